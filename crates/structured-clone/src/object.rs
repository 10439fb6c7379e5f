//! Plain records
//!
//! A [`JsObject`] is an insertion-ordered mapping from [`PropertyKey`] to
//! [`Value`]. Each property carries an `enumerable` flag; only enumerable
//! properties take part in cloning and structural comparison.

use crate::value::Value;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SYMBOL_ID: AtomicU64 = AtomicU64::new(1);

/// A unique symbol usable as a property key
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Symbol {
    /// Unique ID
    pub id: u64,
    /// Symbol description
    pub description: Option<String>,
}

impl Symbol {
    /// Create a fresh symbol, distinct from every other symbol
    pub fn new(description: Option<&str>) -> Rc<Self> {
        Rc::new(Self {
            id: NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed),
            description: description.map(str::to_string),
        })
    }
}

/// Property key of a plain record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    /// String property key
    String(Rc<str>),
    /// Symbol property key
    Symbol(Rc<Symbol>),
}

impl PropertyKey {
    /// Create a string property key
    pub fn string(s: &str) -> Self {
        Self::String(Rc::from(s))
    }

    /// Create a symbol property key
    pub fn symbol(sym: Rc<Symbol>) -> Self {
        Self::Symbol(sym)
    }

    /// Get the string form, if this is a string key
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Symbol(_) => None,
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        Self::string(s)
    }
}

#[derive(Debug, Clone)]
struct Property {
    value: Value,
    enumerable: bool,
}

/// A plain JavaScript object
#[derive(Debug, Default)]
pub struct JsObject {
    properties: RefCell<IndexMap<PropertyKey, Property>>,
}

impl JsObject {
    /// Create an empty object
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an object from `(key, value)` pairs, all enumerable
    pub fn from_entries<K, I>(entries: I) -> Self
    where
        K: Into<PropertyKey>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let obj = Self::new();
        for (key, value) in entries {
            obj.set(key, value);
        }
        obj
    }

    /// Set an enumerable data property. Existing keys keep their position.
    pub fn set(&self, key: impl Into<PropertyKey>, value: Value) {
        self.define(key, value, true);
    }

    /// Define a data property with explicit enumerability
    pub fn define(&self, key: impl Into<PropertyKey>, value: Value, enumerable: bool) {
        self.properties
            .borrow_mut()
            .insert(key.into(), Property { value, enumerable });
    }

    /// Get an own property value
    pub fn get(&self, key: &PropertyKey) -> Option<Value> {
        self.properties.borrow().get(key).map(|p| p.value.clone())
    }

    /// Check whether an own property exists
    pub fn has(&self, key: &PropertyKey) -> bool {
        self.properties.borrow().contains_key(key)
    }

    /// Whether an own property exists and is enumerable
    pub fn is_enumerable(&self, key: &PropertyKey) -> bool {
        self.properties
            .borrow()
            .get(key)
            .is_some_and(|p| p.enumerable)
    }

    /// Delete an own property. Returns `true` if it existed.
    pub fn delete(&self, key: &PropertyKey) -> bool {
        self.properties.borrow_mut().shift_remove(key).is_some()
    }

    /// All own keys in insertion order (enumerable or not)
    pub fn own_keys(&self) -> Vec<PropertyKey> {
        self.properties.borrow().keys().cloned().collect()
    }

    /// Own enumerable properties in insertion order
    pub fn enumerable_entries(&self) -> Vec<(PropertyKey, Value)> {
        self.properties
            .borrow()
            .iter()
            .filter(|(_, p)| p.enumerable)
            .map(|(k, p)| (k.clone(), p.value.clone()))
            .collect()
    }

    /// Number of own properties
    pub fn len(&self) -> usize {
        self.properties.borrow().len()
    }

    /// Whether the object has no own properties
    pub fn is_empty(&self) -> bool {
        self.properties.borrow().is_empty()
    }

    /// Remove every property
    pub fn clear(&self) {
        self.properties.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_survives_overwrite() {
        let obj = JsObject::new();
        obj.set("b", Value::int32(1));
        obj.set("a", Value::int32(2));
        obj.set("b", Value::int32(3));

        let keys: Vec<_> = obj
            .own_keys()
            .iter()
            .filter_map(|k| k.as_str().map(str::to_string))
            .collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(obj.get(&"b".into()), Some(Value::int32(3)));
    }

    #[test]
    fn test_enumerable_entries_skip_hidden() {
        let obj = JsObject::new();
        obj.set("shown", Value::boolean(true));
        obj.define("hidden", Value::boolean(false), false);

        let entries = obj.enumerable_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, PropertyKey::string("shown"));
        assert!(obj.has(&"hidden".into()));
        assert!(!obj.is_enumerable(&"hidden".into()));
    }

    #[test]
    fn test_symbols_are_unique() {
        let a = Symbol::new(Some("tag"));
        let b = Symbol::new(Some("tag"));
        assert_ne!(PropertyKey::symbol(a.clone()), PropertyKey::symbol(b));

        let obj = JsObject::new();
        obj.set(PropertyKey::symbol(a.clone()), Value::int32(1));
        assert_eq!(obj.get(&PropertyKey::symbol(a)), Some(Value::int32(1)));
    }

    #[test]
    fn test_delete() {
        let obj = JsObject::from_entries([("x", Value::null())]);
        assert!(obj.delete(&"x".into()));
        assert!(!obj.delete(&"x".into()));
        assert!(obj.is_empty());
    }
}
