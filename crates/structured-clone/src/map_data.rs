//! Backing data structures for Map and Set.
//!
//! Uses SameValueZero semantics via `MapKey`, insertion-ordered storage
//! with tombstone-based deletion.

use std::cell::RefCell;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHashMap;

use crate::value::Value;

// ============================================================================
// MapKey
// ============================================================================

/// A `Value` hashed and compared with SameValueZero.
///
/// Primitives compare by value (`NaN` equals `NaN`, `-0` equals `+0`);
/// heap values compare by identity.
#[derive(Debug, Clone)]
pub struct MapKey(pub Value);

impl MapKey {
    /// Returns a reference to the underlying `Value`.
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// `-0` becomes `+0`; every other key is unchanged.
    fn normalized(self) -> Self {
        match self.0 {
            Value::Number(n) if n == 0.0 => MapKey(Value::Number(0.0)),
            other => MapKey(other),
        }
    }
}

// Type discriminant tags for hashing
const HASH_TAG_UNDEFINED: u8 = 0;
const HASH_TAG_NULL: u8 = 1;
const HASH_TAG_BOOL: u8 = 2;
const HASH_TAG_FLOAT64: u8 = 4;
const HASH_TAG_STRING: u8 = 5;
const HASH_TAG_BIGINT: u8 = 9;
const HASH_TAG_HEAP: u8 = 14;

/// Normalize a float for SameValueZero hashing: -0 → +0, NaN → canonical NaN bits.
fn normalize_float_bits(n: f64) -> u64 {
    if n == 0.0 {
        0u64
    } else if n.is_nan() {
        0x7FF8_0000_0000_0000u64
    } else {
        n.to_bits()
    }
}

impl Hash for MapKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.0 {
            Value::Undefined => HASH_TAG_UNDEFINED.hash(state),
            Value::Null => HASH_TAG_NULL.hash(state),
            Value::Boolean(b) => {
                HASH_TAG_BOOL.hash(state);
                b.hash(state);
            }
            Value::Number(n) => {
                HASH_TAG_FLOAT64.hash(state);
                normalize_float_bits(*n).hash(state);
            }
            Value::String(s) => {
                HASH_TAG_STRING.hash(state);
                s.hash(state);
            }
            Value::BigInt(b) => {
                HASH_TAG_BIGINT.hash(state);
                b.hash(state);
            }
            heap => {
                HASH_TAG_HEAP.hash(state);
                heap.heap_addr().hash(state);
            }
        }
    }
}

impl PartialEq for MapKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.same_value_zero(&other.0)
    }
}

impl Eq for MapKey {}

// ============================================================================
// MapData
// ============================================================================

/// Insertion-ordered key/value storage shared by `JsMap` and `JsSet`.
///
/// Entries are stored in a `Vec` in insertion order. Deleted entries become
/// `None` (tombstones) so that positions of live entries never shift.
/// A separate hash map provides O(1) key→index lookup.
pub struct MapData {
    inner: RefCell<MapDataInner>,
}

#[derive(Default)]
struct MapDataInner {
    /// Insertion-ordered entries. `None` = tombstone (deleted).
    entries: Vec<Option<(MapKey, Value)>>,
    /// Key → index in `entries` for O(1) lookup.
    index: FxHashMap<MapKey, usize>,
    /// Count of live (non-None) entries.
    size: usize,
}

impl Default for MapData {
    fn default() -> Self {
        Self::new()
    }
}

impl MapData {
    /// Create an empty MapData.
    pub fn new() -> Self {
        Self {
            inner: RefCell::new(MapDataInner::default()),
        }
    }

    /// Number of live entries.
    pub fn size(&self) -> usize {
        self.inner.borrow().size
    }

    /// Get the value associated with `key`, or `None`.
    pub fn get(&self, key: &MapKey) -> Option<Value> {
        let inner = self.inner.borrow();
        if let Some(&idx) = inner.index.get(key)
            && let Some(Some((_, v))) = inner.entries.get(idx)
        {
            return Some(v.clone());
        }
        None
    }

    /// Returns `true` if `key` exists.
    pub fn has(&self, key: &MapKey) -> bool {
        self.inner.borrow().index.contains_key(key)
    }

    /// Insert or update `key` → `value`. Returns `true` if this was an update.
    ///
    /// An update keeps the key stored first. New `-0` keys are stored as `+0`.
    pub fn set(&self, key: MapKey, value: Value) -> bool {
        let mut inner = self.inner.borrow_mut();
        if let Some(&idx) = inner.index.get(&key) {
            // Update in place (preserves insertion order)
            if let Some(Some((_, slot))) = inner.entries.get_mut(idx) {
                *slot = value;
            }
            true
        } else {
            let key = key.normalized();
            let idx = inner.entries.len();
            inner.index.insert(key.clone(), idx);
            inner.entries.push(Some((key, value)));
            inner.size += 1;
            false
        }
    }

    /// Delete `key`. Returns `true` if it existed.
    pub fn delete(&self, key: &MapKey) -> bool {
        let mut inner = self.inner.borrow_mut();
        if let Some(idx) = inner.index.remove(key) {
            inner.entries[idx] = None;
            inner.size -= 1;
            true
        } else {
            false
        }
    }

    /// Remove all entries.
    pub fn clear(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.entries.clear();
        inner.index.clear();
        inner.size = 0;
    }

    /// Snapshot of all live entries in insertion order.
    /// The borrow is released before the caller touches the values.
    pub fn live_entries(&self) -> Vec<(Value, Value)> {
        let inner = self.inner.borrow();
        let mut result = Vec::with_capacity(inner.size);
        for (k, v) in inner.entries.iter().flatten() {
            result.push((k.value().clone(), v.clone()));
        }
        result
    }
}

impl std::fmt::Debug for MapData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        write!(f, "MapData(size={})", inner.size)
    }
}

// ============================================================================
// JsMap / JsSet
// ============================================================================

/// A JavaScript `Map`
#[derive(Debug, Default)]
pub struct JsMap {
    data: MapData,
}

impl JsMap {
    /// Create an empty Map
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a Map from `(key, value)` pairs; later duplicates overwrite earlier ones
    pub fn from_entries(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        let map = Self::new();
        for (key, value) in entries {
            map.set(key, value);
        }
        map
    }

    /// Number of entries
    pub fn size(&self) -> usize {
        self.data.size()
    }

    /// Get the value stored under `key`
    pub fn get(&self, key: &Value) -> Option<Value> {
        self.data.get(&MapKey(key.clone()))
    }

    /// Whether `key` is present
    pub fn has(&self, key: &Value) -> bool {
        self.data.has(&MapKey(key.clone()))
    }

    /// Insert or update. Returns `true` if the key already existed.
    pub fn set(&self, key: Value, value: Value) -> bool {
        self.data.set(MapKey(key), value)
    }

    /// Remove `key`. Returns `true` if it existed.
    pub fn delete(&self, key: &Value) -> bool {
        self.data.delete(&MapKey(key.clone()))
    }

    /// Entries in insertion order
    pub fn entries(&self) -> Vec<(Value, Value)> {
        self.data.live_entries()
    }

    /// Remove all entries
    pub fn clear(&self) {
        self.data.clear();
    }
}

/// A JavaScript `Set`
#[derive(Debug, Default)]
pub struct JsSet {
    data: MapData,
}

impl JsSet {
    /// Create an empty Set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a Set from values; duplicates are dropped
    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        let set = Self::new();
        for value in values {
            set.add(value);
        }
        set
    }

    /// Number of elements
    pub fn size(&self) -> usize {
        self.data.size()
    }

    /// Whether `value` is present
    pub fn has(&self, value: &Value) -> bool {
        self.data.has(&MapKey(value.clone()))
    }

    /// Add a value. Returns `true` if already present (no-op).
    pub fn add(&self, value: Value) -> bool {
        let key = MapKey(value);
        if self.data.has(&key) {
            return true;
        }
        self.data.set(key, Value::Undefined);
        false
    }

    /// Remove `value`. Returns `true` if it existed.
    pub fn delete(&self, value: &Value) -> bool {
        self.data.delete(&MapKey(value.clone()))
    }

    /// Elements in insertion order
    pub fn values(&self) -> Vec<Value> {
        self.data
            .live_entries()
            .into_iter()
            .map(|(k, _)| k)
            .collect()
    }

    /// Remove all elements
    pub fn clear(&self) {
        self.data.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::JsObject;

    #[test]
    fn test_same_value_zero_keys() {
        let map = JsMap::new();
        map.set(Value::nan(), Value::int32(1));
        map.set(Value::number(-0.0), Value::int32(2));

        assert_eq!(map.get(&Value::nan()), Some(Value::int32(1)));
        assert_eq!(map.get(&Value::number(0.0)), Some(Value::int32(2)));
        assert_eq!(map.size(), 2);
    }

    #[test]
    fn test_heap_keys_by_identity() {
        let a = Value::from(JsObject::new());
        let b = Value::from(JsObject::new());
        let map = JsMap::from_entries([(a.clone(), Value::int32(1)), (b.clone(), Value::int32(2))]);

        assert_eq!(map.size(), 2);
        assert_eq!(map.get(&a), Some(Value::int32(1)));
        assert_eq!(map.get(&b), Some(Value::int32(2)));
        assert!(!map.has(&Value::from(JsObject::new())));
    }

    #[test]
    fn test_update_keeps_position_and_delete_tombstones() {
        let map = JsMap::new();
        map.set(Value::string("a"), Value::int32(1));
        map.set(Value::string("b"), Value::int32(2));
        assert!(map.set(Value::string("a"), Value::int32(3)));
        assert!(map.delete(&Value::string("b")));
        map.set(Value::string("c"), Value::int32(4));

        let keys: Vec<_> = map.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![Value::string("a"), Value::string("c")]);
        assert_eq!(map.get(&Value::string("a")), Some(Value::int32(3)));
    }

    #[test]
    fn test_update_keeps_first_key_and_zero_is_normalized() {
        let map = JsMap::new();
        map.set(Value::number(-0.0), Value::int32(1));
        assert!(map.set(Value::number(0.0), Value::int32(2)));

        let (key, value) = map.entries().remove(0);
        assert!(key.same_value(&Value::number(0.0)));
        assert_eq!(value, Value::int32(2));
        assert_eq!(map.size(), 1);

        let positive = JsMap::new();
        positive.set(Value::number(0.0), Value::int32(1));
        assert!(positive.set(Value::number(-0.0), Value::int32(2)));
        let (key, _) = positive.entries().remove(0);
        assert!(key.same_value(&Value::number(0.0)));

        let set = JsSet::new();
        set.add(Value::number(-0.0));
        assert!(set.values()[0].same_value(&Value::number(0.0)));
    }

    #[test]
    fn test_set_dedupes() {
        let set = JsSet::from_values([Value::string("a"), Value::string("a"), Value::int32(0)]);
        assert_eq!(set.size(), 2);
        assert!(set.add(Value::number(-0.0)));
        assert!(set.delete(&Value::string("a")));
        assert_eq!(set.values(), vec![Value::int32(0)]);
    }
}
