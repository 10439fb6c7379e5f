//! Arrays
//!
//! Slots are `Option<Value>`: `None` is a hole, which is distinct from a slot
//! holding `undefined`.

use crate::value::Value;
use std::cell::RefCell;

/// A JavaScript array
#[derive(Debug, Default)]
pub struct JsArray {
    elements: RefCell<Vec<Option<Value>>>,
}

impl JsArray {
    /// Create an empty array
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an array of `len` holes
    pub fn with_length(len: usize) -> Self {
        Self {
            elements: RefCell::new(vec![None; len]),
        }
    }

    /// Create a dense array from values
    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            elements: RefCell::new(values.into_iter().map(Some).collect()),
        }
    }

    /// Array length (holes included)
    pub fn len(&self) -> usize {
        self.elements.borrow().len()
    }

    /// Whether the array has length 0
    pub fn is_empty(&self) -> bool {
        self.elements.borrow().is_empty()
    }

    /// Get the element at `index`. `None` for holes and out-of-range indices.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.elements.borrow().get(index).cloned().flatten()
    }

    /// Whether `index` is within the length but holds no element
    pub fn is_hole(&self, index: usize) -> bool {
        matches!(self.elements.borrow().get(index), Some(None))
    }

    /// Set the element at `index`, growing the array with holes if needed
    pub fn set(&self, index: usize, value: Value) {
        let mut elements = self.elements.borrow_mut();
        if index >= elements.len() {
            elements.resize(index + 1, None);
        }
        elements[index] = Some(value);
    }

    /// Append an element
    pub fn push(&self, value: Value) {
        self.elements.borrow_mut().push(Some(value));
    }

    /// Snapshot of every slot in index order
    pub fn slots(&self) -> Vec<Option<Value>> {
        self.elements.borrow().clone()
    }

    /// Truncate to length 0
    pub fn clear(&self) {
        self.elements.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_past_end_leaves_holes() {
        let arr = JsArray::new();
        arr.set(3, Value::int32(9));
        assert_eq!(arr.len(), 4);
        assert!(arr.is_hole(0));
        assert!(arr.is_hole(2));
        assert!(!arr.is_hole(3));
        assert_eq!(arr.get(3), Some(Value::int32(9)));
    }

    #[test]
    fn test_undefined_is_not_a_hole() {
        let arr = JsArray::from_values([Value::undefined()]);
        assert!(!arr.is_hole(0));
        assert_eq!(arr.get(0), Some(Value::undefined()));
        assert!(!arr.is_hole(1));
        assert_eq!(arr.get(1), None);
    }
}
