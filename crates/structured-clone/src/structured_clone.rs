//! Structured Clone Algorithm
//!
//! Deep-copies a value graph while preserving its shape.
//! See: https://html.spec.whatwg.org/multipage/structured-data.html
//!
//! Key features:
//! - Handles circular references
//! - Preserves object identity within a clone operation
//! - Views sharing one ArrayBuffer keep sharing one cloned buffer
//! - Fails on non-cloneable values (functions, error objects)
//!
//! Containers are registered in `memory` as empty placeholders and filled
//! from an explicit stack of frames instead of by recursion, so graph depth
//! never grows the native stack. A newly registered child container is
//! finished before its parent moves on, which visits the graph in the same
//! order as recursive descent.

use crate::array::JsArray;
use crate::array_buffer::JsArrayBuffer;
use crate::date::JsDate;
use crate::error::{CloneResult, StructuredCloneError};
use crate::handle::Handle;
use crate::map_data::{JsMap, JsSet};
use crate::object::{JsObject, PropertyKey};
use crate::value::Value;
use rustc_hash::FxHashMap;

/// A registered container being filled, with a snapshot of its source
/// children and the index of the next child to clone
enum Frame {
    Array {
        source: Vec<Option<Value>>,
        target: Handle<JsArray>,
        next: usize,
    },
    Object {
        source: Vec<(PropertyKey, Value)>,
        target: Handle<JsObject>,
        next: usize,
    },
    Map {
        source: Vec<(Value, Value)>,
        target: Handle<JsMap>,
        next: usize,
        /// Clone of the current entry's key, once it has been taken
        key: Option<Value>,
    },
    Set {
        source: Vec<Value>,
        target: Handle<JsSet>,
        next: usize,
    },
}

/// Outcome of advancing a frame by one child
enum Step {
    /// Every child has been cloned
    Done,
    /// More children remain
    Next,
    /// The child was a new container; fill it before the parent continues
    Descend(Frame),
}

impl Step {
    fn after(child: Option<Frame>) -> Self {
        child.map_or(Step::Next, Step::Descend)
    }
}

/// Performs the structured clone algorithm
///
/// A cloner can be reused; its memory is emptied after every call, so
/// separate calls never share clones.
#[derive(Default)]
pub struct StructuredCloner {
    /// Map from source address to cloned value (for shared and circular references)
    memory: FxHashMap<usize, Value>,
    /// Containers registered in `memory` whose children are not all cloned yet
    frames: Vec<Frame>,
}

impl StructuredCloner {
    /// Create a new cloner
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone a value using the structured clone algorithm
    pub fn clone(&mut self, value: &Value) -> CloneResult<Value> {
        #[cfg(feature = "clone_logging")]
        let start = std::time::Instant::now();

        let result = self.clone_graph(value);

        #[cfg(feature = "clone_logging")]
        match &result {
            Ok(_) => tracing::debug!(
                target: "otter::clone",
                composites = self.memory.len(),
                elapsed_us = start.elapsed().as_micros() as u64,
                "structured clone complete"
            ),
            Err(err) => tracing::debug!(
                target: "otter::clone",
                kind = err.kind(),
                composites = self.memory.len(),
                "structured clone aborted"
            ),
        }

        if result.is_err() {
            self.discard_partial();
        }
        self.memory.clear();
        self.frames.clear();
        result
    }

    fn clone_graph(&mut self, value: &Value) -> CloneResult<Value> {
        let (root, frame) = self.internal_clone(value)?;
        self.frames.extend(frame);

        while let Some(mut frame) = self.frames.pop() {
            match self.step(&mut frame)? {
                Step::Done => {}
                Step::Next => self.frames.push(frame),
                Step::Descend(child) => {
                    self.frames.push(frame);
                    self.frames.push(child);
                }
            }
        }
        Ok(root)
    }

    /// Clone one value. A new container comes back registered but empty,
    /// together with the frame that fills it.
    fn internal_clone(&mut self, value: &Value) -> CloneResult<(Value, Option<Frame>)> {
        let Some(addr) = value.heap_addr() else {
            // Primitives are copied by value and never enter memory
            return Ok((value.clone(), None));
        };

        // Shared or circular reference
        if let Some(cloned) = self.memory.get(&addr) {
            return Ok((cloned.clone(), None));
        }

        let (cloned, frame) = match value {
            Value::Function(_) => return Err(StructuredCloneError::unsupported("function")),
            Value::Error(_) => return Err(StructuredCloneError::unsupported("error")),

            Value::Date(date) => (Value::from(JsDate::from_millis(date.time_value())), None),
            Value::RegExp(regexp) => (Value::from(regexp.duplicate()), None),
            Value::ArrayBuffer(buffer) => (Value::ArrayBuffer(self.clone_buffer(buffer)), None),
            Value::TypedArray(view) => {
                let buffer = self.clone_buffer(view.buffer());
                (Value::from(view.rebind(buffer)), None)
            }
            Value::DataView(view) => {
                let buffer = self.clone_buffer(view.buffer());
                (Value::from(view.rebind(buffer)), None)
            }

            Value::Array(source) => {
                let target = Handle::new(JsArray::with_length(source.len()));
                let frame = Frame::Array {
                    source: source.slots(),
                    target: target.clone(),
                    next: 0,
                };
                (Value::Array(target), Some(frame))
            }
            Value::Object(source) => {
                let target = Handle::new(JsObject::new());
                let frame = Frame::Object {
                    source: source.enumerable_entries(),
                    target: target.clone(),
                    next: 0,
                };
                (Value::Object(target), Some(frame))
            }
            Value::Map(source) => {
                let target = Handle::new(JsMap::new());
                let frame = Frame::Map {
                    source: source.entries(),
                    target: target.clone(),
                    next: 0,
                    key: None,
                };
                (Value::Map(target), Some(frame))
            }
            Value::Set(source) => {
                let target = Handle::new(JsSet::new());
                let frame = Frame::Set {
                    source: source.values(),
                    target: target.clone(),
                    next: 0,
                };
                (Value::Set(target), Some(frame))
            }

            Value::Undefined
            | Value::Null
            | Value::Boolean(_)
            | Value::Number(_)
            | Value::BigInt(_)
            | Value::String(_) => return Ok((value.clone(), None)),
        };

        // Register before any child is cloned (to handle circular refs)
        self.memory.insert(addr, cloned.clone());
        Ok((cloned, frame))
    }

    /// Buffers are tracked like any other heap value so that views sharing
    /// a buffer end up sharing its clone.
    fn clone_buffer(&mut self, buffer: &Handle<JsArrayBuffer>) -> Handle<JsArrayBuffer> {
        let addr = buffer.addr();
        if let Some(Value::ArrayBuffer(cloned)) = self.memory.get(&addr) {
            return cloned.clone();
        }

        let cloned = Handle::new(buffer.copy());
        self.memory.insert(addr, Value::ArrayBuffer(cloned.clone()));
        cloned
    }

    /// Clone the next child of `frame`
    fn step(&mut self, frame: &mut Frame) -> CloneResult<Step> {
        match frame {
            Frame::Array {
                source,
                target,
                next,
            } => {
                while let Some(slot) = source.get(*next) {
                    let index = *next;
                    *next += 1;
                    // Holes stay holes
                    if let Some(element) = slot {
                        let (cloned, child) = self.internal_clone(element)?;
                        target.set(index, cloned);
                        return Ok(Step::after(child));
                    }
                }
                Ok(Step::Done)
            }
            Frame::Object {
                source,
                target,
                next,
            } => {
                let Some((key, value)) = source.get(*next) else {
                    return Ok(Step::Done);
                };
                *next += 1;
                let (cloned, child) = self.internal_clone(value)?;
                target.set(key.clone(), cloned);
                Ok(Step::after(child))
            }
            Frame::Map {
                source,
                target,
                next,
                key,
            } => {
                let Some((source_key, source_value)) = source.get(*next) else {
                    return Ok(Step::Done);
                };
                // The key's subtree is finished before the value is visited
                match key.take() {
                    None => {
                        let (cloned_key, child) = self.internal_clone(source_key)?;
                        *key = Some(cloned_key);
                        Ok(Step::after(child))
                    }
                    Some(cloned_key) => {
                        *next += 1;
                        let (cloned_value, child) = self.internal_clone(source_value)?;
                        target.set(cloned_key, cloned_value);
                        Ok(Step::after(child))
                    }
                }
            }
            Frame::Set {
                source,
                target,
                next,
            } => {
                let Some(element) = source.get(*next) else {
                    return Ok(Step::Done);
                };
                *next += 1;
                let (cloned, child) = self.internal_clone(element)?;
                target.add(cloned);
                Ok(Step::after(child))
            }
        }
    }

    /// Empty every container cloned so far, breaking any cycles among them.
    fn discard_partial(&mut self) {
        for cloned in self.memory.values() {
            match cloned {
                Value::Array(arr) => arr.clear(),
                Value::Object(obj) => obj.clear(),
                Value::Map(map) => map.clear(),
                Value::Set(set) => set.clear(),
                _ => {}
            }
        }
    }
}

/// Convenience function to clone a value
pub fn structured_clone(value: &Value) -> CloneResult<Value> {
    StructuredCloner::new().clone(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_view::JsDataView;
    use crate::function::JsFunction;
    use crate::native_error::{ErrorKind, JsError};
    use crate::object::PropertyKey;
    use crate::regexp::JsRegExp;
    use crate::typed_array::{JsTypedArray, TypedArrayKind};

    #[test]
    fn test_clone_primitives() {
        let mut cloner = StructuredCloner::new();

        assert!(cloner.clone(&Value::undefined()).unwrap().is_undefined());
        assert!(cloner.clone(&Value::null()).unwrap().is_null());
        assert_eq!(
            cloner.clone(&Value::boolean(true)).unwrap().as_boolean(),
            Some(true)
        );
        assert_eq!(
            cloner.clone(&Value::int32(42)).unwrap().as_number(),
            Some(42.0)
        );
        assert_eq!(
            cloner.clone(&Value::bigint(-12)).unwrap(),
            Value::bigint(-12)
        );
        assert!(cloner.memory.is_empty());
    }

    #[test]
    fn test_clone_nan() {
        let cloned = structured_clone(&Value::nan()).unwrap();
        assert!(cloned.is_nan());
        assert_ne!(cloned, structured_clone(&Value::nan()).unwrap());
    }

    #[test]
    fn test_clone_string() {
        let cloned = structured_clone(&Value::string("hello")).unwrap();
        assert_eq!(cloned.as_str(), Some("hello"));
    }

    #[test]
    fn test_clone_object() {
        let obj = Handle::new(JsObject::new());
        obj.set("x", Value::int32(1));
        obj.set("y", Value::int32(2));

        let val = Value::Object(obj.clone());
        let cloned = structured_clone(&val).unwrap();

        let cloned_obj = cloned.as_object().unwrap();
        assert!(!cloned_obj.ptr_eq(&obj));
        assert_eq!(
            cloned_obj.get(&PropertyKey::string("x")),
            Some(Value::int32(1))
        );
        assert_eq!(
            cloned_obj.get(&PropertyKey::string("y")),
            Some(Value::int32(2))
        );
    }

    #[test]
    fn test_function_not_cloneable() {
        let func = Value::from(JsFunction::new("f", |_| Value::undefined()));
        let result = structured_clone(&func);
        assert!(matches!(
            result,
            Err(StructuredCloneError::UnsupportedType("function"))
        ));
    }

    #[test]
    fn test_error_not_cloneable() {
        let err = Value::from(JsError::new(ErrorKind::Error, ""));
        assert_eq!(
            structured_clone(&err).unwrap_err(),
            StructuredCloneError::UnsupportedType("error")
        );
    }

    #[test]
    fn test_clone_regexp_resets_last_index() {
        let re = Handle::new(JsRegExp::new("ab+c", "gi").unwrap());
        re.set_last_index(3);
        let cloned = structured_clone(&Value::RegExp(re.clone())).unwrap();
        let cloned_re = cloned.as_regexp().unwrap();
        assert!(!cloned_re.ptr_eq(&re));
        assert_eq!(cloned_re.source(), "ab+c");
        assert_eq!(cloned_re.flags(), "gi");
        assert_eq!(cloned_re.last_index(), 0);
    }

    #[test]
    fn test_clone_typed_array_copies_underlying_buffer() {
        let buffer = Handle::new(JsArrayBuffer::new(8));
        let ta = JsTypedArray::new(buffer, TypedArrayKind::Int16, 2, 2).unwrap();
        let ta = Handle::new(ta);
        assert!(ta.set(0, 10.0));
        assert!(ta.set(1, 20.0));

        let cloned_val = structured_clone(&Value::TypedArray(ta.clone())).unwrap();
        let cloned_ta = cloned_val.as_typed_array().unwrap();

        assert_eq!(cloned_ta.kind(), TypedArrayKind::Int16);
        assert_eq!(cloned_ta.byte_offset(), 2);
        assert_eq!(cloned_ta.length(), 2);
        assert_eq!(cloned_ta.buffer().byte_length(), 8);
        assert_eq!(cloned_ta.get(0), Some(10.0));
        assert_eq!(cloned_ta.get(1), Some(20.0));

        assert!(cloned_ta.set(0, 99.0));
        assert_eq!(cloned_ta.get(0), Some(99.0));
        assert_eq!(ta.get(0), Some(10.0));
    }

    #[test]
    fn test_clone_data_view_copies_underlying_buffer() {
        let buffer = Handle::new(JsArrayBuffer::new(8));
        let dv = Handle::new(JsDataView::new(buffer, 1, Some(4)).unwrap());
        dv.set_uint8(0, 11).unwrap();
        dv.set_uint8(1, 22).unwrap();

        let cloned_val = structured_clone(&Value::DataView(dv.clone())).unwrap();
        let cloned_dv = cloned_val.as_data_view().unwrap();

        assert_eq!(cloned_dv.byte_offset(), 1);
        assert_eq!(cloned_dv.byte_length(), 4);
        assert_eq!(cloned_dv.get_uint8(0).unwrap(), 11);
        assert_eq!(cloned_dv.get_uint8(1).unwrap(), 22);

        cloned_dv.set_uint8(0, 99).unwrap();
        assert_eq!(cloned_dv.get_uint8(0).unwrap(), 99);
        assert_eq!(dv.get_uint8(0).unwrap(), 11);
    }

    #[test]
    fn test_views_sharing_a_buffer_share_its_clone() {
        let buffer = Handle::new(JsArrayBuffer::new(16));
        let wide = Value::from(
            JsTypedArray::new(buffer.clone(), TypedArrayKind::Int32, 4, 2).unwrap(),
        );
        let narrow = Value::from(JsDataView::new(buffer.clone(), 0, None).unwrap());
        let root = Value::from(JsArray::from_values([
            wide,
            narrow,
            Value::ArrayBuffer(buffer.clone()),
        ]));

        let cloned = structured_clone(&root).unwrap();
        let arr = cloned.as_array().unwrap();
        let wide = arr.get(0).unwrap();
        let narrow = arr.get(1).unwrap();
        let raw = arr.get(2).unwrap();
        let raw = raw.as_array_buffer().unwrap();

        assert!(!raw.ptr_eq(&buffer));
        assert!(wide.as_typed_array().unwrap().buffer().ptr_eq(raw));
        assert!(narrow.as_data_view().unwrap().buffer().ptr_eq(raw));

        narrow.as_data_view().unwrap().set_uint8(4, 7).unwrap();
        assert_eq!(wide.as_typed_array().unwrap().get(0), Some(7.0));
        assert_eq!(buffer.get(4), Some(0));
    }

    #[test]
    fn test_circular_array() {
        let circular = Handle::new(JsArray::new());
        circular.push(Value::Array(circular.clone()));

        let cloned = structured_clone(&Value::Array(circular.clone())).unwrap();
        let cloned_arr = cloned.as_array().unwrap();
        assert_eq!(cloned_arr.len(), 1);
        assert_eq!(cloned_arr.get(0), Some(cloned.clone()));
        assert_ne!(cloned, Value::Array(circular.clone()));

        cloned_arr.clear();
        circular.clear();
    }

    #[test]
    fn test_failure_releases_partial_clone() {
        let shared = Handle::new(JsArray::from_values([Value::int32(1)]));
        let root = Handle::new(JsObject::new());
        root.set("self", Value::Object(root.clone()));
        root.set("list", Value::Array(shared.clone()));
        root.set("callback", Value::from(JsFunction::new("cb", |_| Value::null())));

        let before = shared.ref_count();
        let mut cloner = StructuredCloner::new();
        let err = cloner.clone(&Value::Object(root.clone())).unwrap_err();
        assert_eq!(err.kind(), "function");
        assert!(cloner.memory.is_empty());
        assert!(cloner.frames.is_empty());
        assert_eq!(shared.ref_count(), before);

        // The cloner stays usable after a failure
        let ok = cloner.clone(&Value::Array(shared.clone())).unwrap();
        assert_eq!(ok.as_array().unwrap().get(0), Some(Value::int32(1)));

        root.clear();
    }

    #[test]
    fn test_first_unsupported_value_in_depth_first_order_is_reported() {
        let func = || Value::from(JsFunction::new("f", |_| Value::undefined()));
        let err = || Value::from(JsError::new(ErrorKind::TypeError, "bad"));
        let arr = |values: Vec<Value>| Value::from(JsArray::from_values(values));

        // [[f], err]: the function sits inside the first child
        let shallow = arr(vec![arr(vec![func()]), err()]);
        assert_eq!(structured_clone(&shallow).unwrap_err().kind(), "function");

        // [[[f]], [err]]
        let nested = arr(vec![arr(vec![arr(vec![func()])]), arr(vec![err()])]);
        assert_eq!(structured_clone(&nested).unwrap_err().kind(), "function");

        // [[err], f]
        let reversed = arr(vec![arr(vec![err()]), func()]);
        assert_eq!(structured_clone(&reversed).unwrap_err().kind(), "error");
    }

    #[test]
    fn test_map_key_subtree_is_visited_before_its_value() {
        let key = Value::from(JsObject::from_entries([(
            "inner",
            Value::from(JsArray::from_values([Value::from(JsError::new(
                ErrorKind::Error,
                "",
            ))])),
        )]));
        let value = Value::from(JsFunction::new("f", |_| Value::null()));
        let map = Value::from(JsMap::from_entries([(key, value)]));
        assert_eq!(structured_clone(&map).unwrap_err().kind(), "error");
    }

    #[test]
    fn test_calls_do_not_share_memory() {
        let obj = Value::from(JsObject::new());
        let mut cloner = StructuredCloner::new();
        let first = cloner.clone(&obj).unwrap();
        let second = cloner.clone(&obj).unwrap();
        assert_ne!(first, second);
    }
}
