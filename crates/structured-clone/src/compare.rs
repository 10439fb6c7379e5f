//! Structural comparison of value graphs
//!
//! [`deep_equal`] answers "do these two graphs have the same shape and
//! leaves?", which is what a correct clone must satisfy. Identity is ignored
//! except for functions and error objects, which have no structure to compare.

use crate::value::Value;
use rustc_hash::FxHashSet;

/// Structural equality of two values.
///
/// - primitives compare with SameValue (`NaN` equals `NaN`, `+0` differs from `-0`)
/// - containers compare element by element in enumeration order; for records
///   only enumerable properties count, and holes only match holes
/// - pairs already under comparison are assumed equal, so cyclic graphs of
///   the same shape compare equal
///
/// The walk is recursive; very deep graphs need a large stack.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    DeepEqual::default().eq(a, b)
}

#[derive(Default)]
struct DeepEqual {
    in_progress: FxHashSet<(usize, usize)>,
}

fn same_time(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || a == b
}

impl DeepEqual {
    fn eq(&mut self, a: &Value, b: &Value) -> bool {
        match (a.heap_addr(), b.heap_addr()) {
            (None, None) => return a.same_value(b),
            (Some(x), Some(y)) => {
                if x == y || !self.in_progress.insert((x, y)) {
                    return true;
                }
            }
            _ => return false,
        }

        match (a, b) {
            (Value::Date(x), Value::Date(y)) => same_time(x.time_value(), y.time_value()),
            (Value::RegExp(x), Value::RegExp(y)) => {
                x.source() == y.source() && x.flag_set() == y.flag_set()
            }
            (Value::ArrayBuffer(x), Value::ArrayBuffer(y)) => x.to_vec() == y.to_vec(),
            (Value::TypedArray(x), Value::TypedArray(y)) => {
                x.kind() == y.kind()
                    && x.byte_offset() == y.byte_offset()
                    && x.length() == y.length()
                    && x.bytes() == y.bytes()
            }
            (Value::DataView(x), Value::DataView(y)) => {
                x.byte_offset() == y.byte_offset()
                    && x.byte_length() == y.byte_length()
                    && x.bytes() == y.bytes()
            }
            (Value::Array(x), Value::Array(y)) => {
                let (xs, ys) = (x.slots(), y.slots());
                xs.len() == ys.len()
                    && xs.iter().zip(&ys).all(|pair| match pair {
                        (None, None) => true,
                        (Some(l), Some(r)) => self.eq(l, r),
                        _ => false,
                    })
            }
            (Value::Object(x), Value::Object(y)) => {
                let (xs, ys) = (x.enumerable_entries(), y.enumerable_entries());
                xs.len() == ys.len()
                    && xs
                        .iter()
                        .zip(&ys)
                        .all(|((lk, lv), (rk, rv))| lk == rk && self.eq(lv, rv))
            }
            (Value::Map(x), Value::Map(y)) => {
                let (xs, ys) = (x.entries(), y.entries());
                xs.len() == ys.len()
                    && xs
                        .iter()
                        .zip(&ys)
                        .all(|((lk, lv), (rk, rv))| self.eq(lk, rk) && self.eq(lv, rv))
            }
            (Value::Set(x), Value::Set(y)) => {
                let (xs, ys) = (x.values(), y.values());
                xs.len() == ys.len() && xs.iter().zip(&ys).all(|(l, r)| self.eq(l, r))
            }
            // Functions and errors only equal themselves, handled above
            _ => false,
        }
    }
}
