//! JavaScript-style values
//!
//! [`Value`] is a closed union over primitives and heap handles. Primitives are
//! plain data with no identity; every other variant wraps a [`Handle`] whose
//! address identifies the object.
//!
//! ## Equality
//!
//! `PartialEq` follows strict equality (`===`):
//! - numbers compare numerically, so `NaN != NaN` and `0 == -0`
//! - strings and BigInts compare by content
//! - heap values compare by identity
//!
//! Use [`crate::compare::deep_equal`] for structural comparison.

use crate::array::JsArray;
use crate::array_buffer::JsArrayBuffer;
use crate::data_view::JsDataView;
use crate::date::JsDate;
use crate::function::JsFunction;
use crate::handle::Handle;
use crate::map_data::{JsMap, JsSet};
use crate::native_error::JsError;
use crate::object::JsObject;
use crate::regexp::JsRegExp;
use crate::typed_array::JsTypedArray;
use num_bigint::BigInt;
use std::rc::Rc;

/// A value that can appear in a cloneable graph
#[derive(Clone)]
pub enum Value {
    /// `undefined`
    Undefined,
    /// `null`
    Null,
    /// Boolean primitive
    Boolean(bool),
    /// Number primitive (IEEE 754 double, NaN included)
    Number(f64),
    /// Arbitrary-precision integer primitive
    BigInt(Rc<BigInt>),
    /// String primitive (immutable, shared storage)
    String(Rc<str>),
    /// Date object
    Date(Handle<JsDate>),
    /// RegExp object
    RegExp(Handle<JsRegExp>),
    /// Raw binary buffer
    ArrayBuffer(Handle<JsArrayBuffer>),
    /// Typed numeric view over an ArrayBuffer
    TypedArray(Handle<JsTypedArray>),
    /// Byte-level view over an ArrayBuffer
    DataView(Handle<JsDataView>),
    /// Ordered sequence
    Array(Handle<JsArray>),
    /// Plain keyed record
    Object(Handle<JsObject>),
    /// Insertion-ordered key/value collection
    Map(Handle<JsMap>),
    /// Insertion-ordered unique-element collection
    Set(Handle<JsSet>),
    /// Callable value
    Function(Handle<JsFunction>),
    /// Platform error object
    Error(Handle<JsError>),
}

impl Value {
    /// Create undefined value
    #[inline]
    pub const fn undefined() -> Self {
        Value::Undefined
    }

    /// Create null value
    #[inline]
    pub const fn null() -> Self {
        Value::Null
    }

    /// Create boolean value
    #[inline]
    pub const fn boolean(b: bool) -> Self {
        Value::Boolean(b)
    }

    /// Create number value
    #[inline]
    pub const fn number(n: f64) -> Self {
        Value::Number(n)
    }

    /// Create NaN value explicitly
    #[inline]
    pub const fn nan() -> Self {
        Value::Number(f64::NAN)
    }

    /// Create 32-bit integer value (stored as a number)
    #[inline]
    pub fn int32(n: i32) -> Self {
        Value::Number(n as f64)
    }

    /// Create string value
    pub fn string(s: &str) -> Self {
        Value::String(Rc::from(s))
    }

    /// Create BigInt value
    pub fn bigint(n: impl Into<BigInt>) -> Self {
        Value::BigInt(Rc::new(n.into()))
    }

    /// Whether this value is a primitive (has no identity)
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Value::Undefined
                | Value::Null
                | Value::Boolean(_)
                | Value::Number(_)
                | Value::BigInt(_)
                | Value::String(_)
        )
    }

    /// Check if undefined
    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Check if null
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this is the NaN number
    #[inline]
    pub fn is_nan(&self) -> bool {
        matches!(self, Value::Number(n) if n.is_nan())
    }

    /// Check if callable
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    /// Get as boolean
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(&**s),
            _ => None,
        }
    }

    /// Get as BigInt
    pub fn as_bigint(&self) -> Option<&BigInt> {
        match self {
            Value::BigInt(b) => Some(&**b),
            _ => None,
        }
    }

    /// Get as Date
    pub fn as_date(&self) -> Option<&Handle<JsDate>> {
        match self {
            Value::Date(d) => Some(d),
            _ => None,
        }
    }

    /// Get as RegExp
    pub fn as_regexp(&self) -> Option<&Handle<JsRegExp>> {
        match self {
            Value::RegExp(r) => Some(r),
            _ => None,
        }
    }

    /// Get as ArrayBuffer
    pub fn as_array_buffer(&self) -> Option<&Handle<JsArrayBuffer>> {
        match self {
            Value::ArrayBuffer(ab) => Some(ab),
            _ => None,
        }
    }

    /// Get as TypedArray
    pub fn as_typed_array(&self) -> Option<&Handle<JsTypedArray>> {
        match self {
            Value::TypedArray(ta) => Some(ta),
            _ => None,
        }
    }

    /// Get as DataView
    pub fn as_data_view(&self) -> Option<&Handle<JsDataView>> {
        match self {
            Value::DataView(dv) => Some(dv),
            _ => None,
        }
    }

    /// Get as Array
    pub fn as_array(&self) -> Option<&Handle<JsArray>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get as plain object
    pub fn as_object(&self) -> Option<&Handle<JsObject>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Get as Map
    pub fn as_map(&self) -> Option<&Handle<JsMap>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Get as Set
    pub fn as_set(&self) -> Option<&Handle<JsSet>> {
        match self {
            Value::Set(s) => Some(s),
            _ => None,
        }
    }

    /// Get as function
    pub fn as_function(&self) -> Option<&Handle<JsFunction>> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Get as error object
    pub fn as_error(&self) -> Option<&Handle<JsError>> {
        match self {
            Value::Error(e) => Some(e),
            _ => None,
        }
    }

    /// Identity of a heap value (its address). `None` for primitives.
    pub fn heap_addr(&self) -> Option<usize> {
        match self {
            Value::Undefined
            | Value::Null
            | Value::Boolean(_)
            | Value::Number(_)
            | Value::BigInt(_)
            | Value::String(_) => None,
            Value::Date(h) => Some(h.addr()),
            Value::RegExp(h) => Some(h.addr()),
            Value::ArrayBuffer(h) => Some(h.addr()),
            Value::TypedArray(h) => Some(h.addr()),
            Value::DataView(h) => Some(h.addr()),
            Value::Array(h) => Some(h.addr()),
            Value::Object(h) => Some(h.addr()),
            Value::Map(h) => Some(h.addr()),
            Value::Set(h) => Some(h.addr()),
            Value::Function(h) => Some(h.addr()),
            Value::Error(h) => Some(h.addr()),
        }
    }

    /// Name of the value's kind, as used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::String(_) => "string",
            Value::Date(_) => "Date",
            Value::RegExp(_) => "RegExp",
            Value::ArrayBuffer(_) => "ArrayBuffer",
            Value::TypedArray(ta) => ta.kind().name(),
            Value::DataView(_) => "DataView",
            Value::Array(_) => "Array",
            Value::Object(_) => "Object",
            Value::Map(_) => "Map",
            Value::Set(_) => "Set",
            Value::Function(_) => "function",
            Value::Error(_) => "error",
        }
    }

    /// `typeof` result
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::String(_) => "string",
            Value::Function(_) => "function",
            _ => "object",
        }
    }

    /// Strict equality (`===`)
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            _ => match (self.heap_addr(), other.heap_addr()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    /// SameValue: like strict equality but `NaN` equals `NaN` and `+0` differs from `-0`
    pub fn same_value(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => {
                if a.is_nan() && b.is_nan() {
                    return true;
                }
                a == b && a.is_sign_negative() == b.is_sign_negative()
            }
            _ => self.strict_equals(other),
        }
    }

    /// SameValueZero: like SameValue but `+0` equals `-0` (Map/Set key equality)
    pub fn same_value_zero(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => (a.is_nan() && b.is_nan()) || a == b,
            _ => self.strict_equals(other),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.strict_equals(other)
    }
}

// Heap values print shallowly so that cyclic graphs can be formatted.
impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::BigInt(b) => write!(f, "{}n", b),
            Value::String(s) => write!(f, "{:?}", s),
            other => match other.heap_addr() {
                Some(addr) => write!(f, "[{} @{:#x}]", other.kind_name(), addr),
                None => write!(f, "[{}]", other.kind_name()),
            },
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::int32(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Rc::from(s))
    }
}

macro_rules! heap_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(inner: $ty) -> Self {
                    Value::$variant(Handle::new(inner))
                }
            }

            impl From<Handle<$ty>> for Value {
                fn from(handle: Handle<$ty>) -> Self {
                    Value::$variant(handle)
                }
            }
        )*
    };
}

heap_value_from! {
    JsDate => Date,
    JsRegExp => RegExp,
    JsArrayBuffer => ArrayBuffer,
    JsTypedArray => TypedArray,
    JsDataView => DataView,
    JsArray => Array,
    JsObject => Object,
    JsMap => Map,
    JsSet => Set,
    JsFunction => Function,
    JsError => Error,
}
