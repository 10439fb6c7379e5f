//! # Structured Clone
//!
//! Deep copies of JavaScript-style value graphs.
//!
//! ## Design Principles
//!
//! - **Closed value model**: [`Value`] is an enum over primitives and heap handles
//! - **Identity by address**: heap values are [`Handle`]s; sharing and cycles
//!   in the input are reproduced exactly in the clone
//! - **Constant stack**: containers are filled from an explicit frame stack, not by recursion
//! - **All or nothing**: a function or error object anywhere in the graph fails
//!   the whole clone
//!
//! ```ignore
//! use structured_clone::{structured_clone, JsArray, Value};
//!
//! let original = Value::from(JsArray::from_values([Value::int32(1)]));
//! let copy = structured_clone(&original)?;
//! ```

#![warn(clippy::all)]
#![warn(missing_docs)]

pub mod array;
pub mod array_buffer;
pub mod compare;
pub mod data_view;
pub mod date;
pub mod error;
pub mod function;
pub mod handle;
pub mod map_data;
pub mod native_error;
pub mod object;
pub mod regexp;
pub mod structured_clone;
pub mod typed_array;
pub mod value;

pub use array::JsArray;
pub use array_buffer::JsArrayBuffer;
pub use compare::deep_equal;
pub use data_view::JsDataView;
pub use date::JsDate;
pub use error::{CloneResult, StructuredCloneError};
pub use function::JsFunction;
pub use handle::Handle;
pub use map_data::{JsMap, JsSet};
pub use native_error::{ErrorKind, JsError};
pub use object::{JsObject, PropertyKey, Symbol};
pub use regexp::{JsRegExp, RegExpFlags};
pub use structured_clone::{StructuredCloner, structured_clone};
pub use typed_array::{JsTypedArray, TypedArrayKind};
pub use value::Value;
