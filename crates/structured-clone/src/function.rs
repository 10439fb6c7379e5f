//! Callable values
//!
//! Functions carry behavior, not data, so they can be invoked but never
//! cloned.

use crate::value::Value;
use std::rc::Rc;

/// Native function body
pub type NativeFn = Rc<dyn Fn(&[Value]) -> Value>;

/// A callable value
pub struct JsFunction {
    name: String,
    func: NativeFn,
}

impl JsFunction {
    /// Create a named function from a closure
    pub fn new<F>(name: &str, f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + 'static,
    {
        Self {
            name: name.to_string(),
            func: Rc::new(f),
        }
    }

    /// Function name (empty for anonymous functions)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the function
    pub fn call(&self, args: &[Value]) -> Value {
        (self.func)(args)
    }
}

impl std::fmt::Debug for JsFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JsFunction({})", self.name)
    }
}
