//! Platform error objects

/// Native error constructor kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// `Error`
    Error,
    /// `EvalError`
    EvalError,
    /// `RangeError`
    RangeError,
    /// `ReferenceError`
    ReferenceError,
    /// `SyntaxError`
    SyntaxError,
    /// `TypeError`
    TypeError,
    /// `URIError`
    URIError,
}

impl ErrorKind {
    /// Constructor name
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::Error => "Error",
            ErrorKind::EvalError => "EvalError",
            ErrorKind::RangeError => "RangeError",
            ErrorKind::ReferenceError => "ReferenceError",
            ErrorKind::SyntaxError => "SyntaxError",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::URIError => "URIError",
        }
    }
}

/// A platform error value (`new Error(...)`)
#[derive(Debug)]
pub struct JsError {
    kind: ErrorKind,
    message: String,
}

impl JsError {
    /// Create an error object
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Constructor name, e.g. `TypeError`
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for JsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.name())
        } else {
            write!(f, "{}: {}", self.name(), self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(JsError::new(ErrorKind::Error, "").to_string(), "Error");
        assert_eq!(
            JsError::new(ErrorKind::TypeError, "bad").to_string(),
            "TypeError: bad"
        );
    }
}
