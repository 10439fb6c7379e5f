//! Clone error types

use thiserror::Error;

/// Structured clone errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuredCloneError {
    /// The graph reaches a value kind that cannot be cloned (functions, errors)
    #[error("DataCloneError: {0} could not be cloned")]
    UnsupportedType(&'static str),
}

impl StructuredCloneError {
    /// Create an unsupported-type error for the named kind
    pub fn unsupported(kind: &'static str) -> Self {
        Self::UnsupportedType(kind)
    }

    /// Name of the kind that stopped the clone
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedType(kind) => kind,
        }
    }
}

/// Result type for clone operations
pub type CloneResult<T> = std::result::Result<T, StructuredCloneError>;
