//! Error types for property operations.

use thiserror::Error;

/// Errors that can occur while building or assigning property values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PropertyError {
    /// The value's native type does not match the property kind.
    #[error("incompatible value type: expected {expected}, got {found}")]
    TypeMismatch { expected: String, found: String },

    /// The name does not denote any property kind.
    #[error("unknown property kind: {0}")]
    UnknownKind(String),

    /// A decimal literal could not be represented.
    #[error("invalid decimal {input:?}: {reason}")]
    InvalidDecimal { input: String, reason: String },

    /// Raw text could not be parsed as a value of the given kind.
    #[error("cannot parse {input:?} as {kind}: {reason}")]
    Parse {
        kind: String,
        input: String,
        reason: String,
    },
}

/// Convenience type alias for property operations.
pub type PropertyResult<T> = std::result::Result<T, PropertyError>;
