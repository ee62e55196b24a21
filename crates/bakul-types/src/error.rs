use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("uuid must be lowercase hex: {0}")]
    NotLowercase(String),

    #[error("invalid item id: {0}")]
    InvalidItemId(String),
}
