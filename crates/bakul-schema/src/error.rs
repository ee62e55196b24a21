//! Error types for schema operations.

use thiserror::Error;

/// Errors that can occur while registering or looking up schemas.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// No node type is registered under this name.
    #[error("node type not registered: {0}")]
    NodeTypeNotFound(String),

    /// No field type is registered under this name.
    #[error("field type not registered: {0}")]
    FieldTypeNotFound(String),

    /// A field type or node type with this name already exists.
    #[error("{kind} already exists: {name}")]
    AlreadyExists { kind: &'static str, name: String },

    /// A node type declares the same field name twice.
    #[error("node type {node_type} declares field {field} more than once")]
    DuplicateField { node_type: String, field: String },

    /// The implementation name does not map to a property kind.
    #[error("unknown property implementation: {0}")]
    UnknownImplementation(String),

    /// The name is empty or too long.
    #[error("invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// A schema definition file could not be parsed.
    #[error("invalid schema config: {0}")]
    Config(String),

    /// I/O error while reading or writing schema files.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A registry lock was poisoned by a panicking writer.
    #[error("registry lock poisoned: {0}")]
    Poisoned(String),
}

/// Convenience type alias for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
