use bakul_schema::SchemaError;
use bakul_tree::StoreError;
use bakul_types::ItemId;

/// Errors from node operations.
///
/// Every variant except the pass-through `Store` and `Schema` reports a
/// caller precondition violation and is never retried internally.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    /// No node type is registered under this name.
    #[error("unknown node type: {0}")]
    UnknownNodeType(String),

    /// The id does not name a node.
    #[error("node not found: {0}")]
    NodeNotFound(ItemId),

    /// The node already has a real type.
    #[error("node is already typed as {0}")]
    AlreadyTyped(String),

    /// The node has not been saved to the store.
    #[error("node is not persisted")]
    NotPersisted,

    /// The node has no property with this name.
    #[error("property not found: {0}")]
    PropertyNotFound(String),

    /// A value did not match the property's declared type.
    #[error("type mismatch on property {property}: expected {expected}, found {found}")]
    TypeMismatch {
        property: String,
        expected: String,
        found: String,
    },

    /// The operation is declared but not implemented.
    #[error("not supported: {0}")]
    NotSupported(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl NodeError {
    /// Whether this is an optimistic-concurrency conflict from the store.
    pub fn is_conflict(&self) -> bool {
        matches!(self, NodeError::Store(StoreError::Conflict { .. }))
    }
}

/// Result alias for node operations.
pub type NodeResult<T> = Result<T, NodeError>;
