use bakul_property::PropertyError;
use bakul_types::ItemId;

/// Errors from item store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested item was not found.
    #[error("item not found: {0}")]
    NotFound(ItemId),

    /// The parent named by a new item does not exist.
    #[error("parent item not found: {0}")]
    MissingParent(ItemId),

    /// The item changed since the caller read it.
    #[error("version conflict on item {id}: expected {expected}, found {actual}")]
    Conflict { id: ItemId, expected: u64, actual: u64 },

    /// An update tried to change a field fixed at creation.
    #[error("cannot change {field} of item {id}")]
    Immutable { id: ItemId, field: &'static str },

    /// A property value did not match its kind.
    #[error("property error: {0}")]
    Property(#[from] PropertyError),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A snapshot does not describe a valid tree.
    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend broke one of its own guarantees.
    #[error("internal store error: {0}")]
    Internal(String),

    /// A store lock was poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    Poisoned(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
