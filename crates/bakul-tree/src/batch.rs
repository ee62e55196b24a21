//! Atomic multi-item writes.

use crate::item::{Item, NewItem};

/// One write inside a [`WriteBatch`].
#[derive(Clone, Debug, PartialEq)]
pub enum WriteOp {
    /// Create a new item. Its parent must already exist in the store.
    Create(NewItem),
    /// Replace a stored item.
    ///
    /// `item.version` is the version the change was based on; the write
    /// fails with a conflict if the stored version differs. Id, uuid,
    /// parent, creation date and item kind cannot change.
    Update(Item),
}

/// An ordered list of writes applied all-or-nothing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, item: NewItem) -> &mut Self {
        self.ops.push(WriteOp::Create(item));
        self
    }

    pub fn update(&mut self, item: Item) -> &mut Self {
        self.ops.push(WriteOp::Update(item));
        self
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}

impl From<Vec<WriteOp>> for WriteBatch {
    fn from(ops: Vec<WriteOp>) -> Self {
        Self { ops }
    }
}

impl FromIterator<WriteOp> for WriteBatch {
    fn from_iter<I: IntoIterator<Item = WriteOp>>(iter: I) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}
