use bakul_types::ItemId;

use crate::batch::{WriteBatch, WriteOp};
use crate::error::{StoreError, StoreResult};
use crate::item::{Item, NewItem};

/// Storage collaborator for the item tree.
///
/// All implementations must satisfy these invariants:
/// - Ids are assigned at creation, strictly increasing, and never reused.
/// - The uuid generator is called exactly once per created item.
/// - `children_of` returns direct children in `(date_created,
///   date_modified, id)` order.
/// - [`commit`](ItemStore::commit) applies a batch completely or not at
///   all, and readers never observe part of a batch.
/// - Updates are compare-and-set on the item version.
pub trait ItemStore: Send + Sync {
    /// Read an item by id.
    ///
    /// Returns `Ok(None)` if the item does not exist.
    fn get(&self, id: ItemId) -> StoreResult<Option<Item>>;

    /// Direct children of `parent`, in sibling order.
    ///
    /// Empty for leaves and for unknown ids.
    fn children_of(&self, parent: ItemId) -> StoreResult<Vec<Item>>;

    /// Items without a parent, in sibling order.
    fn roots(&self) -> StoreResult<Vec<Item>>;

    /// Apply a batch atomically, returning the resulting items in op order.
    fn commit(&self, batch: WriteBatch) -> StoreResult<Vec<Item>>;

    /// Number of stored items.
    fn len(&self) -> StoreResult<usize>;

    /// Returns `true` if the store holds no items.
    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Read an item that must exist.
    fn require(&self, id: ItemId) -> StoreResult<Item> {
        self.get(id)?.ok_or(StoreError::NotFound(id))
    }

    /// Create one item.
    fn create(&self, item: NewItem) -> StoreResult<Item> {
        single(self.commit(WriteBatch::from(vec![WriteOp::Create(item)]))?)
    }

    /// Write back one item, based on `item.version`.
    fn save(&self, item: &Item) -> StoreResult<Item> {
        single(self.commit(WriteBatch::from(vec![WriteOp::Update(item.clone())]))?)
    }

    /// The first child of `parent` named `name`, in sibling order.
    fn find_child(&self, parent: ItemId, name: &str) -> StoreResult<Option<Item>> {
        Ok(self
            .children_of(parent)?
            .into_iter()
            .find(|child| child.name.as_deref() == Some(name)))
    }
}

fn single(mut items: Vec<Item>) -> StoreResult<Item> {
    items
        .pop()
        .ok_or_else(|| StoreError::Internal("commit returned no item for a single write".into()))
}
