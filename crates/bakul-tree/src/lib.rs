//! Item tree for Bakul.
//!
//! Every tree-resident entity is an [`Item`]: either a container node or a
//! typed property leaf. Both share identity, naming, parent linkage and
//! timestamps, so the tree can be traversed without caring which kind an
//! item is.
//!
//! # Design Rules
//!
//! 1. An item has at most one parent and is never re-parented, so parent
//!    chains are acyclic by construction.
//! 2. Children are ordered by `(date_created, date_modified)` ascending,
//!    ties broken by id.
//! 3. Every write carries the version it was based on; stale writes fail
//!    with [`StoreError::Conflict`] instead of overwriting.
//! 4. A [`WriteBatch`] is applied completely or not at all.
//!
//! # Modules
//!
//! - [`error`] — Error types for store operations
//! - [`item`] — [`Item`], [`ItemKind`], [`NewItem`]
//! - [`batch`] — [`WriteBatch`] and [`WriteOp`]
//! - [`traits`] — The [`ItemStore`] trait
//! - [`memory`] — In-memory [`InMemoryItemStore`] with JSON snapshots
//! - [`tree`] — [`get_children`] and the [`dump_tree`] traversal

pub mod batch;
pub mod error;
pub mod item;
pub mod memory;
pub mod traits;
pub mod tree;

pub use batch::{WriteBatch, WriteOp};
pub use error::{StoreError, StoreResult};
pub use item::{Item, ItemKind, NewItem, NewItemKind};
pub use memory::{InMemoryItemStore, StoreSnapshot};
pub use traits::ItemStore;
pub use tree::{dump_tree, get_children, property_children, render_tree, DumpLine, DumpTree};
