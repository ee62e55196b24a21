//! In-memory item store.
//!
//! [`InMemoryItemStore`] keeps every item in a `HashMap` behind a `RwLock`,
//! with a forward parent → children index for traversal. A whole batch is
//! validated and applied under one write lock, which makes batches atomic
//! for both writers and readers.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bakul_property::{PropertyKind, TypedValue};
use bakul_types::{
    Clock, ItemId, MonotonicClock, RandomUuidGenerator, Timestamp, UuidGenerator,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::batch::{WriteBatch, WriteOp};
use crate::error::{StoreError, StoreResult};
use crate::item::{Item, ItemKind, NewItemKind};
use crate::traits::ItemStore;

/// In-memory, HashMap-based item store.
///
/// Intended for tests, embedding and the CLI, which persists it through
/// [`StoreSnapshot`]s.
pub struct InMemoryItemStore {
    state: RwLock<StoreState>,
    uuids: Arc<dyn UuidGenerator>,
    clock: Arc<dyn Clock>,
}

struct StoreState {
    items: HashMap<ItemId, Item>,
    /// Forward-edge index: parent -> children, in creation order.
    children: HashMap<ItemId, Vec<ItemId>>,
    roots: Vec<ItemId>,
    next_id: ItemId,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            items: HashMap::new(),
            children: HashMap::new(),
            roots: Vec::new(),
            next_id: ItemId::new(1),
        }
    }
}

impl StoreState {
    fn insert_new(&mut self, item: Item) {
        match item.parent {
            Some(parent) => self.children.entry(parent).or_default().push(item.id),
            None => self.roots.push(item.id),
        }
        self.items.insert(item.id, item);
    }

    fn sorted(&self, ids: &[ItemId]) -> Vec<Item> {
        let mut items: Vec<Item> = ids
            .iter()
            .filter_map(|id| self.items.get(id))
            .cloned()
            .collect();
        items.sort_by_key(Item::order_key);
        items
    }
}

/// A validated write, ready to apply.
enum Staged {
    Create {
        name: Option<String>,
        parent: Option<ItemId>,
        kind: StagedKind,
    },
    Update(Item),
}

enum StagedKind {
    Node(Option<String>),
    Property(PropertyKind, Option<TypedValue>),
}

impl InMemoryItemStore {
    /// A store with random uuids and the monotonic wall clock.
    pub fn new() -> Self {
        Self::with_capabilities(Arc::new(RandomUuidGenerator), Arc::new(MonotonicClock::new()))
    }

    /// A store using the given uuid generator and clock.
    pub fn with_capabilities(uuids: Arc<dyn UuidGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            uuids,
            clock,
        }
    }

    /// Restore a snapshot, with random uuids and a clock that never goes
    /// back before the newest timestamp in the snapshot.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> StoreResult<Self> {
        let clock = match snapshot.latest_timestamp() {
            Some(floor) => MonotonicClock::with_floor(floor),
            None => MonotonicClock::new(),
        };
        Self::from_snapshot_with(snapshot, Arc::new(RandomUuidGenerator), Arc::new(clock))
    }

    /// Restore a snapshot using the given capabilities.
    pub fn from_snapshot_with(
        snapshot: StoreSnapshot,
        uuids: Arc<dyn UuidGenerator>,
        clock: Arc<dyn Clock>,
    ) -> StoreResult<Self> {
        let mut state = StoreState {
            next_id: snapshot.next_id,
            ..Default::default()
        };

        let mut items = snapshot.items;
        items.sort_by_key(|item| item.id);
        for item in items {
            if item.id >= snapshot.next_id {
                return Err(StoreError::CorruptSnapshot(format!(
                    "item {} is not below next id {}",
                    item.id, snapshot.next_id
                )));
            }
            if state.items.contains_key(&item.id) {
                return Err(StoreError::CorruptSnapshot(format!("duplicate item {}", item.id)));
            }
            if let Some(parent) = item.parent {
                // Parents are always created first, so a valid tree only
                // points at smaller ids; this also rules out cycles.
                let parent_item = state.items.get(&parent).ok_or_else(|| {
                    StoreError::CorruptSnapshot(format!(
                        "item {} has missing or later parent {parent}",
                        item.id
                    ))
                })?;
                if !parent_item.is_node() {
                    return Err(StoreError::CorruptSnapshot(format!(
                        "item {} is parented under property {parent}",
                        item.id
                    )));
                }
            }
            state.insert_new(item);
        }

        debug!(items = state.items.len(), "restored item store snapshot");
        Ok(Self {
            state: RwLock::new(state),
            uuids,
            clock,
        })
    }

    /// Copy out every item.
    pub fn snapshot(&self) -> StoreResult<StoreSnapshot> {
        let state = self.read()?;
        let mut items: Vec<Item> = state.items.values().cloned().collect();
        items.sort_by_key(|item| item.id);
        Ok(StoreSnapshot {
            next_id: state.next_id,
            items,
        })
    }

    /// Write a JSON snapshot to `path`.
    pub fn save_to(&self, path: impl AsRef<Path>) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(&self.snapshot()?)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Restore a store from a JSON snapshot at `path`.
    pub fn load_from(path: impl AsRef<Path>) -> StoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let snapshot: StoreSnapshot =
            serde_json::from_str(&text).map_err(|e| StoreError::Serialization(e.to_string()))?;
        Self::from_snapshot(snapshot)
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    /// Check every op against the current state without changing it.
    fn stage(state: &StoreState, batch: WriteBatch) -> StoreResult<Vec<Staged>> {
        // Versions as they will be after the ops staged so far.
        let mut versions: HashMap<ItemId, u64> = HashMap::new();
        let mut staged = Vec::with_capacity(batch.len());

        for op in batch.into_ops() {
            match op {
                WriteOp::Create(new) => {
                    if let Some(parent) = new.parent {
                        let parent_item =
                            state.items.get(&parent).ok_or(StoreError::MissingParent(parent))?;
                        if !parent_item.is_node() {
                            return Err(StoreError::Immutable {
                                id: parent,
                                field: "children of a property",
                            });
                        }
                    }
                    let kind = match new.kind {
                        NewItemKind::Node { node_type } => StagedKind::Node(node_type),
                        NewItemKind::Property { kind, value } => {
                            let value = value.map(|v| TypedValue::new(kind, v)).transpose()?;
                            StagedKind::Property(kind, value)
                        }
                    };
                    staged.push(Staged::Create {
                        name: new.name,
                        parent: new.parent,
                        kind,
                    });
                }
                WriteOp::Update(item) => {
                    let stored = state.items.get(&item.id).ok_or(StoreError::NotFound(item.id))?;
                    let current = versions.get(&item.id).copied().unwrap_or(stored.version);
                    if item.version != current {
                        return Err(StoreError::Conflict {
                            id: item.id,
                            expected: item.version,
                            actual: current,
                        });
                    }
                    check_immutable(stored, &item)?;
                    versions.insert(item.id, current + 1);
                    staged.push(Staged::Update(item));
                }
            }
        }

        Ok(staged)
    }

    fn apply(&self, state: &mut StoreState, staged: Vec<Staged>) -> Vec<Item> {
        let mut out = Vec::with_capacity(staged.len());
        for op in staged {
            let now = self.clock.now();
            match op {
                Staged::Create { name, parent, kind } => {
                    let id = state.next_id;
                    state.next_id = id.next();
                    let kind = match kind {
                        StagedKind::Node(node_type) => ItemKind::Node { node_type },
                        StagedKind::Property(kind, value) => ItemKind::Property {
                            value: value.unwrap_or_else(|| TypedValue::with_default(kind, now)),
                        },
                    };
                    let item = Item {
                        id,
                        uuid: self.uuids.next(),
                        name,
                        parent,
                        date_created: now,
                        date_modified: now,
                        version: 1,
                        kind,
                    };
                    debug!(id = %item.id, uuid = %item.uuid, label = %item.label(), "created item");
                    state.insert_new(item.clone());
                    out.push(item);
                }
                Staged::Update(mut item) => {
                    item.version += 1;
                    item.date_modified = now;
                    state.items.insert(item.id, item.clone());
                    out.push(item);
                }
            }
        }
        out
    }
}

fn check_immutable(stored: &Item, update: &Item) -> StoreResult<()> {
    let field = if stored.uuid != update.uuid {
        Some("uuid")
    } else if stored.parent != update.parent {
        Some("parent")
    } else if stored.date_created != update.date_created {
        Some("date_created")
    } else {
        match (&stored.kind, &update.kind) {
            (ItemKind::Node { .. }, ItemKind::Node { .. }) => None,
            (ItemKind::Property { value: a }, ItemKind::Property { value: b }) => {
                (a.kind() != b.kind()).then_some("property kind")
            }
            _ => Some("item kind"),
        }
    };
    match field {
        Some(field) => Err(StoreError::Immutable {
            id: stored.id,
            field,
        }),
        None => Ok(()),
    }
}

impl Default for InMemoryItemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemStore for InMemoryItemStore {
    fn get(&self, id: ItemId) -> StoreResult<Option<Item>> {
        Ok(self.read()?.items.get(&id).cloned())
    }

    fn children_of(&self, parent: ItemId) -> StoreResult<Vec<Item>> {
        let state = self.read()?;
        Ok(state
            .children
            .get(&parent)
            .map(|ids| state.sorted(ids))
            .unwrap_or_default())
    }

    fn roots(&self) -> StoreResult<Vec<Item>> {
        let state = self.read()?;
        Ok(state.sorted(&state.roots))
    }

    fn commit(&self, batch: WriteBatch) -> StoreResult<Vec<Item>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }
        let mut state = self.write()?;
        let staged = Self::stage(&state, batch)?;
        let items = self.apply(&mut state, staged);
        debug!(ops = items.len(), "committed batch");
        Ok(items)
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.items.len())
    }
}

impl std::fmt::Debug for InMemoryItemStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len().unwrap_or_default();
        f.debug_struct("InMemoryItemStore")
            .field("item_count", &count)
            .finish()
    }
}

/// Serializable copy of a store's contents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub next_id: ItemId,
    pub items: Vec<Item>,
}

impl StoreSnapshot {
    /// The newest creation or modification time in the snapshot.
    pub fn latest_timestamp(&self) -> Option<Timestamp> {
        self.items
            .iter()
            .map(|item| item.date_created.max(item.date_modified))
            .max()
    }
}
