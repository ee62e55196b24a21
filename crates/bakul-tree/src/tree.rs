//! Kind-agnostic traversal over an [`ItemStore`].
//!
//! Nothing here needs to know whether an item is a node or a property:
//! properties are simply items without children.

use std::fmt;

use bakul_types::{ItemId, ItemUuid};

use crate::error::StoreResult;
use crate::item::Item;
use crate::traits::ItemStore;

/// Direct children of `id`, in sibling order.
///
/// Fails with [`StoreError::NotFound`](crate::StoreError::NotFound) if `id`
/// itself does not exist; returns an empty list for leaves.
pub fn get_children(store: &dyn ItemStore, id: ItemId) -> StoreResult<Vec<Item>> {
    store.require(id)?;
    store.children_of(id)
}

/// Direct property children of `id`, in sibling order.
pub fn property_children(store: &dyn ItemStore, id: ItemId) -> StoreResult<Vec<Item>> {
    Ok(get_children(store, id)?
        .into_iter()
        .filter(Item::is_property)
        .collect())
}

/// One line of a [`dump_tree`] traversal.
#[derive(Clone, Debug, PartialEq)]
pub struct DumpLine {
    pub depth: usize,
    pub id: ItemId,
    pub uuid: ItemUuid,
    pub name: Option<String>,
    pub label: String,
}

impl fmt::Display for DumpLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:indent$}- <{}, {}>", "", self.id, self.uuid, indent = self.depth * 2)
    }
}

/// Lazy pre-order traversal returned by [`dump_tree`].
///
/// Children are fetched from the store only when the traversal reaches
/// their parent.
pub struct DumpTree<'a> {
    store: &'a dyn ItemStore,
    max_depth: usize,
    start: Option<ItemId>,
    stack: Vec<(Item, usize)>,
}

impl DumpTree<'_> {
    fn visit(&mut self, item: Item, depth: usize) -> StoreResult<DumpLine> {
        if depth < self.max_depth {
            let children = self.store.children_of(item.id)?;
            self.stack
                .extend(children.into_iter().rev().map(|child| (child, depth + 1)));
        }
        Ok(DumpLine {
            depth,
            id: item.id,
            uuid: item.uuid.clone(),
            label: item.label(),
            name: item.name,
        })
    }
}

impl Iterator for DumpTree<'_> {
    type Item = StoreResult<DumpLine>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(id) = self.start.take() {
            let line = self.store.require(id).and_then(|item| self.visit(item, 0));
            if line.is_err() {
                self.stack.clear();
            }
            return Some(line);
        }
        let (item, depth) = self.stack.pop()?;
        let line = self.visit(item, depth);
        if line.is_err() {
            self.stack.clear();
        }
        Some(line)
    }
}

/// Pre-order traversal of `id` and its descendants down to `depth` levels.
///
/// `depth == 0` yields only the item itself. The traversal stops after the
/// first error.
pub fn dump_tree(store: &dyn ItemStore, id: ItemId, depth: usize) -> DumpTree<'_> {
    DumpTree {
        store,
        max_depth: depth,
        start: Some(id),
        stack: Vec::new(),
    }
}

/// [`dump_tree`] collected into newline-separated text.
pub fn render_tree(store: &dyn ItemStore, id: ItemId, depth: usize) -> StoreResult<String> {
    let mut out = String::new();
    for line in dump_tree(store, id, depth) {
        out.push_str(&line?.to_string());
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::NewItem;
    use crate::memory::InMemoryItemStore;
    use crate::StoreError;
    use bakul_property::PropertyKind;
    use bakul_types::{FixedStepClock, SequentialUuidGenerator};
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::Arc;

    /// root
    /// ├── a (node)
    /// │   └── a.p (text)
    /// └── b (integer)
    fn fixture() -> (InMemoryItemStore, ItemId) {
        let store = InMemoryItemStore::with_capabilities(
            Arc::new(SequentialUuidGenerator::new()),
            Arc::new(FixedStepClock::new(
                Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                Duration::milliseconds(1),
            )),
        );
        let root = store.create(NewItem::node(None, Some("root".into()))).unwrap();
        let a = store
            .create(NewItem::node(Some(root.id), Some("a".into())))
            .unwrap();
        store
            .create(NewItem::property(a.id, "a.p", PropertyKind::Text))
            .unwrap();
        store
            .create(NewItem::property(root.id, "b", PropertyKind::Integer))
            .unwrap();
        (store, root.id)
    }

    #[test]
    fn children_are_kind_agnostic() {
        let (store, root) = fixture();
        let children = get_children(&store, root).unwrap();
        let names: Vec<_> = children.iter().filter_map(|c| c.name.as_deref()).collect();
        assert_eq!(names, ["a", "b"]);

        // A property is a valid traversal target with no children.
        let b = children[1].id;
        assert!(get_children(&store, b).unwrap().is_empty());
    }

    #[test]
    fn children_of_missing_item_fails() {
        let (store, _) = fixture();
        assert!(matches!(
            get_children(&store, ItemId::new(999)),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn property_children_skips_nodes() {
        let (store, root) = fixture();
        let props = property_children(&store, root).unwrap();
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].name.as_deref(), Some("b"));
    }

    #[test]
    fn dump_is_preorder() {
        let (store, root) = fixture();
        let lines: Vec<(usize, Option<String>)> = dump_tree(&store, root, 10)
            .map(|l| l.map(|l| (l.depth, l.name)))
            .collect::<StoreResult<_>>()
            .unwrap();
        assert_eq!(
            lines,
            vec![
                (0, Some("root".into())),
                (1, Some("a".into())),
                (2, Some("a.p".into())),
                (1, Some("b".into())),
            ]
        );
    }

    #[test]
    fn dump_depth_zero_is_only_the_item() {
        let (store, root) = fixture();
        let lines: Vec<_> = dump_tree(&store, root, 0).collect();
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn dump_stops_at_depth() {
        let (store, root) = fixture();
        let depths: Vec<usize> = dump_tree(&store, root, 1)
            .map(|l| l.unwrap().depth)
            .collect();
        assert_eq!(depths, [0, 1, 1]);
    }

    #[test]
    fn dump_of_missing_item_yields_one_error() {
        let (store, _) = fixture();
        let lines: Vec<_> = dump_tree(&store, ItemId::new(404), 3).collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].is_err());
    }

    #[test]
    fn render_indents_by_depth() {
        let (store, root) = fixture();
        let text = render_tree(&store, root, 2).unwrap();
        let expected = "\
- <1, 00000000000000000000000000000001>
  - <2, 00000000000000000000000000000002>
    - <3, 00000000000000000000000000000003>
  - <4, 00000000000000000000000000000004>
";
        assert_eq!(text, expected);
    }
}
