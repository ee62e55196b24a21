//! Schema binding and property access.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use bakul_property::{PropertyError, PropertyValue};
use bakul_schema::{NodeType, SchemaError, SchemaRegistry, UNTYPED_NODE_TYPE};
use bakul_tree::{
    dump_tree, get_children, render_tree, DumpTree, Item, ItemKind, ItemStore, NewItem,
    StoreError, WriteBatch, WriteOp,
};
use bakul_types::ItemId;
use tracing::{debug, info, warn};

use crate::config::NodeConfig;
use crate::error::{NodeError, NodeResult};
use crate::node::{Node, NodeTypeRef};

/// Node operations over an item store and a schema registry.
///
/// The service holds no per-node state. Each operation reads the node
/// afresh, checks its preconditions, and writes its whole effect as one
/// [`WriteBatch`]. A batch that loses a version race is re-run from the
/// read, so preconditions are always checked against the state the batch
/// is applied to.
pub struct NodeService {
    store: Arc<dyn ItemStore>,
    schema: Arc<dyn SchemaRegistry>,
    config: NodeConfig,
}

impl NodeService {
    pub fn new(store: Arc<dyn ItemStore>, schema: Arc<dyn SchemaRegistry>) -> Self {
        Self::with_config(store, schema, NodeConfig::default())
    }

    pub fn with_config(
        store: Arc<dyn ItemStore>,
        schema: Arc<dyn SchemaRegistry>,
        config: NodeConfig,
    ) -> Self {
        Self {
            store,
            schema,
            config,
        }
    }

    pub fn store(&self) -> &dyn ItemStore {
        self.store.as_ref()
    }

    pub fn schema(&self) -> &dyn SchemaRegistry {
        self.schema.as_ref()
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    // ---- Nodes ----

    /// Create an untyped node, optionally under `parent`.
    pub fn create_node(&self, parent: Option<&Node>, name: Option<&str>) -> NodeResult<Node> {
        let parent_id = match parent {
            Some(parent) => Some(self.item(parent)?.id),
            None => None,
        };
        let item = self
            .store
            .create(NewItem::node(parent_id, name.map(String::from)))?;
        info!(id = %item.id, uuid = %item.uuid, "created node");
        Ok(Node::from_item(&item))
    }

    /// Handle for the node stored under `id`.
    pub fn get_node(&self, id: ItemId) -> NodeResult<Node> {
        self.load(id).map(|item| Node::from_item(&item))
    }

    /// The node's current stored record.
    pub fn item(&self, node: &Node) -> NodeResult<Item> {
        self.load(node.id().ok_or(NodeError::NotPersisted)?)
    }

    /// The node type the node is bound to, if any.
    pub fn node_type(&self, node: &Node) -> NodeResult<Option<NodeType>> {
        if !node.is_persisted() {
            return Ok(None);
        }
        let item = self.item(node)?;
        item.node_type()
            .map(|name| self.resolve(NodeTypeRef::Name(name)))
            .transpose()
    }

    /// Bind `node` to a node type and instantiate its declared properties.
    ///
    /// Allowed only while the node is unset or bound to the untyped
    /// placeholder. The type assignment and all property children are
    /// written in one batch: either all of them land or none do.
    pub fn set_node_type<'a>(
        &self,
        node: &Node,
        target: impl Into<NodeTypeRef<'a>>,
    ) -> NodeResult<NodeType> {
        let target = target.into();
        let id = node.id().ok_or(NodeError::NotPersisted)?;

        self.retry_on_conflict("set_node_type", id, || {
            let mut item = self.load(id)?;
            if let Some(current) = item.node_type() {
                if current != UNTYPED_NODE_TYPE {
                    return Err(NodeError::AlreadyTyped(current.to_string()));
                }
            }

            let node_type = self.resolve(target)?;
            let specs = self.schema.property_specs(&node_type)?;

            let mut batch = WriteBatch::new();
            for spec in &specs {
                batch.create(NewItem::property(id, spec.name.clone(), spec.kind));
            }
            item.kind = ItemKind::Node {
                node_type: Some(node_type.name.clone()),
            };
            batch.update(item);
            self.store.commit(batch)?;

            info!(
                id = %id,
                node_type = %node_type.name,
                properties = specs.len(),
                "bound node type"
            );
            Ok(node_type)
        })
    }

    // ---- Properties ----

    /// Whether `node` has a property child named `name`.
    pub fn has_property(&self, node: &Node, name: &str) -> NodeResult<bool> {
        Ok(self
            .has_properties(node, &[name], false)?
            .first()
            .copied()
            .unwrap_or(false))
    }

    /// One flag per input name, in input order.
    ///
    /// `narrow_check` is reserved and fails with
    /// [`NodeError::NotSupported`].
    pub fn has_properties<S: AsRef<str>>(
        &self,
        node: &Node,
        names: &[S],
        narrow_check: bool,
    ) -> NodeResult<Vec<bool>> {
        if narrow_check {
            return Err(NodeError::NotSupported("narrow property check"));
        }
        let Some(id) = node.id() else {
            return Ok(vec![false; names.len()]);
        };
        self.load(id)?;

        let wanted: HashSet<&str> = names.iter().map(AsRef::as_ref).collect();
        let found: HashSet<String> = self
            .store
            .children_of(id)?
            .into_iter()
            .filter(Item::is_property)
            .filter_map(|child| child.name)
            .filter(|name| wanted.contains(name.as_str()))
            .collect();

        Ok(names.iter().map(|name| found.contains(name.as_ref())).collect())
    }

    /// Assign several properties at once.
    ///
    /// Reserved keys are dropped first. Every remaining pair is checked
    /// before anything is written: one unknown name or incompatible value
    /// fails the whole call and leaves every property unchanged. Returns
    /// the updated property items.
    pub fn set_property<I, K, V>(&self, node: &Node, pairs: I) -> NodeResult<Vec<Item>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<PropertyValue>,
    {
        let id = node.id().ok_or(NodeError::NotPersisted)?;
        let pairs: Vec<(String, PropertyValue)> = pairs
            .into_iter()
            .map(|(key, value)| -> (String, PropertyValue) { (key.into(), value.into()) })
            .filter(|(key, _)| {
                let reserved = self.config.is_reserved(key);
                if reserved {
                    debug!(key = %key, "dropping reserved key");
                }
                !reserved
            })
            .collect();

        self.retry_on_conflict("set_property", id, || self.assign_properties(id, &pairs))
    }

    /// Assign a single property.
    ///
    /// A reserved key is dropped like in [`set_property`](Self::set_property)
    /// and yields `Ok(None)`.
    pub fn set_value(
        &self,
        node: &Node,
        name: &str,
        value: impl Into<PropertyValue>,
    ) -> NodeResult<Option<Item>> {
        let mut updated = self.set_property(node, [(name, value.into())])?;
        Ok(updated.pop())
    }

    fn assign_properties(
        &self,
        id: ItemId,
        pairs: &[(String, PropertyValue)],
    ) -> NodeResult<Vec<Item>> {
        self.load(id)?;

        let mut by_name: HashMap<String, Item> = HashMap::new();
        for child in self.store.children_of(id)? {
            if let (true, Some(name)) = (child.is_property(), child.name.clone()) {
                by_name.entry(name).or_insert(child);
            }
        }

        let mut touched: Vec<&str> = Vec::new();
        for (name, value) in pairs {
            let typed = by_name
                .get_mut(name)
                .and_then(Item::property_mut)
                .ok_or_else(|| NodeError::PropertyNotFound(name.clone()))?;
            typed
                .assign(value.clone())
                .map_err(|err| type_mismatch(name, err))?;
            if !touched.contains(&name.as_str()) {
                touched.push(name);
            }
        }

        if touched.is_empty() {
            return Ok(Vec::new());
        }
        let batch: WriteBatch = touched
            .iter()
            .filter_map(|name| by_name.remove(*name))
            .map(WriteOp::Update)
            .collect();
        let updated = self.store.commit(batch)?;
        debug!(id = %id, properties = updated.len(), "set properties");
        Ok(updated)
    }

    /// The property item named `name`.
    pub fn property(&self, node: &Node, name: &str) -> NodeResult<Item> {
        let item = self.item(node)?;
        self.store
            .children_of(item.id)?
            .into_iter()
            .find(|child| child.is_property() && child.name.as_deref() == Some(name))
            .ok_or_else(|| NodeError::PropertyNotFound(name.to_string()))
    }

    /// The current value of the property named `name`.
    pub fn get_value(&self, node: &Node, name: &str) -> NodeResult<PropertyValue> {
        let item = self.property(node, name)?;
        item.property()
            .map(|typed| typed.value().clone())
            .ok_or_else(|| NodeError::PropertyNotFound(name.to_string()))
    }

    /// The node's property children, in sibling order.
    pub fn properties(&self, node: &Node) -> NodeResult<impl Iterator<Item = Item>> {
        let children = match node.id() {
            Some(id) => {
                self.load(id)?;
                self.store.children_of(id)?
            }
            None => Vec::new(),
        };
        Ok(children.into_iter().filter(Item::is_property))
    }

    /// Property name to value.
    ///
    /// Field names are unique per node type, so every property has its own
    /// key.
    pub fn properties_map(&self, node: &Node) -> NodeResult<BTreeMap<String, PropertyValue>> {
        Ok(self
            .properties(node)?
            .filter_map(|item| {
                let name = item.name.clone()?;
                let value = item.property()?.value().clone();
                Some((name, value))
            })
            .collect())
    }

    // ---- Tree ----

    /// Direct children of the node, nodes and properties alike.
    pub fn children(&self, node: &Node) -> NodeResult<Vec<Item>> {
        let item = self.item(node)?;
        Ok(get_children(self.store.as_ref(), item.id)?)
    }

    /// Lazy pre-order dump of the node's subtree down to `depth` levels.
    pub fn dump_tree(&self, node: &Node, depth: usize) -> NodeResult<DumpTree<'_>> {
        let id = node.id().ok_or(NodeError::NotPersisted)?;
        Ok(dump_tree(self.store.as_ref(), id, depth))
    }

    pub fn render_tree(&self, node: &Node, depth: usize) -> NodeResult<String> {
        let id = node.id().ok_or(NodeError::NotPersisted)?;
        Ok(render_tree(self.store.as_ref(), id, depth)?)
    }

    // ---- Internals ----

    pub(crate) fn resolve(&self, target: NodeTypeRef<'_>) -> NodeResult<NodeType> {
        let name = target.name();
        match self.schema.lookup_node_type(name) {
            Ok(node_type) => Ok(node_type),
            Err(SchemaError::NodeTypeNotFound(_)) => Err(NodeError::UnknownNodeType(name.into())),
            Err(err) => Err(err.into()),
        }
    }

    fn load(&self, id: ItemId) -> NodeResult<Item> {
        match self.store.get(id)? {
            Some(item) if item.is_node() => Ok(item),
            _ => Err(NodeError::NodeNotFound(id)),
        }
    }

    fn retry_on_conflict<T>(
        &self,
        op: &'static str,
        id: ItemId,
        mut attempt: impl FnMut() -> NodeResult<T>,
    ) -> NodeResult<T> {
        let mut retries = 0;
        loop {
            match attempt() {
                Err(err) if err.is_conflict() && retries < self.config.max_conflict_retries => {
                    retries += 1;
                    warn!(op, id = %id, retries, "version conflict, retrying");
                }
                result => return result,
            }
        }
    }
}

fn type_mismatch(property: &str, err: PropertyError) -> NodeError {
    match err {
        PropertyError::TypeMismatch { expected, found } => NodeError::TypeMismatch {
            property: property.to_string(),
            expected,
            found,
        },
        other => NodeError::Store(StoreError::Property(other)),
    }
}

impl std::fmt::Debug for NodeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bakul_property::PropertyKind;
    use bakul_schema::{InMemorySchemaRegistry, NodeTypeDef};
    use bakul_tree::InMemoryItemStore;
    use proptest::prelude::*;
    use std::sync::Mutex;

    fn registry() -> InMemorySchemaRegistry {
        let schema = InMemorySchemaRegistry::new();
        schema
            .register_node_type(
                &NodeTypeDef::new("article")
                    .field("title", "text")
                    .field("views", "integer"),
            )
            .unwrap();
        schema
            .register_node_type(&NodeTypeDef::new("page").field("path", "string"))
            .unwrap();
        schema
    }

    fn service_on(store: Arc<dyn ItemStore>) -> NodeService {
        NodeService::new(store, Arc::new(registry()))
    }

    fn service() -> NodeService {
        service_on(Arc::new(InMemoryItemStore::new()))
    }

    fn article(service: &NodeService) -> Node {
        let node = service.create_node(None, Some("n")).unwrap();
        service.set_node_type(&node, "article").unwrap();
        node
    }

    fn property_names(service: &NodeService, node: &Node) -> Vec<String> {
        service
            .properties(node)
            .unwrap()
            .filter_map(|item| item.name)
            .collect()
    }

    // -----------------------------------------------------------------------
    // Schema binding
    // -----------------------------------------------------------------------

    #[test]
    fn binding_creates_declared_properties() {
        let service = service();
        let node = article(&service);
        assert_eq!(
            service.has_properties(&node, &["title", "views"], false).unwrap(),
            [true, true]
        );
        assert_eq!(property_names(&service, &node), ["title", "views"]);
        assert_eq!(
            service.node_type(&node).unwrap().map(|t| t.name).as_deref(),
            Some("article")
        );
    }

    #[test]
    fn children_follow_declaration_order() {
        let service = service();
        let node = article(&service);
        let children = service.children(&node).unwrap();
        let kinds: Vec<_> = children
            .iter()
            .map(|c| (c.name.clone().unwrap(), c.property().unwrap().kind()))
            .collect();
        assert_eq!(
            kinds,
            [
                ("title".to_string(), PropertyKind::Text),
                ("views".to_string(), PropertyKind::Integer),
            ]
        );
    }

    #[test]
    fn binding_twice_fails_and_changes_nothing() {
        let service = service();
        let node = article(&service);
        let before = service.children(&node).unwrap();

        let err = service.set_node_type(&node, "article").unwrap_err();
        assert!(matches!(err, NodeError::AlreadyTyped(ref name) if name == "article"));
        let err = service.set_node_type(&node, "page").unwrap_err();
        assert!(matches!(err, NodeError::AlreadyTyped(_)));

        assert_eq!(service.children(&node).unwrap(), before);
    }

    #[test]
    fn binding_by_record() {
        let service = service();
        let node = service.create_node(None, None).unwrap();
        let page = service.schema().lookup_node_type("page").unwrap();
        let bound = service.set_node_type(&node, &page).unwrap();
        assert_eq!(bound, page);
        assert!(service.has_property(&node, "path").unwrap());
    }

    #[test]
    fn unknown_type_leaves_node_unset() {
        let service = service();
        let node = service.create_node(None, None).unwrap();
        let err = service.set_node_type(&node, "Article").unwrap_err();
        assert!(matches!(err, NodeError::UnknownNodeType(ref name) if name == "Article"));
        assert_eq!(service.node_type(&node).unwrap(), None);
        assert!(service.children(&node).unwrap().is_empty());
    }

    #[test]
    fn placeholder_can_be_retyped() {
        let service = service();
        let node = service.create_node(None, None).unwrap();
        let placeholder = service.set_node_type(&node, UNTYPED_NODE_TYPE).unwrap();
        assert!(placeholder.is_untyped());
        assert!(service.children(&node).unwrap().is_empty());

        service.set_node_type(&node, "article").unwrap();
        assert_eq!(property_names(&service, &node), ["title", "views"]);
    }

    #[test]
    fn binding_requires_persisted_node() {
        let service = service();
        let draft = Node::detached(Some("draft".into()));
        assert!(matches!(
            service.set_node_type(&draft, "article"),
            Err(NodeError::NotPersisted)
        ));
    }

    #[test]
    fn concurrent_binding_admits_one_winner() {
        let service = Arc::new(service());
        let node = service.create_node(None, None).unwrap();

        let handles: Vec<_> = ["article", "page", "article", "page"]
            .into_iter()
            .map(|name| {
                let service = Arc::clone(&service);
                let node = node.clone();
                std::thread::spawn(move || service.set_node_type(&node, name).map(|t| t.name))
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let winners: Vec<&String> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(winners.len(), 1);
        for result in &results {
            if let Err(err) = result {
                assert!(matches!(err, NodeError::AlreadyTyped(_)));
            }
        }
        let expected = if winners[0] == "article" { 2 } else { 1 };
        assert_eq!(service.children(&node).unwrap().len(), expected);
    }

    // -----------------------------------------------------------------------
    // Property queries
    // -----------------------------------------------------------------------

    #[test]
    fn has_property_reports_missing_names() {
        let service = service();
        let node = article(&service);
        assert!(service.has_property(&node, "title").unwrap());
        assert!(!service.has_property(&node, "body").unwrap());
        assert_eq!(
            service
                .has_properties(&node, &["views", "body", "title", "views"], false)
                .unwrap(),
            [true, false, true, true]
        );
        assert!(service.has_properties::<&str>(&node, &[], false).unwrap().is_empty());
    }

    #[test]
    fn has_property_ignores_child_nodes() {
        let service = service();
        let parent = service.create_node(None, None).unwrap();
        service.create_node(Some(&parent), Some("title")).unwrap();
        assert!(!service.has_property(&parent, "title").unwrap());
    }

    #[test]
    fn narrow_check_is_not_supported() {
        let service = service();
        let node = article(&service);
        assert!(matches!(
            service.has_properties(&node, &["title"], true),
            Err(NodeError::NotSupported(_))
        ));
    }

    #[test]
    fn detached_node_has_no_properties() {
        let service = service();
        let draft = Node::detached(None);
        assert_eq!(
            service.has_properties(&draft, &["a", "b"], false).unwrap(),
            [false, false]
        );
        assert_eq!(service.properties(&draft).unwrap().count(), 0);
    }

    // -----------------------------------------------------------------------
    // Property writes
    // -----------------------------------------------------------------------

    #[test]
    fn article_scenario() {
        let service = service();
        let n = article(&service);

        service
            .set_property(
                &n,
                [
                    ("title", PropertyValue::from("Hello")),
                    ("views", PropertyValue::from(0)),
                ],
            )
            .unwrap();
        assert_eq!(service.get_value(&n, "views").unwrap(), PropertyValue::Integer(0));

        let err = service.set_property(&n, [("views", "oops")]).unwrap_err();
        assert!(matches!(
            err,
            NodeError::TypeMismatch { ref property, .. } if property == "views"
        ));
        assert_eq!(service.get_value(&n, "views").unwrap(), PropertyValue::Integer(0));
        assert_eq!(
            service.get_value(&n, "title").unwrap(),
            PropertyValue::Text("Hello".into())
        );
    }

    #[test]
    fn unknown_name_fails_whole_call() {
        let service = service();
        let n = article(&service);
        let err = service
            .set_property(
                &n,
                [
                    ("title", PropertyValue::from("changed")),
                    ("missing", PropertyValue::from(1)),
                ],
            )
            .unwrap_err();
        assert!(matches!(err, NodeError::PropertyNotFound(ref name) if name == "missing"));
        assert_eq!(service.get_value(&n, "title").unwrap(), PropertyValue::Text(String::new()));
    }

    #[test]
    fn mismatch_after_valid_pair_applies_nothing() {
        let service = service();
        let n = article(&service);
        let err = service
            .set_property(
                &n,
                [
                    ("title", PropertyValue::from("changed")),
                    ("views", PropertyValue::from(1.5)),
                ],
            )
            .unwrap_err();
        assert!(matches!(err, NodeError::TypeMismatch { .. }));
        assert_eq!(service.get_value(&n, "title").unwrap(), PropertyValue::Text(String::new()));
    }

    #[test]
    fn reserved_keys_are_dropped() {
        let service = service();
        let n = article(&service);
        let updated = service
            .set_property(
                &n,
                [
                    ("identifier", PropertyValue::from(9)),
                    ("dateCreated", PropertyValue::Null),
                    ("views", PropertyValue::from(3)),
                ],
            )
            .unwrap();
        assert_eq!(updated.len(), 1);
        assert_eq!(service.get_value(&n, "views").unwrap(), PropertyValue::Integer(3));
    }

    #[test]
    fn write_updates_modified_time() {
        let service = service();
        let n = article(&service);
        let before = service.property(&n, "views").unwrap();
        let after = service.set_value(&n, "views", 10).unwrap().unwrap();
        assert!(after.date_modified > before.date_modified);
        assert_eq!(after.date_created, before.date_created);
        assert_eq!(after.version, before.version + 1);
    }

    #[test]
    fn repeated_name_keeps_last_value() {
        let service = service();
        let n = article(&service);
        let updated = service
            .set_property(&n, [("views", 1), ("views", 2)])
            .unwrap();
        assert_eq!(updated.len(), 1);
        assert_eq!(service.get_value(&n, "views").unwrap(), PropertyValue::Integer(2));
    }

    #[test]
    fn nullable_kinds_accept_null() {
        let service = service();
        let n = article(&service);
        service.set_value(&n, "views", PropertyValue::Null).unwrap();
        assert!(service.get_value(&n, "views").unwrap().is_null());
        // The declared kind still governs after a null.
        assert!(matches!(
            service.set_value(&n, "views", "x"),
            Err(NodeError::TypeMismatch { .. })
        ));
        service.set_value(&n, "views", 4).unwrap();
    }

    #[test]
    fn writes_require_persisted_node() {
        let service = service();
        let draft = Node::detached(None);
        assert!(matches!(
            service.set_property(&draft, [("title", "x")]),
            Err(NodeError::NotPersisted)
        ));
    }

    #[test]
    fn get_value_of_missing_property() {
        let service = service();
        let n = article(&service);
        assert!(matches!(
            service.get_value(&n, "body"),
            Err(NodeError::PropertyNotFound(_))
        ));
    }

    #[test]
    fn properties_map_collects_values() {
        let service = service();
        let n = article(&service);
        service.set_value(&n, "title", "Hi").unwrap();
        let map = service.properties_map(&n).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["title"], PropertyValue::Text("Hi".into()));
        assert_eq!(map["views"], PropertyValue::Integer(0));
    }

    #[test]
    fn set_value_skips_reserved_key() {
        let service = service();
        let n = article(&service);
        let before = service.properties_map(&n).unwrap();
        assert_eq!(service.set_value(&n, "identifier", 5).unwrap(), None);
        assert_eq!(service.set_value(&n, "date_modified", "x").unwrap(), None);
        assert_eq!(service.properties_map(&n).unwrap(), before);
        assert!(service.set_value(&n, "views", 5).unwrap().is_some());
    }

    #[test]
    fn readers_never_see_half_a_write() {
        let service = Arc::new(service());
        let node = article(&service);
        service
            .set_property(
                &node,
                [("title", PropertyValue::from("0")), ("views", PropertyValue::from(0_i64))],
            )
            .unwrap();

        let writer = {
            let service = Arc::clone(&service);
            let node = node.clone();
            std::thread::spawn(move || {
                for i in 1..200_i64 {
                    service
                        .set_property(
                            &node,
                            [
                                ("title", PropertyValue::from(i.to_string())),
                                ("views", PropertyValue::from(i)),
                            ],
                        )
                        .unwrap();
                }
            })
        };
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let service = Arc::clone(&service);
                let node = node.clone();
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        let map = service.properties_map(&node).unwrap();
                        let views = map["views"].as_i64().unwrap();
                        assert_eq!(map["title"], PropertyValue::Text(views.to_string()));
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(service.get_value(&node, "views").unwrap(), PropertyValue::Integer(199));
    }

    #[test]
    fn missing_node_is_reported() {
        let service = service();
        let node = service.create_node(None, None).unwrap();
        let prop_parent = article(&service);
        let prop = service.property(&prop_parent, "title").unwrap();
        assert!(matches!(
            service.get_node(prop.id),
            Err(NodeError::NodeNotFound(_))
        ));
        assert!(matches!(
            service.get_node(ItemId::new(999)),
            Err(NodeError::NodeNotFound(_))
        ));
        assert_eq!(service.get_node(node.id().unwrap()).unwrap(), node);
    }

    // -----------------------------------------------------------------------
    // Tree
    // -----------------------------------------------------------------------

    #[test]
    fn dump_tree_walks_children() {
        let service = service();
        let root = service.create_node(None, Some("root")).unwrap();
        let child = service.create_node(Some(&root), Some("child")).unwrap();
        service.set_node_type(&child, "article").unwrap();

        let depths: Vec<usize> = service
            .dump_tree(&root, 5)
            .unwrap()
            .map(|line| line.unwrap().depth)
            .collect();
        assert_eq!(depths, [0, 1, 2, 2]);

        let text = service.render_tree(&root, 0).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("- <"));
    }

    // -----------------------------------------------------------------------
    // Conflicts
    // -----------------------------------------------------------------------

    type Interference = Box<dyn FnOnce(&InMemoryItemStore) + Send>;

    /// Runs one competing write right before the next commit.
    struct InterferingStore {
        inner: InMemoryItemStore,
        pending: Mutex<Option<Interference>>,
    }

    impl InterferingStore {
        fn new() -> Self {
            Self {
                inner: InMemoryItemStore::new(),
                pending: Mutex::new(None),
            }
        }

        fn before_next_commit(&self, f: impl FnOnce(&InMemoryItemStore) + Send + 'static) {
            *self.pending.lock().unwrap() = Some(Box::new(f));
        }
    }

    impl ItemStore for InterferingStore {
        fn get(&self, id: ItemId) -> bakul_tree::StoreResult<Option<Item>> {
            self.inner.get(id)
        }

        fn children_of(&self, parent: ItemId) -> bakul_tree::StoreResult<Vec<Item>> {
            self.inner.children_of(parent)
        }

        fn roots(&self) -> bakul_tree::StoreResult<Vec<Item>> {
            self.inner.roots()
        }

        fn commit(&self, batch: WriteBatch) -> bakul_tree::StoreResult<Vec<Item>> {
            let pending = self.pending.lock().unwrap().take();
            if let Some(f) = pending {
                f(&self.inner);
            }
            self.inner.commit(batch)
        }

        fn len(&self) -> bakul_tree::StoreResult<usize> {
            self.inner.len()
        }
    }

    #[test]
    fn retry_rechecks_binding_precondition() {
        let store = Arc::new(InterferingStore::new());
        let service = service_on(store.clone());
        let node = service.create_node(None, None).unwrap();
        let id = node.id().unwrap();

        store.before_next_commit(move |inner| {
            let mut item = inner.require(id).unwrap();
            item.kind = ItemKind::Node {
                node_type: Some("page".into()),
            };
            inner.save(&item).unwrap();
        });

        let err = service.set_node_type(&node, "article").unwrap_err();
        assert!(matches!(err, NodeError::AlreadyTyped(ref name) if name == "page"));
        assert!(service.children(&node).unwrap().is_empty());
    }

    #[test]
    fn retry_reapplies_property_write() {
        let store = Arc::new(InterferingStore::new());
        let service = service_on(store.clone());
        let node = article(&service);
        let views = service.property(&node, "views").unwrap();

        store.before_next_commit(move |inner| {
            let mut item = inner.require(views.id).unwrap();
            item.property_mut().unwrap().assign(100).unwrap();
            inner.save(&item).unwrap();
        });

        service.set_value(&node, "views", 7).unwrap();
        assert_eq!(service.get_value(&node, "views").unwrap(), PropertyValue::Integer(7));
    }

    #[test]
    fn conflict_surfaces_without_retries() {
        let store = Arc::new(InterferingStore::new());
        let config = NodeConfig {
            max_conflict_retries: 0,
            ..NodeConfig::default()
        };
        let service = NodeService::with_config(store.clone(), Arc::new(registry()), config);
        let node = service.create_node(None, None).unwrap();
        let id = node.id().unwrap();

        store.before_next_commit(move |inner| {
            let item = inner.require(id).unwrap();
            inner.save(&item).unwrap();
        });

        let err = service.set_node_type(&node, "article").unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(service.node_type(&node).unwrap(), None);
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    fn name_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("title".to_string()),
            Just("views".to_string()),
            "[a-z]{1,6}",
        ]
    }

    proptest! {
        #[test]
        fn has_properties_matches_single_lookups(
            names in proptest::collection::vec(name_strategy(), 0..8)
        ) {
            let service = service();
            let node = article(&service);
            let flags = service.has_properties(&node, names.as_slice(), false).unwrap();
            prop_assert_eq!(flags.len(), names.len());
            for (name, flag) in names.iter().zip(&flags) {
                prop_assert_eq!(*flag, service.has_property(&node, name).unwrap());
                prop_assert_eq!(*flag, name == "title" || name == "views");
            }
        }

        #[test]
        fn integer_round_trip(value in any::<i64>()) {
            let service = service();
            let node = article(&service);
            service.set_value(&node, "views", value).unwrap();
            prop_assert_eq!(
                service.get_value(&node, "views").unwrap(),
                PropertyValue::Integer(value)
            );
        }
    }
}
