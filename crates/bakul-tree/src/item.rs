//! Tree item records.

use bakul_property::{PropertyKind, PropertyValue, TypedValue};
use bakul_types::{ItemId, ItemUuid, Timestamp};
use serde::{Deserialize, Serialize};

/// What an item is: a container node or a typed property leaf.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemKind {
    /// A container bound to zero or one node type, referenced by name.
    Node { node_type: Option<String> },
    /// A leaf holding one typed value.
    Property { value: TypedValue },
}

/// A persisted tree item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub uuid: ItemUuid,
    pub name: Option<String>,
    pub parent: Option<ItemId>,
    pub date_created: Timestamp,
    pub date_modified: Timestamp,
    /// Bumped by the store on every successful write.
    pub version: u64,
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl Item {
    pub fn is_node(&self) -> bool {
        matches!(self.kind, ItemKind::Node { .. })
    }

    pub fn is_property(&self) -> bool {
        matches!(self.kind, ItemKind::Property { .. })
    }

    /// Name of the bound node type, for nodes that have one.
    pub fn node_type(&self) -> Option<&str> {
        match &self.kind {
            ItemKind::Node { node_type } => node_type.as_deref(),
            ItemKind::Property { .. } => None,
        }
    }

    /// The typed value, for property items.
    pub fn property(&self) -> Option<&TypedValue> {
        match &self.kind {
            ItemKind::Property { value } => Some(value),
            ItemKind::Node { .. } => None,
        }
    }

    pub fn property_mut(&mut self) -> Option<&mut TypedValue> {
        match &mut self.kind {
            ItemKind::Property { value } => Some(value),
            ItemKind::Node { .. } => None,
        }
    }

    /// Sibling ordering key.
    pub fn order_key(&self) -> (Timestamp, Timestamp, ItemId) {
        (self.date_created, self.date_modified, self.id)
    }

    /// Short label used in diagnostics.
    pub fn label(&self) -> String {
        match &self.kind {
            ItemKind::Node { node_type } => {
                format!("node:{}", node_type.as_deref().unwrap_or("-"))
            }
            ItemKind::Property { value } => format!("property:{}", value.kind()),
        }
    }
}

/// The kind-specific part of a [`NewItem`].
#[derive(Clone, Debug, PartialEq)]
pub enum NewItemKind {
    Node {
        node_type: Option<String>,
    },
    /// A property; without an explicit value it starts at the kind's
    /// default, with temporal kinds taking the creation time.
    Property {
        kind: PropertyKind,
        value: Option<PropertyValue>,
    },
}

/// An item to be created. The store assigns id, uuid, timestamps and
/// version.
#[derive(Clone, Debug, PartialEq)]
pub struct NewItem {
    pub name: Option<String>,
    pub parent: Option<ItemId>,
    pub kind: NewItemKind,
}

impl NewItem {
    /// An untyped node.
    pub fn node(parent: Option<ItemId>, name: Option<String>) -> Self {
        Self {
            name,
            parent,
            kind: NewItemKind::Node { node_type: None },
        }
    }

    /// A property named `name` under `parent`, holding the kind's default.
    pub fn property(parent: ItemId, name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: Some(name.into()),
            parent: Some(parent),
            kind: NewItemKind::Property { kind, value: None },
        }
    }

    /// Start with `value` instead of the kind's default.
    pub fn with_value(mut self, value: impl Into<PropertyValue>) -> Self {
        if let NewItemKind::Property { value: slot, .. } = &mut self.kind {
            *slot = Some(value.into());
        }
        self
    }

    /// Bind the node to `node_type` at creation.
    pub fn with_node_type(mut self, name: impl Into<String>) -> Self {
        if let NewItemKind::Node { node_type } = &mut self.kind {
            *node_type = Some(name.into());
        }
        self
    }
}
