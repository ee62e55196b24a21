//! The node handle.

use std::fmt;

use bakul_schema::NodeType;
use bakul_tree::Item;
use bakul_types::ItemId;

/// A lightweight handle to a node.
///
/// A handle carries only identity; every [`NodeService`](crate::NodeService)
/// operation reads the node's current state from the store. A handle
/// without an id stands for a node that was never saved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    id: Option<ItemId>,
    name: Option<String>,
}

impl Node {
    /// A node that exists only in memory.
    pub fn detached(name: Option<String>) -> Self {
        Self { id: None, name }
    }

    /// Handle for a stored node item.
    pub fn from_item(item: &Item) -> Self {
        Self {
            id: Some(item.id),
            name: item.name.clone(),
        }
    }

    pub fn id(&self) -> Option<ItemId> {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.id, &self.name) {
            (Some(id), Some(name)) => write!(f, "{name} <{id}>"),
            (Some(id), None) => write!(f, "<{id}>"),
            (None, Some(name)) => write!(f, "{name} <unsaved>"),
            (None, None) => f.write_str("<unsaved>"),
        }
    }
}

/// A node type given either by name or as a resolved record.
#[derive(Clone, Copy, Debug)]
pub enum NodeTypeRef<'a> {
    Name(&'a str),
    Type(&'a NodeType),
}

impl NodeTypeRef<'_> {
    pub fn name(&self) -> &str {
        match self {
            NodeTypeRef::Name(name) => name,
            NodeTypeRef::Type(node_type) => &node_type.name,
        }
    }
}

impl<'a> From<&'a str> for NodeTypeRef<'a> {
    fn from(name: &'a str) -> Self {
        NodeTypeRef::Name(name)
    }
}

impl<'a> From<&'a String> for NodeTypeRef<'a> {
    fn from(name: &'a String) -> Self {
        NodeTypeRef::Name(name)
    }
}

impl<'a> From<&'a NodeType> for NodeTypeRef<'a> {
    fn from(node_type: &'a NodeType) -> Self {
        NodeTypeRef::Type(node_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detached_is_not_persisted() {
        let node = Node::detached(Some("draft".into()));
        assert!(!node.is_persisted());
        assert_eq!(node.id(), None);
        assert_eq!(node.to_string(), "draft <unsaved>");
    }

    #[test]
    fn type_ref_names() {
        let by_name = NodeTypeRef::from("article");
        assert_eq!(by_name.name(), "article");
        let owned = String::from("page");
        assert_eq!(NodeTypeRef::from(&owned).name(), "page");
    }
}
