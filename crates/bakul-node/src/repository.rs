//! Repository and workspace surface.
//!
//! A [`Repository`] names a tree root and the node types it accepts.
//! Workspaces and path navigation are declared here but not implemented;
//! every such call fails with [`NodeError::NotSupported`].

use std::collections::BTreeSet;

use bakul_schema::{validate_name, NodeType};
use bakul_types::{ItemUuid, UuidGenerator};
use tracing::info;

use crate::error::{NodeError, NodeResult};
use crate::node::{Node, NodeTypeRef};
use crate::service::NodeService;

/// A named tree with its own root node.
#[derive(Clone, Debug, PartialEq)]
pub struct Repository {
    pub name: String,
    pub uuid: ItemUuid,
    pub root_node: Node,
    registered_types: BTreeSet<String>,
}

impl Repository {
    /// Create a repository and its root node.
    pub fn create(
        service: &NodeService,
        name: &str,
        uuids: &dyn UuidGenerator,
    ) -> NodeResult<Self> {
        validate_name(name)?;
        let root_node = service.create_node(None, Some(name))?;
        let repo = Self {
            name: name.to_string(),
            uuid: uuids.next(),
            root_node,
            registered_types: BTreeSet::new(),
        };
        info!(name = %repo.name, uuid = %repo.uuid, "created repository");
        Ok(repo)
    }

    /// Accept `node_type` in this repository.
    pub fn register_type<'a>(
        &mut self,
        service: &NodeService,
        node_type: impl Into<NodeTypeRef<'a>>,
    ) -> NodeResult<NodeType> {
        let node_type = service.resolve(node_type.into())?;
        self.registered_types.insert(node_type.name.clone());
        Ok(node_type)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.registered_types.contains(name)
    }

    /// Names of the accepted node types, sorted.
    pub fn registered_types(&self) -> impl Iterator<Item = &str> {
        self.registered_types.iter().map(String::as_str)
    }

    pub fn create_workspace(&self, _name: &str) -> NodeResult<Workspace> {
        Err(NodeError::NotSupported("workspaces"))
    }
}

/// A working view onto a repository, with a current node.
#[derive(Clone, Debug, PartialEq)]
pub struct Workspace {
    pub name: String,
    pub repository: String,
    pub root_node: Node,
    pub current_node: Node,
}

impl Workspace {
    pub fn new(name: impl Into<String>, repository: &Repository) -> Self {
        Self {
            name: name.into(),
            repository: repository.name.clone(),
            root_node: repository.root_node.clone(),
            current_node: repository.root_node.clone(),
        }
    }

    /// Change the current node to the one at `path`.
    pub fn cwd(&mut self, _path: &str) -> NodeResult<Node> {
        Err(NodeError::NotSupported("workspace navigation"))
    }

    /// Path of the current node.
    pub fn pwd(&self) -> NodeResult<String> {
        Err(NodeError::NotSupported("workspace navigation"))
    }

    pub fn create_node(&mut self, _path: &str) -> NodeResult<Node> {
        Err(NodeError::NotSupported("workspace node creation"))
    }

    pub fn get_node(&self, _path: &str) -> NodeResult<Node> {
        Err(NodeError::NotSupported("workspace node lookup"))
    }

    pub fn print_cwd(&self) -> NodeResult<String> {
        Err(NodeError::NotSupported("workspace navigation"))
    }

    pub fn print_path(&self, _path: &str) -> NodeResult<String> {
        Err(NodeError::NotSupported("workspace navigation"))
    }
}
