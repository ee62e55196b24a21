//! Nodes for Bakul.
//!
//! A node is a tree item bound to zero or one node type. Binding a type
//! instantiates one property child per declared field; afterwards the
//! node's properties are read and written by name.
//!
//! [`NodeService`] orchestrates both halves: it resolves schemas through a
//! [`SchemaRegistry`](bakul_schema::SchemaRegistry) and reads and writes
//! items through an [`ItemStore`](bakul_tree::ItemStore). Every
//! multi-item change goes through one atomic write batch, retried on
//! version conflicts.
//!
//! # Modules
//!
//! - [`error`] — [`NodeError`] and the [`NodeResult`] alias
//! - [`config`] — [`NodeConfig`]
//! - [`node`] — the [`Node`] handle
//! - [`service`] — [`NodeService`]: schema binding and property access
//! - [`repository`] — [`Repository`] and [`Workspace`]

pub mod config;
pub mod error;
pub mod node;
pub mod repository;
pub mod service;

pub use config::NodeConfig;
pub use error::{NodeError, NodeResult};
pub use node::{Node, NodeTypeRef};
pub use repository::{Repository, Workspace};
pub use service::NodeService;
