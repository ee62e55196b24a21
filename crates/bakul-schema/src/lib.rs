//! Schema registry for Bakul.
//!
//! A [`NodeType`] is a named schema: an ordered list of [`NodeTypeField`]s,
//! each naming a [`FieldType`]. A field type maps onto one of the closed set
//! of [`PropertyKind`](bakul_property::PropertyKind)s, resolved once when the
//! field type is registered.
//!
//! # Architecture
//!
//! - The registry is the single source of truth mapping a node type name to
//!   its field list. Lookups are exact-name and case-sensitive.
//! - Field types and node types are registered administratively, before any
//!   node uses them, and are read-only afterwards.
//! - Every registry carries the untyped placeholder node type
//!   [`UNTYPED_NODE_TYPE`], which has no fields and does not count as a real
//!   type when binding nodes.
//!
//! # Modules
//!
//! - [`error`] — Error types for schema operations
//! - [`types`] — [`FieldType`], [`NodeType`], [`NodeTypeField`], [`NodeTypeDef`]
//! - [`traits`] — The [`SchemaRegistry`] trait
//! - [`memory`] — In-memory [`InMemorySchemaRegistry`]
//! - [`names`] — Schema name validation
//! - [`config`] — TOML schema definitions ([`SchemaConfig`])

pub mod config;
pub mod error;
pub mod memory;
pub mod names;
pub mod traits;
pub mod types;

pub use config::{FieldTypeConfig, SchemaConfig};
pub use error::{Result, SchemaError};
pub use memory::InMemorySchemaRegistry;
pub use names::validate_name;
pub use traits::SchemaRegistry;
pub use types::{
    FieldDef, FieldType, FieldTypeId, NodeType, NodeTypeDef, NodeTypeField, NodeTypeId,
    PropertySpec, UNTYPED_NODE_TYPE,
};
