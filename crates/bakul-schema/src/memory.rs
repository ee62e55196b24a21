//! In-memory schema registry.
//!
//! [`InMemorySchemaRegistry`] keeps the whole catalog in vectors behind a
//! `RwLock`. Ids are positions in those vectors, so they are dense and follow
//! registration order.

use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use bakul_property::PropertyKind;
use tracing::{debug, info};

use crate::error::{Result, SchemaError};
use crate::names::validate_name;
use crate::traits::SchemaRegistry;
use crate::types::{
    FieldType, FieldTypeId, NodeType, NodeTypeDef, NodeTypeField, NodeTypeId, UNTYPED_NODE_TYPE,
};

/// An in-memory implementation of [`SchemaRegistry`].
///
/// [`InMemorySchemaRegistry::new`] pre-registers one field type per
/// [`PropertyKind`], named by the kind's short name, plus the untyped
/// placeholder node type.
#[derive(Debug)]
pub struct InMemorySchemaRegistry {
    state: RwLock<RegistryState>,
}

#[derive(Debug, Default)]
struct RegistryState {
    field_types: Vec<FieldType>,
    field_types_by_name: HashMap<String, FieldTypeId>,
    node_types: Vec<NodeType>,
    node_types_by_name: HashMap<String, NodeTypeId>,
    fields: HashMap<NodeTypeId, Vec<NodeTypeField>>,
}

impl RegistryState {
    fn insert_field_type(&mut self, name: &str, kind: PropertyKind, builtin: bool) -> FieldType {
        let id = FieldTypeId(self.field_types.len() as u32);
        let field_type = FieldType {
            id,
            name: name.to_string(),
            kind,
            builtin,
        };
        self.field_types.push(field_type.clone());
        self.field_types_by_name.insert(name.to_string(), id);
        field_type
    }

    fn insert_node_type(&mut self, def: &NodeTypeDef, fields: Vec<(String, FieldTypeId)>) -> NodeType {
        let id = NodeTypeId(self.node_types.len() as u32);
        let node_type = NodeType {
            id,
            name: def.name.clone(),
            extends: def.extends.clone(),
            author: def.author.clone(),
            description: def.description.clone(),
            short_description: def.short_description.clone(),
            viewer: def.viewer.clone(),
        };
        let fields = fields
            .into_iter()
            .map(|(name, field_type)| NodeTypeField {
                name,
                field_type,
                node_type: id,
            })
            .collect();
        self.node_types.push(node_type.clone());
        self.node_types_by_name.insert(def.name.clone(), id);
        self.fields.insert(id, fields);
        node_type
    }
}

impl InMemorySchemaRegistry {
    /// A registry holding the built-in field types and the placeholder.
    pub fn new() -> Self {
        let mut state = RegistryState::default();
        for kind in PropertyKind::ALL {
            state.insert_field_type(kind.short_name(), kind, true);
        }
        state.insert_node_type(&placeholder_def(), Vec::new());
        Self {
            state: RwLock::new(state),
        }
    }

    /// A registry holding only the placeholder node type.
    pub fn bare() -> Self {
        let mut state = RegistryState::default();
        state.insert_node_type(&placeholder_def(), Vec::new());
        Self {
            state: RwLock::new(state),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, RegistryState>> {
        self.state
            .read()
            .map_err(|e| SchemaError::Poisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, RegistryState>> {
        self.state
            .write()
            .map_err(|e| SchemaError::Poisoned(e.to_string()))
    }
}

impl Default for InMemorySchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn placeholder_def() -> NodeTypeDef {
    NodeTypeDef::new(UNTYPED_NODE_TYPE).short_description("untyped node")
}

impl SchemaRegistry for InMemorySchemaRegistry {
    fn lookup_node_type(&self, name: &str) -> Result<NodeType> {
        let state = self.read()?;
        state
            .node_types_by_name
            .get(name)
            .map(|id| state.node_types[id.0 as usize].clone())
            .ok_or_else(|| SchemaError::NodeTypeNotFound(name.to_string()))
    }

    fn node_type_by_id(&self, id: NodeTypeId) -> Result<NodeType> {
        let state = self.read()?;
        state
            .node_types
            .get(id.0 as usize)
            .cloned()
            .ok_or_else(|| SchemaError::NodeTypeNotFound(format!("#{}", id.0)))
    }

    fn fields_of(&self, node_type: &NodeType) -> Result<Vec<NodeTypeField>> {
        let state = self.read()?;
        state
            .fields
            .get(&node_type.id)
            .cloned()
            .ok_or_else(|| SchemaError::NodeTypeNotFound(node_type.name.clone()))
    }

    fn field_type(&self, name: &str) -> Result<FieldType> {
        let state = self.read()?;
        state
            .field_types_by_name
            .get(name)
            .map(|id| state.field_types[id.0 as usize].clone())
            .ok_or_else(|| SchemaError::FieldTypeNotFound(name.to_string()))
    }

    fn field_type_by_id(&self, id: FieldTypeId) -> Result<FieldType> {
        let state = self.read()?;
        state
            .field_types
            .get(id.0 as usize)
            .cloned()
            .ok_or_else(|| SchemaError::FieldTypeNotFound(format!("#{}", id.0)))
    }

    fn register_field_type(&self, name: &str, implementation: &str) -> Result<FieldType> {
        validate_name(name)?;
        let kind: PropertyKind = implementation
            .parse()
            .map_err(|_| SchemaError::UnknownImplementation(implementation.to_string()))?;

        let mut state = self.write()?;
        if state.field_types_by_name.contains_key(name) {
            return Err(SchemaError::AlreadyExists {
                kind: "field type",
                name: name.to_string(),
            });
        }
        let field_type = state.insert_field_type(name, kind, false);
        debug!(name, implementation = kind.implementation_name(), "registered field type");
        Ok(field_type)
    }

    fn register_node_type(&self, def: &NodeTypeDef) -> Result<NodeType> {
        validate_name(&def.name)?;

        let mut state = self.write()?;
        if state.node_types_by_name.contains_key(&def.name) {
            return Err(SchemaError::AlreadyExists {
                kind: "node type",
                name: def.name.clone(),
            });
        }

        let mut seen = HashSet::new();
        let mut resolved = Vec::with_capacity(def.fields.len());
        for field in &def.fields {
            validate_name(&field.name)?;
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    node_type: def.name.clone(),
                    field: field.name.clone(),
                });
            }
            let field_type = state
                .field_types_by_name
                .get(&field.field_type)
                .copied()
                .ok_or_else(|| SchemaError::FieldTypeNotFound(field.field_type.clone()))?;
            resolved.push((field.name.clone(), field_type));
        }

        let node_type = state.insert_node_type(def, resolved);
        info!(name = %node_type.name, fields = def.fields.len(), "registered node type");
        Ok(node_type)
    }

    fn node_types(&self) -> Result<Vec<NodeType>> {
        Ok(self.read()?.node_types.clone())
    }

    fn field_types(&self) -> Result<Vec<FieldType>> {
        Ok(self.read()?.field_types.clone())
    }
}
