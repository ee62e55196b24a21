//! TOML schema definitions.
//!
//! ```toml
//! [[field_types]]
//! name = "rich_text"
//! implementation = "TextProperty"
//!
//! [[node_types]]
//! name = "article"
//! author = "editorial"
//!
//! [[node_types.fields]]
//! name = "title"
//! field_type = "text"
//!
//! [[node_types.fields]]
//! name = "body"
//! field_type = "rich_text"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SchemaError};
use crate::traits::SchemaRegistry;
use crate::types::{FieldDef, NodeTypeDef};

/// A field type entry: a name and the property implementation backing it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldTypeConfig {
    pub name: String,
    pub implementation: String,
}

/// Field types and node types to register, in order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaConfig {
    #[serde(default)]
    pub field_types: Vec<FieldTypeConfig>,
    #[serde(default)]
    pub node_types: Vec<NodeTypeDef>,
}

impl SchemaConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| SchemaError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SchemaError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Register every field type, then every node type.
    ///
    /// Stops at the first failure; entries registered before it remain.
    pub fn apply(&self, registry: &dyn SchemaRegistry) -> Result<()> {
        for ft in &self.field_types {
            registry.register_field_type(&ft.name, &ft.implementation)?;
        }
        for nt in &self.node_types {
            registry.register_node_type(nt)?;
        }
        debug!(
            field_types = self.field_types.len(),
            node_types = self.node_types.len(),
            "applied schema config"
        );
        Ok(())
    }

    /// Rebuild the definitions held by `registry`.
    ///
    /// Built-in field types are skipped, as is the untyped placeholder.
    pub fn export(registry: &dyn SchemaRegistry) -> Result<Self> {
        let field_types = registry
            .field_types()?
            .into_iter()
            .filter(|ft| !ft.builtin)
            .map(|ft| FieldTypeConfig {
                implementation: ft.implementation().to_string(),
                name: ft.name,
            })
            .collect();

        let mut node_types = Vec::new();
        for nt in registry.node_types()? {
            if nt.is_untyped() {
                continue;
            }
            let fields = registry
                .fields_of(&nt)?
                .into_iter()
                .map(|f| {
                    Ok(FieldDef {
                        field_type: registry.field_type_by_id(f.field_type)?.name,
                        name: f.name,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            node_types.push(NodeTypeDef {
                name: nt.name,
                extends: nt.extends,
                author: nt.author,
                description: nt.description,
                short_description: nt.short_description,
                viewer: nt.viewer,
                fields,
            });
        }

        Ok(Self {
            field_types,
            node_types,
        })
    }
}
