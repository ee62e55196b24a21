//! Core schema records.

use std::fmt;

use bakul_property::PropertyKind;
use serde::{Deserialize, Serialize};

/// Name of the placeholder node type carried by every registry.
///
/// A node bound to it has no properties and may still be given a real type.
pub const UNTYPED_NODE_TYPE: &str = "bakul:node";

/// Registry-assigned identity of a [`FieldType`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldTypeId(pub u32);

/// Registry-assigned identity of a [`NodeType`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeTypeId(pub u32);

/// A named property variant, e.g. `integer` backed by `IntegerProperty`.
///
/// Immutable after registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldType {
    pub id: FieldTypeId,
    pub name: String,
    pub kind: PropertyKind,
    /// Registered by the registry itself rather than by configuration.
    #[serde(default)]
    pub builtin: bool,
}

impl FieldType {
    /// Implementation name of the backing property variant.
    pub fn implementation(&self) -> &'static str {
        self.kind.implementation_name()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A named schema.
///
/// `extends` is recorded but has no inheritance semantics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeType {
    pub id: NodeTypeId,
    pub name: String,
    pub extends: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub viewer: Option<String>,
}

impl NodeType {
    /// Whether this is the untyped placeholder.
    pub fn is_untyped(&self) -> bool {
        self.name == UNTYPED_NODE_TYPE
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// One declared field of a node type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeTypeField {
    pub name: String,
    pub field_type: FieldTypeId,
    pub node_type: NodeTypeId,
}

/// A field resolved down to the property kind it instantiates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertySpec {
    pub name: String,
    pub kind: PropertyKind,
}

/// Field entry of a [`NodeTypeDef`]: a field name and a field type name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub field_type: String,
}

/// Definition of a node type, as supplied at registration time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeTypeDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewer: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

impl NodeTypeDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Append a field; declaration order is kept.
    pub fn field(mut self, name: impl Into<String>, field_type: impl Into<String>) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            field_type: field_type.into(),
        });
        self
    }

    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.extends = Some(parent.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn short_description(mut self, short: impl Into<String>) -> Self {
        self.short_description = Some(short.into());
        self
    }

    pub fn viewer(mut self, viewer: impl Into<String>) -> Self {
        self.viewer = Some(viewer.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn def_builder_keeps_field_order() {
        let def = NodeTypeDef::new("article")
            .author("editor")
            .field("title", "text")
            .field("views", "integer");
        let names: Vec<&str> = def.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["title", "views"]);
        assert_eq!(def.author.as_deref(), Some("editor"));
        assert!(def.extends.is_none());
    }

    #[test]
    fn untyped_placeholder_is_recognized() {
        let placeholder = NodeType {
            id: NodeTypeId(0),
            name: UNTYPED_NODE_TYPE.into(),
            extends: None,
            author: None,
            description: None,
            short_description: None,
            viewer: None,
        };
        assert!(placeholder.is_untyped());
        assert_eq!(placeholder.to_string(), "bakul:node");
    }

    #[test]
    fn field_type_reports_implementation() {
        let ft = FieldType {
            id: FieldTypeId(3),
            name: "counter".into(),
            kind: PropertyKind::Integer,
            builtin: false,
        };
        assert_eq!(ft.implementation(), "IntegerProperty");
    }
}
