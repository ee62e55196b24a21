//! The [`SchemaRegistry`] trait defining the schema catalog interface.

use crate::error::Result;
use crate::types::{
    FieldType, FieldTypeId, NodeType, NodeTypeDef, NodeTypeField, NodeTypeId, PropertySpec,
    UNTYPED_NODE_TYPE,
};

/// Catalog of field types and node types.
///
/// Implementations must be thread-safe (`Send + Sync`). Registration is
/// all-or-nothing: a node type whose definition fails validation leaves the
/// registry unchanged.
pub trait SchemaRegistry: Send + Sync {
    /// Look up a node type by exact, case-sensitive name.
    ///
    /// Fails with [`SchemaError::NodeTypeNotFound`](crate::SchemaError::NodeTypeNotFound)
    /// if absent.
    fn lookup_node_type(&self, name: &str) -> Result<NodeType>;

    /// Look up a node type by id.
    fn node_type_by_id(&self, id: NodeTypeId) -> Result<NodeType>;

    /// The declared fields of `node_type`, in declaration order.
    fn fields_of(&self, node_type: &NodeType) -> Result<Vec<NodeTypeField>>;

    /// Look up a field type by exact name.
    fn field_type(&self, name: &str) -> Result<FieldType>;

    /// Look up a field type by id.
    fn field_type_by_id(&self, id: FieldTypeId) -> Result<FieldType>;

    /// Register a field type backed by the named property implementation
    /// (`"IntegerProperty"` or `"integer"`).
    fn register_field_type(&self, name: &str, implementation: &str) -> Result<FieldType>;

    /// Register a node type and its fields.
    fn register_node_type(&self, def: &NodeTypeDef) -> Result<NodeType>;

    /// All node types, in registration order.
    fn node_types(&self) -> Result<Vec<NodeType>>;

    /// All field types, in registration order.
    fn field_types(&self) -> Result<Vec<FieldType>>;

    /// The untyped placeholder node type.
    fn untyped(&self) -> Result<NodeType> {
        self.lookup_node_type(UNTYPED_NODE_TYPE)
    }

    /// Alias of [`fields_of`](Self::fields_of).
    fn get_fields(&self, node_type: &NodeType) -> Result<Vec<NodeTypeField>> {
        self.fields_of(node_type)
    }

    /// The fields of `node_type` resolved to the property kinds they
    /// instantiate, in declaration order.
    fn property_specs(&self, node_type: &NodeType) -> Result<Vec<PropertySpec>> {
        self.fields_of(node_type)?
            .into_iter()
            .map(|field| {
                let field_type = self.field_type_by_id(field.field_type)?;
                Ok(PropertySpec {
                    name: field.name,
                    kind: field_type.kind,
                })
            })
            .collect()
    }
}
