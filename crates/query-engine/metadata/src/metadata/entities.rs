//! Entity, attribute and relationship shapes supplied by the metadata
//! gateway.

use std::collections::BTreeMap;

use enum_iterator::Sequence;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Mapping from an entity's logical name to its information.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct EntitiesInfo(pub BTreeMap<String, EntityInfo>);

impl EntitiesInfo {
    pub fn empty() -> Self {
        EntitiesInfo(BTreeMap::new())
    }
}

/// Everything the engine needs to know about one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EntityInfo {
    pub logical_name: String,
    /// Name of the entity's collection (entity set) in the web API.
    pub entity_set_name: String,
    /// Logical name of the primary-key attribute.
    pub primary_id_attribute: String,
    #[serde(default)]
    pub object_type_code: Option<u32>,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeInfo>,
    /// Relationships where this entity is the referenced (one) side.
    #[serde(default)]
    pub one_to_many: Vec<OneToManyRelationship>,
    /// Relationships where this entity is the referencing (many) side.
    #[serde(default)]
    pub many_to_one: Vec<OneToManyRelationship>,
    #[serde(default)]
    pub many_to_many: Vec<ManyToManyRelationship>,
}

impl EntityInfo {
    /// Look up an attribute by its logical name.
    pub fn attribute(&self, logical_name: &str) -> Option<&AttributeInfo> {
        self.attributes.get(logical_name)
    }
}

/// Information about one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AttributeInfo {
    pub logical_name: String,
    pub attribute_type: AttributeType,
    /// For lookup-typed attributes, the entities the lookup may point at.
    #[serde(default)]
    pub targets: Vec<String>,
    /// For managed properties, the type of the wrapped value.
    #[serde(default)]
    pub value_type: Option<AttributeType>,
}

impl AttributeInfo {
    /// The storage property name in the web API. Lookup-typed attributes are
    /// exposed through a synthetic `_name_value` property.
    pub fn property_name(&self) -> String {
        if self.attribute_type.is_lookup() {
            format!("_{}_value", self.logical_name)
        } else {
            self.logical_name.clone()
        }
    }
}

/// The attribute type tags the engine distinguishes when formatting literals
/// and naming properties.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Sequence,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Memo,
    Integer,
    BigInt,
    Decimal,
    Money,
    Double,
    Boolean,
    DateTime,
    UniqueIdentifier,
    Lookup,
    Customer,
    Owner,
    Picklist,
    State,
    Status,
    EntityName,
    /// A managed property wrapping a value of [`AttributeInfo::value_type`].
    ManagedProperty,
}

impl AttributeType {
    /// Whether values of this type reference another record by id.
    pub fn is_lookup(self) -> bool {
        matches!(
            self,
            AttributeType::Lookup | AttributeType::Customer | AttributeType::Owner
        )
    }
}

/// A one-to-many relationship, usable from either side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OneToManyRelationship {
    pub schema_name: String,
    pub referenced_entity: String,
    pub referenced_attribute: String,
    pub referencing_entity: String,
    pub referencing_attribute: String,
    /// Collection-valued navigation property on the referenced entity.
    pub referenced_navigation_property: String,
    /// Single-valued navigation property on the referencing entity.
    pub referencing_navigation_property: String,
}

/// A many-to-many relationship through an intersect entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ManyToManyRelationship {
    pub schema_name: String,
    pub intersect_entity: String,
    pub entity1: String,
    pub entity1_intersect_attribute: String,
    pub entity1_navigation_property: String,
    pub entity2: String,
    pub entity2_intersect_attribute: String,
    pub entity2_navigation_property: String,
}
