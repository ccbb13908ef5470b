//! Metadata information regarding the remote platform's entity catalog.

pub mod entities;

// re-export without modules
pub use entities::*;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A complete in-memory metadata catalog. Implements [`MetadataProvider`] for
/// deployments that load their metadata from configuration, and for test
/// fixtures.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct Metadata {
    pub entities: EntitiesInfo,
}

impl Metadata {
    pub fn empty() -> Self {
        Metadata {
            entities: EntitiesInfo::empty(),
        }
    }
}

/// Errors produced by metadata lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetadataError {
    #[error("entity '{0}' not found")]
    EntityNotFound(String),
    #[error("no entity with object type code {0}")]
    EntityTypeCodeNotFound(u32),
}

/// The gateway the translation engine consults for entity, attribute and
/// relationship metadata.
///
/// The engine may look the same entity up repeatedly during one compilation
/// and places no bound on repeat calls; implementations backed by a remote
/// service are expected to cache internally.
pub trait MetadataProvider {
    /// Gets the metadata for an entity by its logical name.
    fn entity(&self, logical_name: &str) -> Result<EntityInfo, MetadataError>;

    /// Gets the metadata for an entity by its numeric object type code.
    fn entity_by_type_code(&self, type_code: u32) -> Result<EntityInfo, MetadataError>;
}

impl MetadataProvider for Metadata {
    fn entity(&self, logical_name: &str) -> Result<EntityInfo, MetadataError> {
        self.entities
            .0
            .get(logical_name)
            .cloned()
            .ok_or_else(|| MetadataError::EntityNotFound(logical_name.to_string()))
    }

    fn entity_by_type_code(&self, type_code: u32) -> Result<EntityInfo, MetadataError> {
        self.entities
            .0
            .values()
            .find(|entity| entity.object_type_code == Some(type_code))
            .cloned()
            .ok_or(MetadataError::EntityTypeCodeNotFound(type_code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Metadata {
        serde_json::from_value(serde_json::json!({
            "entities": {
                "incident": {
                    "logical_name": "incident",
                    "entity_set_name": "incidents",
                    "primary_id_attribute": "incidentid",
                    "object_type_code": 112
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn looks_up_by_logical_name() {
        let metadata = catalog();
        assert_eq!(
            metadata.entity("incident").unwrap().entity_set_name,
            "incidents"
        );
        assert_eq!(
            metadata.entity("account").unwrap_err(),
            MetadataError::EntityNotFound("account".to_string())
        );
    }

    #[test]
    fn looks_up_by_object_type_code() {
        let metadata = catalog();
        assert_eq!(
            metadata.entity_by_type_code(112).unwrap().logical_name,
            "incident"
        );
        assert_eq!(
            metadata.entity_by_type_code(1).unwrap_err(),
            MetadataError::EntityTypeCodeNotFound(1)
        );
    }
}
