//! Helpers for processing the Fetch tree and the metadata around it.

use query_engine_metadata::metadata::{AttributeInfo, EntityInfo, MetadataProvider};

use super::error::Error;

/// Static information for the duration of one compilation: the injected
/// metadata gateway. Compilation is re-entrant; an `Env` holds no state of
/// its own.
pub struct Env<'a> {
    provider: &'a dyn MetadataProvider,
}

impl<'a> Env<'a> {
    /// Create a new Env by supplying the metadata gateway.
    pub fn new(provider: &'a dyn MetadataProvider) -> Env<'a> {
        Env { provider }
    }

    /// Look up an entity's information in the metadata.
    pub fn entity(&self, logical_name: &str) -> Result<EntityInfo, Error> {
        Ok(self.provider.entity(logical_name)?)
    }

    /// Look up an entity by its numeric object type code.
    pub fn entity_by_type_code(&self, type_code: u32) -> Result<EntityInfo, Error> {
        Ok(self.provider.entity_by_type_code(type_code)?)
    }

    /// Look up an attribute in an entity's metadata.
    pub fn attribute<'e>(
        &self,
        entity: &'e EntityInfo,
        logical_name: &str,
    ) -> Result<&'e AttributeInfo, Error> {
        entity
            .attribute(logical_name)
            .ok_or_else(|| Error::AttributeNotFound {
                entity: entity.logical_name.clone(),
                attribute: logical_name.to_string(),
            })
    }
}
