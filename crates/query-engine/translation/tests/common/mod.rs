//! Shared fixture metadata for the translation tests: a small slice of a
//! platform catalog with every relationship shape the engine handles.

use std::collections::BTreeMap;

use query_engine_metadata::metadata::{
    AttributeInfo, AttributeType, EntitiesInfo, EntityInfo, ManyToManyRelationship, Metadata,
    OneToManyRelationship,
};
use query_engine_odata::odata::parsed;
use query_engine_translation::translation::error::Error;
use query_engine_translation::translation::helpers::Env;
use query_engine_translation::translation::{forward, reverse};

pub const BASE_URL: &str = "https://example.crm.dynamics.com/api/data/v9.0";

/// Compile a Fetch tree given as JSON against the fixture metadata.
pub fn convert_fetch(fetch: serde_json::Value) -> Result<String, Error> {
    let fetch: fetch_model::Fetch = serde_json::from_value(fetch).expect("fetch fixture");
    let metadata = fixture_metadata();
    let env = Env::new(&metadata);
    forward::compile(&env, &fetch, BASE_URL)
}

/// Convert a parsed web query back to a Fetch tree against the fixture
/// metadata.
pub fn convert_web_query(query: &parsed::QueryExpression) -> Result<fetch_model::Fetch, Error> {
    let metadata = fixture_metadata();
    let env = Env::new(&metadata);
    reverse::convert(&env, query)
}

fn attribute(name: &str, attribute_type: AttributeType) -> AttributeInfo {
    AttributeInfo {
        logical_name: name.to_string(),
        attribute_type,
        targets: vec![],
        value_type: None,
    }
}

fn lookup(name: &str, targets: &[&str]) -> AttributeInfo {
    AttributeInfo {
        logical_name: name.to_string(),
        attribute_type: AttributeType::Lookup,
        targets: targets.iter().map(ToString::to_string).collect(),
        value_type: None,
    }
}

fn managed_property(name: &str, value_type: AttributeType) -> AttributeInfo {
    AttributeInfo {
        logical_name: name.to_string(),
        attribute_type: AttributeType::ManagedProperty,
        targets: vec![],
        value_type: Some(value_type),
    }
}

fn entity(
    logical_name: &str,
    entity_set_name: &str,
    primary_id_attribute: &str,
    object_type_code: Option<u32>,
    attributes: Vec<AttributeInfo>,
) -> EntityInfo {
    EntityInfo {
        logical_name: logical_name.to_string(),
        entity_set_name: entity_set_name.to_string(),
        primary_id_attribute: primary_id_attribute.to_string(),
        object_type_code,
        attributes: attributes
            .into_iter()
            .map(|attribute| (attribute.logical_name.clone(), attribute))
            .collect(),
        one_to_many: vec![],
        many_to_one: vec![],
        many_to_many: vec![],
    }
}

pub fn fixture_metadata() -> Metadata {
    // account 1:N contact through the customer lookup; navigation names
    // follow the platform convention: the collection side is named after the
    // relationship, the single-valued side after the lookup attribute.
    let contact_customer_accounts = OneToManyRelationship {
        schema_name: "contact_customer_accounts".to_string(),
        referenced_entity: "account".to_string(),
        referenced_attribute: "accountid".to_string(),
        referencing_entity: "contact".to_string(),
        referencing_attribute: "parentcustomerid".to_string(),
        referenced_navigation_property: "contact_customer_accounts".to_string(),
        referencing_navigation_property: "parentcustomerid".to_string(),
    };
    let account_primarycontact = OneToManyRelationship {
        schema_name: "account_primarycontact".to_string(),
        referenced_entity: "contact".to_string(),
        referenced_attribute: "contactid".to_string(),
        referencing_entity: "account".to_string(),
        referencing_attribute: "primarycontactid".to_string(),
        referenced_navigation_property: "account_primarycontact".to_string(),
        referencing_navigation_property: "primarycontactid".to_string(),
    };
    let contact_list = ManyToManyRelationship {
        schema_name: "contact_list".to_string(),
        intersect_entity: "listmember".to_string(),
        entity1: "contact".to_string(),
        entity1_intersect_attribute: "entityid".to_string(),
        entity1_navigation_property: "lists".to_string(),
        entity2: "list".to_string(),
        entity2_intersect_attribute: "listid".to_string(),
        entity2_navigation_property: "contacts".to_string(),
    };

    let mut account = entity(
        "account",
        "accounts",
        "accountid",
        None,
        vec![
            attribute("accountid", AttributeType::UniqueIdentifier),
            attribute("name", AttributeType::String),
            attribute("websiteurl", AttributeType::String),
            attribute("createdon", AttributeType::DateTime),
            lookup("primarycontactid", &["contact"]),
        ],
    );
    account.one_to_many = vec![contact_customer_accounts.clone()];
    account.many_to_one = vec![account_primarycontact.clone()];

    let mut contact = entity(
        "contact",
        "contacts",
        "contactid",
        None,
        vec![
            attribute("contactid", AttributeType::UniqueIdentifier),
            attribute("firstname", AttributeType::String),
            attribute("createdon", AttributeType::DateTime),
            lookup("parentcustomerid", &["account", "contact"]),
        ],
    );
    contact.one_to_many = vec![account_primarycontact];
    contact.many_to_one = vec![contact_customer_accounts];
    contact.many_to_many = vec![contact_list.clone()];

    let connection = entity(
        "connection",
        "connections",
        "connectionid",
        None,
        vec![
            attribute("connectionid", AttributeType::UniqueIdentifier),
            attribute("record1objecttypecode", AttributeType::Picklist),
        ],
    );

    let incident = entity(
        "incident",
        "incidents",
        "incidentid",
        Some(112),
        vec![attribute("incidentid", AttributeType::UniqueIdentifier)],
    );

    let stringmap = entity(
        "stringmap",
        "stringmaps",
        "stringmapid",
        None,
        vec![
            attribute("stringmapid", AttributeType::UniqueIdentifier),
            attribute("objecttypecode", AttributeType::EntityName),
            attribute("attributename", AttributeType::String),
            attribute("attributevalue", AttributeType::Integer),
            attribute("value", AttributeType::String),
        ],
    );

    let webresource = entity(
        "webresource",
        "webresourceset",
        "webresourceid",
        None,
        vec![
            attribute("webresourceid", AttributeType::UniqueIdentifier),
            attribute("name", AttributeType::String),
            managed_property("iscustomizable", AttributeType::Boolean),
        ],
    );

    let mut listmember = entity(
        "listmember",
        "listmembers",
        "listmemberid",
        None,
        vec![
            attribute("listmemberid", AttributeType::UniqueIdentifier),
            lookup("entityid", &["contact"]),
            lookup("listid", &["list"]),
        ],
    );
    listmember.many_to_many = vec![contact_list.clone()];

    let mut list = entity(
        "list",
        "lists",
        "listid",
        None,
        vec![
            attribute("listid", AttributeType::UniqueIdentifier),
            attribute("name", AttributeType::String),
        ],
    );
    list.many_to_many = vec![contact_list];

    let entities = [
        account, contact, connection, incident, stringmap, webresource, listmember, list,
    ]
    .into_iter()
    .map(|entity| (entity.logical_name.clone(), entity))
    .collect::<BTreeMap<String, EntityInfo>>();

    Metadata {
        entities: EntitiesInfo(entities),
    }
}
