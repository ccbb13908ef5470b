//! The Fetch query tree: the structured form of a FetchXML query as consumed
//! and produced by the translation engine. XML text (de)serialization is an
//! external concern; these types (de)serialize through serde using the
//! FetchXML wire names.

mod operator;

pub use operator::ConditionOperator;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A complete Fetch query, rooted at one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Fetch {
    /// Row limit for the whole query.
    #[serde(default)]
    pub top: Option<u32>,
    /// Page number. Carried so that the engine can reject it explicitly.
    #[serde(default)]
    pub page: Option<u32>,
    /// Page size, only meaningful together with `page`.
    #[serde(default)]
    pub count: Option<u32>,
    /// When set, grouping/aggregate attributes drive the output.
    #[serde(default)]
    pub aggregate: bool,
    /// Alternate data source (e.g. the archive store).
    #[serde(default)]
    pub datasource: Option<String>,
    pub entity: Entity,
}

/// The root entity of a Fetch query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Entity {
    pub name: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

/// A child node of an entity or link-entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Item {
    AllAttributes,
    Attribute(Attribute),
    #[serde(rename = "link-entity")]
    Link(LinkEntity),
    Filter(Filter),
    Order(Order),
}

/// A join node: an entity plus the key pair connecting it to its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LinkEntity {
    pub name: String,
    /// Join attribute on this (the child) entity. Optional in the data model
    /// so that its absence surfaces as a malformed-input error.
    #[serde(default)]
    pub from: Option<String>,
    /// Join attribute on the parent entity.
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default, rename = "link-type")]
    pub link_type: JoinKind,
    /// Marks the intersect entity of a many-to-many join.
    #[serde(default)]
    pub intersect: bool,
    #[serde(default)]
    pub items: Vec<Item>,
}

/// How a link-entity joins to its parent. An unspecified kind means inner.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema,
)]
pub enum JoinKind {
    #[default]
    #[serde(rename = "inner")]
    Inner,
    #[serde(rename = "outer")]
    Outer,
    #[serde(rename = "any")]
    Any,
    #[serde(rename = "all")]
    All,
    #[serde(rename = "not any")]
    NotAny,
    #[serde(rename = "not all")]
    NotAll,
}

impl JoinKind {
    /// The FetchXML wire name, for error messages.
    pub fn name(self) -> &'static str {
        match self {
            JoinKind::Inner => "inner",
            JoinKind::Outer => "outer",
            JoinKind::Any => "any",
            JoinKind::All => "all",
            JoinKind::NotAny => "not any",
            JoinKind::NotAll => "not all",
        }
    }
}

impl std::fmt::Display for JoinKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A requested attribute, optionally grouped or aggregated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Attribute {
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub groupby: bool,
    #[serde(default)]
    pub aggregate: Option<AggregateFunction>,
}

/// Aggregate functions applicable to an attribute.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
    enum_iterator::Sequence,
)]
#[serde(rename_all = "lowercase")]
pub enum AggregateFunction {
    Count,
    /// Distinct count of a column's values.
    Countcolumn,
    Sum,
    Avg,
    Min,
    Max,
}

/// A boolean group of conditions, nested groups and any/all link filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Filter {
    #[serde(default, rename = "type")]
    pub filter_type: FilterType,
    #[serde(default)]
    pub items: Vec<FilterItem>,
}

/// The combinator joining the members of a filter group.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    #[default]
    And,
    Or,
}

/// A child node of a filter group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum FilterItem {
    Condition(Condition),
    Filter(Filter),
    #[serde(rename = "link-entity")]
    Link(LinkEntity),
}

/// A single comparison against an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Condition {
    pub attribute: String,
    /// Alias of another link-entity in the tree when the condition targets a
    /// different entity than the one its filter belongs to.
    #[serde(default)]
    pub entityname: Option<String>,
    pub operator: ConditionOperator,
    #[serde(default)]
    pub value: Option<String>,
    /// Values for multi-valued operators such as `in` or `between`.
    #[serde(default)]
    pub values: Vec<String>,
    /// Name of another column to compare against instead of a literal.
    #[serde(default, rename = "valueof")]
    pub value_of: Option<String>,
}

/// A sort entry. Sorting is only supported on the root entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Order {
    pub attribute: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub descending: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_fetchxml_wire_names() {
        let fetch: Fetch = serde_json::from_value(serde_json::json!({
            "top": 10,
            "entity": {
                "name": "account",
                "items": [
                    "all-attributes",
                    { "attribute": { "name": "name" } },
                    { "link-entity": {
                        "name": "contact",
                        "from": "parentcustomerid",
                        "to": "accountid",
                        "link-type": "not any",
                        "items": [
                            { "filter": { "type": "or", "items": [
                                { "condition": {
                                    "attribute": "firstname",
                                    "operator": "begins-with",
                                    "value": "Mar"
                                } }
                            ] } }
                        ]
                    } },
                    { "order": { "attribute": "name", "descending": true } }
                ]
            }
        }))
        .unwrap();

        assert_eq!(fetch.top, Some(10));
        assert_eq!(fetch.entity.name, "account");
        assert_eq!(fetch.entity.items.len(), 4);
        match &fetch.entity.items[2] {
            Item::Link(link) => {
                assert_eq!(link.link_type, JoinKind::NotAny);
                match &link.items[0] {
                    Item::Filter(filter) => {
                        assert_eq!(filter.filter_type, FilterType::Or);
                        match &filter.items[0] {
                            FilterItem::Condition(condition) => {
                                assert_eq!(
                                    condition.operator,
                                    ConditionOperator::BeginsWith
                                );
                            }
                            other => panic!("expected condition, got {other:?}"),
                        }
                    }
                    other => panic!("expected filter, got {other:?}"),
                }
            }
            other => panic!("expected link-entity, got {other:?}"),
        }
    }

    #[test]
    fn join_kind_defaults_to_inner() {
        let link: LinkEntity = serde_json::from_value(serde_json::json!({
            "name": "contact",
            "from": "parentcustomerid",
            "to": "accountid"
        }))
        .unwrap();
        assert_eq!(link.link_type, JoinKind::Inner);
    }
}
