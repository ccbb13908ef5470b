//! The already-parsed web-query expression tree consumed by the reverse
//! compiler.
//!
//! Producing this tree from a URL string is the job of an external
//! OData-grammar parser backed by the platform's data model; the reverse
//! compiler only walks it. The shapes here are the subset of parser output
//! the reverse grammar can handle, as closed variant sets, so unsupported
//! shapes surface as explicit match arms rather than downcasts.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A parsed web query: path plus query options.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct QueryExpression {
    #[serde(default)]
    pub path: Vec<PathSegment>,
    #[serde(default)]
    pub selection: Option<SelectExpand>,
    #[serde(default)]
    pub filter: Option<Expression>,
    #[serde(default)]
    pub order_by: Vec<OrderByExpression>,
    #[serde(default)]
    pub transformations: Vec<Transformation>,
    #[serde(default)]
    pub top: Option<u32>,
}

/// One segment of the resource path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PathSegment {
    /// A collection (entity set) segment; `entity` is the logical name of the
    /// set's element type as resolved by the parser's data model.
    EntitySet { name: String, entity: String },
    /// Any other segment kind (keyed record, function, `$count`, …).
    Other(String),
}

/// A `$select`/`$expand` clause.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct SelectExpand {
    /// True when the selection is unrestricted (no `$select` list).
    #[serde(default)]
    pub all_selected: bool,
    #[serde(default)]
    pub items: Vec<SelectItem>,
}

/// One selected item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SelectItem {
    /// A plain property path.
    Property { path: Vec<String> },
    /// An expanded navigation property with its nested selection.
    Expand {
        path: Vec<String>,
        selection: SelectExpand,
    },
}

/// A filter (or order-by target) expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    Binary {
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// Access to a property of the current range.
    Property(String),
    Literal(Literal),
    /// An implicit type-conversion node wrapping its source expression.
    Convert(Box<Expression>),
}

/// Binary operator kinds the parser can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOperator {
    And,
    Or,
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

/// A constant value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    String(String),
    Integer(i64),
    Decimal(f64),
    Boolean(bool),
    Null,
}

impl Literal {
    /// The literal as a Fetch condition value string, `None` for null.
    pub fn value_string(&self) -> Option<String> {
        match self {
            Literal::String(value) => Some(value.clone()),
            Literal::Integer(value) => Some(value.to_string()),
            Literal::Decimal(value) => Some(value.to_string()),
            Literal::Boolean(value) => Some(value.to_string()),
            Literal::Null => None,
        }
    }
}

/// One `$orderby` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OrderByExpression {
    pub expression: Expression,
    #[serde(default)]
    pub descending: bool,
}

/// One `$apply` transformation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Transformation {
    GroupBy {
        #[serde(default)]
        properties: Vec<String>,
        #[serde(default)]
        aggregate: Vec<AggregateExpression>,
    },
    /// Any other transformation kind (standalone aggregate, filter, …).
    Other(String),
}

/// One aggregate expression inside a transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AggregateExpression {
    /// The virtual row-count expression (`$count as alias`).
    CountVirtual { alias: String },
    /// An aggregation of a named property.
    Function {
        property: String,
        function: String,
        alias: String,
    },
}
