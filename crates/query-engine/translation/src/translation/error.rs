//! Errors for query translation.

use fetch_model::{ConditionOperator, JoinKind};
use query_engine_metadata::metadata::MetadataError;

/// How an error should be phrased to the caller: a metadata lookup that came
/// up empty, a legal query the target representation cannot express, or an
/// input tree that was invalid to begin with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Metadata,
    Unsupported,
    Malformed,
}

/// A type for translation errors. Nothing here is recoverable inside the
/// engine; every variant aborts the whole compilation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    // metadata lookups that came up empty
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error("no metadata for attribute {entity}.{attribute}")]
    AttributeNotFound { entity: String, attribute: String },
    #[error("cannot find metadata for relation {parent}.{to} => {child}.{from}")]
    RelationshipNotFound {
        parent: String,
        to: String,
        child: String,
        from: String,
    },
    #[error("cannot find filter entity '{0}'")]
    FilterEntityNotFound(String),
    #[error("no navigation property '{navigation}' on entity '{entity}'")]
    NavigationPropertyNotFound { entity: String, navigation: String },
    #[error("no value type in metadata for managed property '{0}'")]
    ManagedPropertyValueType(String),

    // constructs the web query format cannot express
    #[error("page-based pagination is not supported")]
    PagingNotSupported,
    #[error("data source '{0}' is not supported")]
    DataSourceNotSupported(String),
    #[error(
        "ordering on link entity {alias}.{attribute} is not supported; \
         sort on the root entity instead"
    )]
    SortOnLinkEntity { alias: String, attribute: String },
    #[error("cannot apply filter to child collection {0}")]
    FilterOnChildCollection(String),
    #[error(
        "cannot filter on nested link-entity {0}; rearrange the query to \
         have filters on first-level link-entities only"
    )]
    NestedLinkFilter(String),
    #[error(
        "cannot include inner join on nested link-entity {0}; rearrange the \
         query to have inner joins on first-level link-entities only"
    )]
    NestedInnerJoin(String),
    #[error(
        "complex LIKE wildcards are not supported in '{0}'; only % at the \
         start or end of the value is expressible"
    )]
    ComplexWildcard(String),
    #[error("operator '{0}' cannot be negated under a 'not any'/'not all' filter")]
    NotNegatable(ConditionOperator),
    #[error("link type '{0}' is not supported inside a filter")]
    LinkKindInFilter(JoinKind),
    #[error("link type '{0}' is only supported inside a filter")]
    LinkKindOutsideFilter(JoinKind),
    #[error("link type '{0}' cannot be nested under a negated filter")]
    LambdaUnderNegation(JoinKind),
    #[error("cannot apply an any/all filter to single-valued navigation property '{0}'")]
    LambdaOnSingleValued(String),

    // reverse-direction shapes outside the supported sub-grammar
    #[error("unhandled multiple path segments")]
    MultiplePathSegments,
    #[error("unhandled path segment '{0}'")]
    UnhandledPathSegment(String),
    #[error("unhandled multiple select segments")]
    MultipleSelectSegments,
    #[error("unhandled multiple expand segments")]
    MultipleExpandSegments,
    #[error("many-to-many navigation property '{0}' cannot be reconstructed")]
    ManyToManyExpand(String),
    #[error("unhandled filter expression shape")]
    UnhandledFilterExpression,
    #[error("unhandled filter source expression")]
    UnhandledFilterSource,
    #[error("unhandled filter target expression")]
    UnhandledFilterTarget,
    #[error("unhandled filter operator '{0}'")]
    UnhandledFilterOperator(String),
    #[error("unhandled sort expression shape")]
    UnhandledSortExpression,
    #[error("unhandled transformation '{0}'")]
    UnhandledTransformation(String),
    #[error("unhandled aggregate expression '{0}'")]
    UnhandledAggregateExpression(String),

    // structurally invalid input trees
    #[error("link-entity '{link}' is missing its '{attribute}' join attribute")]
    MissingJoinAttribute {
        link: String,
        attribute: &'static str,
    },
    #[error("invalid many-to-many link definition under '{0}'")]
    InvalidManyToManyLink(String),
    #[error("condition is missing an attribute name")]
    MissingConditionAttribute,
    #[error("operator '{operator}' on attribute '{attribute}' requires a value")]
    MissingConditionValue {
        attribute: String,
        operator: ConditionOperator,
    },
    #[error("aggregate attribute '{0}' requires an alias")]
    MissingAggregateAlias(String),
    #[error("invalid {kind} literal '{value}'")]
    InvalidLiteral { kind: &'static str, value: String },
}

impl Error {
    /// Classify the error for user-facing phrasing.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Metadata(_)
            | Error::AttributeNotFound { .. }
            | Error::RelationshipNotFound { .. }
            | Error::FilterEntityNotFound(_)
            | Error::NavigationPropertyNotFound { .. }
            | Error::ManagedPropertyValueType(_) => ErrorKind::Metadata,

            Error::PagingNotSupported
            | Error::DataSourceNotSupported(_)
            | Error::SortOnLinkEntity { .. }
            | Error::FilterOnChildCollection(_)
            | Error::NestedLinkFilter(_)
            | Error::NestedInnerJoin(_)
            | Error::ComplexWildcard(_)
            | Error::NotNegatable(_)
            | Error::LinkKindInFilter(_)
            | Error::LinkKindOutsideFilter(_)
            | Error::LambdaUnderNegation(_)
            | Error::LambdaOnSingleValued(_)
            | Error::MultiplePathSegments
            | Error::UnhandledPathSegment(_)
            | Error::MultipleSelectSegments
            | Error::MultipleExpandSegments
            | Error::ManyToManyExpand(_)
            | Error::UnhandledFilterExpression
            | Error::UnhandledFilterSource
            | Error::UnhandledFilterTarget
            | Error::UnhandledFilterOperator(_)
            | Error::UnhandledSortExpression
            | Error::UnhandledTransformation(_)
            | Error::UnhandledAggregateExpression(_) => ErrorKind::Unsupported,

            Error::MissingJoinAttribute { .. }
            | Error::InvalidManyToManyLink(_)
            | Error::MissingConditionAttribute
            | Error::MissingConditionValue { .. }
            | Error::MissingAggregateAlias(_)
            | Error::InvalidLiteral { .. } => ErrorKind::Malformed,
        }
    }
}
