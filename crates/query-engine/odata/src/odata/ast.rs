//! Type definitions of the web-query AST.

/// A query against one collection: the structured form of
/// `/collection?$select=…&$expand=…&$filter=…&$orderby=…&$top=…` or
/// `/collection?$apply=…`.
///
/// Filter fragments are carried pre-rendered; grouping and AND/OR joining
/// happen at render time. When `aggregates` is non-empty only `$apply` is
/// rendered and the plain query options are suppressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionQuery {
    /// The collection (entity set) name.
    pub collection: String,
    pub select: Vec<String>,
    pub expand: Vec<ExpandItem>,
    /// Root filter groups, AND-joined.
    pub filter: Vec<FilterGroup>,
    pub order_by: Vec<OrderByItem>,
    pub top: Option<u32>,
    /// Group-by keys of an `$apply` clause.
    pub groups: Vec<String>,
    /// Aggregate expressions of an `$apply` clause.
    pub aggregates: Vec<String>,
}

/// One expanded navigation property with its nested query options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandItem {
    pub navigation_property: String,
    pub select: Vec<String>,
    pub expand: Vec<ExpandItem>,
    pub filter: Vec<FilterGroup>,
}

/// The combinator joining the members of a filter group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    And,
    Or,
}

/// A parenthesized group of rendered condition fragments and nested groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterGroup {
    pub combine: Combinator,
    pub conditions: Vec<String>,
    pub groups: Vec<FilterGroup>,
}

/// One `$orderby` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderByItem {
    pub property: String,
    pub descending: bool,
}
