//! Helpers for building web-query AST values in common shapes.

use super::ast::*;

/// A query on a collection with every option empty.
pub fn empty_query(collection: String) -> CollectionQuery {
    CollectionQuery {
        collection,
        select: vec![],
        expand: vec![],
        filter: vec![],
        order_by: vec![],
        top: None,
        groups: vec![],
        aggregates: vec![],
    }
}

/// A filter group holding a single rendered condition.
pub fn condition_group(condition: String) -> FilterGroup {
    FilterGroup {
        combine: Combinator::And,
        conditions: vec![condition],
        groups: vec![],
    }
}
