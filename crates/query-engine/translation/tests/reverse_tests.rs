//! Reverse compilation: parsed web queries back to Fetch trees.

mod common;

use common::{convert_fetch, convert_web_query};
use fetch_model::Fetch;
use query_engine_odata::odata::parsed::{
    AggregateExpression, BinaryOperator, Expression, Literal, OrderByExpression, PathSegment,
    QueryExpression, SelectExpand, SelectItem, Transformation,
};
use query_engine_translation::translation::error::{Error, ErrorKind};
use serde_json::json;
use similar_asserts::assert_eq;

fn accounts() -> Vec<PathSegment> {
    vec![PathSegment::EntitySet {
        name: "accounts".to_string(),
        entity: "account".to_string(),
    }]
}

fn property(name: &str) -> SelectItem {
    SelectItem::Property {
        path: vec![name.to_string()],
    }
}

fn expand(navigation: &str, selection: SelectExpand) -> SelectItem {
    SelectItem::Expand {
        path: vec![navigation.to_string()],
        selection,
    }
}

fn selection(items: Vec<SelectItem>) -> Option<SelectExpand> {
    Some(SelectExpand {
        all_selected: false,
        items,
    })
}

fn equals(attribute: &str, value: &str) -> Expression {
    Expression::Binary {
        operator: BinaryOperator::Equal,
        left: Box::new(Expression::Property(attribute.to_string())),
        right: Box::new(Expression::Literal(Literal::String(value.to_string()))),
    }
}

fn expected_fetch(fetch: serde_json::Value) -> Fetch {
    serde_json::from_value(fetch).expect("expected fetch fixture")
}

#[test]
fn simple_query() {
    let query = QueryExpression {
        path: accounts(),
        selection: selection(vec![property("name")]),
        ..QueryExpression::default()
    };

    assert_eq!(
        convert_web_query(&query).unwrap(),
        expected_fetch(json!({
            "entity": { "name": "account", "items": [
                { "attribute": { "name": "name" } }
            ] }
        }))
    );
}

#[test]
fn left_outer_join_parent_link() {
    let query = QueryExpression {
        path: accounts(),
        selection: selection(vec![
            property("name"),
            expand(
                "primarycontactid",
                SelectExpand {
                    all_selected: false,
                    items: vec![property("firstname")],
                },
            ),
        ]),
        ..QueryExpression::default()
    };

    assert_eq!(
        convert_web_query(&query).unwrap(),
        expected_fetch(json!({
            "entity": { "name": "account", "items": [
                { "attribute": { "name": "name" } },
                { "link-entity": {
                    "name": "contact", "from": "contactid", "to": "primarycontactid",
                    "link-type": "outer",
                    "items": [ { "attribute": { "name": "firstname" } } ]
                } }
            ] }
        }))
    );
}

#[test]
fn left_outer_join_child_link() {
    let query = QueryExpression {
        path: accounts(),
        selection: selection(vec![
            property("name"),
            expand(
                "contact_customer_accounts",
                SelectExpand {
                    all_selected: false,
                    items: vec![property("firstname")],
                },
            ),
        ]),
        ..QueryExpression::default()
    };

    assert_eq!(
        convert_web_query(&query).unwrap(),
        expected_fetch(json!({
            "entity": { "name": "account", "items": [
                { "attribute": { "name": "name" } },
                { "link-entity": {
                    "name": "contact", "from": "parentcustomerid", "to": "accountid",
                    "link-type": "outer",
                    "items": [ { "attribute": { "name": "firstname" } } ]
                } }
            ] }
        }))
    );
}

#[test]
fn simple_filter() {
    let query = QueryExpression {
        path: accounts(),
        selection: selection(vec![property("name")]),
        filter: Some(equals("name", "FXB")),
        ..QueryExpression::default()
    };

    assert_eq!(
        convert_web_query(&query).unwrap(),
        expected_fetch(json!({
            "entity": { "name": "account", "items": [
                { "attribute": { "name": "name" } },
                { "filter": { "items": [
                    { "condition": { "attribute": "name", "operator": "eq", "value": "FXB" } }
                ] } }
            ] }
        }))
    );
}

#[test]
fn nested_filter() {
    let query = QueryExpression {
        path: accounts(),
        selection: selection(vec![property("name")]),
        filter: Some(Expression::Binary {
            operator: BinaryOperator::And,
            left: Box::new(equals("name", "FXB")),
            right: Box::new(Expression::Binary {
                operator: BinaryOperator::Or,
                left: Box::new(equals("websiteurl", "xrmtoolbox.com")),
                right: Box::new(equals("websiteurl", "fetchxmlbuilder.com")),
            }),
        }),
        ..QueryExpression::default()
    };

    assert_eq!(
        convert_web_query(&query).unwrap(),
        expected_fetch(json!({
            "entity": { "name": "account", "items": [
                { "attribute": { "name": "name" } },
                { "filter": { "items": [
                    { "condition": { "attribute": "name", "operator": "eq", "value": "FXB" } },
                    { "filter": { "type": "or", "items": [
                        { "condition": { "attribute": "websiteurl", "operator": "eq", "value": "xrmtoolbox.com" } },
                        { "condition": { "attribute": "websiteurl", "operator": "eq", "value": "fetchxmlbuilder.com" } }
                    ] } }
                ] } }
            ] }
        }))
    );
}

#[test]
fn filter_unwraps_conversion_nodes() {
    let query = QueryExpression {
        path: accounts(),
        selection: selection(vec![property("name")]),
        filter: Some(Expression::Binary {
            operator: BinaryOperator::Equal,
            left: Box::new(Expression::Convert(Box::new(Expression::Property(
                "name".to_string(),
            )))),
            right: Box::new(Expression::Literal(Literal::String("FXB".to_string()))),
        }),
        ..QueryExpression::default()
    };

    assert_eq!(
        convert_web_query(&query).unwrap(),
        expected_fetch(json!({
            "entity": { "name": "account", "items": [
                { "attribute": { "name": "name" } },
                { "filter": { "items": [
                    { "condition": { "attribute": "name", "operator": "eq", "value": "FXB" } }
                ] } }
            ] }
        }))
    );
}

#[test]
fn sort() {
    let query = QueryExpression {
        path: accounts(),
        selection: selection(vec![property("name")]),
        order_by: vec![
            OrderByExpression {
                expression: Expression::Property("name".to_string()),
                descending: false,
            },
            OrderByExpression {
                expression: Expression::Property("websiteurl".to_string()),
                descending: true,
            },
        ],
        ..QueryExpression::default()
    };

    assert_eq!(
        convert_web_query(&query).unwrap(),
        expected_fetch(json!({
            "entity": { "name": "account", "items": [
                { "attribute": { "name": "name" } },
                { "order": { "attribute": "name" } },
                { "order": { "attribute": "websiteurl", "descending": true } }
            ] }
        }))
    );
}

#[test]
fn top() {
    let query = QueryExpression {
        path: accounts(),
        selection: selection(vec![property("name")]),
        top: Some(10),
        ..QueryExpression::default()
    };

    assert_eq!(
        convert_web_query(&query).unwrap(),
        expected_fetch(json!({
            "top": 10,
            "entity": { "name": "account", "items": [
                { "attribute": { "name": "name" } }
            ] }
        }))
    );
}

#[test]
fn aggregate_count() {
    let query = QueryExpression {
        path: accounts(),
        transformations: vec![Transformation::GroupBy {
            properties: vec!["name".to_string()],
            aggregate: vec![AggregateExpression::CountVirtual {
                alias: "count".to_string(),
            }],
        }],
        ..QueryExpression::default()
    };

    assert_eq!(
        convert_web_query(&query).unwrap(),
        expected_fetch(json!({
            "aggregate": true,
            "entity": { "name": "account", "items": [
                { "attribute": { "name": "name", "alias": "name", "groupby": true } },
                { "attribute": { "name": "accountid", "alias": "count", "aggregate": "count" } }
            ] }
        }))
    );
}

#[test]
fn unrestricted_selection_becomes_select_all() {
    let query = QueryExpression {
        path: accounts(),
        selection: Some(SelectExpand {
            all_selected: true,
            items: vec![],
        }),
        ..QueryExpression::default()
    };

    assert_eq!(
        convert_web_query(&query).unwrap(),
        expected_fetch(json!({
            "entity": { "name": "account", "items": [ "all-attributes" ] }
        }))
    );
}

#[test]
fn reconstructed_items_are_normalized_by_category() {
    // Expand listed ahead of the plain property; the output still puts
    // attributes before links before the filter before the sorts.
    let query = QueryExpression {
        path: accounts(),
        selection: selection(vec![
            expand(
                "primarycontactid",
                SelectExpand {
                    all_selected: false,
                    items: vec![property("firstname")],
                },
            ),
            property("name"),
        ]),
        filter: Some(equals("name", "FXB")),
        order_by: vec![OrderByExpression {
            expression: Expression::Property("name".to_string()),
            descending: false,
        }],
        ..QueryExpression::default()
    };

    let fetch = convert_web_query(&query).unwrap();

    let categories = fetch
        .entity
        .items
        .iter()
        .map(|item| match item {
            fetch_model::Item::AllAttributes => "all",
            fetch_model::Item::Attribute(_) => "attribute",
            fetch_model::Item::Link(_) => "link",
            fetch_model::Item::Filter(_) => "filter",
            fetch_model::Item::Order(_) => "order",
        })
        .collect::<Vec<&str>>();

    assert_eq!(categories, vec!["attribute", "link", "filter", "order"]);
}

#[test]
fn round_trips_an_outer_join_query_with_equality_filter() {
    let fetch_fixture = json!({
        "top": 10,
        "entity": { "name": "account", "items": [
            { "attribute": { "name": "name" } },
            { "link-entity": {
                "name": "contact", "from": "contactid", "to": "primarycontactid",
                "link-type": "outer",
                "items": [ { "attribute": { "name": "firstname" } } ]
            } },
            { "filter": { "items": [
                { "condition": { "attribute": "name", "operator": "eq", "value": "FXB" } }
            ] } },
            { "order": { "attribute": "name" } }
        ] }
    });

    // Forward: the tree compiles to the URL this parsed query represents.
    assert_eq!(
        convert_fetch(fetch_fixture.clone()).unwrap(),
        "https://example.crm.dynamics.com/api/data/v9.0/accounts?$select=name\
         &$expand=primarycontactid($select=firstname)\
         &$filter=(name eq 'FXB')&$orderby=name asc&$top=10"
    );

    // Reverse: the parsed form of that URL reconstructs the same tree.
    let query = QueryExpression {
        path: accounts(),
        selection: selection(vec![
            property("name"),
            expand(
                "primarycontactid",
                SelectExpand {
                    all_selected: false,
                    items: vec![property("firstname")],
                },
            ),
        ]),
        filter: Some(equals("name", "FXB")),
        order_by: vec![OrderByExpression {
            expression: Expression::Property("name".to_string()),
            descending: false,
        }],
        top: Some(10),
        ..QueryExpression::default()
    };

    assert_eq!(
        convert_web_query(&query).unwrap(),
        expected_fetch(fetch_fixture)
    );
}

#[test]
fn multiple_path_segments_are_unsupported() {
    let query = QueryExpression {
        path: vec![
            PathSegment::EntitySet {
                name: "accounts".to_string(),
                entity: "account".to_string(),
            },
            PathSegment::Other("count".to_string()),
        ],
        ..QueryExpression::default()
    };

    let error = convert_web_query(&query).unwrap_err();
    assert_eq!(error, Error::MultiplePathSegments);
    assert_eq!(error.kind(), ErrorKind::Unsupported);
}

#[test]
fn non_collection_path_segments_are_unsupported() {
    let query = QueryExpression {
        path: vec![PathSegment::Other("WhoAmI".to_string())],
        ..QueryExpression::default()
    };

    assert_eq!(
        convert_web_query(&query).unwrap_err(),
        Error::UnhandledPathSegment("WhoAmI".to_string())
    );
}

#[test]
fn non_equality_comparisons_are_unsupported() {
    let query = QueryExpression {
        path: accounts(),
        filter: Some(Expression::Binary {
            operator: BinaryOperator::GreaterThan,
            left: Box::new(Expression::Property("name".to_string())),
            right: Box::new(Expression::Literal(Literal::String("FXB".to_string()))),
        }),
        ..QueryExpression::default()
    };

    let error = convert_web_query(&query).unwrap_err();
    assert_eq!(
        error,
        Error::UnhandledFilterOperator("GreaterThan".to_string())
    );
    assert_eq!(error.kind(), ErrorKind::Unsupported);
}

#[test]
fn property_to_property_comparisons_are_unsupported() {
    let query = QueryExpression {
        path: accounts(),
        filter: Some(Expression::Binary {
            operator: BinaryOperator::Equal,
            left: Box::new(Expression::Property("name".to_string())),
            right: Box::new(Expression::Property("websiteurl".to_string())),
        }),
        ..QueryExpression::default()
    };

    assert_eq!(
        convert_web_query(&query).unwrap_err(),
        Error::UnhandledFilterTarget
    );
}

#[test]
fn literal_comparison_sources_are_unsupported() {
    let query = QueryExpression {
        path: accounts(),
        filter: Some(Expression::Binary {
            operator: BinaryOperator::Equal,
            left: Box::new(Expression::Literal(Literal::Integer(1))),
            right: Box::new(Expression::Literal(Literal::Integer(1))),
        }),
        ..QueryExpression::default()
    };

    assert_eq!(
        convert_web_query(&query).unwrap_err(),
        Error::UnhandledFilterSource
    );
}

#[test]
fn null_comparison_values_are_unsupported() {
    let query = QueryExpression {
        path: accounts(),
        filter: Some(Expression::Binary {
            operator: BinaryOperator::Equal,
            left: Box::new(Expression::Property("name".to_string())),
            right: Box::new(Expression::Literal(Literal::Null)),
        }),
        ..QueryExpression::default()
    };

    assert_eq!(
        convert_web_query(&query).unwrap_err(),
        Error::UnhandledFilterTarget
    );
}

#[test]
fn sorting_by_anything_but_a_property_is_unsupported() {
    let query = QueryExpression {
        path: accounts(),
        order_by: vec![OrderByExpression {
            expression: Expression::Literal(Literal::Integer(1)),
            descending: false,
        }],
        ..QueryExpression::default()
    };

    assert_eq!(
        convert_web_query(&query).unwrap_err(),
        Error::UnhandledSortExpression
    );
}

#[test]
fn unknown_transformations_are_unsupported() {
    let query = QueryExpression {
        path: accounts(),
        transformations: vec![Transformation::Other("filter".to_string())],
        ..QueryExpression::default()
    };

    assert_eq!(
        convert_web_query(&query).unwrap_err(),
        Error::UnhandledTransformation("filter".to_string())
    );
}

#[test]
fn named_aggregate_functions_are_unsupported() {
    let query = QueryExpression {
        path: accounts(),
        transformations: vec![Transformation::GroupBy {
            properties: vec!["name".to_string()],
            aggregate: vec![AggregateExpression::Function {
                property: "revenue".to_string(),
                function: "sum".to_string(),
                alias: "total".to_string(),
            }],
        }],
        ..QueryExpression::default()
    };

    assert_eq!(
        convert_web_query(&query).unwrap_err(),
        Error::UnhandledAggregateExpression("sum".to_string())
    );
}

#[test]
fn unknown_navigation_properties_are_metadata_errors() {
    let query = QueryExpression {
        path: accounts(),
        selection: selection(vec![expand(
            "sidekicks",
            SelectExpand {
                all_selected: false,
                items: vec![],
            },
        )]),
        ..QueryExpression::default()
    };

    let error = convert_web_query(&query).unwrap_err();
    assert_eq!(
        error,
        Error::NavigationPropertyNotFound {
            entity: "account".to_string(),
            navigation: "sidekicks".to_string(),
        }
    );
    assert_eq!(error.kind(), ErrorKind::Metadata);
}

#[test]
fn many_to_many_expands_are_unsupported() {
    let query = QueryExpression {
        path: vec![PathSegment::EntitySet {
            name: "contacts".to_string(),
            entity: "contact".to_string(),
        }],
        selection: selection(vec![expand(
            "lists",
            SelectExpand {
                all_selected: false,
                items: vec![],
            },
        )]),
        ..QueryExpression::default()
    };

    let error = convert_web_query(&query).unwrap_err();
    assert_eq!(error, Error::ManyToManyExpand("lists".to_string()));
    assert_eq!(error.kind(), ErrorKind::Unsupported);
}
