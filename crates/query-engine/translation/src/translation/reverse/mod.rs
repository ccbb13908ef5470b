//! Translate a parsed web-query expression tree back into a Fetch tree.
//!
//! The reverse grammar is narrower than the forward one: equality-only
//! filters, root-entity sorts, and a single group-by transformation with a
//! virtual row count. The inner/outer distinction of forward compilation is
//! not recoverable once inner-join hoisting has happened, so every expand
//! comes back as an outer join.

use fetch_model::{
    AggregateFunction, Attribute, Condition, ConditionOperator, Entity, Fetch, Filter, FilterItem,
    FilterType, Item, JoinKind, LinkEntity, Order,
};
use query_engine_odata::odata::parsed;

use super::error::Error;
use super::helpers::Env;

/// Translate a parsed web query into a Fetch tree ready for external XML
/// serialization. Fails with a descriptive error on any shape outside the
/// reverse sub-grammar.
pub fn convert(env: &Env, query: &parsed::QueryExpression) -> Result<Fetch, Error> {
    let entity_name = parse_entity(query)?;

    let mut items: Vec<Item> = Vec::new();

    if let Some(selection) = &query.selection {
        items.extend(parse_selection(env, &entity_name, selection)?);
    }

    if let Some(filter) = &query.filter {
        items.push(Item::Filter(parse_filter(filter)?));
    }

    items.extend(parse_order_by(&query.order_by)?);

    let grouped = parse_transformations(env, &entity_name, &query.transformations)?;
    let aggregate = !grouped.is_empty();
    items.extend(grouped);

    normalize(&mut items);

    let fetch = Fetch {
        top: query.top,
        page: None,
        count: None,
        aggregate,
        datasource: None,
        entity: Entity {
            name: entity_name,
            items,
        },
    };

    tracing::info!("fetch AST: {:?}", fetch);

    Ok(fetch)
}

/// The path must resolve to exactly one collection segment.
fn parse_entity(query: &parsed::QueryExpression) -> Result<String, Error> {
    match query.path.as_slice() {
        [parsed::PathSegment::EntitySet { entity, .. }] => Ok(entity.clone()),
        [parsed::PathSegment::Other(kind)] => Err(Error::UnhandledPathSegment(kind.clone())),
        _ => Err(Error::MultiplePathSegments),
    }
}

/// Plain property references become attributes, an unrestricted selection
/// becomes select-all, and expands become link-entities.
fn parse_selection(
    env: &Env,
    entity_name: &str,
    selection: &parsed::SelectExpand,
) -> Result<Vec<Item>, Error> {
    let mut items = Vec::new();

    if selection.all_selected {
        items.push(Item::AllAttributes);
    }

    for selected in &selection.items {
        match selected {
            parsed::SelectItem::Property { path } => {
                let [name] = path.as_slice() else {
                    return Err(Error::MultipleSelectSegments);
                };
                items.push(Item::Attribute(Attribute {
                    name: name.clone(),
                    alias: None,
                    groupby: false,
                    aggregate: None,
                }));
            }
            parsed::SelectItem::Expand { path, selection } => {
                let [navigation] = path.as_slice() else {
                    return Err(Error::MultipleExpandSegments);
                };
                items.push(Item::Link(parse_expand(env, entity_name, navigation, selection)?));
            }
        }
    }

    Ok(items)
}

/// Reconstruct a link-entity from an expanded navigation property, deriving
/// the join key pair from the relationship metadata: collection-valued
/// navigations first, then single-valued ones.
fn parse_expand(
    env: &Env,
    entity_name: &str,
    navigation: &str,
    selection: &parsed::SelectExpand,
) -> Result<LinkEntity, Error> {
    let entity = env.entity(entity_name)?;

    let (child_entity, from, to) = if let Some(relation) = entity
        .one_to_many
        .iter()
        .find(|relation| relation.referenced_navigation_property == navigation)
    {
        (
            relation.referencing_entity.clone(),
            sanitize_lookup_property(&relation.referencing_attribute),
            relation.referenced_attribute.clone(),
        )
    } else if let Some(relation) = entity
        .many_to_one
        .iter()
        .find(|relation| relation.referencing_navigation_property == navigation)
    {
        (
            relation.referenced_entity.clone(),
            relation.referenced_attribute.clone(),
            relation.referencing_attribute.clone(),
        )
    } else if entity.many_to_many.iter().any(|relation| {
        relation.entity1_navigation_property == navigation
            || relation.entity2_navigation_property == navigation
    }) {
        // The two-hop intersect form cannot be rebuilt from one navigation.
        return Err(Error::ManyToManyExpand(navigation.to_string()));
    } else {
        return Err(Error::NavigationPropertyNotFound {
            entity: entity_name.to_string(),
            navigation: navigation.to_string(),
        });
    };

    let mut items = parse_selection(env, &child_entity, selection)?;
    normalize(&mut items);

    Ok(LinkEntity {
        name: child_entity,
        from: Some(from),
        to: Some(to),
        alias: None,
        link_type: JoinKind::Outer,
        intersect: false,
        items,
    })
}

/// Strip the synthetic `_name_value` wrapper off a lookup property name.
fn sanitize_lookup_property(name: &str) -> String {
    let name = name.strip_prefix('_').unwrap_or(name);
    let name = name.strip_suffix("_value").unwrap_or(name);
    name.to_string()
}

/// An AND/OR tree of equality comparisons becomes nested filter groups; a
/// single comparison is wrapped in an AND group.
fn parse_filter(expression: &parsed::Expression) -> Result<Filter, Error> {
    match parse_condition_tree(expression)? {
        FilterItem::Filter(filter) => Ok(filter),
        item => Ok(Filter {
            filter_type: FilterType::And,
            items: vec![item],
        }),
    }
}

fn parse_condition_tree(expression: &parsed::Expression) -> Result<FilterItem, Error> {
    let parsed::Expression::Binary {
        operator,
        left,
        right,
    } = expression
    else {
        return Err(Error::UnhandledFilterExpression);
    };

    // An and/or of two nested comparisons becomes a nested group.
    if matches!(
        operator,
        parsed::BinaryOperator::And | parsed::BinaryOperator::Or
    ) && matches!(**left, parsed::Expression::Binary { .. })
        && matches!(**right, parsed::Expression::Binary { .. })
    {
        let filter_type = match operator {
            parsed::BinaryOperator::And => FilterType::And,
            _ => FilterType::Or,
        };
        return Ok(FilterItem::Filter(Filter {
            filter_type,
            items: vec![parse_condition_tree(left)?, parse_condition_tree(right)?],
        }));
    }

    // Otherwise this must be a property-vs-literal comparison.
    let mut lhs: &parsed::Expression = left;
    if let parsed::Expression::Convert(source) = lhs {
        lhs = source.as_ref();
    }
    let parsed::Expression::Property(attribute) = lhs else {
        return Err(Error::UnhandledFilterSource);
    };

    let parsed::Expression::Literal(literal) = right.as_ref() else {
        return Err(Error::UnhandledFilterTarget);
    };
    let value = literal
        .value_string()
        .ok_or(Error::UnhandledFilterTarget)?;

    let operator = match operator {
        parsed::BinaryOperator::Equal => ConditionOperator::Eq,
        other => return Err(Error::UnhandledFilterOperator(format!("{other:?}"))),
    };

    Ok(FilterItem::Condition(Condition {
        attribute: attribute.clone(),
        entityname: None,
        operator,
        value: Some(value),
        values: vec![],
        value_of: None,
    }))
}

/// Chained (property, direction) pairs become sort entries; only root-entity
/// properties are accepted.
fn parse_order_by(order_by: &[parsed::OrderByExpression]) -> Result<Vec<Item>, Error> {
    order_by
        .iter()
        .map(|entry| {
            let parsed::Expression::Property(attribute) = &entry.expression else {
                return Err(Error::UnhandledSortExpression);
            };
            Ok(Item::Order(Order {
                attribute: attribute.clone(),
                alias: None,
                descending: entry.descending,
            }))
        })
        .collect()
}

/// One group-by transformation with an optional nested aggregate. Only the
/// virtual row count is expressible on the Fetch side, mapped onto the root
/// entity's primary key with `count`.
fn parse_transformations(
    env: &Env,
    entity_name: &str,
    transformations: &[parsed::Transformation],
) -> Result<Vec<Item>, Error> {
    let mut items = Vec::new();

    for transformation in transformations {
        let (properties, aggregate) = match transformation {
            parsed::Transformation::GroupBy {
                properties,
                aggregate,
            } => (properties, aggregate),
            parsed::Transformation::Other(kind) => {
                return Err(Error::UnhandledTransformation(kind.clone()));
            }
        };

        for property in properties {
            items.push(Item::Attribute(Attribute {
                name: property.clone(),
                alias: Some(property.clone()),
                groupby: true,
                aggregate: None,
            }));
        }

        for expression in aggregate {
            match expression {
                parsed::AggregateExpression::CountVirtual { alias } => {
                    let entity = env.entity(entity_name)?;
                    items.push(Item::Attribute(Attribute {
                        name: entity.primary_id_attribute,
                        alias: Some(alias.clone()),
                        groupby: false,
                        aggregate: Some(AggregateFunction::Count),
                    }));
                }
                parsed::AggregateExpression::Function { function, .. } => {
                    return Err(Error::UnhandledAggregateExpression(function.clone()));
                }
            }
        }
    }

    Ok(items)
}

/// Order reconstructed child nodes by a fixed category precedence so the
/// output is deterministic and re-parseable regardless of input ordering.
fn normalize(items: &mut [Item]) {
    items.sort_by_key(|item| match item {
        Item::AllAttributes => 0,
        Item::Attribute(_) => 1,
        Item::Link(_) => 2,
        Item::Filter(_) => 3,
        Item::Order(_) => 4,
    });
}
