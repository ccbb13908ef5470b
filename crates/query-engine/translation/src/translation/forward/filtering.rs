//! Handle filter translation: boolean groups, condition rendering, wildcard
//! patterns and any/all lambda filters.

use fetch_model::{
    Condition, ConditionOperator, Filter, FilterItem, FilterType, Item, JoinKind, LinkEntity,
};
use query_engine_metadata::metadata::{AttributeInfo, AttributeType};
use query_engine_odata::odata::ast::{Combinator, FilterGroup};
use query_engine_odata::odata::convert::render_filters;

use super::super::error::Error;
use super::super::helpers::Env;
use super::super::navigation;
use super::super::operators::{self, ArgumentType, FunctionArity, OperatorMapping};
use super::super::values;

/// Convert the filter nodes among `items` into filter groups. `prefix` is
/// prepended to condition paths (a navigation-property path or a bound
/// variable, with its trailing `/`); `negate` flips leaf comparisons inside
/// `not any`/`not all` bodies.
pub fn convert_filters(
    env: &Env,
    entity_name: &str,
    items: &[Item],
    root_items: &[Item],
    prefix: &str,
    negate: bool,
    lambda_counter: &mut u32,
) -> Result<Vec<FilterGroup>, Error> {
    let mut groups = Vec::new();

    for item in items {
        let Item::Filter(filter) = item else {
            continue;
        };
        if filter.items.is_empty() {
            continue;
        }
        groups.push(convert_filter(
            env,
            entity_name,
            filter,
            root_items,
            prefix,
            negate,
            lambda_counter,
        )?);
    }

    Ok(groups)
}

/// Convert one filter node into a combinator-joined group of its conditions,
/// nested groups and lambda fragments.
fn convert_filter(
    env: &Env,
    entity_name: &str,
    filter: &Filter,
    root_items: &[Item],
    prefix: &str,
    negate: bool,
    lambda_counter: &mut u32,
) -> Result<FilterGroup, Error> {
    let mut group = FilterGroup {
        combine: match filter.filter_type {
            FilterType::And => Combinator::And,
            FilterType::Or => Combinator::Or,
        },
        conditions: vec![],
        groups: vec![],
    };

    for item in &filter.items {
        match item {
            FilterItem::Condition(condition) => {
                group.conditions.push(convert_condition(
                    env,
                    entity_name,
                    condition,
                    root_items,
                    prefix,
                    negate,
                )?);
            }
            FilterItem::Filter(nested) => {
                if nested.items.is_empty() {
                    continue;
                }
                group.groups.push(convert_filter(
                    env,
                    entity_name,
                    nested,
                    root_items,
                    prefix,
                    negate,
                    lambda_counter,
                )?);
            }
            FilterItem::Link(link) => {
                group.conditions.push(convert_filter_link(
                    env,
                    entity_name,
                    link,
                    root_items,
                    prefix,
                    negate,
                    lambda_counter,
                )?);
            }
        }
    }

    Ok(group)
}

/// Compile a link-entity appearing inside a filter: the any/all lambda
/// pattern.
///
/// `not any`/`not all` cannot negate a lambda as a unit in the web query
/// grammar, so the negation is pushed inward: leaf comparisons flip and the
/// fragment is prefixed with `not `. A `not` nested inside an already negated
/// body cancels back to the positive form; a positive `any`/`all` nested
/// under a negation has no defined rewrite and is rejected.
fn convert_filter_link(
    env: &Env,
    entity_name: &str,
    link: &LinkEntity,
    root_items: &[Item],
    prefix: &str,
    negate: bool,
    lambda_counter: &mut u32,
) -> Result<String, Error> {
    let (keyword, body_negated, not_prefix) = match (link.link_type, negate) {
        (JoinKind::Any, false) => ("any", false, ""),
        (JoinKind::All, false) => ("all", false, ""),
        (JoinKind::NotAny, false) => ("any", true, "not "),
        (JoinKind::NotAll, false) => ("all", true, "not "),
        (JoinKind::NotAny, true) => ("any", false, ""),
        (JoinKind::NotAll, true) => ("all", false, ""),
        (JoinKind::Any | JoinKind::All, true) => {
            return Err(Error::LambdaUnderNegation(link.link_type));
        }
        (JoinKind::Inner | JoinKind::Outer, _) => {
            return Err(Error::LinkKindInFilter(link.link_type));
        }
    };

    let resolved = navigation::resolve(env, entity_name, link)?;
    if !resolved.is_collection {
        return Err(Error::LambdaOnSingleValued(resolved.navigation_property));
    }
    let link = resolved.next_link.unwrap_or(link);

    let variable = format!("x{lambda_counter}");
    *lambda_counter += 1;

    let groups = convert_filters(
        env,
        &link.name,
        &link.items,
        root_items,
        &format!("{variable}/"),
        body_negated,
        lambda_counter,
    )?;

    let body = match render_filters(&groups) {
        Some(body) => body,
        None => {
            let child = env.entity(&link.name)?;
            format!("({variable}/{} ne null)", child.primary_id_attribute)
        }
    };

    Ok(format!(
        "{not_prefix}{prefix}{}/{keyword}({variable}:{body})",
        resolved.navigation_property
    ))
}

/// Render one condition into a comparison fragment.
fn convert_condition(
    env: &Env,
    entity_name: &str,
    condition: &Condition,
    root_items: &[Item],
    prefix: &str,
    negate: bool,
) -> Result<String, Error> {
    if condition.attribute.is_empty() {
        return Err(Error::MissingConditionAttribute);
    }

    let operator = if negate {
        operators::negate(condition.operator)?
    } else {
        condition.operator
    };

    let mut entity_name = entity_name.to_string();
    let mut navigation = prefix.to_string();

    // A cross-entity condition re-targets the comparison at a link found by
    // alias, replacing the path prefix with the path to that link.
    if let Some(alias) = &condition.entityname {
        let found = navigation::find_link_entity(env, &entity_name, root_items, alias, "")?
            .ok_or_else(|| Error::FilterEntityNotFound(alias.clone()))?;

        if found.is_collection {
            return Err(Error::FilterOnChildCollection(found.navigation_path));
        }

        entity_name = found.link.name.clone();
        navigation = found.navigation_path;
    }

    if navigation.split('/').count() >= 3 {
        return Err(Error::NestedLinkFilter(navigation));
    }

    let entity = env.entity(&entity_name)?;
    let attribute = env.attribute(&entity, &condition.attribute)?;

    // The comparison target: lookups go through their synthetic property,
    // managed properties compare against their wrapped Value.
    let target = if attribute.attribute_type == AttributeType::ManagedProperty {
        format!("{navigation}{}/Value", attribute.logical_name)
    } else {
        format!("{navigation}{}", attribute.property_name())
    };

    match operators::mapping(operator) {
        OperatorMapping::Comparison(symbol) => {
            if let Some(value) = &condition.value {
                let formatted = format_typed_value(env, attribute, value)?;
                Ok(format!("{target} {symbol} {formatted}"))
            } else if let Some(value_of) = &condition.value_of {
                Ok(format!("{target} {symbol} {value_of}"))
            } else {
                Err(Error::MissingConditionValue {
                    attribute: condition.attribute.clone(),
                    operator,
                })
            }
        }

        OperatorMapping::NullCheck { negated } => {
            let symbol = if negated { "ne" } else { "eq" };
            Ok(format!("{target} {symbol} null"))
        }

        OperatorMapping::Wildcard { negated } => {
            let raw = required_value(condition, operator)?;
            render_wildcard(env, attribute, &navigation, &target, raw, negated)
        }

        OperatorMapping::StringFunction { function, negated } => {
            let raw = required_value(condition, operator)?;
            let fragment = format!(
                "{function}({}, {})",
                values::url_encode(&format!("{navigation}{}", attribute.logical_name)),
                values::format_string(raw)
            );
            Ok(apply_not(fragment, negated))
        }

        OperatorMapping::QueryFunction {
            function,
            arity,
            argument,
        } => render_query_function(attribute, condition, operator, &navigation, function, arity, argument),
    }
}

/// LIKE patterns: a leading/trailing `%` turns into startswith/endswith/
/// contains; bracket-escaped wildcard characters are unescaped; any other
/// wildcard use has no faithful translation.
fn render_wildcard(
    env: &Env,
    attribute: &AttributeInfo,
    navigation: &str,
    target: &str,
    raw: &str,
    negated: bool,
) -> Result<String, Error> {
    let mut pattern = raw;

    let has_initial = pattern.starts_with('%');
    if has_initial {
        pattern = &pattern[1..];
    }
    let has_terminal = pattern.ends_with('%');
    if has_terminal {
        pattern = &pattern[..pattern.len() - 1];
    }

    if !all_wildcards_escaped(pattern) {
        return Err(Error::ComplexWildcard(raw.to_string()));
    }

    let value = unescape_wildcards(pattern);

    let fragment = if !has_initial && !has_terminal {
        format!("{target} eq {}", format_typed_value(env, attribute, &value)?)
    } else {
        let function = if has_initial && has_terminal {
            "contains"
        } else if has_initial {
            "endswith"
        } else {
            "startswith"
        };
        format!(
            "{function}({}, {})",
            values::url_encode(&format!("{navigation}{}", attribute.logical_name)),
            values::format_string(&value)
        )
    };

    Ok(apply_not(fragment, negated))
}

/// Whether every wildcard character in the pattern sits in its own
/// single-character bracket escape (`[%]`, `[_]`, `[[]`).
fn all_wildcards_escaped(pattern: &str) -> bool {
    let mut bracket_start = None;

    for (position, character) in pattern.char_indices() {
        if !matches!(character, '%' | '_' | '[' | ']') {
            if bracket_start.is_some() {
                // a non-wildcard character in brackets: not an escape
                return false;
            }
            continue;
        }

        if bracket_start.is_none() {
            if character == '[' {
                bracket_start = Some(position);
            } else {
                // a wildcard character outside brackets
                return false;
            }
        }

        if character == ']' {
            match bracket_start {
                Some(start) if position > start + 2 => return false,
                _ => bracket_start = None,
            }
        }
    }

    true
}

fn unescape_wildcards(pattern: &str) -> String {
    pattern
        .replace("[_]", "_")
        .replace("[%]", "%")
        .replace("[[]", "[")
}

/// Render a platform-defined query function call.
fn render_query_function(
    attribute: &AttributeInfo,
    condition: &Condition,
    operator: ConditionOperator,
    navigation: &str,
    function: &str,
    arity: FunctionArity,
    argument: ArgumentType,
) -> Result<String, Error> {
    let property = values::url_encode(&attribute.logical_name);

    let format_argument = |raw: &str| match argument {
        ArgumentType::Text => Ok(values::format_string(raw)),
        ArgumentType::WholeNumber => values::format_integer(raw),
    };

    match arity {
        FunctionArity::None => Ok(format!(
            "{navigation}Microsoft.Dynamics.CRM.{function}(PropertyName='{property}')"
        )),
        FunctionArity::One => {
            let value = required_value(condition, operator)?;
            Ok(format!(
                "{navigation}Microsoft.Dynamics.CRM.{function}(PropertyName='{property}',PropertyValue={})",
                format_argument(value)?
            ))
        }
        FunctionArity::Two => {
            if condition.values.is_empty() {
                return Err(Error::MissingConditionValue {
                    attribute: condition.attribute.clone(),
                    operator,
                });
            }
            let arguments = condition
                .values
                .iter()
                .enumerate()
                .map(|(index, value)| {
                    Ok(format!("Property{}={}", index + 1, format_argument(value)?))
                })
                .collect::<Result<Vec<String>, Error>>()?;
            Ok(format!(
                "{navigation}Microsoft.Dynamics.CRM.{function}(PropertyName='{property}',{})",
                arguments.join(",")
            ))
        }
        FunctionArity::Variadic => {
            let arguments = condition
                .values
                .iter()
                .map(|value| format_argument(value))
                .collect::<Result<Vec<String>, Error>>()?;
            Ok(format!(
                "{navigation}Microsoft.Dynamics.CRM.{function}(PropertyName='{property}',PropertyValues=[{}])",
                arguments.join(",")
            ))
        }
    }
}

/// Format a literal per the attribute's declared type.
fn format_typed_value(env: &Env, attribute: &AttributeInfo, raw: &str) -> Result<String, Error> {
    let attribute_type = if attribute.attribute_type == AttributeType::ManagedProperty {
        attribute
            .value_type
            .ok_or_else(|| Error::ManagedPropertyValueType(attribute.logical_name.clone()))?
    } else {
        attribute.attribute_type
    };

    match attribute_type {
        AttributeType::Decimal | AttributeType::Money | AttributeType::Double => {
            values::format_decimal(raw)
        }
        AttributeType::BigInt
        | AttributeType::Integer
        | AttributeType::Picklist
        | AttributeType::State
        | AttributeType::Status => values::format_integer(raw),
        AttributeType::Boolean => values::format_boolean(raw),
        AttributeType::UniqueIdentifier
        | AttributeType::Lookup
        | AttributeType::Customer
        | AttributeType::Owner => values::format_guid(raw),
        AttributeType::DateTime => values::format_datetime(raw),
        AttributeType::EntityName => {
            let code = raw.trim().parse::<u32>().map_err(|_| Error::InvalidLiteral {
                kind: "object type code",
                value: raw.to_string(),
            })?;
            let target = env.entity_by_type_code(code)?;
            Ok(values::format_string(&target.logical_name))
        }
        AttributeType::ManagedProperty => Err(Error::ManagedPropertyValueType(
            attribute.logical_name.clone(),
        )),
        AttributeType::String | AttributeType::Memo => Ok(values::format_string(raw)),
    }
}

fn required_value<'a>(
    condition: &'a Condition,
    operator: ConditionOperator,
) -> Result<&'a str, Error> {
    condition
        .value
        .as_deref()
        .ok_or_else(|| Error::MissingConditionValue {
            attribute: condition.attribute.clone(),
            operator,
        })
}

fn apply_not(fragment: String, negated: bool) -> String {
    if negated {
        format!("not {fragment}")
    } else {
        fragment
    }
}
