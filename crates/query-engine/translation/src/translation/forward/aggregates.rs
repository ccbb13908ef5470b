//! Handle `$apply` grouping and aggregation.

use fetch_model::{AggregateFunction, Item};

use super::super::error::Error;

/// Group-by keys: attributes flagged groupby, by attribute name.
pub fn convert_groups(items: &[Item]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| match item {
            Item::Attribute(attribute) if attribute.groupby => Some(attribute.name.clone()),
            _ => None,
        })
        .collect()
}

/// Aggregate expressions: the row count uses the virtual `$count`, everything
/// else aggregates a named column `with` its function.
pub fn convert_aggregates(items: &[Item]) -> Result<Vec<String>, Error> {
    let mut aggregates = Vec::new();

    for item in items {
        let Item::Attribute(attribute) = item else {
            continue;
        };
        let Some(function) = attribute.aggregate else {
            continue;
        };
        let alias = attribute
            .alias
            .as_deref()
            .ok_or_else(|| Error::MissingAggregateAlias(attribute.name.clone()))?;

        aggregates.push(match function {
            AggregateFunction::Count => format!("$count as {alias}"),
            other => format!(
                "{} with {} as {alias}",
                attribute.name,
                aggregate_function_name(other)
            ),
        });
    }

    Ok(aggregates)
}

/// The web-query spelling of each aggregate function.
fn aggregate_function_name(function: AggregateFunction) -> &'static str {
    match function {
        AggregateFunction::Count => "count",
        AggregateFunction::Countcolumn => "countdistinct",
        AggregateFunction::Avg => "average",
        AggregateFunction::Sum => "sum",
        AggregateFunction::Min => "min",
        AggregateFunction::Max => "max",
    }
}
