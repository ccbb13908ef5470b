//! Translate a Fetch query tree into a web-query URL.

pub mod aggregates;
pub mod filtering;
pub mod joins;
pub mod sorting;

use fetch_model::{Fetch, Item};
use query_engine_odata::odata::ast::CollectionQuery;
use query_engine_odata::odata::helpers as odata;

use super::error::Error;
use super::helpers::Env;

/// Translate a Fetch query to an absolute web-query URL rooted at `base_url`.
///
/// Fails fast with a descriptive error on any construct the web query format
/// cannot express; a partially-built URL is never returned.
pub fn compile(env: &Env, fetch: &Fetch, base_url: &str) -> Result<String, Error> {
    let query = compile_query(env, fetch)?;

    tracing::info!("web query AST: {:?}", query);

    Ok(format!(
        "{}{}",
        base_url.trim_end_matches('/'),
        query.to_query_string()
    ))
}

/// Translate a Fetch query to the web-query AST.
pub fn compile_query(env: &Env, fetch: &Fetch) -> Result<CollectionQuery, Error> {
    if fetch.page.is_some() || fetch.count.is_some() {
        return Err(Error::PagingNotSupported);
    }

    if let Some(datasource) = &fetch.datasource {
        return Err(Error::DataSourceNotSupported(datasource.clone()));
    }

    let entity = &fetch.entity;
    let entity_info = env.entity(&entity.name)?;

    let mut query = odata::empty_query(entity_info.entity_set_name.clone());
    query.top = fetch.top;

    if entity.items.is_empty() {
        return Ok(query);
    }

    if fetch.aggregate {
        query.groups = aggregates::convert_groups(&entity.items);
        query.aggregates = aggregates::convert_aggregates(&entity.items)?;
    }

    query.select = convert_root_select(env, &entity.name, &entity.items)?;
    query.order_by = sorting::convert_order(env, &entity.name, &entity.items)?;

    // Bound-variable counters, threaded through the recursive conversions so
    // generated names stay unique within this one compilation.
    let mut lambda_counter = 1;
    let mut range_counter = 1;

    query.filter = filtering::convert_filters(
        env,
        &entity.name,
        &entity.items,
        &entity.items,
        "",
        false,
        &mut lambda_counter,
    )?;
    query.expand = joins::convert_joins(
        env,
        &entity.name,
        &entity.items,
        &entity.items,
        &mut lambda_counter,
    )?;

    // Add extra root filters to simulate inner joins.
    let inner_join_filters = joins::convert_inner_join_filters(
        env,
        &entity.name,
        &entity.items,
        &entity.items,
        "",
        &mut range_counter,
        &mut lambda_counter,
    )?;
    query.filter.extend(inner_join_filters);

    Ok(query)
}

/// The `$select` list of the root entity. A select-all flag suppresses the
/// list (an unrestricted selection); with items present but no attributes
/// requested the primary key is selected.
fn convert_root_select(env: &Env, entity_name: &str, items: &[Item]) -> Result<Vec<String>, Error> {
    if items
        .iter()
        .any(|item| matches!(item, Item::AllAttributes))
    {
        return Ok(vec![]);
    }

    let mut select = convert_select(env, entity_name, items)?;

    if select.is_empty() {
        select.push(env.entity(entity_name)?.primary_id_attribute);
    }

    Ok(select)
}

/// Requested attributes mapped to their storage property names.
pub(crate) fn convert_select(
    env: &Env,
    entity_name: &str,
    items: &[Item],
) -> Result<Vec<String>, Error> {
    let entity = env.entity(entity_name)?;

    let mut select = Vec::new();
    for item in items {
        let Item::Attribute(attribute) = item else {
            continue;
        };
        let info = env.attribute(&entity, &attribute.name)?;
        select.push(info.property_name());
    }

    Ok(select)
}
