//! Handle expands and the inner-join simulation.

use fetch_model::{Item, JoinKind};
use query_engine_odata::odata::ast::{ExpandItem, FilterGroup};
use query_engine_odata::odata::convert::render_filters;
use query_engine_odata::odata::helpers as odata;

use super::super::error::Error;
use super::super::helpers::Env;
use super::super::navigation;
use super::filtering;

/// Build one expand per link-entity that has child items, recursing into
/// nested links. For a consumed many-to-many hop the far-side link supplies
/// the child entity and items; when it carries nothing there is nothing to
/// expand.
pub fn convert_joins(
    env: &Env,
    entity_name: &str,
    items: &[Item],
    root_items: &[Item],
    lambda_counter: &mut u32,
) -> Result<Vec<ExpandItem>, Error> {
    let mut expands = Vec::new();

    for item in items {
        let Item::Link(link) = item else {
            continue;
        };
        if link.items.is_empty() {
            continue;
        }
        match link.link_type {
            JoinKind::Inner | JoinKind::Outer => {}
            other => return Err(Error::LinkKindOutsideFilter(other)),
        }

        let resolved = navigation::resolve(env, entity_name, link)?;
        let effective = resolved.next_link.unwrap_or(link);

        if resolved.next_link.is_some() && effective.items.is_empty() {
            continue;
        }

        let mut expand = ExpandItem {
            navigation_property: resolved.navigation_property,
            select: super::convert_select(env, &effective.name, &effective.items)?,
            expand: convert_joins(
                env,
                &effective.name,
                &effective.items,
                root_items,
                lambda_counter,
            )?,
            filter: vec![],
        };

        // Single-valued inner joins don't get a nested filter here; their
        // restriction is hoisted to the root by the inner-join simulation,
        // and attaching it twice would restrict twice.
        if link.link_type == JoinKind::Outer || resolved.is_collection {
            expand.filter = filtering::convert_filters(
                env,
                &effective.name,
                &effective.items,
                root_items,
                "",
                false,
                lambda_counter,
            )?;
        }

        expands.push(expand);
    }

    Ok(expands)
}

/// Re-express inner (and default) joins as root-level filter predicates,
/// since the web query's expand has no inner/outer distinction.
///
/// Collection joins wrap their restriction in an `any()` lambda over a fresh
/// `o<N>` bound variable; single-valued joins hoist their conditions onto the
/// navigation path, or assert the related record exists when they carry
/// none. Restricting a link nested two or more levels down has no faithful
/// translation and is rejected.
pub fn convert_inner_join_filters(
    env: &Env,
    entity_name: &str,
    items: &[Item],
    root_items: &[Item],
    path: &str,
    range_counter: &mut u32,
    lambda_counter: &mut u32,
) -> Result<Vec<FilterGroup>, Error> {
    let mut filters = Vec::new();

    for item in items {
        let Item::Link(link) = item else {
            continue;
        };
        if link.link_type != JoinKind::Inner {
            continue;
        }

        let resolved = navigation::resolve(env, entity_name, link)?;
        let property_name = format!("{path}{}", resolved.navigation_property);
        let effective = resolved.next_link.unwrap_or(link);

        if resolved.is_collection {
            let variable = format!("o{range_counter}");
            *range_counter += 1;

            let mut child_filters = filtering::convert_filters(
                env,
                &effective.name,
                &effective.items,
                root_items,
                &format!("{variable}/"),
                false,
                lambda_counter,
            )?;

            if child_filters.is_empty() {
                let child = env.entity(&effective.name)?;
                child_filters.push(odata::condition_group(format!(
                    "{variable}/{} ne null",
                    child.primary_id_attribute
                )));
            }

            child_filters.extend(convert_inner_join_filters(
                env,
                &effective.name,
                &effective.items,
                root_items,
                &format!("{path}{variable}/"),
                range_counter,
                lambda_counter,
            )?);

            let body = render_filters(&child_filters).unwrap_or_default();
            filters.push(odata::condition_group(format!(
                "{property_name}/any({variable}:{body})"
            )));
        } else {
            let mut child_filters = filtering::convert_filters(
                env,
                &effective.name,
                &effective.items,
                root_items,
                &format!("{property_name}/"),
                false,
                lambda_counter,
            )?;

            if child_filters.is_empty() {
                if property_name.split('/').count() >= 2 {
                    return Err(Error::NestedInnerJoin(property_name));
                }
                let child = env.entity(&effective.name)?;
                filters.push(odata::condition_group(format!(
                    "{property_name}/{} ne null",
                    child.primary_id_attribute
                )));
            }

            child_filters.extend(convert_inner_join_filters(
                env,
                &effective.name,
                &effective.items,
                root_items,
                &format!("{property_name}/"),
                range_counter,
                lambda_counter,
            )?);

            filters.extend(child_filters);
        }
    }

    Ok(filters)
}
