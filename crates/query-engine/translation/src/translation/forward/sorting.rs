//! Handle `$orderby` translation.

use fetch_model::Item;
use query_engine_odata::odata::ast::OrderByItem;

use super::super::error::Error;
use super::super::helpers::Env;

/// Convert the root entity's sort entries. Sorting by a joined entity's
/// attribute has no web-query equivalent and is rejected.
pub fn convert_order(
    env: &Env,
    entity_name: &str,
    items: &[Item],
) -> Result<Vec<OrderByItem>, Error> {
    let entity = env.entity(entity_name)?;

    let mut order_by = Vec::new();
    for item in items {
        let Item::Order(order) = item else {
            continue;
        };

        if let Some(alias) = &order.alias {
            return Err(Error::SortOnLinkEntity {
                alias: alias.clone(),
                attribute: order.attribute.clone(),
            });
        }

        let attribute = env.attribute(&entity, &order.attribute)?;
        order_by.push(OrderByItem {
            property: attribute.property_name(),
            descending: order.descending,
        });
    }

    Ok(order_by)
}
