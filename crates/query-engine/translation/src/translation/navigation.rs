//! Resolve link-entities to navigation properties, and find link-entities by
//! alias for cross-entity conditions.

use fetch_model::{Item, LinkEntity};

use super::error::Error;
use super::helpers::Env;

/// The result of resolving one join descriptor against the metadata.
#[derive(Debug)]
pub struct ResolvedNavigation<'a> {
    pub navigation_property: String,
    /// True when the property denotes a collection of related records.
    pub is_collection: bool,
    /// For a many-to-many join, the nested second-hop link consumed by the
    /// resolution. The caller must not process it again as a separate hop.
    pub next_link: Option<&'a LinkEntity>,
}

/// The required `from`/`to` join attributes of a link, or a malformed-input
/// error naming the missing one.
pub fn join_attributes(link: &LinkEntity) -> Result<(&str, &str), Error> {
    let from = link
        .from
        .as_deref()
        .ok_or_else(|| Error::MissingJoinAttribute {
            link: link.name.clone(),
            attribute: "from",
        })?;
    let to = link.to.as_deref().ok_or_else(|| Error::MissingJoinAttribute {
        link: link.name.clone(),
        attribute: "to",
    })?;
    Ok((from, to))
}

/// Determine the navigation property connecting `parent_entity` to the given
/// link. Search order, first match wins: one-to-many where the parent is the
/// referenced side, many-to-one where the parent is the referencing side,
/// then many-to-many from either intersect side. A many-to-many match
/// requires exactly one nested link describing the opposite intersect hop,
/// which is consumed.
pub fn resolve<'a>(
    env: &Env,
    parent_entity: &str,
    link: &'a LinkEntity,
) -> Result<ResolvedNavigation<'a>, Error> {
    let (from, to) = join_attributes(link)?;
    let entity = env.entity(parent_entity)?;

    for relation in &entity.one_to_many {
        if relation.referenced_entity == parent_entity
            && relation.referenced_attribute == to
            && relation.referencing_entity == link.name
            && relation.referencing_attribute == from
        {
            return Ok(ResolvedNavigation {
                navigation_property: relation.referenced_navigation_property.clone(),
                is_collection: true,
                next_link: None,
            });
        }
    }

    for relation in &entity.many_to_one {
        if relation.referencing_entity == parent_entity
            && relation.referencing_attribute == to
            && relation.referenced_entity == link.name
            && relation.referenced_attribute == from
        {
            return Ok(ResolvedNavigation {
                navigation_property: relation.referencing_navigation_property.clone(),
                is_collection: false,
                next_link: None,
            });
        }
    }

    let nested = link
        .items
        .iter()
        .filter_map(|item| match item {
            Item::Link(nested) => Some(nested),
            _ => None,
        })
        .collect::<Vec<&LinkEntity>>();

    for relation in &entity.many_to_many {
        if relation.entity1 == parent_entity && relation.entity1_intersect_attribute == from {
            if nested.len() > 1 {
                return Err(Error::InvalidManyToManyLink(link.name.clone()));
            }
            if nested.len() == 1 {
                let next = nested[0];
                if relation.entity2 == next.name
                    && next.to.as_deref() == Some(relation.entity2_intersect_attribute.as_str())
                {
                    return Ok(ResolvedNavigation {
                        navigation_property: relation.entity1_navigation_property.clone(),
                        is_collection: true,
                        next_link: Some(next),
                    });
                }
            }
        }
    }

    for relation in &entity.many_to_many {
        if relation.entity2 == parent_entity && relation.entity2_intersect_attribute == from {
            if nested.len() > 1 {
                return Err(Error::InvalidManyToManyLink(link.name.clone()));
            }
            if nested.len() == 1 {
                let next = nested[0];
                if relation.entity1 == next.name
                    && next.from.as_deref() == Some(relation.entity1_intersect_attribute.as_str())
                {
                    return Ok(ResolvedNavigation {
                        navigation_property: relation.entity2_navigation_property.clone(),
                        is_collection: true,
                        next_link: Some(next),
                    });
                }
            }
        }
    }

    Err(Error::RelationshipNotFound {
        parent: parent_entity.to_string(),
        to: to.to_string(),
        child: link.name.clone(),
        from: from.to_string(),
    })
}

/// A link found by alias search, with the navigation-property path leading to
/// it from the root.
#[derive(Debug)]
pub struct FoundLink<'a> {
    pub link: &'a LinkEntity,
    /// The accumulated path, `nav1/nav2/` style, with a trailing separator.
    pub navigation_path: String,
    pub is_collection: bool,
}

/// Find the link-entity a cross-entity condition refers to, accumulating the
/// navigation-property path on the way down. A link with no alias matches by
/// its logical name.
pub fn find_link_entity<'a>(
    env: &Env,
    entity_name: &str,
    items: &'a [Item],
    alias: &str,
    path: &str,
) -> Result<Option<FoundLink<'a>>, Error> {
    for item in items {
        let Item::Link(link) = item else { continue };

        let resolved = resolve(env, entity_name, link)?;
        let navigation_path = format!("{path}{}/", resolved.navigation_property);

        if link.alias.as_deref() == Some(alias) || (link.alias.is_none() && link.name == alias) {
            return Ok(Some(FoundLink {
                link,
                navigation_path,
                is_collection: resolved.is_collection,
            }));
        }

        if let Some(found) = find_link_entity(env, &link.name, &link.items, alias, &navigation_path)?
        {
            return Ok(Some(found));
        }
    }

    Ok(None)
}
