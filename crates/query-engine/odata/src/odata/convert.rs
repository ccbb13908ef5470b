//! Convert the web-query AST to its URL query-string form.

use super::ast::*;

impl CollectionQuery {
    /// Render as `/collection` or `/collection?<options>`. Fragment contents
    /// are expected to be escaped already; the `$`/`=`/`&` framing is emitted
    /// literally as the web API expects it.
    pub fn to_query_string(&self) -> String {
        let parts = self.parts();
        if parts.is_empty() {
            format!("/{}", self.collection)
        } else {
            format!("/{}?{}", self.collection, parts.join("&"))
        }
    }

    fn parts(&self) -> Vec<String> {
        if !self.aggregates.is_empty() {
            let mut apply = format!("aggregate({})", self.aggregates.join(","));

            if !self.groups.is_empty() {
                apply = format!("groupby(({}),{})", self.groups.join(","), apply);
            }

            if let Some(filter) = render_filters(&self.filter) {
                apply = format!("filter({filter})/{apply}");
            }

            return vec![format!("$apply={apply}")];
        }

        let mut parts = render_options(&self.select, &self.expand, &self.filter);

        if !self.order_by.is_empty() {
            let order_by = self
                .order_by
                .iter()
                .map(OrderByItem::render)
                .collect::<Vec<String>>()
                .join(",");
            parts.push(format!("$orderby={order_by}"));
        }

        if let Some(top) = self.top {
            parts.push(format!("$top={top}"));
        }

        parts
    }
}

impl ExpandItem {
    /// Render as `navigation(<options>)`, options joined with `;`.
    fn render(&self) -> String {
        let parts = render_options(&self.select, &self.expand, &self.filter);
        format!("{}({})", self.navigation_property, parts.join(";"))
    }
}

/// The `$select`/`$expand`/`$filter` options shared by the root query and
/// nested expands.
fn render_options(
    select: &[String],
    expand: &[ExpandItem],
    filter: &[FilterGroup],
) -> Vec<String> {
    let mut parts = Vec::new();

    if !select.is_empty() {
        parts.push(format!("$select={}", select.join(",")));
    }

    if !expand.is_empty() {
        let expand = expand
            .iter()
            .map(ExpandItem::render)
            .collect::<Vec<String>>()
            .join(",");
        parts.push(format!("$expand={expand}"));
    }

    if let Some(filter) = render_filters(filter) {
        parts.push(format!("$filter={filter}"));
    }

    parts
}

/// Render a list of groups AND-joined, or `None` when nothing survives.
pub fn render_filters(groups: &[FilterGroup]) -> Option<String> {
    let rendered = groups
        .iter()
        .filter_map(FilterGroup::render)
        .collect::<Vec<String>>();

    if rendered.is_empty() {
        None
    } else {
        Some(rendered.join(" and "))
    }
}

impl FilterGroup {
    /// Render as `(a and b and (…))`, or `None` when the group is empty.
    /// Empty members contribute nothing.
    pub fn render(&self) -> Option<String> {
        let items = self
            .conditions
            .iter()
            .filter(|condition| !condition.is_empty())
            .cloned()
            .chain(self.groups.iter().filter_map(FilterGroup::render))
            .collect::<Vec<String>>();

        if items.is_empty() {
            return None;
        }

        let combinator = match self.combine {
            Combinator::And => " and ",
            Combinator::Or => " or ",
        };

        Some(format!("({})", items.join(combinator)))
    }
}

impl OrderByItem {
    fn render(&self) -> String {
        let direction = if self.descending { "desc" } else { "asc" };
        format!("{} {}", self.property, direction)
    }
}
