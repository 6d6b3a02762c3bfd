use crate::table::{Item, Table};

/// Rows whose name contains `query`, ignoring case, in sheet order.
///
/// The query is matched as given, whitespace included; only an empty query
/// returns every row.
pub fn filter<'a>(table: &'a Table, query: &str) -> Vec<&'a Item> {
    if query.is_empty() {
        return table.items().iter().collect();
    }

    let needle = query.to_lowercase();
    table
        .items()
        .iter()
        .filter(|item| !item.name.is_empty() && item.name.to_lowercase().contains(&needle))
        .collect()
}
