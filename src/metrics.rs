use serde::Serialize;

use crate::table::Table;

/// Derived figures for one row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemMetrics {
    pub name: String,
    pub unit_profit: f64,
    pub row_profit: f64,
    pub sales: f64,
}

/// Derived figures for the whole table. Nothing here is stored; recompute
/// after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub items: Vec<ItemMetrics>,
    pub total_profit: f64,
    pub total_sales: f64,
    pub total_on_hand: f64,
    /// On-hand stock valued at cost.
    pub stock_value: f64,
}

pub fn compute(table: &Table) -> Metrics {
    let items: Vec<ItemMetrics> = table
        .items()
        .iter()
        .map(|item| ItemMetrics {
            name: item.name.clone(),
            unit_profit: item.unit_profit(),
            row_profit: item.row_profit(),
            sales: item.sales(),
        })
        .collect();

    Metrics {
        total_profit: items.iter().map(|m| m.row_profit).sum(),
        total_sales: items.iter().map(|m| m.sales).sum(),
        total_on_hand: table.items().iter().map(|i| i.on_hand).sum(),
        stock_value: table.items().iter().map(|i| i.on_hand * i.cost).sum(),
        items,
    }
}
