use crate::metrics::Metrics;
use crate::table::Item;

const NAME_WIDTH: usize = 24;

/// Text table of items with their derived profit figures. The selected row
/// is marked with `>`.
pub fn items_table(items: &[&Item], selected: Option<&str>) -> String {
    let mut out = format!(
        "  {:<w$} {:>8} {:>10} {:>10} {:>8} {:>8} {:>10} {:>12}\n",
        "Product",
        "On hand",
        "Price",
        "Cost",
        "Inflow",
        "Outflow",
        "Unit prof",
        "Row profit",
        w = NAME_WIDTH
    );
    for item in items {
        let marker = if Some(item.name.as_str()) == selected { '>' } else { ' ' };
        out.push_str(&format!(
            "{} {:<w$} {:>8} {:>10.2} {:>10.2} {:>8} {:>8} {:>10.2} {:>12.2}\n",
            marker,
            clip(&item.name, NAME_WIDTH),
            item.on_hand,
            item.sale_price,
            item.cost,
            item.inflow,
            item.outflow,
            item.unit_profit(),
            item.row_profit(),
            w = NAME_WIDTH
        ));
    }
    if items.is_empty() {
        out.push_str("  (no matching items)\n");
    }
    out
}

pub fn item_line(item: &Item) -> String {
    format!(
        "{}: on hand {}, inflow {}, outflow {}, unit profit {:.2}, row profit {:.2}",
        item.name,
        item.on_hand,
        item.inflow,
        item.outflow,
        item.unit_profit(),
        item.row_profit()
    )
}

pub fn summary(metrics: &Metrics) -> String {
    format!(
        "Total sales: {:.2} | Total profit: {:.2} | Units on hand: {} | Stock at cost: {:.2}",
        metrics.total_sales, metrics.total_profit, metrics.total_on_hand, metrics.stock_value
    )
}

fn clip(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut clipped: String = s.chars().take(width - 1).collect();
        clipped.push('~');
        clipped
    }
}
