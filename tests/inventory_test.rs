use stockroom::client::MemorySheet;
use stockroom::{CellValue, ColumnNames, Grid, Inventory, InventoryError, StockPolicy};

fn text(s: &str) -> CellValue {
    CellValue::from(s)
}

fn header() -> Vec<CellValue> {
    ["Product", "On Hand", "Sale Price", "Cost", "Inflow", "Outflow"]
        .iter()
        .map(|h| text(h))
        .collect()
}

fn row(name: &str, on_hand: i64, price: f64, cost: f64, inflow: i64, outflow: i64) -> Vec<CellValue> {
    vec![
        text(name),
        (on_hand as f64).into(),
        price.into(),
        cost.into(),
        (inflow as f64).into(),
        (outflow as f64).into(),
    ]
}

fn shop_grid() -> Grid {
    vec![
        header(),
        row("Coke", 10, 15.0, 10.0, 0, 0),
        row("Diet Coke", 5, 16.0, 10.5, 2, 1),
        row("Pepsi", 8, 14.0, 9.0, 0, 0),
    ]
}

fn open(grid: Grid, policy: StockPolicy) -> (Inventory, MemorySheet) {
    let sheet = MemorySheet::new(grid);
    let inventory = Inventory::load(Box::new(sheet.clone()), ColumnNames::default(), policy)
        .expect("sheet should load");
    (inventory, sheet)
}

// Helper to check one item's counters
fn assert_counts(inventory: &Inventory, name: &str, on_hand: i64, inflow: i64, outflow: i64) {
    let item = inventory
        .table()
        .get(name)
        .unwrap_or_else(|| panic!("item {} should exist", name));
    assert_eq!(item.on_hand, on_hand as f64, "on_hand of {}", name);
    assert_eq!(item.inflow, inflow as f64, "inflow of {}", name);
    assert_eq!(item.outflow, outflow as f64, "outflow of {}", name);
}

#[test]
fn coke_sale_and_metrics() {
    let grid = vec![header(), row("Coke", 10, 15.0, 10.0, 0, 0)];
    let (mut inventory, _) = open(grid, StockPolicy::AllowNegative);

    inventory.sell("Coke", 3).unwrap();
    assert_counts(&inventory, "Coke", 7, 0, 3);

    let metrics = inventory.metrics();
    assert_eq!(metrics.items[0].unit_profit, 5.0);
    assert_eq!(metrics.items[0].row_profit, 15.0);
    assert_eq!(metrics.total_sales, 45.0);
    assert_eq!(metrics, inventory.metrics());
}

#[test]
fn search_examples() {
    let grid = vec![header(), row("Coke", 10, 15.0, 10.0, 0, 0)];
    let (inventory, _) = open(grid, StockPolicy::AllowNegative);

    let hits = inventory.filter("cok");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Coke");
    assert!(inventory.filter("pepsi").is_empty());
    assert_eq!(inventory.filter("").len(), 1);
}

#[test]
fn sell_restock_round_trip_on_every_row() {
    let (mut inventory, _) = open(shop_grid(), StockPolicy::AllowNegative);
    let before: Vec<_> = inventory.table().items().to_vec();

    for item in &before {
        inventory.sell(&item.name, 4).unwrap();
        inventory.restock(&item.name, 4).unwrap();
    }
    for item in &before {
        let after = inventory.table().get(&item.name).unwrap();
        assert_eq!(after.on_hand, item.on_hand);
        assert_eq!(after.inflow, item.inflow + 4.0);
        assert_eq!(after.outflow, item.outflow + 4.0);
    }
}

#[test]
fn adjust_overrides_on_hand_only() {
    let (mut inventory, _) = open(shop_grid(), StockPolicy::AllowNegative);
    inventory.adjust_on_hand("Diet Coke", 42).unwrap();
    assert_counts(&inventory, "Diet Coke", 42, 2, 1);
}

#[test]
fn errors_leave_table_alone() {
    let (mut inventory, _) = open(shop_grid(), StockPolicy::RejectNegative);

    assert!(matches!(inventory.sell("Fanta", 1), Err(InventoryError::NotFound(_))));
    assert!(matches!(inventory.restock("Coke", -2), Err(InventoryError::InvalidInput(_))));
    assert!(matches!(inventory.sell("Pepsi", 9), Err(InventoryError::InsufficientStock { .. })));
    assert_counts(&inventory, "Pepsi", 8, 0, 0);
    assert!(!inventory.is_dirty());
}

#[test]
fn negative_stock_allowed_by_default() {
    let (mut inventory, _) = open(shop_grid(), StockPolicy::AllowNegative);
    inventory.sell("Pepsi", 9).unwrap();
    assert_counts(&inventory, "Pepsi", -1, 0, 9);
}

#[test]
fn flush_writes_header_plus_rows() {
    let (mut inventory, sheet) = open(shop_grid(), StockPolicy::AllowNegative);
    inventory.sell("Coke", 2).unwrap();
    assert!(inventory.is_dirty());

    let rows = inventory.flush().unwrap();
    assert_eq!(rows, 4);
    assert_eq!(sheet.writes(), 1);
    assert!(!inventory.is_dirty());
    assert!(inventory.last_flush().is_some());

    let grid = sheet.grid();
    assert_eq!(grid.len(), inventory.table().len() + 1);
    assert_eq!(grid[0], header());
    assert_eq!(grid[1], row("Coke", 8, 15.0, 10.0, 0, 2));
}

#[test]
fn flush_of_empty_table_writes_only_header() {
    let (mut inventory, sheet) = open(vec![header()], StockPolicy::AllowNegative);
    assert!(inventory.table().is_empty());

    assert_eq!(inventory.flush().unwrap(), 1);
    assert_eq!(sheet.grid(), vec![header()]);
}

#[test]
fn failed_flush_keeps_local_state() {
    let (mut inventory, sheet) = open(shop_grid(), StockPolicy::AllowNegative);
    inventory.restock("Pepsi", 5).unwrap();
    sheet.fail_writes(true);

    let err = inventory.flush().unwrap_err();
    assert!(matches!(err, InventoryError::Persist(_)));
    assert!(inventory.is_dirty());
    assert!(inventory.last_flush().is_none());
    assert_counts(&inventory, "Pepsi", 13, 5, 0);
    assert_eq!(sheet.grid(), shop_grid());

    sheet.fail_writes(false);
    inventory.flush().unwrap();
    assert_eq!(sheet.grid()[3], row("Pepsi", 13, 14.0, 9.0, 5, 0));
}

#[test]
fn flush_keeps_header_order_and_extra_columns() {
    let grid = vec![
        vec![text("Notes"), text(" Outflow "), text("Product"), text("Cost"), text("Sale Price"), text("Inflow"), text("On Hand")],
        vec![text("fridge"), 0_i64.into(), text("Coke"), 10.0.into(), 15.0.into(), 0_i64.into(), 10_i64.into()],
    ];
    let (mut inventory, sheet) = open(grid, StockPolicy::AllowNegative);
    inventory.sell("Coke", 1).unwrap();
    inventory.flush().unwrap();

    let written = sheet.grid();
    assert_eq!(written[0][1], text("Outflow"));
    assert_eq!(written[1][0], text("fridge"));
    assert_eq!(written[1][1], CellValue::Number(1.0));
    assert_eq!(written[1][6], CellValue::Number(9.0));
}

#[test]
fn fractional_stock_loads_and_flushes() {
    let mut grid = shop_grid();
    grid.push(vec![text("Cheddar (kg)"), text("2.5"), 18.0.into(), 11.0.into(), CellValue::Number(4.0), text("1.5")]);
    let (mut inventory, sheet) = open(grid, StockPolicy::AllowNegative);

    let cheddar = inventory.table().get("Cheddar (kg)").unwrap();
    assert_eq!(cheddar.on_hand, 2.5);
    assert_eq!(cheddar.outflow, 1.5);

    inventory.sell("Cheddar (kg)", 1).unwrap();
    inventory.flush().unwrap();
    let written = sheet.grid();
    assert_eq!(written[4][1], CellValue::Number(1.5));
    assert_eq!(written[4][5], CellValue::Number(2.5));
}

#[test]
fn search_matches_whitespace_literally() {
    let (inventory, _) = open(shop_grid(), StockPolicy::AllowNegative);
    let hits: Vec<&str> = inventory.filter(" coke").iter().map(|i| i.name.as_str()).collect();
    assert_eq!(hits, vec!["Diet Coke"]);
    assert_eq!(inventory.filter(" ").len(), 1);
}

#[test]
fn load_failures() {
    let sheet = MemorySheet::new(shop_grid());
    sheet.fail_reads(true);
    let err = Inventory::load(Box::new(sheet), ColumnNames::default(), StockPolicy::AllowNegative)
        .err()
        .unwrap();
    assert!(matches!(err, InventoryError::Load(_)));
    assert!(err.is_load_error());

    let mut grid = shop_grid();
    grid[0].pop();
    let err = Inventory::load(Box::new(MemorySheet::new(grid)), ColumnNames::default(), StockPolicy::AllowNegative)
        .err()
        .unwrap();
    assert!(matches!(err, InventoryError::Malformed(_)));
    assert!(err.is_load_error());
}

#[test]
fn reload_discards_edits_and_picks_up_remote_changes() {
    let (mut inventory, sheet) = open(shop_grid(), StockPolicy::AllowNegative);
    inventory.sell("Coke", 5).unwrap();

    let mut remote = shop_grid();
    remote.push(row("Fanta", 3, 12.0, 8.0, 0, 0));
    sheet.set_grid(remote);

    inventory.reload().unwrap();
    assert!(!inventory.is_dirty());
    assert_counts(&inventory, "Coke", 10, 0, 0);
    assert_eq!(inventory.table().len(), 4);
}

#[test]
fn failed_reload_keeps_current_table() {
    let (mut inventory, sheet) = open(shop_grid(), StockPolicy::AllowNegative);
    inventory.sell("Coke", 5).unwrap();
    sheet.fail_reads(true);

    assert!(inventory.reload().is_err());
    assert!(inventory.is_dirty());
    assert_counts(&inventory, "Coke", 5, 0, 5);
}
