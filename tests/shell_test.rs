use std::fs;
use std::path::Path;

use stockroom::client::CsvSheet;
use stockroom::shell::{Outcome, Shell};
use stockroom::{ColumnNames, Inventory, StockPolicy};

const STOCK_CSV: &str = "\
Product , On Hand,Sale Price,Cost,Inflow,Outflow,Supplier
Coke,10,15,10,0,0,Metro
Diet Coke,5,16,10.5,2,1,Metro
\"Crisps, salted\",20,2.5,1.2,0,0,
";

fn shell_for(path: &Path) -> Shell {
    let inventory = Inventory::load(
        Box::new(CsvSheet::new(path)),
        ColumnNames::default(),
        StockPolicy::AllowNegative,
    )
    .expect("csv should load");
    Shell::new(inventory)
}

fn status(outcome: &Outcome) -> &str {
    match outcome {
        Outcome::Continue { status, .. } => status,
        Outcome::Exit => "exit",
    }
}

#[test]
fn sell_and_save_through_the_shell() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stock.csv");
    fs::write(&path, STOCK_CSV).unwrap();
    let mut shell = shell_for(&path);

    assert_eq!(status(&shell.execute("sell 1")), "no item selected");
    assert_eq!(status(&shell.execute("select Coke")), "ok");
    assert_eq!(status(&shell.execute("sell 3")), "ok");
    assert_eq!(status(&shell.execute("restock 4")), "ok");
    assert!(shell.view().contains("[unsaved]"));

    assert_eq!(status(&shell.execute("q")), "unsaved changes: save first or q! to discard");
    assert_eq!(status(&shell.execute("save")), "saved 4 rows");
    assert_eq!(shell.execute("q"), Outcome::Exit);

    let saved = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = saved.lines().collect();
    assert_eq!(lines[0], "Product,On Hand,Sale Price,Cost,Inflow,Outflow,Supplier");
    assert_eq!(lines[1], "Coke,11,15,10,4,3,Metro");
    assert_eq!(lines[3], "\"Crisps, salted\",20,2.5,1.2,0,0,");
}

#[test]
fn find_narrows_the_view() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stock.csv");
    fs::write(&path, STOCK_CSV).unwrap();
    let mut shell = shell_for(&path);

    assert_eq!(status(&shell.execute("find COKE")), "2 match(es)");
    let view = shell.view();
    assert!(view.contains("Diet Coke"));
    assert!(!view.contains("Crisps"));

    assert_eq!(status(&shell.execute("find")), "3 match(es)");
    assert!(shell.view().contains("Crisps"));
}

#[test]
fn bad_input_reports_status() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stock.csv");
    fs::write(&path, STOCK_CSV).unwrap();
    let mut shell = shell_for(&path);

    assert_eq!(status(&shell.execute("")), "invalid command");
    assert_eq!(status(&shell.execute("select Fanta")), "no item named 'Fanta'");
    shell.execute("select Diet Coke");
    assert_eq!(status(&shell.execute("set -3")), "invalid input: on-hand value must not be negative (got -3)");
    assert_eq!(status(&shell.execute("set 9")), "ok");
    assert_eq!(shell.inventory().table().get("Diet Coke").unwrap().on_hand, 9.0);
}

#[test]
fn failed_save_keeps_changes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stock.csv");
    fs::write(&path, STOCK_CSV).unwrap();
    let mut shell = shell_for(&path);

    shell.execute("select Coke");
    shell.execute("sell 1");
    // Removing the directory makes the temp file creation fail.
    drop(dir);

    let outcome = shell.execute("save");
    assert!(status(&outcome).starts_with("could not save to the sheet"));
    assert!(shell.inventory().is_dirty());
    assert_eq!(shell.inventory().table().get("Coke").unwrap().on_hand, 9.0);
}

#[test]
fn malformed_csv_fails_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stock.csv");
    fs::write(&path, "Product,On Hand\nCoke,10\n").unwrap();

    let err = Inventory::load(
        Box::new(CsvSheet::new(&path)),
        ColumnNames::default(),
        StockPolicy::AllowNegative,
    )
    .err()
    .unwrap();
    assert!(err.is_load_error());
}
