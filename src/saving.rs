use log::info;

use crate::client::SheetClient;
use crate::error::{InventoryError, Result};
use crate::schema::ColumnNames;
use crate::table::Table;

/// Reads the whole sheet and builds the table.
pub fn load_table(client: &dyn SheetClient, names: &ColumnNames) -> Result<Table> {
    let grid = client.read_grid().map_err(InventoryError::Load)?;
    let table = Table::from_grid(grid, names)?;
    table.warn_duplicates();
    info!("loaded {} items from {}", table.len(), client.describe());
    Ok(table)
}

/// Overwrites the sheet with the table in a single write and returns the
/// number of rows written, header included. The table itself is never
/// touched, whether the write succeeds or not.
pub fn flush_table(client: &dyn SheetClient, table: &Table) -> Result<usize> {
    let grid = table.to_grid();
    client.write_grid(&grid).map_err(InventoryError::Persist)?;
    info!("flushed {} rows to {}", grid.len(), client.describe());
    Ok(grid.len())
}
