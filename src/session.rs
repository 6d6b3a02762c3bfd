use chrono::{DateTime, Local};
use log::{info, warn};

use crate::client::SheetClient;
use crate::error::Result;
use crate::metrics::{self, Metrics};
use crate::operations::StockPolicy;
use crate::query;
use crate::saving::{flush_table, load_table};
use crate::schema::ColumnNames;
use crate::table::{Item, Table};

/// One operator session: the sheet client plus the table loaded from it.
///
/// Edits stay in memory until [`Inventory::flush`] succeeds.
pub struct Inventory {
    client: Box<dyn SheetClient>,
    names: ColumnNames,
    policy: StockPolicy,
    table: Table,
    dirty: bool,
    last_flush: Option<DateTime<Local>>,
}

impl Inventory {
    pub fn load(client: Box<dyn SheetClient>, names: ColumnNames, policy: StockPolicy) -> Result<Self> {
        let table = load_table(&*client, &names)?;
        Ok(Inventory {
            client,
            names,
            policy,
            table,
            dirty: false,
            last_flush: None,
        })
    }

    /// Re-reads the sheet, discarding unflushed edits. On failure the
    /// current table is kept.
    pub fn reload(&mut self) -> Result<()> {
        let table = load_table(&*self.client, &self.names)?;
        if self.dirty {
            warn!("reload discarded unsaved changes");
        }
        self.table = table;
        self.dirty = false;
        Ok(())
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn source(&self) -> String {
        self.client.describe()
    }

    pub fn filter(&self, query: &str) -> Vec<&Item> {
        query::filter(&self.table, query)
    }

    pub fn sell(&mut self, name: &str, qty: i64) -> Result<&Item> {
        let item = self.table.sell(name, qty, self.policy)?;
        self.dirty = true;
        info!("sold {} of '{}', {} left", qty, name, item.on_hand);
        Ok(item)
    }

    pub fn restock(&mut self, name: &str, qty: i64) -> Result<&Item> {
        let item = self.table.restock(name, qty)?;
        self.dirty = true;
        info!("restocked {} of '{}', {} on hand", qty, name, item.on_hand);
        Ok(item)
    }

    pub fn adjust_on_hand(&mut self, name: &str, value: i64) -> Result<&Item> {
        let item = self.table.adjust_on_hand(name, value)?;
        self.dirty = true;
        info!("set on-hand of '{}' to {}", name, value);
        Ok(item)
    }

    pub fn metrics(&self) -> Metrics {
        metrics::compute(&self.table)
    }

    /// Pushes the whole table to the sheet. Returns rows written, header
    /// included. No retry on failure.
    pub fn flush(&mut self) -> Result<usize> {
        let rows = flush_table(&*self.client, &self.table)?;
        self.dirty = false;
        self.last_flush = Some(Local::now());
        Ok(rows)
    }

    /// True when there are edits the sheet has not seen.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn last_flush(&self) -> Option<DateTime<Local>> {
        self.last_flush
    }
}
