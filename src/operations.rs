//! Per-item mutations. Each one edits the first row whose name matches
//! exactly and hands back the updated row.

use serde::{Deserialize, Serialize};

use crate::error::{InventoryError, Result};
use crate::table::{Item, Table};

/// What a sale may do to the on-hand count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockPolicy {
    /// On-hand may go below zero.
    #[default]
    AllowNegative,
    /// A sale larger than the on-hand count is refused.
    RejectNegative,
}

fn non_negative(what: &str, value: i64) -> Result<f64> {
    if value < 0 {
        Err(InventoryError::InvalidInput(format!(
            "{} must not be negative (got {})",
            what, value
        )))
    } else {
        Ok(value as f64)
    }
}

impl Table {
    /// Records a sale: `outflow += qty`, `on_hand -= qty`.
    pub fn sell(&mut self, name: &str, qty: i64, policy: StockPolicy) -> Result<&Item> {
        let amount = non_negative("quantity", qty)?;
        let item = self.get_mut(name)?;

        if policy == StockPolicy::RejectNegative && amount > item.on_hand {
            return Err(InventoryError::InsufficientStock {
                name: item.name.clone(),
                on_hand: item.on_hand,
                requested: qty,
            });
        }

        item.outflow += amount;
        item.on_hand -= amount;
        Ok(item)
    }

    /// Records a restock: `inflow += qty`, `on_hand += qty`.
    pub fn restock(&mut self, name: &str, qty: i64) -> Result<&Item> {
        let amount = non_negative("quantity", qty)?;
        let item = self.get_mut(name)?;

        item.inflow += amount;
        item.on_hand += amount;
        Ok(item)
    }

    /// Manual correction of the on-hand count. Inflow and outflow are left
    /// alone.
    pub fn adjust_on_hand(&mut self, name: &str, value: i64) -> Result<&Item> {
        let value = non_negative("on-hand value", value)?;
        let item = self.get_mut(name)?;
        item.on_hand = value;
        Ok(item)
    }
}
