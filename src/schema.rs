//! Column roles of the inventory sheet and the header layout captured at
//! load time.
//!
//! On read the columns may come in any order; the header seen at load is
//! kept verbatim (after trimming) and written back in the same order on
//! flush.

use serde::{Deserialize, Serialize};

use crate::error::{InventoryError, Result};

/// Header names of the six columns the inventory relies on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColumnNames {
    pub name: String,
    pub on_hand: String,
    pub sale_price: String,
    pub cost: String,
    pub inflow: String,
    pub outflow: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        ColumnNames {
            name: "Product".to_string(),
            on_hand: "On Hand".to_string(),
            sale_price: "Sale Price".to_string(),
            cost: "Cost".to_string(),
            inflow: "Inflow".to_string(),
            outflow: "Outflow".to_string(),
        }
    }
}

/// Strips surrounding whitespace from a header cell.
pub fn normalize_header(raw: &str) -> String {
    raw.trim().to_string()
}

/// Positions of each role within the captured header.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    header: Vec<String>,
    pub name: usize,
    pub on_hand: usize,
    pub sale_price: usize,
    pub cost: usize,
    pub inflow: usize,
    pub outflow: usize,
}

impl Default for Layout {
    /// The default column names in their default order.
    fn default() -> Self {
        let names = ColumnNames::default();
        Layout {
            header: vec![
                names.name,
                names.on_hand,
                names.sale_price,
                names.cost,
                names.inflow,
                names.outflow,
            ],
            name: 0,
            on_hand: 1,
            sale_price: 2,
            cost: 3,
            inflow: 4,
            outflow: 5,
        }
    }
}

impl Layout {
    /// Resolves every role against a header row. Names must match exactly
    /// after trimming; a repeated header name is rejected since the value
    /// written back would be ambiguous.
    pub fn resolve(raw_header: &[String], names: &ColumnNames) -> Result<Self> {
        let header: Vec<String> = raw_header.iter().map(|h| normalize_header(h)).collect();

        for (i, h) in header.iter().enumerate() {
            if !h.is_empty() && header[..i].contains(h) {
                return Err(InventoryError::Malformed(format!(
                    "column '{}' appears more than once in the header",
                    h
                )));
            }
        }

        let find = |wanted: &str| -> Result<usize> {
            let wanted = normalize_header(wanted);
            header.iter().position(|h| *h == wanted).ok_or_else(|| {
                InventoryError::Malformed(format!("missing expected column '{}'", wanted))
            })
        };

        Ok(Layout {
            name: find(&names.name)?,
            on_hand: find(&names.on_hand)?,
            sale_price: find(&names.sale_price)?,
            cost: find(&names.cost)?,
            inflow: find(&names.inflow)?,
            outflow: find(&names.outflow)?,
            header,
        })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn width(&self) -> usize {
        self.header.len()
    }
}
