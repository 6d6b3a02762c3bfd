use log::warn;
use serde::Serialize;

use crate::cell::{CellValue, Grid};
use crate::error::{InventoryError, Result};
use crate::schema::{ColumnNames, Layout};

/// One inventory row.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Item {
    pub name: String,
    pub on_hand: f64,
    pub sale_price: f64,
    pub cost: f64,
    pub inflow: f64,
    pub outflow: f64,
    // Every cell of the row as loaded, in header order. Columns outside the
    // six roles are written back from here untouched.
    #[serde(skip)]
    cells: Vec<CellValue>,
}

impl Item {
    pub fn new(name: &str, on_hand: f64, sale_price: f64, cost: f64, inflow: f64, outflow: f64) -> Self {
        Item {
            name: name.to_string(),
            on_hand,
            sale_price,
            cost,
            inflow,
            outflow,
            cells: Vec::new(),
        }
    }

    pub fn unit_profit(&self) -> f64 {
        self.sale_price - self.cost
    }

    pub fn row_profit(&self) -> f64 {
        self.outflow * self.unit_profit()
    }

    pub fn sales(&self) -> f64 {
        self.outflow * self.sale_price
    }

    fn to_row(&self, layout: &Layout) -> Vec<CellValue> {
        let mut row = self.cells.clone();
        row.resize(layout.width(), CellValue::Empty);
        row[layout.name] = CellValue::from_text(&self.name);
        row[layout.on_hand] = self.on_hand.into();
        row[layout.sale_price] = self.sale_price.into();
        row[layout.cost] = self.cost.into();
        row[layout.inflow] = self.inflow.into();
        row[layout.outflow] = self.outflow.into();
        row
    }
}

/// The in-memory inventory: rows in sheet order plus the header layout
/// captured when it was loaded.
#[derive(Clone, Debug)]
pub struct Table {
    layout: Layout,
    items: Vec<Item>,
}

impl Table {
    /// Builds a table from a raw grid whose first row is the header.
    ///
    /// Short rows are padded with blanks (the Sheets API drops trailing empty
    /// cells); a row longer than the header, an unreadable number, or a
    /// missing expected column makes the grid malformed. Entirely blank rows
    /// are skipped.
    pub fn from_grid(grid: Grid, names: &ColumnNames) -> Result<Self> {
        let mut rows = grid.into_iter();
        let header_row = rows
            .next()
            .ok_or_else(|| InventoryError::Malformed("sheet has no header row".to_string()))?;
        let header: Vec<String> = header_row.iter().map(|c| c.to_string()).collect();
        let layout = Layout::resolve(&header, names)?;

        let mut items = Vec::new();
        for (i, mut row) in rows.enumerate() {
            // 1-based sheet row, counting the header
            let sheet_row = i + 2;
            if row.iter().all(CellValue::is_empty) {
                continue;
            }
            if row.len() > layout.width() {
                return Err(InventoryError::Malformed(format!(
                    "row {} has {} cells but the header has {} columns",
                    sheet_row,
                    row.len(),
                    layout.width()
                )));
            }
            row.resize(layout.width(), CellValue::Empty);
            items.push(parse_item(row, &layout, sheet_row)?);
        }

        Ok(Table { layout, items })
    }

    /// Builds a table directly from items, using the default header order.
    pub fn from_items(items: Vec<Item>) -> Self {
        Table {
            layout: Layout::default(),
            items,
        }
    }

    /// Header row followed by one row per item, in the captured column order.
    pub fn to_grid(&self) -> Grid {
        let mut grid = Vec::with_capacity(self.items.len() + 1);
        grid.push(self.layout.header().iter().map(|h| CellValue::from_text(h)).collect());
        for item in &self.items {
            grid.push(item.to_row(&self.layout));
        }
        grid
    }

    pub fn header(&self) -> &[String] {
        self.layout.header()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First row (in sheet order) with exactly this name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|item| item.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Item> {
        self.position(name).map(|i| &self.items[i])
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Result<&mut Item> {
        let index = self
            .position(name)
            .ok_or_else(|| InventoryError::NotFound(name.to_string()))?;
        Ok(&mut self.items[index])
    }

    /// Names that occur on more than one row. Lookups only ever reach the
    /// first of them.
    pub fn duplicate_names(&self) -> Vec<String> {
        let mut dups: Vec<String> = Vec::new();
        for (i, item) in self.items.iter().enumerate() {
            if self.items[..i].iter().any(|prev| prev.name == item.name)
                && !dups.contains(&item.name)
            {
                dups.push(item.name.clone());
            }
        }
        dups
    }

    pub(crate) fn warn_duplicates(&self) {
        for name in self.duplicate_names() {
            warn!("item '{}' appears more than once; only the first row is editable", name);
        }
    }
}

fn parse_item(cells: Vec<CellValue>, layout: &Layout, sheet_row: usize) -> Result<Item> {
    let number = |index: usize| -> Result<f64> {
        cells[index].as_amount().ok_or_else(|| bad_number(&cells[index], layout, index, sheet_row))
    };

    Ok(Item {
        name: cells[layout.name].to_string(),
        on_hand: number(layout.on_hand)?,
        sale_price: number(layout.sale_price)?,
        cost: number(layout.cost)?,
        inflow: number(layout.inflow)?,
        outflow: number(layout.outflow)?,
        cells,
    })
}

fn bad_number(cell: &CellValue, layout: &Layout, index: usize, sheet_row: usize) -> InventoryError {
    InventoryError::Malformed(format!(
        "row {}, column '{}': '{}' is not a valid number",
        sheet_row,
        layout.header()[index],
        cell
    ))
}
