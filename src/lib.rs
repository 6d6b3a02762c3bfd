/*!
# Stockroom

Inventory keeping for a single shop whose stock list lives in a spreadsheet.

## Overview

The stock list is read once per session into memory. The operator searches
it by product name, records sales and restocks, corrects on-hand counts, and
watches profit and sales totals. Nothing reaches the spreadsheet until the
operator saves, at which point the whole table is written back in one go.

## Architecture

### Sheet backends
- **Google Sheets** - v4 REST API over blocking `reqwest`, bearer-token auth
- **CSV file** - a local export of the sheet, replaced atomically on save
- **Memory** - shared in-process grid, used by tests

### Core
- Tabular Store - typed rows plus the header order captured at load
- Query Engine - case-insensitive substring search on the product name
- Item Operations - sell, restock, manual on-hand correction
- Metrics - per-item and total profit and sales, always derived
- Persistence - whole-table overwrite on demand

### Shells
- Terminal REPL (`stockroom` binary)
- JSON API and page served with axum (`stockroom-web`, feature `web`)

## Sheet layout

The header row must contain, in any order, the product name, on-hand,
sale price, cost, inflow and outflow columns (names configurable, surrounding
whitespace ignored). Other columns are carried through untouched.

## Modules

- **cell**: cell values exchanged with backends
- **schema**: column names and header layout
- **table**: rows and the in-memory table
- **query**: search
- **operations**: sell, restock, adjust
- **metrics**: derived profit figures
- **saving**: load and flush
- **client**: sheet backends
- **session**: the operator session tying it all together
- **config**: settings file, environment and credentials
- **render** / **shell**: terminal front end
- **app**: web front end
*/

pub mod cell;
pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod operations;
pub mod query;
pub mod render;
pub mod saving;
pub mod schema;
pub mod session;
pub mod shell;
pub mod table;

#[cfg(feature = "web")]
pub mod app;

pub use cell::{CellValue, Grid};
pub use client::{ClientError, SheetClient};
pub use error::{InventoryError, Result};
pub use metrics::{ItemMetrics, Metrics};
pub use operations::StockPolicy;
pub use schema::ColumnNames;
pub use session::Inventory;
pub use table::{Item, Table};
