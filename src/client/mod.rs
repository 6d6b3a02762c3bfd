//! Spreadsheet backends.
//!
//! A [`SheetClient`] is built explicitly at startup and handed to the
//! session; there is no process-wide connection.

mod csv_file;
mod google;
mod memory;

pub use csv_file::CsvSheet;
pub use google::{GoogleSheets, SheetTarget};
pub use memory::MemorySheet;

use thiserror::Error;

use crate::cell::Grid;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("spreadsheet '{0}' not found")]
    SpreadsheetNotFound(String),

    #[error("sheet '{0}' not found")]
    SheetNotFound(String),

    #[error("unexpected response: {0}")]
    BadResponse(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Csv(#[from] csv::Error),

    /// Failure injected by [`MemorySheet`].
    #[error("{0}")]
    Unavailable(String),
}

/// A single sheet that can be read whole and overwritten whole.
pub trait SheetClient: Send {
    /// Human-readable location of the sheet, for logs and status lines.
    fn describe(&self) -> String;

    /// Every row of the sheet, header first.
    fn read_grid(&self) -> Result<Grid, ClientError>;

    /// Replaces the entire sheet contents with `grid` in one write.
    fn write_grid(&self, grid: &Grid) -> Result<(), ClientError>;
}
