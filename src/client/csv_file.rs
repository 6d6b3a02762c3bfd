use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use log::debug;
use tempfile::NamedTempFile;

use super::{ClientError, SheetClient};
use crate::cell::{CellValue, Grid};

/// A local CSV file standing in for the remote sheet.
///
/// # Examples
/// ```no_run
/// use stockroom::client::{CsvSheet, SheetClient};
///
/// let sheet = CsvSheet::new("inventory.csv");
/// match sheet.read_grid() {
///     Ok(grid) => println!("{} rows", grid.len()),
///     Err(e) => eprintln!("Error reading CSV: {}", e),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CsvSheet {
    path: PathBuf,
}

impl CsvSheet {
    pub fn new(path: impl AsRef<Path>) -> Self {
        CsvSheet {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl SheetClient for CsvSheet {
    fn describe(&self) -> String {
        format!("CSV file {}", self.path.display())
    }

    fn read_grid(&self) -> Result<Grid, ClientError> {
        let file = File::open(&self.path)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut grid = Vec::new();
        for record in reader.records() {
            let record = record?;
            grid.push(record.iter().map(CellValue::from_text).collect());
        }
        debug!("read {} rows from {}", grid.len(), self.path.display());
        Ok(grid)
    }

    /// Writes to a temporary file next to the target and renames it into
    /// place, so a failed write leaves the old file as it was.
    fn write_grid(&self, grid: &Grid) -> Result<(), ClientError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let tmp = NamedTempFile::new_in(&dir)?;
        {
            let mut writer = csv::WriterBuilder::new()
                .flexible(true)
                .from_writer(BufWriter::new(tmp.as_file()));
            for row in grid {
                writer.write_record(row.iter().map(|cell| cell.to_string()))?;
            }
            writer.flush()?;
        }
        tmp.persist(&self.path).map_err(|e| ClientError::Io(e.error))?;
        debug!("wrote {} rows to {}", grid.len(), self.path.display());
        Ok(())
    }
}
