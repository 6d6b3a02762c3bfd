//! Application settings.
//!
//! Settings come from a JSON file (missing file means defaults), then from
//! `STOCKROOM_*` environment variables, which may be placed in a `.env`
//! file. The access token is never stored in the settings file itself; it
//! is read from an environment variable or a token file.

use directories_next::ProjectDirs;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::{self, BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::{CsvSheet, GoogleSheets, SheetClient, SheetTarget};
use crate::error::{InventoryError, Result};
use crate::operations::StockPolicy;
use crate::schema::ColumnNames;

const QUALIFIER: &str = "com";
const ORGANIZATION: &str = "Stockroom";
const APPLICATION: &str = "stockroom";
pub const CONFIG_FILE: &str = "stockroom.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    GoogleSheets,
    Csv,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub backend: Backend,
    pub spreadsheet: String,
    pub spreadsheet_id: Option<String>,
    pub sheet: String,
    pub csv_path: Option<PathBuf>,
    /// Environment variable holding the OAuth access token.
    pub token_env: String,
    /// File holding the OAuth access token, used when the variable is unset.
    pub token_file: Option<PathBuf>,
    pub columns: ColumnNames,
    pub allow_negative_stock: bool,
    pub request_timeout_secs: u64,
    pub listen: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            backend: Backend::GoogleSheets,
            spreadsheet: "Inventory".to_string(),
            spreadsheet_id: None,
            sheet: "Sheet1".to_string(),
            csv_path: None,
            token_env: "STOCKROOM_ACCESS_TOKEN".to_string(),
            token_file: None,
            columns: ColumnNames::default(),
            allow_negative_stock: true,
            request_timeout_secs: 30,
            listen: "127.0.0.1:3000".to_string(),
        }
    }
}

impl Settings {
    /// Loads `.env`, the settings file and the environment overrides.
    ///
    /// With no explicit path, `stockroom.json` in the working directory is
    /// tried first, then the platform config directory.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("loaded environment from {}", path.display());
        }

        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path(),
        };
        let mut settings = match path {
            Some(path) => Self::from_file(&path).map_err(|e| {
                InventoryError::Config(format!("{}: {}", path.display(), e))
            })?,
            None => Settings::default(),
        };

        let env: HashMap<String, String> = std::env::vars().collect();
        settings.apply_env(&env);
        Ok(settings)
    }

    /// Reads a settings file; a missing file yields the defaults.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        match fs::File::open(path) {
            Ok(file) => {
                info!("reading settings from {}", path.display());
                serde_json::from_reader(BufReader::new(file))
                    .map_err(|e| io::Error::new(ErrorKind::InvalidData, e))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("no settings file at {}, using defaults", path.display());
                Ok(Settings::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Applies `STOCKROOM_SPREADSHEET`, `STOCKROOM_SPREADSHEET_ID`,
    /// `STOCKROOM_SHEET` and `STOCKROOM_CSV`. Setting `STOCKROOM_CSV` also
    /// switches the backend to CSV.
    pub fn apply_env(&mut self, env: &HashMap<String, String>) {
        let get = |key: &str| env.get(key).filter(|v| !v.trim().is_empty()).cloned();

        if let Some(v) = get("STOCKROOM_SPREADSHEET") {
            self.spreadsheet = v;
        }
        if let Some(v) = get("STOCKROOM_SPREADSHEET_ID") {
            self.spreadsheet_id = Some(v);
        }
        if let Some(v) = get("STOCKROOM_SHEET") {
            self.sheet = v;
        }
        if let Some(v) = get("STOCKROOM_CSV") {
            self.use_csv(PathBuf::from(v));
        }
    }

    pub fn use_csv(&mut self, path: PathBuf) {
        self.backend = Backend::Csv;
        self.csv_path = Some(path);
    }

    pub fn stock_policy(&self) -> StockPolicy {
        if self.allow_negative_stock {
            StockPolicy::AllowNegative
        } else {
            StockPolicy::RejectNegative
        }
    }

    pub fn target(&self) -> SheetTarget {
        SheetTarget {
            spreadsheet: self.spreadsheet.clone(),
            spreadsheet_id: self.spreadsheet_id.clone(),
            sheet: self.sheet.clone(),
        }
    }

    /// The access token, from the configured variable or else the token
    /// file. Surrounding whitespace is dropped.
    pub fn access_token(&self) -> Result<String> {
        if let Ok(token) = std::env::var(&self.token_env) {
            if !token.trim().is_empty() {
                return Ok(token.trim().to_string());
            }
        }
        if let Some(path) = &self.token_file {
            let token = fs::read_to_string(path).map_err(|e| {
                InventoryError::Config(format!("cannot read token file {}: {}", path.display(), e))
            })?;
            if !token.trim().is_empty() {
                return Ok(token.trim().to_string());
            }
        }
        Err(InventoryError::Config(format!(
            "no access token: set {} or token_file",
            self.token_env
        )))
    }

    /// Builds the client for the configured backend. For Google Sheets this
    /// authenticates and opens the sheet.
    pub fn connect(&self) -> Result<Box<dyn SheetClient>> {
        match self.backend {
            Backend::Csv => {
                let path = self.csv_path.clone().ok_or_else(|| {
                    InventoryError::Config("csv backend selected but csv_path is not set".to_string())
                })?;
                Ok(Box::new(CsvSheet::new(path)))
            }
            Backend::GoogleSheets => {
                let token = self.access_token()?;
                let timeout = Duration::from_secs(self.request_timeout_secs.max(1));
                let client =
                    GoogleSheets::connect(&token, &self.target(), timeout).map_err(InventoryError::Load)?;
                Ok(Box::new(client))
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}
