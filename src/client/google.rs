use std::time::Duration;

use log::{debug, info};
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{ClientError, SheetClient};
use crate::cell::{CellValue, Grid};

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const DRIVE_FILES_API: &str = "https://www.googleapis.com/drive/v3/files";
const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

/// Which spreadsheet and sheet to open.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTarget {
    /// Spreadsheet file name, looked up through Drive.
    pub spreadsheet: String,
    /// Skips the Drive lookup when set.
    pub spreadsheet_id: Option<String>,
    /// Tab title inside the spreadsheet.
    pub sheet: String,
}

/// A Google Sheets tab reached over the v4 REST API.
///
/// Authenticates with an OAuth bearer token issued for the shop's service
/// account; the token is supplied once at startup.
pub struct GoogleSheets {
    http: Client,
    token: String,
    spreadsheet_id: String,
    sheet_title: String,
    sheet_id: i64,
}

#[derive(Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
    #[serde(default)]
    grid_properties: GridSize,
}

/// Current dimensions of a tab. `updateCells` cannot write outside them.
#[derive(Deserialize, Debug, Default, Clone, Copy)]
#[serde(rename_all = "camelCase")]
struct GridSize {
    #[serde(default)]
    row_count: i64,
    #[serde(default)]
    column_count: i64,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

impl GoogleSheets {
    /// Opens the spreadsheet and the named sheet inside it.
    pub fn connect(token: &str, target: &SheetTarget, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build()?;

        let spreadsheet_id = match &target.spreadsheet_id {
            Some(id) => id.clone(),
            None => find_spreadsheet(&http, token, &target.spreadsheet)?,
        };
        let sheet_id = sheet_properties(&http, token, &spreadsheet_id)?
            .into_iter()
            .find(|p| p.title == target.sheet)
            .map(|p| p.sheet_id)
            .ok_or_else(|| ClientError::SheetNotFound(target.sheet.clone()))?;
        info!(
            "opened sheet '{}' (id {}) in spreadsheet {}",
            target.sheet, sheet_id, spreadsheet_id
        );

        Ok(GoogleSheets {
            http,
            token: token.to_string(),
            spreadsheet_id,
            sheet_title: target.sheet.clone(),
            sheet_id,
        })
    }
}

impl SheetClient for GoogleSheets {
    fn describe(&self) -> String {
        format!("Google sheet '{}' in {}", self.sheet_title, self.spreadsheet_id)
    }

    fn read_grid(&self) -> Result<Grid, ClientError> {
        let url = format!(
            "{}/{}/values/{}",
            SHEETS_API,
            self.spreadsheet_id,
            urlencoding::encode(&a1_sheet_range(&self.sheet_title))
        );
        debug!("GET {}", url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("valueRenderOption", "UNFORMATTED_VALUE"), ("majorDimension", "ROWS")])
            .send()?;
        let range: ValueRange = check(response)?.json()?;
        Ok(grid_from_values(&range.values))
    }

    /// One `batchUpdate` over the whole sheet: cells the grid does not cover
    /// are cleared, so the sheet ends up holding exactly `grid`. The tab is
    /// grown first in the same call when the grid does not fit.
    fn write_grid(&self, grid: &Grid) -> Result<(), ClientError> {
        let size = sheet_properties(&self.http, &self.token, &self.spreadsheet_id)?
            .into_iter()
            .find(|p| p.sheet_id == self.sheet_id)
            .map(|p| p.grid_properties)
            .ok_or_else(|| ClientError::SheetNotFound(self.sheet_title.clone()))?;

        let url = format!("{}/{}:batchUpdate", SHEETS_API, self.spreadsheet_id);
        debug!("POST {} ({} rows)", url, grid.len());
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&update_cells_request(self.sheet_id, grid, size))
            .send()?;
        check(response)?;
        Ok(())
    }
}

fn find_spreadsheet(http: &Client, token: &str, name: &str) -> Result<String, ClientError> {
    let query = drive_query(name);
    debug!("GET {} q={}", DRIVE_FILES_API, query);
    let response = http
        .get(DRIVE_FILES_API)
        .bearer_auth(token)
        .query(&[("q", query.as_str()), ("fields", "files(id)"), ("pageSize", "10")])
        .send()?;
    let list: FileList = check(response)?.json()?;
    list.files
        .into_iter()
        .next()
        .map(|f| f.id)
        .ok_or_else(|| ClientError::SpreadsheetNotFound(name.to_string()))
}

fn sheet_properties(http: &Client, token: &str, spreadsheet_id: &str) -> Result<Vec<SheetProperties>, ClientError> {
    let url = format!("{}/{}", SHEETS_API, spreadsheet_id);
    debug!("GET {}", url);
    let response = http
        .get(&url)
        .bearer_auth(token)
        .query(&[("fields", "sheets.properties(sheetId,title,gridProperties(rowCount,columnCount))")])
        .send()?;
    let meta: SpreadsheetMeta = check(response)?.json()?;
    Ok(meta.sheets.into_iter().map(|s| s.properties).collect())
}

/// Turns a non-2xx response into [`ClientError::Api`], using the message
/// from Google's error envelope when there is one.
fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(ClientError::Api {
        status: status.as_u16(),
        message: api_error_message(&body),
    })
}

fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

fn drive_query(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('\'', "\\'");
    format!(
        "name = '{}' and mimeType = '{}' and trashed = false",
        escaped, SPREADSHEET_MIME
    )
}

/// A1 range covering a whole tab, e.g. `'Stock 2024'`.
fn a1_sheet_range(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

fn grid_from_values(values: &[Vec<Value>]) -> Grid {
    values
        .iter()
        .map(|row| row.iter().map(CellValue::from_json).collect())
        .collect()
}

fn update_cells_request(sheet_id: i64, grid: &Grid, size: GridSize) -> Value {
    let rows: Vec<Value> = grid
        .iter()
        .map(|row| json!({ "values": row.iter().map(CellValue::to_cell_data).collect::<Vec<_>>() }))
        .collect();

    let mut requests = Vec::new();
    let extra_rows = grid.len() as i64 - size.row_count;
    if extra_rows > 0 {
        requests.push(append_dimension(sheet_id, "ROWS", extra_rows));
    }
    let width = grid.iter().map(Vec::len).max().unwrap_or(0) as i64;
    let extra_columns = width - size.column_count;
    if extra_columns > 0 {
        requests.push(append_dimension(sheet_id, "COLUMNS", extra_columns));
    }
    requests.push(json!({
        "updateCells": {
            "range": { "sheetId": sheet_id },
            "rows": rows,
            "fields": "userEnteredValue"
        }
    }));

    json!({ "requests": requests })
}

fn append_dimension(sheet_id: i64, dimension: &str, length: i64) -> Value {
    json!({
        "appendDimension": {
            "sheetId": sheet_id,
            "dimension": dimension,
            "length": length
        }
    })
}
