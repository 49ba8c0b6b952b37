use std::path::Path;
use std::time::Duration;

use mailharvest_core::SourceRange;
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::auth;
use crate::error::{Result, SheetsError};
use crate::spreadsheet::Spreadsheet;

const DRIVE_FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Google Sheets workbook opened by display name. Every call is a
/// blocking HTTP request; errors surface directly with no retry policy.
pub struct GoogleSheets {
    http: Client,
    access_token: String,
    spreadsheet_id: String,
}

impl GoogleSheets {
    /// Loads credentials (refreshing the access token if needed) and
    /// resolves the workbook's display name to a spreadsheet id through
    /// the Drive API, the same way the workbook is looked up in the
    /// Sheets UI sidebar.
    pub fn open(credentials: &Path, workbook: &str) -> Result<Self> {
        let access_token = auth::access_token(credentials)?;
        let http = Client::builder()
            .user_agent("mailharvest")
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        let spreadsheet_id = lookup_workbook(&http, &access_token, workbook)?;
        debug!(workbook, spreadsheet_id, "workbook resolved");
        Ok(Self {
            http,
            access_token,
            spreadsheet_id,
        })
    }

    fn values_url(&self, range: &str, suffix: Option<&str>) -> Result<Url> {
        let mut url = Url::parse(SHEETS_BASE_URL)?;
        {
            let mut segments = url.path_segments_mut().expect("https url has a path");
            segments.push(&self.spreadsheet_id).push("values");
            match suffix {
                Some(suffix) => segments.push(&format!("{range}{suffix}")),
                None => segments.push(range),
            };
        }
        Ok(url)
    }

    fn metadata_url(&self) -> Result<Url> {
        let mut url = Url::parse(SHEETS_BASE_URL)?;
        url.path_segments_mut()
            .expect("https url has a path")
            .push(&self.spreadsheet_id);
        Ok(url)
    }
}

impl Spreadsheet for GoogleSheets {
    fn sheet_title(&self, name: &str) -> Result<String> {
        let url = self.metadata_url()?;
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .query(&[("fields", "sheets.properties.title")])
            .send()?;
        let meta: SpreadsheetMeta = check(response)?.json()?;
        meta.sheets
            .into_iter()
            .map(|sheet| sheet.properties.title)
            .find(|title| title == name)
            .ok_or_else(|| SheetsError::SheetNotFound(name.to_string()))
    }

    fn read_column(&self, range: &SourceRange) -> Result<Vec<String>> {
        let a1 = sheet_range(&range.sheet, &range.read_range());
        let url = self.values_url(&a1, None)?;
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .query(&[("majorDimension", "COLUMNS")])
            .send()?;
        let values: ValueRange = check(response)?.json()?;
        let column = values.values.into_iter().next().unwrap_or_default();
        debug!(range = %a1, cells = column.len(), "column fetched");
        Ok(column.into_iter().map(cell_to_string).collect())
    }

    fn clear_range(&self, sheet: &str, range: &str) -> Result<()> {
        let a1 = sheet_range(sheet, range);
        let url = self.values_url(&a1, Some(":clear"))?;
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({}))
            .send()?;
        check(response)?;
        debug!(range = %a1, "range cleared");
        Ok(())
    }

    fn write_rows(&self, sheet: &str, range: &str, rows: &[Vec<String>]) -> Result<()> {
        let a1 = sheet_range(sheet, range);
        let url = self.values_url(&a1, None)?;
        let body = serde_json::json!({
            "majorDimension": "ROWS",
            "values": rows,
        });
        let response = self
            .http
            .put(url)
            .bearer_auth(&self.access_token)
            .query(&[("valueInputOption", "RAW")])
            .json(&body)
            .send()?;
        check(response)?;
        debug!(range = %a1, rows = rows.len(), "rows written");
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<FileEntry>,
}

#[derive(Debug, Deserialize)]
struct FileEntry {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

fn lookup_workbook(http: &Client, access_token: &str, workbook: &str) -> Result<String> {
    let query = format!(
        "name = '{}' and mimeType = 'application/vnd.google-apps.spreadsheet' and trashed = false",
        workbook.replace('\'', "\\'")
    );
    let response = http
        .get(DRIVE_FILES_URL)
        .bearer_auth(access_token)
        .query(&[
            ("q", query.as_str()),
            ("fields", "files(id, name)"),
            ("pageSize", "10"),
        ])
        .send()?;
    let list: FileList = check(response)?.json()?;
    list.files
        .into_iter()
        .next()
        .map(|file| file.id)
        .ok_or_else(|| SheetsError::WorkbookNotFound(workbook.to_string()))
}

/// A1 sheet qualifier with gspread-style quoting: the name is always
/// wrapped in single quotes, embedded quotes doubled.
fn quote_sheet(name: &str) -> String {
    format!("'{}'", name.replace('\'', "''"))
}

fn sheet_range(sheet: &str, range: &str) -> String {
    format!("{}!{range}", quote_sheet(sheet))
}

fn cell_to_string(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

/// Maps non-2xx responses onto the error taxonomy: 401/403 are
/// authentication problems, everything else an API error carrying the
/// response body.
fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().unwrap_or_default();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(SheetsError::Auth(format!(
            "HTTP {}: {message}",
            status.as_u16()
        )));
    }
    Err(SheetsError::Api {
        status: status.as_u16(),
        message,
    })
}
