use std::path::PathBuf;

use mailharvest_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid response body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("credentials file not found: {0}")]
    CredentialsNotFound(PathBuf),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("api error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("workbook not found: {0:?}")]
    WorkbookNotFound(String),
    #[error("worksheet not found: {0:?}")]
    SheetNotFound(String),
}

pub type Result<T> = std::result::Result<T, SheetsError>;
