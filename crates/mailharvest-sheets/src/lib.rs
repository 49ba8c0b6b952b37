pub mod auth;
pub mod error;
pub mod google;
pub mod pipeline;
pub mod spreadsheet;

pub use error::{Result, SheetsError};
pub use google::GoogleSheets;
pub use pipeline::{harvest, HarvestReport};
pub use spreadsheet::Spreadsheet;
