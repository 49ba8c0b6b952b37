use mailharvest_core::SourceRange;

use crate::Result;

/// The workbook operations the harvest pipeline needs. One implementation
/// talks to Google Sheets; tests drive the pipeline through an in-memory
/// fake.
pub trait Spreadsheet {
    /// Resolves a worksheet by name and returns its display title.
    fn sheet_title(&self, name: &str) -> Result<String>;

    /// Reads a column's cell values from the configured start row to the
    /// end of the data. Trailing empty cells are not included.
    fn read_column(&self, range: &SourceRange) -> Result<Vec<String>>;

    /// Clears an A1 range (e.g. `A2:A`) on the named worksheet.
    fn clear_range(&self, sheet: &str, range: &str) -> Result<()>;

    /// Writes row-major values into an A1 range on the named worksheet.
    fn write_rows(&self, sheet: &str, range: &str, rows: &[Vec<String>]) -> Result<()>;
}
