use mailharvest_core::{CellRef, EmailSet, SourceRange};
use tracing::debug;

use crate::error::Result;
use crate::spreadsheet::Spreadsheet;

/// What the operator sees at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestReport {
    pub written: usize,
    pub sheet_title: String,
}

/// The whole batch job: fetch every configured source column, extract and
/// union the addresses, clear the destination column from the anchor
/// down, write the sorted result sized exactly to the set.
///
/// Straight-line with no partial commit: a failure after the clear leaves
/// the destination empty and the operator re-runs.
pub fn harvest(
    workbook: &dyn Spreadsheet,
    sources: &[SourceRange],
    dest_sheet: &str,
    anchor: &CellRef,
) -> Result<HarvestReport> {
    let mut aggregate = EmailSet::new();
    for source in sources {
        let cells = workbook.read_column(source)?;
        debug!(
            sheet = %source.sheet,
            column = source.column,
            start_row = source.start_row,
            cells = cells.len(),
            "source range fetched"
        );
        aggregate.extend_from_cells(&cells);
    }
    debug!(addresses = aggregate.len(), "aggregate built");

    let sheet_title = workbook.sheet_title(dest_sheet)?;
    workbook.clear_range(dest_sheet, &anchor.clear_range())?;

    let rows = aggregate.into_sorted_rows();
    let written = rows.len();
    if !rows.is_empty() {
        workbook.write_rows(dest_sheet, &anchor.write_range(written), &rows)?;
    }

    Ok(HarvestReport {
        written,
        sheet_title,
    })
}
