use std::cell::RefCell;
use std::collections::HashMap;

use mailharvest_core::{CellRef, SourceRange};
use mailharvest_sheets::error::{Result, SheetsError};
use mailharvest_sheets::{harvest, Spreadsheet};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Clear { sheet: String, range: String },
    Write { sheet: String, range: String, rows: Vec<Vec<String>> },
}

/// In-memory workbook: columns keyed by (sheet, column, start_row),
/// mutations recorded in order.
#[derive(Default)]
struct FakeWorkbook {
    columns: HashMap<(String, u32, u32), Vec<String>>,
    calls: RefCell<Vec<Call>>,
}

impl FakeWorkbook {
    fn with_column(mut self, sheet: &str, column: u32, start_row: u32, cells: &[&str]) -> Self {
        self.columns.insert(
            (sheet.to_string(), column, start_row),
            cells.iter().map(|cell| cell.to_string()).collect(),
        );
        self
    }
}

impl Spreadsheet for FakeWorkbook {
    fn sheet_title(&self, name: &str) -> Result<String> {
        if name == "Roster" {
            Ok(name.to_string())
        } else {
            Err(SheetsError::SheetNotFound(name.to_string()))
        }
    }

    fn read_column(&self, range: &SourceRange) -> Result<Vec<String>> {
        Ok(self
            .columns
            .get(&(range.sheet.clone(), range.column, range.start_row))
            .cloned()
            .unwrap_or_default())
    }

    fn clear_range(&self, sheet: &str, range: &str) -> Result<()> {
        self.calls.borrow_mut().push(Call::Clear {
            sheet: sheet.to_string(),
            range: range.to_string(),
        });
        Ok(())
    }

    fn write_rows(&self, sheet: &str, range: &str, rows: &[Vec<String>]) -> Result<()> {
        self.calls.borrow_mut().push(Call::Write {
            sheet: sheet.to_string(),
            range: range.to_string(),
            rows: rows.to_vec(),
        });
        Ok(())
    }
}

fn rows(addresses: &[&str]) -> Vec<Vec<String>> {
    addresses
        .iter()
        .map(|address| vec![address.to_string()])
        .collect()
}

#[test]
fn harvests_two_sources_into_sorted_unique_rows() {
    let workbook = FakeWorkbook::default()
        .with_column("A", 2, 3, &["p@q.com", "bad-entry", "P@Q.COM"])
        .with_column("B", 1, 2, &["r@s.net;t@u.org"]);
    let sources = vec![
        SourceRange::parse("A,2,3").expect("source"),
        SourceRange::parse("B,1,2").expect("source"),
    ];
    let anchor = CellRef::parse("A2").expect("anchor");

    let report = harvest(&workbook, &sources, "Roster", &anchor).expect("harvest");

    assert_eq!(report.written, 3);
    assert_eq!(report.sheet_title, "Roster");
    let calls = workbook.calls.borrow();
    assert_eq!(
        *calls,
        vec![
            Call::Clear {
                sheet: "Roster".to_string(),
                range: "A2:A".to_string(),
            },
            Call::Write {
                sheet: "Roster".to_string(),
                range: "A2:A4".to_string(),
                rows: rows(&["p@q.com", "r@s.net", "t@u.org"]),
            },
        ]
    );
}

#[test]
fn clears_destination_before_writing() {
    let workbook = FakeWorkbook::default().with_column("A", 1, 1, &["x@y.com"]);
    let sources = vec![SourceRange::parse("A,1,1").expect("source")];
    let anchor = CellRef::parse("C5").expect("anchor");

    harvest(&workbook, &sources, "Roster", &anchor).expect("harvest");

    let calls = workbook.calls.borrow();
    assert!(matches!(calls[0], Call::Clear { .. }));
    assert!(matches!(calls[1], Call::Write { .. }));
}

#[test]
fn empty_aggregate_clears_but_writes_nothing() {
    let workbook = FakeWorkbook::default().with_column("A", 1, 1, &["not an email", ""]);
    let sources = vec![SourceRange::parse("A,1,1").expect("source")];
    let anchor = CellRef::parse("A2").expect("anchor");

    let report = harvest(&workbook, &sources, "Roster", &anchor).expect("harvest");

    assert_eq!(report.written, 0);
    let calls = workbook.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert!(matches!(calls[0], Call::Clear { .. }));
}

#[test]
fn missing_source_column_reads_as_empty() {
    let workbook = FakeWorkbook::default();
    let sources = vec![SourceRange::parse("Nowhere,1,1").expect("source")];
    let anchor = CellRef::parse("A1").expect("anchor");

    let report = harvest(&workbook, &sources, "Roster", &anchor).expect("harvest");
    assert_eq!(report.written, 0);
}

#[test]
fn missing_destination_sheet_aborts_before_clearing() {
    let workbook = FakeWorkbook::default().with_column("A", 1, 1, &["x@y.com"]);
    let sources = vec![SourceRange::parse("A,1,1").expect("source")];
    let anchor = CellRef::parse("A2").expect("anchor");

    let err = harvest(&workbook, &sources, "Missing", &anchor).unwrap_err();
    assert!(matches!(err, SheetsError::SheetNotFound(_)));
    assert!(workbook.calls.borrow().is_empty());
}

#[test]
fn rerun_against_unchanged_data_is_idempotent() {
    let workbook = FakeWorkbook::default()
        .with_column("A", 2, 3, &["p@q.com", "P@Q.COM"])
        .with_column("B", 1, 2, &["p@q.com, z@w.org"]);
    let sources = vec![
        SourceRange::parse("A,2,3").expect("source"),
        SourceRange::parse("B,1,2").expect("source"),
    ];
    let anchor = CellRef::parse("A2").expect("anchor");

    let first = harvest(&workbook, &sources, "Roster", &anchor).expect("harvest");
    let second = harvest(&workbook, &sources, "Roster", &anchor).expect("harvest");
    assert_eq!(first, second);
    assert_eq!(first.written, 2);
}
