use std::str::FromStr;

use crate::error::CoreError;

/// One configured harvest source: a worksheet, a 1-indexed column, and the
/// 1-indexed row the data starts at (rows above are headers).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRange {
    pub sheet: String,
    pub column: u32,
    pub start_row: u32,
}

impl SourceRange {
    /// Parses the `"sheet,column,row"` triple used in configuration.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
        let [sheet, column, start_row] = parts.as_slice() else {
            return Err(CoreError::SourceRangeShape(raw.to_string()));
        };
        if sheet.is_empty() {
            return Err(CoreError::EmptySheetName(raw.to_string()));
        }
        let column = parse_positive(column).ok_or_else(|| CoreError::InvalidColumn {
            value: raw.to_string(),
            token: column.to_string(),
        })?;
        let start_row = parse_positive(start_row).ok_or_else(|| CoreError::InvalidStartRow {
            value: raw.to_string(),
            token: start_row.to_string(),
        })?;
        Ok(Self {
            sheet: sheet.to_string(),
            column,
            start_row,
        })
    }

    /// Open-ended A1 range covering the column from the start row down,
    /// e.g. `B3:B`. The sheet qualifier is added by the transport.
    pub fn read_range(&self) -> String {
        let letters = column_letters(self.column);
        format!("{letters}{}:{letters}", self.start_row)
    }
}

impl FromStr for SourceRange {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

/// A single A1 cell reference such as `B3`, used as the destination
/// anchor. Column and row are both 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRef {
    pub column: u32,
    pub row: u32,
}

impl CellRef {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        let split = trimmed
            .find(|ch: char| ch.is_ascii_digit())
            .ok_or_else(|| CoreError::InvalidCellRef(raw.to_string()))?;
        let (letters, digits) = trimmed.split_at(split);
        if letters.is_empty() || !letters.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(CoreError::InvalidCellRef(raw.to_string()));
        }
        let row: u32 = digits
            .parse()
            .ok()
            .filter(|row| *row >= 1)
            .ok_or_else(|| CoreError::InvalidCellRef(raw.to_string()))?;
        let mut column: u32 = 0;
        for ch in letters.chars() {
            let digit = ch.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
            column = column
                .checked_mul(26)
                .and_then(|value| value.checked_add(digit))
                .ok_or_else(|| CoreError::InvalidCellRef(raw.to_string()))?;
        }
        Ok(Self { column, row })
    }

    pub fn a1(&self) -> String {
        format!("{}{}", column_letters(self.column), self.row)
    }

    /// Open-ended clear range from this anchor to the bottom of its
    /// column, e.g. `A2:A`. Clearing before writing guarantees stale rows
    /// from a previous larger run never survive.
    pub fn clear_range(&self) -> String {
        let letters = column_letters(self.column);
        format!("{}{}:{letters}", letters, self.row)
    }

    /// Write range sized to exactly `rows` single-cell rows starting at
    /// this anchor, e.g. `A2:A4` for three rows.
    pub fn write_range(&self, rows: usize) -> String {
        let letters = column_letters(self.column);
        let last = self.row as u64 + rows.saturating_sub(1) as u64;
        format!("{}{}:{letters}{last}", letters, self.row)
    }
}

impl FromStr for CellRef {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

/// 1-indexed column number to spreadsheet letters: 1 -> A, 26 -> Z,
/// 27 -> AA (bijective base 26).
pub fn column_letters(column: u32) -> String {
    let mut column = column;
    let mut letters = Vec::new();
    while column > 0 {
        let remainder = (column - 1) % 26;
        letters.push((b'A' + remainder as u8) as char);
        column = (column - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn parse_positive(token: &str) -> Option<u32> {
    token.parse::<u32>().ok().filter(|value| *value >= 1)
}

#[cfg(test)]
mod tests {
    use super::{column_letters, CellRef, SourceRange};
    use crate::error::CoreError;

    #[test]
    fn parses_source_range_triple() {
        let range = SourceRange::parse("Signups, 2, 3").expect("parse");
        assert_eq!(range.sheet, "Signups");
        assert_eq!(range.column, 2);
        assert_eq!(range.start_row, 3);
        assert_eq!(range.read_range(), "B3:B");
    }

    #[test]
    fn rejects_wrong_token_count() {
        let err = SourceRange::parse("Signups,2").unwrap_err();
        assert_eq!(err, CoreError::SourceRangeShape("Signups,2".to_string()));
        assert!(SourceRange::parse("a,1,2,3").is_err());
    }

    #[test]
    fn rejects_non_integer_column_and_row() {
        assert!(matches!(
            SourceRange::parse("Signups,two,3"),
            Err(CoreError::InvalidColumn { .. })
        ));
        assert!(matches!(
            SourceRange::parse("Signups,2,0"),
            Err(CoreError::InvalidStartRow { .. })
        ));
        assert!(matches!(
            SourceRange::parse(",2,3"),
            Err(CoreError::EmptySheetName(_))
        ));
    }

    #[test]
    fn parses_cell_refs() {
        let anchor = CellRef::parse("B3").expect("parse");
        assert_eq!(anchor, CellRef { column: 2, row: 3 });
        assert_eq!(anchor.a1(), "B3");
        let wide = CellRef::parse("aa10").expect("parse");
        assert_eq!(wide.column, 27);
    }

    #[test]
    fn rejects_malformed_cell_refs() {
        assert!(CellRef::parse("3B").is_err());
        assert!(CellRef::parse("B").is_err());
        assert!(CellRef::parse("12").is_err());
        assert!(CellRef::parse("B0").is_err());
        assert!(CellRef::parse("B-3").is_err());
    }

    #[test]
    fn builds_clear_and_write_ranges() {
        let anchor = CellRef::parse("A2").expect("parse");
        assert_eq!(anchor.clear_range(), "A2:A");
        assert_eq!(anchor.write_range(3), "A2:A4");
        assert_eq!(anchor.write_range(1), "A2:A2");
    }

    #[test]
    fn column_letters_round_the_alphabet() {
        assert_eq!(column_letters(1), "A");
        assert_eq!(column_letters(26), "Z");
        assert_eq!(column_letters(27), "AA");
        assert_eq!(column_letters(52), "AZ");
        assert_eq!(column_letters(703), "AAA");
    }
}
