//! Spreadsheet import.

use crate::error::ExchangeError;
use crate::mapping::{map_row_to_report, normalize_header, FieldMap};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use returnsdesk_model::{Clock, ReportDraft};
use std::io::Cursor;

/// Reads the first worksheet of a workbook into header-keyed rows.
///
/// The first row is the header row. Rows whose cells are all blank are
/// skipped; missing cells read as blank.
pub fn read_workbook_rows(bytes: &[u8]) -> Result<Vec<FieldMap>, ExchangeError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| ExchangeError::Spreadsheet(format!("failed to open workbook: {}", e)))?;

    let first = match workbook.sheet_names().first() {
        Some(name) => name.clone(),
        None => return Ok(Vec::new()),
    };
    let range = workbook.worksheet_range(&first).map_err(|e| {
        ExchangeError::Spreadsheet(format!("failed to read sheet '{}': {}", first, e))
    })?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(cells) => cells
            .iter()
            .map(|cell| normalize_header(&cell_text(cell)))
            .collect(),
        None => return Ok(Vec::new()),
    };

    Ok(rows
        .map(|cells| cells.iter().map(cell_text).collect::<Vec<_>>())
        .filter(|values| values.iter().any(|v| !v.is_empty()))
        .map(|values| {
            headers
                .iter()
                .enumerate()
                .filter(|(_, header)| !header.is_empty())
                .map(|(idx, header)| (header.clone(), values.get(idx).cloned().unwrap_or_default()))
                .collect()
        })
        .collect())
}

/// Parses a workbook into report drafts.
pub fn parse_workbook(bytes: &[u8], clock: &dyn Clock) -> Result<Vec<ReportDraft>, ExchangeError> {
    Ok(read_workbook_rows(bytes)?
        .iter()
        .map(|row| map_row_to_report(row, clock))
        .collect())
}

/// Renders a cell as trimmed text. Integral numbers print without a fraction.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string().trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::String("  Bosch ".into())), "Bosch");
        assert_eq!(cell_text(&Data::Float(12345.0)), "12345");
        assert_eq!(cell_text(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_text(&Data::Int(7)), "7");
    }

    #[test]
    fn test_garbage_is_spreadsheet_error() {
        let err = read_workbook_rows(b"definitely not a workbook").unwrap_err();
        assert!(matches!(err, ExchangeError::Spreadsheet(_)));
    }
}
