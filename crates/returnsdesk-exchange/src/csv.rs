//! CSV serialization and parsing.
//!
//! Export writes a BOM-prefixed, comma-separated table with the nine fixed
//! columns, every field double-quoted. Import detects `;` or `,` from the
//! first line, treats the first non-blank line as the header row and maps
//! every following line through the header-synonym table.

use crate::error::ExchangeError;
use crate::mapping::{map_row_to_report, normalize_header, FieldMap};
use encoding_rs::WINDOWS_1252;
use returnsdesk_model::{Clock, Report, ReportDraft, ReportField};
use std::borrow::Cow;

/// UTF-8 byte-order mark prefixed to exported CSV.
pub const BOM: char = '\u{feff}';

/// File name used for CSV export.
pub const CSV_EXPORT_FILE: &str = "reportes_devolucion.csv";

/// Serializes reports to CSV text.
pub fn to_csv(reports: &[Report]) -> String {
    let mut out = String::new();
    out.push(BOM);
    let header: Vec<&str> = ReportField::EXPORT_COLUMNS
        .iter()
        .map(|field| field.export_header())
        .collect();
    out.push_str(&header.join(","));
    out.push('\n');

    for report in reports {
        let row: Vec<String> = ReportField::EXPORT_COLUMNS
            .iter()
            .map(|&field| quote(report.value(field)))
            .collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Decodes CSV bytes: UTF-8 when valid, Windows-1252 otherwise.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            let (text, _, _) = WINDOWS_1252.decode(bytes);
            text
        }
    }
}

/// Picks the field delimiter from the first non-blank line.
///
/// `;` is chosen only when that line contains `;` and no `,`.
pub fn detect_delimiter(text: &str) -> char {
    let first = text
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or_default();
    if first.contains(';') && !first.contains(',') {
        ';'
    } else {
        ','
    }
}

/// Parses CSV text into header-keyed rows.
///
/// Header cells are normalized (trimmed, unquoted, lower-cased); data cells
/// are trimmed. Short rows yield blank values for the missing columns.
pub fn read_rows(text: &str) -> Result<Vec<FieldMap>, ExchangeError> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let delimiter = detect_delimiter(text);
    let mut records = split_records(text, delimiter)?.into_iter();

    let headers: Vec<String> = match records.next() {
        Some(cells) => cells.iter().map(|cell| normalize_header(cell)).collect(),
        None => return Ok(Vec::new()),
    };

    Ok(records
        .map(|cells| {
            headers
                .iter()
                .enumerate()
                .filter(|(_, header)| !header.is_empty())
                .map(|(idx, header)| (header.clone(), cells.get(idx).cloned().unwrap_or_default()))
                .collect()
        })
        .collect())
}

/// Parses CSV text into report drafts.
pub fn parse_csv(text: &str, clock: &dyn Clock) -> Result<Vec<ReportDraft>, ExchangeError> {
    Ok(read_rows(text)?
        .iter()
        .map(|row| map_row_to_report(row, clock))
        .collect())
}

/// Splits text into records of trimmed cells.
///
/// Records end at LF or CRLF outside double quotes. Inside quotes, the
/// delimiter and line breaks are literal and `""` is an escaped quote.
/// Lines holding only whitespace are dropped.
fn split_records(text: &str, delimiter: char) -> Result<Vec<Vec<String>>, ExchangeError> {
    let mut records = Vec::new();
    let mut cells: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut blank = true;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    cell.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    cell.push(c);
                }
                _ => cell.push(c),
            }
            continue;
        }

        match c {
            '"' if cell.trim().is_empty() => {
                cell.clear();
                in_quotes = true;
                blank = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                cells.push(std::mem::take(&mut cell));
                let finished = std::mem::take(&mut cells);
                if !blank {
                    records.push(trim_cells(finished));
                }
                blank = true;
                line += 1;
                record_line = line;
            }
            c if c == delimiter => {
                cells.push(std::mem::take(&mut cell));
                blank = false;
            }
            _ => {
                if !c.is_whitespace() {
                    blank = false;
                }
                cell.push(c);
            }
        }
    }

    if in_quotes {
        return Err(ExchangeError::Malformed {
            line: record_line,
            reason: "unterminated quoted field".to_string(),
        });
    }
    cells.push(cell);
    if !blank {
        records.push(trim_cells(cells));
    }
    Ok(records)
}

fn trim_cells(cells: Vec<String>) -> Vec<String> {
    cells.into_iter().map(|cell| cell.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use returnsdesk_model::{FixedClock, ReportFields};

    fn clock() -> FixedClock {
        FixedClock::new(
            NaiveDate::from_ymd_opt(2024, 4, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        )
    }

    fn report(id: &str, client: &str, comment: &str) -> Report {
        Report {
            id: id.to_string(),
            fields: ReportFields {
                client: client.to_string(),
                comment: comment.to_string(),
                ..Default::default()
            },
            timestamp: "2024-03-01 08:00:00".to_string(),
        }
    }

    #[test]
    fn test_to_csv_layout() {
        let csv = to_csv(&[report("R-1", "Ana \"La\" Pérez", "")]);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "\u{feff}ID Interno,Número de pedido,Cliente / Comprador,Marca,Pieza,Motivo de devolución,Estado,Comentario interno,Fecha"
        );
        assert_eq!(
            lines.next().unwrap(),
            r#""R-1","","Ana ""La"" Pérez","","","","","","2024-03-01 08:00:00""#
        );
        assert!(lines.next().is_none());
        assert!(csv.ends_with('\n'));
    }

    #[test]
    fn test_to_csv_empty_has_header_only() {
        assert_eq!(to_csv(&[]).lines().count(), 1);
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1,2;3"), ';');
        assert_eq!(detect_delimiter("a;b,c"), ',');
        assert_eq!(detect_delimiter("\n\n a,b"), ',');
        assert_eq!(detect_delimiter("single"), ',');
    }

    #[test]
    fn test_read_rows_semicolon_crlf_and_blank_lines() {
        let rows = read_rows("Cliente;Marca\r\n\r\n\"Acme\";Bosch\r\n   \r\nBeta\r\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["cliente"], "Acme");
        assert_eq!(rows[0]["marca"], "Bosch");
        assert_eq!(rows[1]["cliente"], "Beta");
        assert_eq!(rows[1]["marca"], "");
    }

    #[test]
    fn test_read_rows_quoted_delimiters_and_newlines() {
        let rows = read_rows("id,comment\n\"R-1\",\"a, b\nc \"\"d\"\"\"\n").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["comment"], "a, b\nc \"d\"");
    }

    #[test]
    fn test_read_rows_strips_bom_from_header() {
        let rows = read_rows("\u{feff}\"ID Interno\",Marca\n\"R-9\",X\n").unwrap();
        assert_eq!(rows[0]["id interno"], "R-9");
    }

    #[test]
    fn test_unterminated_quote_is_malformed() {
        let err = read_rows("id,comment\nR-1,ok\nR-2,\"broken\n").unwrap_err();
        match err {
            ExchangeError::Malformed { line, .. } => assert_eq!(line, 3),
            other => panic!("expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_csv_blank_id_cell() {
        let drafts = parse_csv("Id,Cliente,Marca\n,\"Acme\",\"Bosch\"\n", &clock()).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].id, None);
        assert_eq!(drafts[0].fields.client, "Acme");
        assert_eq!(drafts[0].fields.brand, "Bosch");
    }

    #[test]
    fn test_round_trip_keeps_canonical_columns() {
        let reports = vec![
            report("R-1", "Acme", "fragile, handle with \"care\""),
            report("R-2", "Beta", "line one\nline two"),
        ];
        let first = to_csv(&reports);
        let reparsed: Vec<Report> = parse_csv(&first, &clock())
            .unwrap()
            .into_iter()
            .map(|draft| {
                let id = draft.id.clone().unwrap_or_default();
                let timestamp = draft.timestamp.clone().unwrap_or_default();
                Report::from_draft(draft, id, timestamp)
            })
            .collect();
        assert_eq!(to_csv(&reparsed), first);
    }

    #[test]
    fn test_decode_text_falls_back_to_windows_1252() {
        let bytes = b"Motivo de devoluci\xf3n";
        assert_eq!(decode_text(bytes), "Motivo de devolución");
        assert_eq!(decode_text("ñ".as_bytes()), "ñ");
    }
}
