//! File exchange for return reports.
//!
//! This crate provides:
//! - CSV export and CSV/XLSX import through a header-synonym mapping
//! - One-page-per-report client PDFs built with `lopdf`
//! - `FileSink` destinations for exported files
//! - `Exchange`, which runs imports and exports against a `RecordStore`
//!   and turns every failure into a logged, user-facing outcome

#![deny(missing_docs)]

/// CSV serialization and parsing.
pub mod csv;
/// PDF rendering.
pub mod document;
/// Error types for exchange operations.
pub mod error;
/// Header-synonym row mapping.
pub mod mapping;
/// Import/export orchestration.
pub mod orchestrator;
/// Export destinations.
pub mod sink;
/// Spreadsheet import.
pub mod workbook;

pub use csv::{decode_text, detect_delimiter, parse_csv, read_rows, to_csv, CSV_EXPORT_FILE};
pub use document::{document_file_name, DocumentRenderer, RenderedDocument};
pub use error::ExchangeError;
pub use mapping::{map_row_to_report, normalize_header, resolve, FieldMap};
pub use orchestrator::{Exchange, ExportOutcome, ImportFormat, ImportOutcome};
pub use sink::{DirectorySink, FileSink, MemorySink};
pub use workbook::{parse_workbook, read_workbook_rows};
