//! Error types for import, export and rendering.

use returnsdesk_store::StoreError;
use thiserror::Error;

/// Errors that can occur while exchanging reports with files.
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// I/O error while reading input or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The record store rejected a save.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    /// CSV input could not be tokenized.
    #[error("malformed CSV at line {line}: {reason}")]
    Malformed {
        /// 1-based line where the offending record starts.
        line: usize,
        /// What went wrong.
        reason: String,
    },
    /// Spreadsheet input could not be opened or read.
    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),
    /// PDF construction failed.
    #[error("PDF error: {0}")]
    Pdf(String),
    /// A document was requested for zero reports.
    #[error("no reports to render")]
    NothingToRender,
    /// Output file name is not a plain file name.
    #[error("invalid output file name '{0}'")]
    InvalidFileName(String),
}
