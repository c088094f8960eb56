//! Import and export orchestration.
//!
//! [`Exchange`] drives the codecs and the renderer against a
//! [`RecordStore`] and a [`FileSink`]. None of its operations return an
//! error: every failure is logged to the activity log and reported as an
//! outcome carrying a one-line notice for the user.

use crate::csv::{decode_text, parse_csv, to_csv, BOM, CSV_EXPORT_FILE};
use crate::document::DocumentRenderer;
use crate::error::ExchangeError;
use crate::sink::FileSink;
use crate::workbook::parse_workbook;
use returnsdesk_model::{Report, ReportDraft};
use returnsdesk_store::{Confirmation, RecordStore, ERROR_MARKER};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Input format chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    /// `.csv` or `.txt`.
    Csv,
    /// Anything else, read as a workbook.
    Spreadsheet,
}

impl ImportFormat {
    /// Dispatches on the extension of `name`, case-insensitively.
    pub fn from_name(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("csv") | Some("txt") => ImportFormat::Csv,
            _ => ImportFormat::Spreadsheet,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ImportFormat::Csv => "CSV",
            ImportFormat::Spreadsheet => "XLSX",
        }
    }
}

/// Result of an import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Every parsed row was saved.
    Imported {
        /// Format the file was read as.
        format: ImportFormat,
        /// Rows saved.
        count: usize,
    },
    /// The CSV file held no non-blank line.
    Empty,
    /// Reading, parsing or saving failed.
    Failed {
        /// One-line message for the user.
        notice: String,
        /// Rows saved before the failure; they stay committed.
        saved: usize,
    },
}

impl fmt::Display for ImportOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportOutcome::Imported { format, count } => {
                write!(f, "{} import completed: {} reports", format.label(), count)
            }
            ImportOutcome::Empty => f.write_str("Empty CSV, nothing imported"),
            ImportOutcome::Failed { notice, .. } => f.write_str(notice),
        }
    }
}

/// Result of a CSV or PDF export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The file was delivered.
    Written {
        /// Name the file was delivered under.
        file_name: String,
        /// Where the sink put it.
        path: PathBuf,
    },
    /// There was nothing to export.
    Skipped {
        /// One-line message for the user.
        notice: String,
    },
    /// Rendering or delivery failed.
    Failed {
        /// One-line message for the user.
        notice: String,
    },
}

impl fmt::Display for ExportOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportOutcome::Written { path, .. } => write!(f, "Written {}", path.display()),
            ExportOutcome::Skipped { notice } | ExportOutcome::Failed { notice } => {
                f.write_str(notice)
            }
        }
    }
}

/// Moves reports between the record store and files.
pub struct Exchange<'a> {
    records: &'a mut RecordStore,
    sink: &'a mut dyn FileSink,
    archive_threshold: Option<usize>,
}

impl<'a> Exchange<'a> {
    /// Creates an orchestrator over `records`, delivering exports to `sink`.
    pub fn new(records: &'a mut RecordStore, sink: &'a mut dyn FileSink) -> Self {
        Self {
            records,
            sink,
            archive_threshold: None,
        }
    }

    /// Runs `auto_archive(threshold)` after each successful import.
    pub fn with_archive_threshold(mut self, threshold: Option<usize>) -> Self {
        self.archive_threshold = threshold;
        self
    }

    /// Imports the file at `path`.
    pub fn import_from_file<P: AsRef<Path>>(&mut self, path: P) -> ImportOutcome {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.records
            .activity()
            .add(format!("Import started: {}", name));

        match fs::read(path) {
            Ok(bytes) => self.import_loaded(&name, &bytes),
            Err(e) => self.import_failed(ImportFormat::from_name(&name), ExchangeError::Io(e), 0),
        }
    }

    /// Imports already-read file contents; `name` selects the format.
    pub fn import_bytes(&mut self, name: &str, bytes: &[u8]) -> ImportOutcome {
        self.records
            .activity()
            .add(format!("Import started: {}", name));
        self.import_loaded(name, bytes)
    }

    fn import_loaded(&mut self, name: &str, bytes: &[u8]) -> ImportOutcome {
        let format = ImportFormat::from_name(name);
        tracing::debug!(file = name, format = ?format, bytes = bytes.len(), "importing");
        let clock = self.records.clock();

        let parsed = match format {
            ImportFormat::Csv => {
                let text = decode_text(bytes);
                let body = text.strip_prefix(BOM).unwrap_or(text.as_ref());
                if body.trim().is_empty() {
                    self.records.activity().add("Empty CSV (import skipped)");
                    return ImportOutcome::Empty;
                }
                parse_csv(body, clock.as_ref())
            }
            ImportFormat::Spreadsheet => parse_workbook(bytes, clock.as_ref()),
        };
        let drafts = match parsed {
            Ok(drafts) => drafts,
            Err(e) => return self.import_failed(format, e, 0),
        };

        let count = match self.save_all(drafts) {
            Ok(count) => count,
            Err((e, saved)) => return self.import_failed(format, e, saved),
        };
        self.records.activity().add(format!(
            "{} import completed: {} reports.",
            format.label(),
            count
        ));

        if let Some(threshold) = self.archive_threshold {
            if let Err(e) = self.records.auto_archive(threshold, Confirmation::Declined) {
                self.records
                    .activity()
                    .add(format!("{} Auto-archive after import failed: {}", ERROR_MARKER, e));
            }
        }
        ImportOutcome::Imported { format, count }
    }

    /// Saves drafts one by one; earlier saves stay committed on failure.
    fn save_all(&mut self, drafts: Vec<ReportDraft>) -> Result<usize, (ExchangeError, usize)> {
        let mut saved = 0;
        for draft in drafts {
            self.records
                .save_report(draft)
                .map_err(|e| (ExchangeError::Store(e), saved))?;
            saved += 1;
        }
        Ok(saved)
    }

    fn import_failed(&mut self, format: ImportFormat, err: ExchangeError, saved: usize) -> ImportOutcome {
        self.records.activity().add(format!(
            "{} {} import failed: {}",
            ERROR_MARKER,
            format.label(),
            err
        ));
        ImportOutcome::Failed {
            notice: format!("Import failed, check the file format and data ({})", err),
            saved,
        }
    }

    /// Exports the active list as `reportes_devolucion.csv`.
    pub fn export_to_csv(&mut self) -> ExportOutcome {
        if self.records.snapshot().is_empty() {
            self.records
                .activity()
                .add("Export: no reports (output skipped)");
            return ExportOutcome::Skipped {
                notice: "No reports to export".to_string(),
            };
        }

        let csv = to_csv(self.records.snapshot());
        match self.sink.deliver(CSV_EXPORT_FILE, csv.as_bytes()) {
            Ok(path) => {
                self.records.activity().add("Reports exported to CSV");
                ExportOutcome::Written {
                    file_name: CSV_EXPORT_FILE.to_string(),
                    path,
                }
            }
            Err(e) => {
                self.records
                    .activity()
                    .add(format!("{} CSV export failed: {}", ERROR_MARKER, e));
                ExportOutcome::Failed {
                    notice: format!("Could not write the CSV file ({})", e),
                }
            }
        }
    }

    /// Renders `reports` into one client PDF, one page each, in order.
    pub fn generate_client_pdf(&mut self, reports: &[Report]) -> ExportOutcome {
        if reports.is_empty() {
            self.records
                .activity()
                .add("Client PDF skipped: no reports selected");
            return ExportOutcome::Skipped {
                notice: "No reports to export".to_string(),
            };
        }

        let renderer = DocumentRenderer::new(self.records.clock());
        let delivered = renderer.render(reports).and_then(|doc| {
            let path = self.sink.deliver(&doc.file_name, &doc.bytes)?;
            Ok((doc.file_name, path))
        });
        match delivered {
            Ok((file_name, path)) => {
                self.records.activity().add(format!(
                    "Client PDF exported ({}): {}",
                    reports.len(),
                    file_name
                ));
                ExportOutcome::Written { file_name, path }
            }
            Err(e) => {
                self.records
                    .activity()
                    .add(format!("{} Client PDF generation failed: {}", ERROR_MARKER, e));
                ExportOutcome::Failed {
                    notice: format!("Could not generate the PDF ({})", e),
                }
            }
        }
    }

    /// Renders the active report with `id`.
    pub fn export_selected_pdf(&mut self, id: &str) -> ExportOutcome {
        match self.records.find(id).cloned() {
            Some(report) => self.generate_client_pdf(&[report]),
            None => {
                self.records
                    .activity()
                    .add(format!("Client PDF skipped, report not found: {}", id));
                ExportOutcome::Skipped {
                    notice: format!("Report not found: {}", id),
                }
            }
        }
    }

    /// Renders every active report, oldest first.
    pub fn export_all_pdf(&mut self) -> ExportOutcome {
        let mut reports = self.records.snapshot().to_vec();
        reports.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        self.generate_client_pdf(&reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_dispatch() {
        assert_eq!(ImportFormat::from_name("a.csv"), ImportFormat::Csv);
        assert_eq!(ImportFormat::from_name("A.TXT"), ImportFormat::Csv);
        assert_eq!(ImportFormat::from_name("a.xlsx"), ImportFormat::Spreadsheet);
        assert_eq!(ImportFormat::from_name("a.ods"), ImportFormat::Spreadsheet);
        assert_eq!(ImportFormat::from_name("noext"), ImportFormat::Spreadsheet);
    }

    #[test]
    fn test_outcome_display() {
        let imported = ImportOutcome::Imported {
            format: ImportFormat::Csv,
            count: 2,
        };
        assert_eq!(imported.to_string(), "CSV import completed: 2 reports");
        let skipped = ExportOutcome::Skipped {
            notice: "No reports to export".into(),
        };
        assert_eq!(skipped.to_string(), "No reports to export");
    }
}
