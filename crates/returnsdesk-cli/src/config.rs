//! Resolved runtime configuration.

use crate::path;
use returnsdesk_exchange::DirectorySink;
use returnsdesk_model::SystemClock;
use returnsdesk_store::{FileStore, RecordStore};
use std::path::PathBuf;
use std::sync::Arc;

/// Application directory name under the platform data directory.
const APP_DIR: &str = "returnsdesk";
/// Used when the platform has no data directory.
const FALLBACK_DATA_DIR: &str = ".returnsdesk";

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeskConfig {
    /// Directory holding the durable blobs.
    pub data_dir: PathBuf,
    /// Directory receiving exported files.
    pub out_dir: PathBuf,
    /// Active-list size kept by the post-save/post-import auto-archive.
    pub archive_threshold: Option<usize>,
}

impl DeskConfig {
    /// Fills unset values with defaults.
    pub fn resolve(
        data_dir: Option<PathBuf>,
        out_dir: Option<PathBuf>,
        archive_threshold: Option<usize>,
    ) -> Self {
        Self {
            data_dir: data_dir.unwrap_or_else(default_data_dir),
            out_dir: out_dir.unwrap_or_else(|| PathBuf::from(".")),
            archive_threshold,
        }
    }

    /// Opens the record store kept in `data_dir`.
    pub fn open_records(&self) -> Result<RecordStore, Box<dyn std::error::Error>> {
        let backend = FileStore::open(&self.data_dir).map_err(|e| {
            format!(
                "Failed to open data directory: {}: {}",
                path::sanitize_path_for_error(&self.data_dir),
                e
            )
        })?;
        let records = RecordStore::open_default(Arc::new(backend), Arc::new(SystemClock))
            .map_err(|e| format!("Failed to load reports: {}", e))?;
        Ok(records)
    }

    /// Sink writing exports into `out_dir`.
    pub fn sink(&self) -> DirectorySink {
        DirectorySink::new(&self.out_dir)
    }
}

/// `<platform data dir>/returnsdesk`, or `./.returnsdesk` without one.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
}
