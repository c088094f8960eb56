//! Error types for store operations.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error while reading or writing a blob.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error while encoding a blob.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// A persisted blob could not be decoded.
    #[error("blob '{blob}' is corrupt: {source}")]
    Corrupt {
        /// Name of the blob that failed to decode.
        blob: String,
        /// Underlying decode error.
        source: serde_json::Error,
    },
    /// Blob name is not usable as a storage key.
    #[error("invalid blob name '{0}'")]
    InvalidKey(String),
}
