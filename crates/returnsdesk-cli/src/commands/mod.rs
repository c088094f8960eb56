//! Command implementations.

use thiserror::Error;

pub mod archive;
pub mod clear;
pub mod delete;
pub mod export_csv;
pub mod import;
pub mod list;
pub mod log;
pub mod new_id;
pub mod pdf;
pub mod save;

/// An import or export that ran but did not complete.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct OperationFailed(pub String);
