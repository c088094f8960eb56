//! Record store for return reports.
//!
//! This crate provides:
//! - `DurableStore` blob storage with file-backed and in-memory implementations
//! - `ActivityLog`, the timestamped append-only message sink
//! - `RecordStore`, which owns the active and archived report lists,
//!   generates identifiers, writes through on every mutation and notifies
//!   subscribers
//!
//! Blobs are JSON arrays named `reports`, `archiveReports` and `logs`, each
//! rewritten in full on every change.

#![deny(missing_docs)]

/// Activity log.
pub mod activity;
/// Durable blob storage backends.
pub mod durable;
/// Error types for store operations.
pub mod error;
/// Change notification.
pub mod notify;
/// Record store.
pub mod records;

pub use activity::{ActivityLog, ERROR_MARKER};
pub use durable::{
    load_list, store_list, DurableStore, FileStore, MemoryStore, ARCHIVE_BLOB, LOGS_BLOB,
    REPORTS_BLOB,
};
pub use error::StoreError;
pub use notify::{SubscriptionId, Subscribers};
pub use records::{RecordStore, SaveKind};

/// Answer to a confirmation-gated request.
///
/// Destructive operations accept an already-answered request; asking the
/// user is the caller's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// The user agreed.
    Confirmed,
    /// The user declined; the operation is a no-op.
    Declined,
}

impl Confirmation {
    /// Returns true for `Confirmed`.
    pub fn is_confirmed(self) -> bool {
        matches!(self, Confirmation::Confirmed)
    }
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Confirmation::Confirmed
        } else {
            Confirmation::Declined
        }
    }
}
