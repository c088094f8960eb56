//! Data model primitives for return reports.
//!
//! This crate provides:
//! - `Report` / `ReportDraft` records as they are persisted and exchanged
//! - The ordered header-synonym table used by tabular import
//! - A `Clock` abstraction with a system and a fixed implementation
//! - Identifier generation (`R-{YYYYMMDD}-{HHMMSS}[-{brandSlug}]`)
//!
//! Nothing here performs I/O; persistence lives in `returnsdesk-store` and
//! file formats live in `returnsdesk-exchange`.

#![deny(missing_docs)]

/// Clock abstraction and timestamp formatting.
pub mod clock;
/// Report field enumeration and header synonyms.
pub mod field;
/// Identifier generation.
pub mod id;
/// Report and draft records.
pub mod report;

pub use clock::{format_timestamp, Clock, FixedClock, SystemClock, TIMESTAMP_FORMAT};
pub use field::ReportField;
pub use id::{brand_slug, IdGenerator, MAX_ID_ATTEMPTS};
pub use report::{Report, ReportDraft, ReportFields};
