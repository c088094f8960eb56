//! Heuristic header mapping from tabular rows to report drafts.

use returnsdesk_model::{format_timestamp, Clock, ReportDraft, ReportField};
use std::collections::BTreeMap;

/// One tabular row keyed by header name.
pub type FieldMap = BTreeMap<String, String>;

/// Normalizes a header cell: outer quotes stripped, trimmed, lower-cased.
pub fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let unquoted = unquoted.strip_suffix('"').unwrap_or(unquoted);
    unquoted.trim().to_lowercase()
}

/// Resolves the value of `field` in `row`.
///
/// Candidates from the field's synonym list are tried in order, matching
/// header names case-insensitively; the first non-empty trimmed value wins.
pub fn resolve(row: &FieldMap, field: ReportField) -> Option<String> {
    field.synonyms().iter().find_map(|candidate| {
        row.iter()
            .filter(|(header, _)| normalize_header(header) == *candidate)
            .map(|(_, value)| value.trim())
            .find(|value| !value.is_empty())
            .map(str::to_string)
    })
}

/// Builds a draft from a row.
///
/// An unresolved id stays `None` so the record store generates one, seeded
/// with the resolved brand, when the draft is saved. An unresolved
/// timestamp is stamped with `clock`.
pub fn map_row_to_report(row: &FieldMap, clock: &dyn Clock) -> ReportDraft {
    let mut draft = ReportDraft::default();
    for field in ReportField::ALL {
        let value = resolve(row, field);
        match field {
            ReportField::Id => draft.id = value,
            ReportField::Timestamp => draft.timestamp = value,
            other => draft.fields.set(other, value.unwrap_or_default()),
        }
    }
    if draft.timestamp.is_none() {
        draft.timestamp = Some(format_timestamp(clock.now()));
    }
    draft
}
