use crate::field::ReportField;
use serde::{Deserialize, Serialize};

/// Free-text fields shared by reports and drafts.
///
/// All fields default to blank; nothing here is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportFields {
    /// Customer order number.
    pub order_number: String,
    /// Customer or buyer name.
    pub client: String,
    /// Customer e-mail address.
    pub client_email: String,
    /// Product brand.
    pub brand: String,
    /// Returned part or reference.
    pub part: String,
    /// Reason given for the return.
    pub reason: String,
    /// Processing status.
    pub status: String,
    /// Internal comment.
    pub comment: String,
}

impl ReportFields {
    /// Returns the value held for `field`, or `None` for `Id` and `Timestamp`
    /// which live on the enclosing record.
    pub fn get(&self, field: ReportField) -> Option<&str> {
        let value = match field {
            ReportField::OrderNumber => &self.order_number,
            ReportField::Client => &self.client,
            ReportField::ClientEmail => &self.client_email,
            ReportField::Brand => &self.brand,
            ReportField::Part => &self.part,
            ReportField::Reason => &self.reason,
            ReportField::Status => &self.status,
            ReportField::Comment => &self.comment,
            ReportField::Id | ReportField::Timestamp => return None,
        };
        Some(value.as_str())
    }

    /// Stores `value` under `field`. `Id` and `Timestamp` are ignored.
    pub fn set(&mut self, field: ReportField, value: String) {
        let slot = match field {
            ReportField::OrderNumber => &mut self.order_number,
            ReportField::Client => &mut self.client,
            ReportField::ClientEmail => &mut self.client_email,
            ReportField::Brand => &mut self.brand,
            ReportField::Part => &mut self.part,
            ReportField::Reason => &mut self.reason,
            ReportField::Status => &mut self.status,
            ReportField::Comment => &mut self.comment,
            ReportField::Id | ReportField::Timestamp => return,
        };
        *slot = value;
    }
}

/// A persisted return report.
///
/// Serializes to the flat camelCase object stored in the `reports` and
/// `archiveReports` blobs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Report {
    /// Unique identifier, immutable once assigned.
    pub id: String,
    /// Free-text fields.
    #[serde(flatten)]
    pub fields: ReportFields,
    /// Last-save time as `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
}

impl Report {
    /// Builds a report from a draft, replacing its id and timestamp.
    pub fn from_draft(draft: ReportDraft, id: String, timestamp: String) -> Self {
        Self {
            id,
            fields: draft.fields,
            timestamp,
        }
    }

    /// Returns the value for any field, including id and timestamp.
    pub fn value(&self, field: ReportField) -> &str {
        match field {
            ReportField::Id => &self.id,
            ReportField::Timestamp => &self.timestamp,
            other => self.fields.get(other).unwrap_or_default(),
        }
    }
}

/// Report data before id and timestamp normalization.
///
/// Used as the input to saves and as the output of tabular import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportDraft {
    /// Identifier; `None` or blank means "generate one on save".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Free-text fields.
    #[serde(flatten)]
    pub fields: ReportFields,
    /// Timestamp as supplied; always discarded by saves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ReportDraft {
    /// Returns the draft's id if it is present and not blank.
    pub fn resolved_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

impl From<Report> for ReportDraft {
    fn from(report: Report) -> Self {
        Self {
            id: Some(report.id),
            fields: report.fields,
            timestamp: Some(report.timestamp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_report_serializes_flat_camel_case() {
        let report = Report {
            id: "R-20240101-120000".into(),
            fields: ReportFields {
                order_number: "PO-1".into(),
                client_email: "a@b.c".into(),
                ..Default::default()
            },
            timestamp: "2024-01-01 12:00:00".into(),
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["id"], "R-20240101-120000");
        assert_eq!(value["orderNumber"], "PO-1");
        assert_eq!(value["clientEmail"], "a@b.c");
        assert_eq!(value["comment"], "");
        assert_eq!(value["timestamp"], "2024-01-01 12:00:00");
    }

    #[test]
    fn test_report_tolerates_missing_and_unknown_keys() {
        let report: Report = serde_json::from_value(json!({
            "id": "R-1",
            "client": "Acme",
            "legacy": true
        }))
        .unwrap();

        assert_eq!(report.id, "R-1");
        assert_eq!(report.fields.client, "Acme");
        assert_eq!(report.fields.brand, "");
        assert_eq!(report.timestamp, "");
    }

    #[test]
    fn test_resolved_id_ignores_blank() {
        let mut draft = ReportDraft::default();
        assert_eq!(draft.resolved_id(), None);
        draft.id = Some("   ".into());
        assert_eq!(draft.resolved_id(), None);
        draft.id = Some(" R-7 ".into());
        assert_eq!(draft.resolved_id(), Some("R-7"));
    }

    #[test]
    fn test_value_covers_every_field() {
        let mut report = Report {
            id: "R-1".into(),
            timestamp: "t".into(),
            ..Default::default()
        };
        for field in ReportField::ALL {
            report.fields.set(field, format!("{:?}", field));
        }
        assert_eq!(report.value(ReportField::Id), "R-1");
        assert_eq!(report.value(ReportField::Timestamp), "t");
        assert_eq!(report.value(ReportField::Brand), "Brand");
        assert_eq!(report.value(ReportField::Comment), "Comment");
    }
}
