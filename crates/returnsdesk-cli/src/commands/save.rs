//! Save command implementation.

use crate::config::DeskConfig;
use clap::Args;
use returnsdesk_model::{ReportDraft, ReportField};
use returnsdesk_store::Confirmation;

/// Field values for a save. Omitted flags keep the stored value on update.
#[derive(Args, Debug, Default)]
pub struct SaveArgs {
    /// Report ID (generated from the brand when omitted or unknown to the store)
    #[arg(long)]
    pub id: Option<String>,
    /// Order number
    #[arg(long)]
    pub order: Option<String>,
    /// Client or buyer
    #[arg(long)]
    pub client: Option<String>,
    /// Client e-mail
    #[arg(long)]
    pub email: Option<String>,
    /// Brand
    #[arg(long)]
    pub brand: Option<String>,
    /// Returned part
    #[arg(long)]
    pub part: Option<String>,
    /// Return reason
    #[arg(long)]
    pub reason: Option<String>,
    /// Status
    #[arg(long)]
    pub status: Option<String>,
    /// Internal comment
    #[arg(long)]
    pub comment: Option<String>,
}

impl SaveArgs {
    fn overrides(self) -> Vec<(ReportField, String)> {
        [
            (ReportField::OrderNumber, self.order),
            (ReportField::Client, self.client),
            (ReportField::ClientEmail, self.email),
            (ReportField::Brand, self.brand),
            (ReportField::Part, self.part),
            (ReportField::Reason, self.reason),
            (ReportField::Status, self.status),
            (ReportField::Comment, self.comment),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect()
    }
}

pub fn run(config: &DeskConfig, mut args: SaveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut records = config.open_records()?;

    let id = args.id.take();
    let existing = id.as_deref().and_then(|id| records.find(id)).cloned();
    let updating = existing.is_some();
    let mut draft = match existing {
        Some(report) => ReportDraft::from(report),
        None => ReportDraft {
            id,
            ..Default::default()
        },
    };
    for (field, value) in args.overrides() {
        draft.fields.set(field, value);
    }

    let report = records.save_report(draft)?;
    println!(
        "{} {}",
        if updating { "Updated" } else { "Saved" },
        report.id
    );

    if let Some(threshold) = config.archive_threshold {
        let moved = records.auto_archive(threshold, Confirmation::Declined)?;
        if moved > 0 {
            println!("Archived {} reports", moved);
        }
    }
    Ok(())
}
