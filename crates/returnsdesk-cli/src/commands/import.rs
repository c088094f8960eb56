//! Import command implementation.

use super::OperationFailed;
use crate::config::DeskConfig;
use crate::path;
use returnsdesk_exchange::{Exchange, ImportOutcome};
use std::path::PathBuf;

pub fn run(config: &DeskConfig, file: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mut records = config.open_records()?;
    let mut sink = config.sink();
    let outcome = Exchange::new(&mut records, &mut sink)
        .with_archive_threshold(config.archive_threshold)
        .import_from_file(&file);

    match outcome {
        ImportOutcome::Failed { notice, saved } => Err(OperationFailed(format!(
            "{}: {} ({} reports saved before the failure)",
            path::sanitize_path_for_error(&file),
            notice,
            saved
        ))
        .into()),
        other => {
            println!("{}", other);
            Ok(())
        }
    }
}
