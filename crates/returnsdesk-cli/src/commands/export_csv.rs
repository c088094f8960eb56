//! Export-csv command implementation.

use super::OperationFailed;
use crate::config::DeskConfig;
use returnsdesk_exchange::{Exchange, ExportOutcome};

pub fn run(config: &DeskConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut records = config.open_records()?;
    let mut sink = config.sink();
    let outcome = Exchange::new(&mut records, &mut sink).export_to_csv();
    report(outcome)
}

/// Prints a finished export; a failed one becomes the command's error.
pub(crate) fn report(outcome: ExportOutcome) -> Result<(), Box<dyn std::error::Error>> {
    match outcome {
        ExportOutcome::Failed { notice } => Err(OperationFailed(notice).into()),
        other => {
            println!("{}", other);
            Ok(())
        }
    }
}
