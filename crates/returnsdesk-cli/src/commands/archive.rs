//! Archive command implementation.

use crate::config::DeskConfig;
use crate::prompt;
use returnsdesk_store::Confirmation;

pub fn run(config: &DeskConfig, threshold: usize, yes: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut records = config.open_records()?;

    // Only archiving everything asks first.
    let confirmation = if threshold == 0 {
        let count = records.snapshot().len();
        if count == 0 {
            println!("Nothing to archive");
            return Ok(());
        }
        let answer = prompt::confirm(&format!("Archive all {} active reports?", count), yes)?;
        if !answer.is_confirmed() {
            println!("Cancelled");
            return Ok(());
        }
        answer
    } else {
        Confirmation::Declined
    };

    let moved = records.auto_archive(threshold, confirmation)?;
    println!(
        "Archived {} reports ({} active, {} archived)",
        moved,
        records.snapshot().len(),
        records.archive().len()
    );
    Ok(())
}
