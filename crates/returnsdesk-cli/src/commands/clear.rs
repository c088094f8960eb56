//! Clear command implementation.

use crate::config::DeskConfig;
use crate::prompt;

pub fn run(config: &DeskConfig, yes: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut records = config.open_records()?;
    let count = records.snapshot().len();
    let confirmation = prompt::confirm(
        &format!("Delete all {} active reports?", count),
        yes,
    )?;

    if records.clear_all(confirmation)? {
        println!("Deleted {} reports", count);
    } else {
        println!("Cancelled");
    }
    Ok(())
}
