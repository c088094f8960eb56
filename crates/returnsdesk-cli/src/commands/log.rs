//! Log command implementation.

use crate::config::DeskConfig;
use crate::prompt;

pub fn run(config: &DeskConfig, clear: bool, yes: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut records = config.open_records()?;

    if clear {
        let confirmation = prompt::confirm("Clear the activity log?", yes)?;
        if !records.activity().clear(confirmation) {
            println!("Cancelled");
            return Ok(());
        }
    }

    for entry in records.activity_entries() {
        println!("{}", entry);
    }
    Ok(())
}
