//! Delete command implementation.

use crate::config::DeskConfig;

pub fn run(config: &DeskConfig, id: String) -> Result<(), Box<dyn std::error::Error>> {
    let mut records = config.open_records()?;
    if records.delete_report(&id)? {
        println!("Deleted {}", id);
    } else {
        println!("Report not found: {}", id);
    }
    Ok(())
}
