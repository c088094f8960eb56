//! New-id command implementation.

use crate::config::DeskConfig;

pub fn run(config: &DeskConfig, brand: String) -> Result<(), Box<dyn std::error::Error>> {
    let mut records = config.open_records()?;
    println!("{}", records.generate_id(&brand));
    Ok(())
}
