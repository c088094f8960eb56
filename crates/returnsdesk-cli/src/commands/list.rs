//! List command implementation.

use crate::config::DeskConfig;
use crate::output;

pub fn run(config: &DeskConfig, archive: bool, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let records = config.open_records()?;
    let reports = if archive {
        records.archive()
    } else {
        records.snapshot()
    };

    if json {
        for report in reports {
            println!("{}", output::format_json(report));
        }
        return Ok(());
    }

    output::print_table_header();
    for report in reports {
        println!("{}", output::format_table_row(report));
    }
    Ok(())
}
