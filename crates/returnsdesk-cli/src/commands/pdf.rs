//! PDF command implementation.

use super::export_csv::report;
use crate::config::DeskConfig;
use returnsdesk_exchange::Exchange;

pub fn run(config: &DeskConfig, id: Option<String>, all: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut records = config.open_records()?;
    let mut sink = config.sink();
    let mut exchange = Exchange::new(&mut records, &mut sink);

    let outcome = match id {
        Some(id) if !all => exchange.export_selected_pdf(&id),
        _ => exchange.export_all_pdf(),
    };
    report(outcome)
}
