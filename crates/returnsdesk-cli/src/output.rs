//! Output formatting utilities.

use returnsdesk_model::Report;

/// Formats a report as one line of JSON.
pub fn format_json(report: &Report) -> String {
    serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a report as a simple table row.
pub fn format_table_row(report: &Report) -> String {
    format!(
        "{:<34} {:<19} {:<24} {:<14} {}",
        truncate(&report.id, 34),
        report.timestamp,
        truncate(&report.fields.client, 24),
        truncate(&report.fields.brand, 14),
        report.fields.status
    )
}

/// Prints table header.
#[allow(clippy::print_literal)]
pub fn print_table_header() {
    println!(
        "{:<34} {:<19} {:<24} {:<14} {}",
        "ID", "TIMESTAMP", "CLIENT", "BRAND", "STATUS"
    );
    println!("{}", "-".repeat(100));
}

/// Shortens `s` to at most `max_len` characters, ending in `...` when cut.
/// Line breaks are flattened to spaces.
fn truncate(s: &str, max_len: usize) -> String {
    let flat = s.replace(['\r', '\n'], " ");
    if flat.chars().count() <= max_len {
        flat
    } else {
        let kept: String = flat.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
