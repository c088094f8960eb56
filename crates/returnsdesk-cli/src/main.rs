//! Returnsdesk CLI - Command-line interface for recording, archiving and exchanging return reports.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod output;
mod path;
mod prompt;

use commands::{archive, clear, delete, export_csv, import, list, log, new_id, pdf, save};
use config::DeskConfig;

#[derive(Parser)]
#[command(name = "returnsdesk")]
#[command(about = "Return report record store with CSV/XLSX import, CSV export and PDF output")]
struct Cli {
    /// Directory holding the report, archive and log blobs
    #[arg(long, global = true, env = "RETURNSDESK_DATA_DIR")]
    data_dir: Option<PathBuf>,
    /// Directory receiving exported CSV and PDF files (default: current directory)
    #[arg(long, global = true, env = "RETURNSDESK_OUT_DIR")]
    out_dir: Option<PathBuf>,
    /// Keep at most N active reports, archiving the oldest after save and import
    #[arg(long, global = true, env = "RETURNSDESK_ARCHIVE_THRESHOLD")]
    archive_threshold: Option<usize>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List active (or archived) reports
    List {
        /// List the archive instead of the active reports
        #[arg(long)]
        archive: bool,
        /// Output one JSON object per line
        #[arg(long)]
        json: bool,
    },
    /// Print a freshly generated report ID
    NewId {
        /// Brand used as the ID suffix
        #[arg(long, default_value = "")]
        brand: String,
    },
    /// Create or update a report
    Save(save::SaveArgs),
    /// Delete an active report
    Delete {
        /// Report ID
        id: String,
    },
    /// Delete every active report
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Move the oldest reports to the archive
    Archive {
        /// Reports to keep active; 0 archives everything (default: 0)
        #[arg(long, default_value_t = 0)]
        threshold: usize,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Import reports from a CSV or spreadsheet file
    Import {
        /// Input file (.csv/.txt read as CSV, anything else as a workbook)
        file: PathBuf,
    },
    /// Export active reports to reportes_devolucion.csv
    ExportCsv,
    /// Render client PDFs
    Pdf {
        /// Report ID to render
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        id: Option<String>,
        /// Render every active report, oldest first
        #[arg(long)]
        all: bool,
    },
    /// Show or clear the activity log
    Log {
        /// Clear the log
        #[arg(long)]
        clear: bool,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .ok();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let config = DeskConfig::resolve(cli.data_dir, cli.out_dir, cli.archive_threshold);
    tracing::debug!(data_dir = %config.data_dir.display(), "configuration resolved");

    let result = match cli.command {
        Commands::List { archive, json } => list::run(&config, archive, json),
        Commands::NewId { brand } => new_id::run(&config, brand),
        Commands::Save(args) => save::run(&config, args),
        Commands::Delete { id } => delete::run(&config, id),
        Commands::Clear { yes } => clear::run(&config, yes),
        Commands::Archive { threshold, yes } => archive::run(&config, threshold, yes),
        Commands::Import { file } => import::run(&config, file),
        Commands::ExportCsv => export_csv::run(&config),
        Commands::Pdf { id, all } => pdf::run(&config, id, all),
        Commands::Log { clear, yes } => log::run(&config, clear, yes),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
