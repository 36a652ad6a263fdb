//! `wip`: offline maintenance for the WIP tracker.
//!
//! Works directly on the data directory, so run it while `wipd` is
//! stopped (redb takes an exclusive lock on the file).

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::context::StoreArgs;

/// WIP tracker CLI.
#[derive(Parser, Debug)]
#[command(name = "wip", about = "Shop WIP tracker maintenance CLI")]
struct Cli {
    #[command(flatten)]
    store: StoreArgs,

    /// Output format: table or json.
    #[arg(long = "output", short = 'o', global = true, default_value = "table")]
    output: String,

    /// Enable debug logging (or set RUST_LOG).
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a case PDF and print the order draft. Nothing is saved.
    #[command(name = "parse-pdf")]
    ParsePdf {
        /// Path to the PDF.
        file: PathBuf,
        /// Print the extracted text instead of the parsed fields.
        #[arg(long)]
        text: bool,
    },

    /// List active orders that share an RO number.
    Duplicates,

    /// Keep the most recently updated order per RO and delete the rest.
    Dedupe {
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },

    /// List active orders whose status reads as completed.
    Completed,

    /// Archive every completed order.
    #[command(name = "archive-completed")]
    ArchiveCompleted {
        /// Archive month label, e.g. "October 2025" (default: this month).
        #[arg(long)]
        month: Option<String>,
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },

    /// List archived orders that share an RO number across months.
    #[command(name = "archive-duplicates")]
    ArchiveDuplicates,

    /// Keep the most recently created archive copy per RO and delete the rest.
    #[command(name = "dedupe-archives")]
    DedupeArchives {
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },

    /// Delete one archived order by id.
    #[command(name = "delete-archived")]
    DeleteArchived {
        id: String,
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },

    /// Load a WIP spreadsheet export (CSV) onto the board.
    #[command(name = "import-csv")]
    ImportCsv {
        /// Path to the CSV file.
        file: PathBuf,
        /// Load the rows straight into the archive instead.
        #[arg(long)]
        archive: bool,
        /// Archive month label for --archive (default: this month).
        #[arg(long, requires = "archive")]
        month: Option<String>,
    },

    /// Delete every active order. Archives and notes are kept.
    #[command(name = "clear-orders")]
    ClearOrders {
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },

    /// Archive shift notes older than yesterday (after the archive hour).
    #[command(name = "archive-notes")]
    ArchiveNotes,

    /// Show version.
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let json_output = cli.output == "json";

    match cli.command {
        Commands::ParsePdf { file, text } => {
            commands::pdf::parse(&file, text)?;
        }

        Commands::Duplicates => {
            let svc = cli.store.open()?;
            commands::orders::duplicates(&svc, json_output)?;
        }

        Commands::Dedupe { yes } => {
            if !yes && !commands::confirm("Delete duplicate orders?")? {
                println!("Cancelled.");
                return Ok(());
            }
            let svc = cli.store.open()?;
            commands::orders::dedupe(&svc, &cli.store.actor)?;
        }

        Commands::Completed => {
            let svc = cli.store.open()?;
            commands::orders::completed(&svc, json_output)?;
        }

        Commands::ArchiveCompleted { month, yes } => {
            if !yes && !commands::confirm("Archive all completed orders?")? {
                println!("Cancelled.");
                return Ok(());
            }
            let svc = cli.store.open()?;
            commands::orders::archive_completed(&svc, month.as_deref(), &cli.store.actor)?;
        }

        Commands::ArchiveDuplicates => {
            let svc = cli.store.open()?;
            commands::archives::duplicates(&svc, json_output)?;
        }

        Commands::DedupeArchives { yes } => {
            if !yes && !commands::confirm("Delete duplicate archived orders?")? {
                println!("Cancelled.");
                return Ok(());
            }
            let svc = cli.store.open()?;
            commands::archives::dedupe(&svc, &cli.store.actor)?;
        }

        Commands::DeleteArchived { id, yes } => {
            if !yes && !commands::confirm(&format!("Delete archived order {}?", id))? {
                println!("Cancelled.");
                return Ok(());
            }
            let svc = cli.store.open()?;
            commands::archives::delete(&svc, &id, &cli.store.actor)?;
        }

        Commands::ImportCsv { file, archive, month } => {
            let svc = cli.store.open()?;
            let outcome =
                commands::import::import_csv(&svc, &file, archive, month.as_deref(), &cli.store.actor)?;
            if json_output {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                commands::import::report(&outcome);
            }
        }

        Commands::ClearOrders { yes } => {
            if !yes && !commands::confirm("Delete ALL active orders?")? {
                println!("Cancelled.");
                return Ok(());
            }
            let svc = cli.store.open()?;
            commands::import::clear(&svc, &cli.store.actor)?;
        }

        Commands::ArchiveNotes => {
            let svc = cli.store.open()?;
            commands::notes::archive(&svc, &cli.store.actor)?;
        }

        Commands::Version => {
            println!("wip cli v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
