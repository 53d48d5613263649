//! PavIDB CLI
//!
//! Command-line tools for managing a field-inspection store.
//!
//! # Commands
//!
//! - `status` - Show record and pending-sync counts
//! - `inspect` - Display store statistics and metadata
//! - `export` - Export the whole store to a backup document
//! - `import` - Import a backup document, resolving contract conflicts
//! - `push` - Mark all pending records as synced

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// PavIDB command-line store tools.
#[derive(Parser)]
#[command(name = "pavidb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the store directory
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show record and pending-sync counts
    Status,

    /// Display store statistics and metadata
    Inspect {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Export the whole store to a backup document
    Export {
        /// Output file (defaults to PAVINSPECT_BACKUP_<date>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import a backup document into the store
    Import {
        /// Backup file to import
        input: PathBuf,

        /// Resolve every contract conflict by replacing the local contract
        #[arg(long)]
        replace_all: bool,

        /// Abort instead of prompting when conflicts are found
        #[arg(long)]
        abort_on_conflict: bool,
    },

    /// Mark all pending records as synced
    Push,

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Status => {
            let path = cli.path.ok_or("Store path required for status")?;
            commands::status::run(&path)?;
        }
        Commands::Inspect { format } => {
            let path = cli.path.ok_or("Store path required for inspect")?;
            commands::inspect::run(&path, &format)?;
        }
        Commands::Export { output } => {
            let path = cli.path.ok_or("Store path required for export")?;
            commands::export::run(&path, output.as_deref())?;
        }
        Commands::Import {
            input,
            replace_all,
            abort_on_conflict,
        } => {
            let path = cli.path.ok_or("Store path required for import")?;
            commands::import::run(&path, &input, replace_all, abort_on_conflict)?;
        }
        Commands::Push => {
            let path = cli.path.ok_or("Store path required for push")?;
            commands::push::run(&path)?;
        }
        Commands::Version => {
            println!("PavIDB CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("PavIDB Core v{}", pavidb_core::VERSION);
        }
    }

    Ok(())
}
