//! CareerBank CLI
//!
//! Command-line tools for the CareerBank record store.
//!
//! # Commands
//!
//! - `check` - Run the startup integrity pass (interactive on mismatch)
//! - `backup` - Snapshot a healthy store
//! - `restore` - Restore one collection from the most recent snapshot
//! - `show` / `add` / `remove` - Inspect and edit bank records

mod commands;
mod prompt;

use careerbank_core::{CollectionStore, SchemaRegistry, StorageRoot};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// CareerBank command-line record-store tools.
#[derive(Parser)]
#[command(name = "careerbank")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Storage root directory
    #[arg(global = true, short, long, default_value = ".")]
    root: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the startup integrity pass, prompting on mismatches
    Check,

    /// Snapshot a healthy store into BACKUPS/<timestamp>
    Backup,

    /// Restore one collection from the most recent snapshot
    Restore {
        /// Collection name (e.g. skills, projects, user_profile)
        collection: String,
    },

    /// Print the records of a collection
    Show {
        /// Collection name
        collection: String,
    },

    /// Append one record to a tabular collection
    Add {
        /// Collection name
        collection: String,

        /// Field values, one per schema column
        values: Vec<String>,
    },

    /// Remove records whose first field equals KEY
    Remove {
        /// Collection name
        collection: String,

        /// Value of the record's first field
        key: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let store = CollectionStore::new(StorageRoot::new(&cli.root), SchemaRegistry::new());

    match cli.command {
        Commands::Check => commands::check::run(&store)?,
        Commands::Backup => commands::backup::create(&store)?,
        Commands::Restore { collection } => commands::backup::restore(&store, &collection)?,
        Commands::Show { collection } => commands::bank::show(&store, &collection)?,
        Commands::Add { collection, values } => {
            commands::bank::add(&store, &collection, &values)?;
        }
        Commands::Remove { collection, key } => {
            commands::bank::remove(&store, &collection, &key)?;
        }
        Commands::Version => {
            println!("CareerBank CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("CareerBank Core v{}", careerbank_core::VERSION);
        }
    }

    Ok(())
}
