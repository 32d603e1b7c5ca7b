//! OpenEvents data CLI
//!
//! Validates folders of YAML documents and builds data store snapshots.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use oetd::{load_folder, validate_folder, SchemaRegistry};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "oetdctl")]
#[command(about = "Load and validate OpenEvents data folders")]
struct Cli {
    /// Explain what is being done
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the items in a given folder
    Validate {
        /// Folder of YAML documents to validate
        folder: PathBuf,
    },

    /// Load a data folder into an in-memory store
    Load {
        /// Folder with locations/, organizers/, and events/ subdirectories
        folder: PathBuf,
        /// Write the loaded store as a JSON snapshot
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let registry = SchemaRegistry::compile()?;

    match cli.command {
        Commands::Validate { folder } => {
            let errors = validate_folder(&folder, &registry)?;
            if errors > 0 {
                std::process::exit(1);
            }
        }

        Commands::Load { folder, output } => {
            let store = load_folder(&folder, &registry)?;
            tracing::info!(
                locations = store.locations.len(),
                organizers = store.organizers.len(),
                events = store.events.len(),
                "data store loaded"
            );

            if let Some(path) = output {
                let snapshot = serde_json::to_string_pretty(&store)?;
                fs::write(&path, snapshot)?;
                tracing::info!(path = %path.display(), "snapshot written");
            }
        }
    }

    Ok(())
}
