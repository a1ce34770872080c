//! Rawdrop CLI - watch a folder and convert camera raw files to JPEGs.
//!
//! New raw files under the watched root are decoded, fitted into a square
//! box, contrast-enhanced and saved as JPEG with their EXIF data intact.
//!
//! # Usage
//!
//! ```bash
//! # Watch a folder, writing JPEGs into a `jpg/` subfolder
//! rawdrop watch ~/Pictures/import --subfolder jpg
//!
//! # Convert everything once and exit
//! rawdrop watch ~/Pictures/import --run-once --overwrite always
//!
//! # Convert a single file
//! rawdrop convert DSC_0870.NEF --box-size 2560
//!
//! # View configuration
//! rawdrop config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// Rawdrop - watch a folder and convert camera raw files to enhanced JPEGs.
#[derive(Parser, Debug)]
#[command(name = "rawdrop")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Read configuration from this file instead of the default location
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Watch a directory and convert new raw files as they appear
    Watch(cli::watch::WatchArgs),

    /// Convert a single raw file
    Convert(cli::convert::ConvertArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match &cli.config {
        Some(path) => rawdrop_core::Config::load_from(path)?,
        None => match rawdrop_core::Config::load() {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Warning: Failed to load config: {e}\n  \
                     Using default configuration. Check your config file with `rawdrop config path`."
                );
                rawdrop_core::Config::default()
            }
        },
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Rawdrop v{}", rawdrop_core::VERSION);

    match cli.command {
        Commands::Watch(args) => cli::watch::execute(args, config).await,
        Commands::Convert(args) => cli::convert::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, config).await,
    }
}
