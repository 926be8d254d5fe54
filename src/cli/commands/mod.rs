//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod import;
mod init;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{Config, Settings};

#[derive(Parser)]
#[command(name = "review-insight")]
#[command(about = "Tourist attraction reviews with sentiment statistics")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Create the review table
    Init,

    /// Start the HTTP API server
    Serve {
        /// Address to bind to: PORT, HOST, or HOST:PORT (default: 0.0.0.0:8080)
        bind: Option<String>,

        /// Skip creating the review table on startup
        #[arg(long)]
        no_init: bool,
    },

    /// Import reviews from a JSON array or JSON Lines file
    Import {
        /// File to import (e.g. a mongoexport dump)
        file: PathBuf,
    },
}

/// Load settings from the given config file, or from discovery when none is given.
async fn load_settings(config_path: Option<&PathBuf>) -> anyhow::Result<Settings> {
    let config = match config_path {
        Some(path) => Config::load_from_path(path).await,
        None => Config::load().await,
    }
    .map_err(anyhow::Error::msg)?;

    if let Some(path) = &config.source_path {
        tracing::debug!("Loaded config from {}", path.display());
    }

    Ok(config.into_settings())
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_ref()).await?;

    match cli.command {
        Commands::Init => init::cmd_init(&settings).await,
        Commands::Serve { bind, no_init } => {
            serve::cmd_serve(settings, bind.as_deref(), !no_init).await
        }
        Commands::Import { file } => import::cmd_import(&settings, &file).await,
    }
}
