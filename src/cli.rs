use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::load_config;
use crate::server;

/// CLI for repo2pdf: serve PDF renditions of repository documentation.
#[derive(Parser)]
#[clap(
    name = "repo2pdf",
    version,
    about = "Render the documentation of public GitHub repositories to PDF over HTTP"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Path to the YAML config file (defaults apply when omitted)
        #[clap(long)]
        config: Option<PathBuf>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main().
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve { config } => {
            let config = load_config(config.as_deref())?;
            server::serve(config).await
        }
    }
}
