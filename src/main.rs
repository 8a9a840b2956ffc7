//! WebLens - DOM snapshot tracker
//!
//! Main entry point for the WebLens CLI and API server.

mod cli;
mod cmd_config;
mod cmd_diff;
mod server;

use clap::Parser;

use crate::cli::{Cli, Commands, RunArgs};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Cli { config, command } = Cli::parse();

    match command.unwrap_or_else(|| Commands::Run(RunArgs::from_env())) {
        Commands::Run(args) => {
            server::init_tracing()?;
            let loaded = cmd_config::load(&config)?;
            if !config.exists() {
                tracing::info!("{} not found, using defaults", config.display());
            }
            server::run_server(loaded, args).await
        }
        Commands::Diff {
            older,
            newer,
            format,
        } => cmd_diff::run(&older, &newer, format).await,
        Commands::CheckConfig => cmd_config::run(&config),
    }
}
