//! CLI definitions for WebLens.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// WebLens CLI.
#[derive(Parser)]
#[command(name = "weblens")]
#[command(about = "DOM snapshot tracker: stores page captures and diffs them")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the API server in foreground (default)
    Run(RunArgs),

    /// Diff two files line by line, the way snapshots are diffed
    Diff {
        /// Older version
        older: PathBuf,

        /// Newer version
        newer: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = DiffFormat::Text)]
        format: DiffFormat,
    },

    /// Load and validate the configuration file
    CheckConfig,
}

/// Overrides applied on top of the configuration file.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct RunArgs {
    /// Server host
    #[arg(long)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// SQLite database file
    #[arg(long, conflicts_with = "in_memory")]
    pub db: Option<PathBuf>,

    /// Keep everything in memory; nothing survives a restart
    #[arg(long)]
    pub in_memory: bool,
}

impl RunArgs {
    /// Arguments used when no subcommand is given.
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT").ok().and_then(|p| p.parse().ok()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum DiffFormat {
    /// `+`/`-`/` ` prefixed lines
    Text,
    /// Chunks and stats as JSON
    Json,
}
