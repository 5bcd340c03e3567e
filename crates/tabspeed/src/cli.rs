//! Command-line interface definitions for tabspeed.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use config::TabId;
use logging::LogArgs;

/// Command-line interface for the `tabspeed` binary.
#[derive(Parser, Debug)]
#[command(
    name = "tabspeed",
    about = "Drive the tabspeed engine from the command line",
    version
)]
pub struct Cli {
    /// Logging controls.
    #[command(flatten)]
    pub log: LogArgs,

    /// What to do.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a JSON step script against a simulated page.
    Replay(ReplayArgs),
    /// Load and validate a configuration file.
    Check {
        /// Configuration file (JSON).
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// Print the default configuration as JSON.
    Defaults,
}

/// Arguments for the `replay` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// Step script (JSON array of steps).
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Configuration file used as storage. Loaded at start and written after
    /// every key pass. Without it the configuration lives in memory.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Tab id the simulated browser reports.
    #[arg(long, default_value_t = 1)]
    pub tab: TabId,
}
