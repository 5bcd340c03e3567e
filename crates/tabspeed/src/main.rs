#![warn(missing_docs)]

//! Entry point for the `tabspeed` binary.

mod cli;
mod console;
mod error;
mod replay;
mod script;

use std::process;

use clap::Parser;
use config::Config;
use tracing::error;

use crate::{
    cli::{Cli, Commands},
    error::Result,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(err) = run().await {
        error!("{err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Parse CLI arguments, install logging, and dispatch to the chosen command.
async fn run() -> Result<()> {
    let Cli { log, command } = Cli::parse();
    logging::init(&log);

    match command {
        Commands::Replay(args) => replay::run(&args).await,
        Commands::Check { path } => {
            let cfg = config::load_from_path(&path)?;
            println!(
                "ok: {} keybinds, {} tab overrides, {} pins",
                cfg.keybinds.len(),
                cfg.tabs.len(),
                cfg.pins.len()
            );
            Ok(())
        }
        Commands::Defaults => {
            println!("{}", config::to_json_string(&Config::default())?);
            Ok(())
        }
    }
}
