//! biblib
//!
//! Serves the library API and manages its configuration file.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;

use biblib_cli::BiblibConfig;
use biblib_cli::cli::{Args, Command};
use biblib_cli::config_handlers::handle_config_command;
use biblib_cli::logging::init_tracing;
use biblib_cli::serve::cmd_serve;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Serve { bind } => {
            let config = BiblibConfig::load(args.config.as_deref())?;
            init_tracing(&config.log)?;
            cmd_serve(&config, bind.as_deref()).await?;
        }
        Command::Config { action } => {
            handle_config_command(args.config.as_deref(), action)?;
        }
    }
    Ok(())
}
