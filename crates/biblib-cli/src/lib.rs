//! # biblib-cli
//!
//! The `biblib` binary and the pieces it is built from:
//! - [`cli`]: clap argument definitions
//! - [`config`]: the TOML configuration file and its environment overrides
//! - [`config_handlers`]: `biblib config ...` subcommands
//! - [`logging`]: `tracing` subscriber setup
//! - [`serve`]: `biblib serve`

#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod config_handlers;
pub mod error;
pub mod logging;
pub mod serve;

pub use config::BiblibConfig;
pub use error::{Error, Result};
