// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! The launcher is meant to be invoked with no arguments at all; every flag
//! here is optional and only touches the ambient layer (config location,
//! logging, dry-run). Relay behaviour is the same with or without them.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `scriptrelay`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "scriptrelay",
    version,
    about = "Start a script next to this binary, relay signals to it and exit with its status.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to a launcher config file (TOML).
    ///
    /// Default: `scriptrelay.toml` in the launcher's installation directory,
    /// used only if it exists.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SCRIPTRELAY_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve the command and environment, print them, but don't spawn.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
