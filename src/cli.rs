// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::StoreBackend;

/// Command-line arguments for `pollwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pollwatch",
    version,
    about = "Poll directories for changed files and run commands on every change.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Pollwatch.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Pollwatch.toml")]
    pub config: String,

    /// Run a single pass over all targets, then exit.
    #[arg(long)]
    pub once: bool,

    /// Delay between passes (e.g. "10s", "500ms"); overrides `[config].interval`.
    #[arg(long, value_name = "DURATION")]
    pub interval: Option<String>,

    /// Snapshot store backend; overrides `[config].store`.
    #[arg(long, value_enum, value_name = "STORE")]
    pub store: Option<StoreBackend>,

    /// `.env` file holding the database settings.
    ///
    /// Default: `.env` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `POLLWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print targets, but don't touch the store or run
    /// any commands.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
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
