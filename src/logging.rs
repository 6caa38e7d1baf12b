// src/logging.rs

//! Logging for `pollwatch`.
//!
//! Two sinks:
//!
//! - Process logs go through `tracing` + `tracing-subscriber` to STDERR.
//!   Priority for determining the level:
//!   1. `--log-level` CLI flag (if provided)
//!   2. `POLLWATCH_LOG` environment variable (e.g. "info", "debug")
//!   3. default to `info`
//! - Each target has its own append-only text file ([`TargetLog`]) that
//!   receives tracked files, command output and failures.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use tracing::warn;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let level = match cli_level {
        Some(lvl) => level_from_log_level(lvl),
        None => std::env::var("POLLWATCH_LOG")
            .ok()
            .and_then(|s| parse_level_str(&s))
            .unwrap_or(tracing::Level::INFO),
    };

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}

/// Append-only diagnostic log of a single target.
///
/// The file is opened (and created if needed) for every write, so it can be
/// rotated or removed while the watcher runs. A failed write is reported via
/// `tracing` and otherwise ignored: losing a log line never stops the loop.
#[derive(Debug, Clone)]
pub struct TargetLog {
    path: PathBuf,
}

impl TargetLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append one line.
    pub fn line(&self, text: impl AsRef<str>) {
        let mut text = text.as_ref().to_string();
        if !text.ends_with('\n') {
            text.push('\n');
        }
        self.append(text.as_bytes());
    }

    /// Append captured process output verbatim. Empty output is skipped.
    pub fn output(&self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        self.append(bytes);
        if !bytes.ends_with(b"\n") {
            self.append(b"\n");
        }
    }

    fn append(&self, bytes: &[u8]) {
        let res = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(bytes));
        if let Err(e) = res {
            warn!(log = ?self.path, error = %e, "failed to write target log");
        }
    }
}
