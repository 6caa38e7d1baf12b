// src/errors.rs

//! Crate-wide error type, severity classification and result alias.

use std::path::PathBuf;

use thiserror::Error;

/// How the caller should react to an error.
///
/// - `Fatal`: stop the process after logging the cause.
/// - `Recoverable`: log it and carry on with the next poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Fatal,
    Recoverable,
}

#[derive(Error, Debug)]
pub enum PollwatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Environment error: {0}")]
    EnvError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Cannot read directory {path:?}: {reason}")]
    DirectoryUnreadable { path: PathBuf, reason: String },

    #[error("Cannot read file {path:?}: {reason}")]
    FileUnreadable { path: PathBuf, reason: String },

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Incompatible database schema: {0}")]
    IncompatibleSchema(String),

    #[error("Command `{command}` failed: {reason}")]
    CommandFailed { command: String, reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PollwatchError {
    /// Classify the error.
    ///
    /// Only a failing command is recoverable; every other error means the
    /// watcher can no longer trust its view of the filesystem or the store.
    pub fn severity(&self) -> Severity {
        match self {
            PollwatchError::CommandFailed { .. } => Severity::Recoverable,
            _ => Severity::Fatal,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

pub type Result<T> = std::result::Result<T, PollwatchError>;
