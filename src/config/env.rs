// src/config/env.rs

//! Database settings gathered from the environment.
//!
//! Variables are read after loading a `.env` file (the default one in the
//! working directory, or the one given with `--env-file`). A missing `.env`
//! file is not an error; a malformed one is.
//!
//! - `DATABASE_URL` wins when set.
//! - Otherwise `DB_HOST`, `DB_USER`, `DB_PASSWORD`, `DB_NAME` are required and
//!   `DB_PORT` defaults to 5432.
//! - `DB_SSLMODE` (e.g. `require`) overrides the default of no TLS.

use std::fmt;
use std::path::Path;

use sqlx::postgres::{PgConnectOptions, PgSslMode};
use tracing::debug;

use crate::errors::{PollwatchError, Result};

const DEFAULT_PORT: u16 = 5432;

/// Connection parameters for the snapshot database.
#[derive(Clone, PartialEq, Eq)]
pub enum DbSettings {
    Url(String),
    Parts {
        host: String,
        port: u16,
        user: String,
        password: String,
        database: String,
        ssl_mode: Option<String>,
    },
}

impl fmt::Debug for DbSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbSettings::Url(_) => f.debug_tuple("Url").field(&"<redacted>").finish(),
            DbSettings::Parts {
                host,
                port,
                user,
                database,
                ssl_mode,
                ..
            } => f
                .debug_struct("Parts")
                .field("host", host)
                .field("port", port)
                .field("user", user)
                .field("database", database)
                .field("ssl_mode", ssl_mode)
                .finish_non_exhaustive(),
        }
    }
}

impl DbSettings {
    /// Load `.env` (if present) and read the settings from the process
    /// environment.
    pub fn from_env(env_file: Option<&Path>) -> Result<Self> {
        let loaded = match env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true),
            None => dotenvy::dotenv().map(|_| true),
        }
        .or_else(|err| match err {
            dotenvy::Error::Io(_) => Ok(false),
            other => Err(PollwatchError::EnvError(other.to_string())),
        })?;
        debug!(env_file_loaded = loaded, "environment prepared");

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("DATABASE_URL") {
            return Ok(DbSettings::Url(url));
        }

        let require = |key: &str| {
            get(key).ok_or_else(|| {
                PollwatchError::EnvError(format!(
                    "{key} is not set (and DATABASE_URL is absent)"
                ))
            })
        };

        let port = match get("DB_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
                PollwatchError::EnvError(format!("DB_PORT '{raw}' is invalid: {e}"))
            })?,
            None => DEFAULT_PORT,
        };

        Ok(DbSettings::Parts {
            host: require("DB_HOST")?,
            port,
            user: require("DB_USER")?,
            password: require("DB_PASSWORD")?,
            database: require("DB_NAME")?,
            ssl_mode: get("DB_SSLMODE"),
        })
    }

    /// Translate into `sqlx` connect options.
    pub fn connect_options(&self) -> Result<PgConnectOptions> {
        match self {
            DbSettings::Url(url) => url.trim().parse::<PgConnectOptions>().map_err(|e| {
                PollwatchError::EnvError(format!("invalid DATABASE_URL: {e}"))
            }),
            DbSettings::Parts {
                host,
                port,
                user,
                password,
                database,
                ssl_mode,
            } => {
                let ssl_mode = match ssl_mode {
                    Some(mode) => mode.parse::<PgSslMode>().map_err(|e| {
                        PollwatchError::EnvError(format!("invalid DB_SSLMODE: {e}"))
                    })?,
                    None => PgSslMode::Disable,
                };
                Ok(PgConnectOptions::new()
                    .host(host)
                    .port(*port)
                    .username(user)
                    .password(password)
                    .database(database)
                    .ssl_mode(ssl_mode))
            }
        }
    }
}
