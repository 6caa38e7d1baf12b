// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::target::Target;
use crate::types::StoreBackend;

/// Configuration exactly as read from the TOML file.
///
/// ```toml
/// [config]
/// interval = "10s"
/// store = "postgres"
///
/// [[target]]
/// path = "./src"
/// commands = ["cargo build", "cargo test"]
/// exclude_regex = [".*\\.log$"]
/// include_regex = ["debug\\.log$"]
/// log = "pollwatch.log"
/// ```
///
/// Turn it into a [`ConfigFile`] with `ConfigFile::try_from`, which validates
/// every target and compiles its patterns.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    /// Global behaviour from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// All `[[target]]` entries, in file order.
    #[serde(default)]
    pub target: Vec<TargetConfig>,
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Delay after each full pass over all targets (e.g. `"10s"`).
    #[serde(default = "default_interval")]
    pub interval: String,

    /// Snapshot store backend.
    #[serde(default)]
    pub store: StoreBackend,
}

fn default_interval() -> String {
    "10s".to_string()
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            store: StoreBackend::default(),
        }
    }
}

/// One `[[target]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    /// Directory whose direct children are watched.
    pub path: String,

    /// Commands run, in order, when a file under `path` changes.
    #[serde(default)]
    pub commands: Vec<String>,

    /// Regexes removing matching filenames from the scan.
    #[serde(default, rename = "exclude_regex")]
    pub exclude: Vec<String>,

    /// Regexes re-admitting matching filenames, even when excluded.
    #[serde(default, rename = "include_regex")]
    pub include: Vec<String>,

    /// File receiving this target's diagnostic lines.
    pub log: String,
}

/// Validated configuration.
///
/// Only constructible through `TryFrom<RawConfigFile>` (see `validate.rs`) or
/// [`ConfigFile::new_unchecked`].
#[derive(Debug, Clone)]
pub struct ConfigFile {
    interval: Duration,
    store: StoreBackend,
    targets: Vec<Target>,
}

impl ConfigFile {
    pub fn new_unchecked(
        interval: Duration,
        store: StoreBackend,
        targets: Vec<Target>,
    ) -> Self {
        Self {
            interval,
            store,
            targets,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn store(&self) -> StoreBackend {
        self.store
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn into_targets(self) -> Vec<Target> {
        self.targets
    }
}
