// src/target.rs

//! A single watch unit: a root directory, the commands to run when one of
//! its files changes, the filename rules and the log sink.

use std::path::{Path, PathBuf};

use crate::config::model::TargetConfig;
use crate::errors::Result;
use crate::watch::patterns::PatternRules;

#[derive(Debug, Clone)]
pub struct Target {
    /// Root path exactly as configured; used as the snapshot key.
    key: String,
    root: PathBuf,
    commands: Vec<String>,
    rules: PatternRules,
    log: PathBuf,
}

impl Target {
    pub fn new(
        root: impl Into<String>,
        commands: Vec<String>,
        rules: PatternRules,
        log: impl Into<PathBuf>,
    ) -> Self {
        let key = root.into();
        Self {
            root: PathBuf::from(&key),
            key,
            commands,
            rules,
            log: log.into(),
        }
    }

    /// Compile the patterns of a `[[target]]` entry.
    pub fn from_config(cfg: &TargetConfig) -> Result<Self> {
        let rules = PatternRules::compile(&cfg.exclude, &cfg.include)?;
        Ok(Self::new(
            cfg.path.clone(),
            cfg.commands.clone(),
            rules,
            cfg.log.clone(),
        ))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn rules(&self) -> &PatternRules {
        &self.rules
    }

    pub fn log_path(&self) -> &Path {
        &self.log
    }

    /// Full path of a file directly under the root.
    pub fn file_path(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }
}
