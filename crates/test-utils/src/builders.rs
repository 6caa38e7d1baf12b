#![allow(dead_code)]

use std::path::Path;

use pollwatch::config::{ConfigFile, ConfigSection, RawConfigFile, TargetConfig};
use pollwatch::target::Target;
use pollwatch::types::StoreBackend;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                target: Vec::new(),
            },
        }
    }

    pub fn with_target(mut self, target: TargetConfig) -> Self {
        self.config.target.push(target);
        self
    }

    pub fn with_interval(mut self, interval: &str) -> Self {
        self.config.config.interval = interval.to_string();
        self
    }

    pub fn with_store(mut self, store: StoreBackend) -> Self {
        self.config.config.store = store;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TargetConfig`.
pub struct TargetConfigBuilder {
    target: TargetConfig,
}

impl TargetConfigBuilder {
    /// A target rooted at `path` logging to `<path>.log` next to it.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let log = path.with_extension("log");
        Self {
            target: TargetConfig {
                path: path.to_string_lossy().into_owned(),
                commands: vec![],
                exclude: vec![],
                include: vec![],
                log: log.to_string_lossy().into_owned(),
            },
        }
    }

    pub fn command(mut self, cmd: &str) -> Self {
        self.target.commands.push(cmd.to_string());
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.target.exclude.push(pattern.to_string());
        self
    }

    pub fn include(mut self, pattern: &str) -> Self {
        self.target.include.push(pattern.to_string());
        self
    }

    pub fn log(mut self, path: impl AsRef<Path>) -> Self {
        self.target.log = path.as_ref().to_string_lossy().into_owned();
        self
    }

    pub fn build(self) -> TargetConfig {
        self.target
    }

    /// Compile straight into a `Target`.
    pub fn target(self) -> Target {
        Target::from_config(&self.target).expect("Failed to compile target from builder")
    }
}
