// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{ConfigFile, RawConfigFile, TargetConfig};
use crate::errors::{PollwatchError, Result};
use crate::target::Target;
use crate::types::parse_duration;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = PollwatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        ensure_has_targets(&raw)?;
        let interval = validate_interval(&raw.config.interval)?;

        let mut targets = Vec::with_capacity(raw.target.len());
        for (idx, cfg) in raw.target.iter().enumerate() {
            validate_target(idx, cfg)?;
            targets.push(Target::from_config(cfg)?);
        }

        Ok(ConfigFile::new_unchecked(interval, raw.config.store, targets))
    }
}

fn ensure_has_targets(cfg: &RawConfigFile) -> Result<()> {
    if cfg.target.is_empty() {
        return Err(PollwatchError::ConfigError(
            "config must contain at least one [[target]] entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_interval(raw: &str) -> Result<Duration> {
    let interval = parse_duration(raw).map_err(|e| {
        PollwatchError::ConfigError(format!("[config].interval: {e}"))
    })?;
    if interval.is_zero() {
        return Err(PollwatchError::ConfigError(
            "[config].interval must be greater than zero".to_string(),
        ));
    }
    Ok(interval)
}

fn validate_target(idx: usize, cfg: &TargetConfig) -> Result<()> {
    if cfg.path.trim().is_empty() {
        return Err(PollwatchError::ConfigError(format!(
            "target #{idx} has an empty `path`"
        )));
    }
    if cfg.log.trim().is_empty() {
        return Err(PollwatchError::ConfigError(format!(
            "target '{}' has an empty `log`",
            cfg.path
        )));
    }
    if cfg.commands.is_empty() {
        return Err(PollwatchError::ConfigError(format!(
            "target '{}' must list at least one command",
            cfg.path
        )));
    }
    if let Some(pos) = cfg.commands.iter().position(|c| c.trim().is_empty()) {
        return Err(PollwatchError::ConfigError(format!(
            "target '{}' has a blank command at position {}",
            cfg.path, pos
        )));
    }
    Ok(())
}
