// src/exec/backend.rs

//! Pluggable action runner abstraction.
//!
//! The watch loop talks to an `ActionRunner` instead of spawning processes
//! itself. Production uses [`ProcessActionRunner`]; tests can swap in a
//! runner that records invocations and returns scripted outcomes.

use async_trait::async_trait;

use crate::errors::Result;
use crate::logging::TargetLog;
use crate::target::Target;

use super::pipeline::run_pipeline;

/// Trait abstracting how a target's action pipeline is executed.
#[async_trait]
pub trait ActionRunner: Send {
    /// Run every command of `target` in order, stopping at the first failure.
    ///
    /// `filename` is the changed file that caused this run (for logging).
    ///
    /// A failing command must be reported as
    /// [`PollwatchError::CommandFailed`](crate::errors::PollwatchError::CommandFailed),
    /// which the watch loop treats as recoverable.
    async fn run_pipeline(
        &mut self,
        target: &Target,
        filename: &str,
        log: &TargetLog,
    ) -> Result<()>;
}

/// Real action runner used in production: spawns OS processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessActionRunner;

impl ProcessActionRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ActionRunner for ProcessActionRunner {
    async fn run_pipeline(
        &mut self,
        target: &Target,
        filename: &str,
        log: &TargetLog,
    ) -> Result<()> {
        run_pipeline(target, filename, log).await
    }
}
