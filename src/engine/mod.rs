// src/engine/mod.rs

//! Orchestration engine for pollwatch.
//!
//! One pass walks every target in configuration order:
//!
//! `Idle -> Scanning -> Detecting -> Acting -> Committing -> Idle`
//!
//! For each changed file the whole command list of the target runs, and the
//! file's new content is committed only when every command succeeded. A
//! failed pipeline leaves the snapshot untouched, so the same change is seen
//! again on the next pass.
//!
//! The pure bookkeeping (stage transitions, failure streaks) lives in
//! [`core`]; the async/IO shell is implemented in [`runtime`].

use std::time::Duration;

pub mod commit;
pub mod core;
pub mod runtime;

pub use self::core::{CycleStage, LoopCore};
pub use commit::commit_snapshot;
pub use runtime::WatchLoop;

/// Runtime options for the watch loop.
#[derive(Debug, Clone, Copy)]
pub struct LoopOptions {
    /// Delay after each full pass over all targets.
    pub interval: Duration,
    /// Stop after the first pass (used for `--once`).
    pub single_pass: bool,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            single_pass: false,
        }
    }
}

/// What happened to one scanned file during a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Content equal to the latest snapshot; nothing ran.
    Unchanged,
    /// Pipeline succeeded and the new content was recorded.
    Committed,
    /// Pipeline failed; the snapshot was left as it was.
    ActionFailed(String),
}

/// Result of processing one target in one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetReport {
    pub root: String,
    /// Files that survived the scan, in listing order.
    pub tracked: Vec<String>,
    /// Outcome per tracked file, in processing order.
    pub outcomes: Vec<(String, FileOutcome)>,
}

impl TargetReport {
    pub fn outcome_of(&self, filename: &str) -> Option<&FileOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| name == filename)
            .map(|(_, outcome)| outcome)
    }

    pub fn committed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Committed))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::ActionFailed(_)))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Unchanged))
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Result of one full pass over all targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    pub targets: Vec<TargetReport>,
}

impl PassReport {
    pub fn target(&self, root: &str) -> Option<&TargetReport> {
        self.targets.iter().find(|t| t.root == root)
    }

    /// Number of action pipelines started during the pass.
    pub fn actions_run(&self) -> usize {
        self.targets.iter().map(|t| t.committed() + t.failed()).sum()
    }
}
