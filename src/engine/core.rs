// src/engine/core.rs

//! Pure bookkeeping for the watch loop.
//!
//! No IO, no Tokio: the current stage of the cycle and the number of
//! consecutive pipeline failures per file.

use std::collections::HashMap;
use std::fmt;

use tracing::trace;

/// Stage of the per-target cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleStage {
    #[default]
    Idle,
    Scanning,
    Detecting,
    Acting,
    Committing,
}

impl fmt::Display for CycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CycleStage::Idle => "idle",
            CycleStage::Scanning => "scanning",
            CycleStage::Detecting => "detecting",
            CycleStage::Acting => "acting",
            CycleStage::Committing => "committing",
        };
        f.write_str(name)
    }
}

impl CycleStage {
    /// Whether `next` may follow `self`.
    ///
    /// Returning to `Idle` is always allowed (end of target or abort).
    pub fn can_transition_to(self, next: CycleStage) -> bool {
        use CycleStage::*;
        match (self, next) {
            (_, Idle) => true,
            (Idle, Scanning) => true,
            (Scanning, Detecting) => true,
            (Detecting, Detecting | Acting) => true,
            (Acting, Committing | Detecting) => true,
            (Committing, Detecting) => true,
            _ => false,
        }
    }
}

type FileKey = (String, String);

#[derive(Debug, Default)]
pub struct LoopCore {
    stage: CycleStage,
    failures: HashMap<FileKey, u32>,
}

impl LoopCore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> CycleStage {
        self.stage
    }

    /// Move to `next`. Illegal transitions are a bug in the loop.
    pub fn advance(&mut self, next: CycleStage) {
        debug_assert!(
            self.stage.can_transition_to(next),
            "illegal cycle transition {} -> {}",
            self.stage,
            next
        );
        trace!(from = %self.stage, to = %next, "cycle stage");
        self.stage = next;
    }

    /// Count another failed pipeline for the file; returns the streak length.
    pub fn record_failure(&mut self, root: &str, filename: &str) -> u32 {
        let streak = self
            .failures
            .entry((root.to_string(), filename.to_string()))
            .or_insert(0);
        *streak += 1;
        *streak
    }

    /// Clear the failure streak after a commit; returns the previous streak.
    pub fn record_success(&mut self, root: &str, filename: &str) -> u32 {
        self.failures
            .remove(&(root.to_string(), filename.to_string()))
            .unwrap_or(0)
    }

    /// Drop the streaks of files under `root` that the latest scan no longer
    /// returned (deleted or now filtered out).
    pub fn forget_untracked(&mut self, root: &str, tracked: &[String]) {
        self.failures
            .retain(|(r, f), _| r != root || tracked.iter().any(|t| t == f));
    }

    pub fn failure_streak(&self, root: &str, filename: &str) -> u32 {
        self.failures
            .get(&(root.to_string(), filename.to_string()))
            .copied()
            .unwrap_or(0)
    }
}
