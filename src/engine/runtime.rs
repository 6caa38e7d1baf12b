// src/engine/runtime.rs

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::errors::Result;
use crate::exec::ActionRunner;
use crate::fs::FileSystem;
use crate::logging::TargetLog;
use crate::store::SnapshotStore;
use crate::target::Target;
use crate::watch::{detect, scan_target};

use super::commit::commit_snapshot;
use super::core::{CycleStage, LoopCore};
use super::{FileOutcome, LoopOptions, PassReport, TargetReport};

/// Polls every target, runs its pipeline for each changed file and commits
/// snapshots on success.
///
/// The loop owns the snapshot store for its whole lifetime and closes it on
/// exit. Everything runs sequentially: targets in configuration order, files
/// in listing order, commands in configured order.
pub struct WatchLoop<S: SnapshotStore, R: ActionRunner> {
    targets: Vec<Target>,
    logs: Vec<TargetLog>,
    fs: Arc<dyn FileSystem>,
    store: S,
    runner: R,
    core: LoopCore,
    options: LoopOptions,
}

impl<S: SnapshotStore, R: ActionRunner> fmt::Debug for WatchLoop<S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchLoop")
            .field("targets", &self.targets.len())
            .field("core", &self.core)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<S: SnapshotStore, R: ActionRunner> WatchLoop<S, R> {
    pub fn new(
        targets: Vec<Target>,
        fs: Arc<dyn FileSystem>,
        store: S,
        runner: R,
        options: LoopOptions,
    ) -> Self {
        let logs = targets
            .iter()
            .map(|t| TargetLog::new(t.log_path()))
            .collect();
        Self {
            targets,
            logs,
            fs,
            store,
            runner,
            core: LoopCore::new(),
            options,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn core(&self) -> &LoopCore {
        &self.core
    }

    /// One full pass over all targets.
    ///
    /// Returns the first fatal error encountered; recoverable command
    /// failures are logged and reported in the [`PassReport`].
    pub async fn run_pass(&mut self) -> Result<PassReport> {
        let mut report = PassReport::default();
        for idx in 0..self.targets.len() {
            report.targets.push(self.process_target(idx).await?);
        }
        debug!(actions = report.actions_run(), "pass finished");
        Ok(report)
    }

    /// Run passes until `shutdown` resolves or a fatal error occurs.
    ///
    /// `shutdown` is only observed while sleeping between passes; a pass that
    /// has started always runs to completion. The store is closed before
    /// returning, on success and on error.
    pub async fn run_until<F>(mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        info!(
            targets = self.targets.len(),
            interval = ?self.options.interval,
            "watch loop started"
        );
        tokio::pin!(shutdown);

        let result = loop {
            if let Err(err) = self.run_pass().await {
                error!(error = %err, "fatal error; stopping watch loop");
                break Err(err);
            }

            if self.options.single_pass {
                info!("single pass complete");
                break Ok(());
            }

            tokio::select! {
                _ = tokio::time::sleep(self.options.interval) => {}
                _ = &mut shutdown => {
                    info!("shutdown requested");
                    break Ok(());
                }
            }
        };

        self.store.close().await;
        info!("watch loop exiting");
        result
    }

    /// Run passes forever (until a fatal error).
    pub async fn run(self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    async fn process_target(&mut self, idx: usize) -> Result<TargetReport> {
        let Self {
            targets,
            logs,
            fs,
            store,
            runner,
            core,
            ..
        } = self;
        let target = &targets[idx];
        let log = &logs[idx];
        let fs: &dyn FileSystem = &**fs;

        if core.stage() != CycleStage::Idle {
            core.advance(CycleStage::Idle);
        }

        log.line(format!("Tracking: {}", target.key()));
        core.advance(CycleStage::Scanning);
        let files = match scan_target(fs, target) {
            Ok(files) => files,
            Err(err) => {
                log.line(err.to_string());
                return Err(err);
            }
        };

        core.forget_untracked(target.key(), &files);

        let mut report = TargetReport {
            root: target.key().to_string(),
            tracked: files.clone(),
            outcomes: Vec::with_capacity(files.len()),
        };

        for filename in files {
            log.line(format!("File tracked: {filename}"));
            core.advance(CycleStage::Detecting);

            let observation = match detect(fs, &*store, target, &filename).await {
                Ok(obs) => obs,
                Err(err) => {
                    log.line(err.to_string());
                    return Err(err);
                }
            };

            if !observation.changed {
                report.outcomes.push((filename, FileOutcome::Unchanged));
                continue;
            }

            info!(
                root = %target.key(),
                file = %filename,
                first_seen = observation.first_seen,
                "change detected"
            );
            core.advance(CycleStage::Acting);

            if let Err(err) = runner.run_pipeline(target, &filename, log).await {
                if err.is_fatal() {
                    log.line(err.to_string());
                    return Err(err);
                }
                let streak = core.record_failure(target.key(), &filename);
                warn!(
                    root = %target.key(),
                    file = %filename,
                    consecutive_failures = streak,
                    error = %err,
                    "action pipeline failed; change will be retried next pass"
                );
                report
                    .outcomes
                    .push((filename, FileOutcome::ActionFailed(err.to_string())));
                continue;
            }

            core.advance(CycleStage::Committing);
            if let Err(err) = commit_snapshot(fs, &mut *store, target, &observation).await {
                log.line(err.to_string());
                return Err(err);
            }
            let previous_failures = core.record_success(target.key(), &filename);
            if previous_failures > 0 {
                info!(
                    root = %target.key(),
                    file = %filename,
                    previous_failures,
                    "change committed after earlier failures"
                );
            }
            log.line(format!("Committed: {filename}"));
            report.outcomes.push((filename, FileOutcome::Committed));
        }

        core.advance(CycleStage::Idle);
        Ok(report)
    }
}
