use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use pollwatch::errors::{PollwatchError, Result};
use pollwatch::exec::ActionRunner;
use pollwatch::logging::TargetLog;
use pollwatch::target::Target;

/// A fake action runner that:
/// - records which (target root, file) pairs triggered a pipeline
/// - succeeds or fails depending on a shared switch, without spawning
///   anything.
///
/// Clones share state, so a test can keep a clone to inspect calls or flip
/// the outcome after handing the runner to the watch loop.
#[derive(Clone, Default)]
pub struct FakeActionRunner {
    calls: Arc<Mutex<Vec<(String, String)>>>,
    failing: Arc<Mutex<bool>>,
}

impl FakeActionRunner {
    pub fn succeeding() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let runner = Self::default();
        runner.set_failing(true);
        runner
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ActionRunner for FakeActionRunner {
    async fn run_pipeline(
        &mut self,
        target: &Target,
        filename: &str,
        log: &TargetLog,
    ) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((target.key().to_string(), filename.to_string()));

        let failing = *self.failing.lock().unwrap();
        if failing {
            log.line(format!("fake pipeline failed for {filename}"));
            return Err(PollwatchError::CommandFailed {
                command: "fake".to_string(),
                reason: "exit status 1".to_string(),
            });
        }
        log.line(format!("fake pipeline ok for {filename}"));
        Ok(())
    }
}
