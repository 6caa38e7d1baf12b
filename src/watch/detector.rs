// src/watch/detector.rs

use tracing::debug;

use crate::errors::{PollwatchError, Result};
use crate::fs::FileSystem;
use crate::store::SnapshotStore;
use crate::target::Target;

/// What the detector saw for one file in one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub filename: String,
    /// Content read from disk during detection. This exact content is what
    /// gets committed if the action pipeline succeeds.
    pub content: Vec<u8>,
    /// No snapshot existed for this file before.
    pub first_seen: bool,
    pub changed: bool,
}

/// Exact byte comparison against the latest snapshot.
///
/// A file without any snapshot always counts as changed, even when empty.
pub fn content_differs(recorded: Option<&[u8]>, current: &[u8]) -> bool {
    match recorded {
        Some(recorded) => recorded != current,
        None => true,
    }
}

/// Read `filename` under the target root and compare it with the store.
pub async fn detect<S>(
    fs: &dyn FileSystem,
    store: &S,
    target: &Target,
    filename: &str,
) -> Result<Observation>
where
    S: SnapshotStore + ?Sized,
{
    let path = target.file_path(filename);
    let content = fs.read(&path).map_err(|e| PollwatchError::FileUnreadable {
        path: path.clone(),
        reason: format!("{e:#}"),
    })?;

    let recorded = store.latest(target.key(), filename).await?;
    let first_seen = recorded.is_none();
    let changed = content_differs(recorded.as_deref(), &content);

    debug!(root = %target.key(), file = %filename, first_seen, changed, "compared file with snapshot");

    Ok(Observation {
        filename: filename.to_string(),
        content,
        first_seen,
        changed,
    })
}

/// Whether `filename` differs from its latest snapshot.
pub async fn changed<S>(
    fs: &dyn FileSystem,
    store: &S,
    target: &Target,
    filename: &str,
) -> Result<bool>
where
    S: SnapshotStore + ?Sized,
{
    Ok(detect(fs, store, target, filename).await?.changed)
}
