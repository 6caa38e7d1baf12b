// src/engine/commit.rs

use chrono::{DateTime, Utc};

use crate::errors::{PollwatchError, Result};
use crate::fs::FileSystem;
use crate::store::SnapshotStore;
use crate::target::Target;
use crate::watch::Observation;

/// Record the observed content of a file as its new snapshot.
///
/// The record's timestamp is the file's modification time read right now,
/// while the content is the one read during detection, i.e. the version the
/// pipeline was run for.
pub async fn commit_snapshot<S>(
    fs: &dyn FileSystem,
    store: &mut S,
    target: &Target,
    observation: &Observation,
) -> Result<()>
where
    S: SnapshotStore + ?Sized,
{
    let path = target.file_path(&observation.filename);
    let modified = fs
        .modified(&path)
        .map_err(|e| PollwatchError::FileUnreadable {
            path: path.clone(),
            reason: format!("{e:#}"),
        })?;

    store
        .record(
            target.key(),
            &observation.filename,
            &observation.content,
            DateTime::<Utc>::from(modified),
        )
        .await
}
