// src/store/mod.rs

//! Snapshot store: append-only history of file contents whose action
//! pipeline succeeded.
//!
//! Records are keyed by (target root as configured, filename). They are never
//! updated or deleted; the newest inserted record for a key is the one the
//! change detector compares against.
//!
//! - [`memory`] keeps records in a `Vec` (lost on restart).
//! - [`postgres`] persists them in the `changes` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::Result;

pub mod memory;
pub mod postgres;

pub use memory::MemorySnapshotStore;
pub use postgres::{PgSnapshotStore, MIGRATOR};

/// One persisted version of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRecord {
    /// Insertion order; strictly increasing per store.
    pub id: i64,
    pub root: String,
    pub filename: String,
    pub content: Vec<u8>,
    /// The file's modification time when the record was written.
    pub modified_at: DateTime<Utc>,
}

/// Storage for snapshot records.
///
/// Any error returned here is fatal to the watcher.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Content of the newest record for the key, or `None` if the file has
    /// never been recorded.
    async fn latest(&self, root: &str, filename: &str) -> Result<Option<Vec<u8>>>;

    /// Append a new record. Earlier records stay untouched.
    async fn record(
        &mut self,
        root: &str,
        filename: &str,
        content: &[u8],
        modified_at: DateTime<Utc>,
    ) -> Result<()>;

    /// All records for the key, newest first.
    async fn history(&self, root: &str, filename: &str) -> Result<Vec<SnapshotRecord>>;

    /// Release the underlying resources. Called once at shutdown.
    async fn close(&mut self) {}
}
