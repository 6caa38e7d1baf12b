// src/store/memory.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use super::{SnapshotRecord, SnapshotStore};
use crate::errors::Result;

/// Stores snapshot records in memory only.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    records: Vec<SnapshotRecord>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records across all keys.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn matching<'a>(
        &'a self,
        root: &'a str,
        filename: &'a str,
    ) -> impl DoubleEndedIterator<Item = &'a SnapshotRecord> + 'a {
        self.records
            .iter()
            .filter(move |r| r.root == root && r.filename == filename)
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn latest(&self, root: &str, filename: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.matching(root, filename).next_back().map(|r| r.content.clone()))
    }

    async fn record(
        &mut self,
        root: &str,
        filename: &str,
        content: &[u8],
        modified_at: DateTime<Utc>,
    ) -> Result<()> {
        let id = self.records.last().map_or(1, |r| r.id + 1);
        self.records.push(SnapshotRecord {
            id,
            root: root.to_string(),
            filename: filename.to_string(),
            content: content.to_vec(),
            modified_at,
        });
        info!(root = %root, file = %filename, id, "stored snapshot (memory)");
        Ok(())
    }

    async fn history(&self, root: &str, filename: &str) -> Result<Vec<SnapshotRecord>> {
        Ok(self.matching(root, filename).rev().cloned().collect())
    }
}
