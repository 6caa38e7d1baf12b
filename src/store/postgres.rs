// src/store/postgres.rs

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Row};
use tracing::{debug, info};

use super::{SnapshotRecord, SnapshotStore};
use crate::errors::{PollwatchError, Result};

/// Embedded schema migrations for the `changes` table.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Stores snapshot records in the PostgreSQL `changes` table.
///
/// The pool is capped at a single connection: the watcher is strictly
/// sequential and that connection is the one shared handle for the whole run.
#[derive(Clone)]
pub struct PgSnapshotStore {
    pool: PgPool,
}

impl fmt::Debug for PgSnapshotStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgSnapshotStore")
            .field("pool_size", &self.pool.size())
            .field("closed", &self.pool.is_closed())
            .finish()
    }
}

impl PgSnapshotStore {
    /// Open the connection, verify it and bring the schema up to date.
    pub async fn connect(options: PgConnectOptions) -> Result<Self> {
        info!("connecting to snapshot database");

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .test_before_acquire(true)
            .connect_with(options)
            .await?;

        MIGRATOR.run(&pool).await?;
        Self::verify_schema(&pool).await?;

        info!("snapshot database ready");
        Ok(Self { pool })
    }

    /// Wrap an existing pool whose schema is already migrated.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Check that `changes.file_content` stores raw bytes.
    ///
    /// The migration creates the table only if it is missing, so a `changes`
    /// table left by another tool (e.g. with a text content column) would
    /// survive it and only fail later, on the first query.
    pub async fn verify_schema(pool: &PgPool) -> Result<()> {
        let data_type: Option<String> = sqlx::query_scalar(
            r#"
            SELECT data_type::text
            FROM information_schema.columns
            WHERE table_schema = current_schema()
              AND table_name = 'changes'
              AND column_name = 'file_content'
            "#,
        )
        .fetch_optional(pool)
        .await?;

        match data_type.as_deref() {
            Some("bytea") => Ok(()),
            found => Err(PollwatchError::IncompatibleSchema(format!(
                "changes.file_content must be bytea, found {}; point pollwatch at a fresh database",
                found.unwrap_or("no such column")
            ))),
        }
    }
}

#[async_trait]
impl SnapshotStore for PgSnapshotStore {
    async fn latest(&self, root: &str, filename: &str) -> Result<Option<Vec<u8>>> {
        let content = sqlx::query_scalar::<_, Vec<u8>>(
            r#"
            SELECT file_content
            FROM changes
            WHERE path = $1 AND filename = $2
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(root)
        .bind(filename)
        .fetch_optional(&self.pool)
        .await?;

        debug!(root = %root, file = %filename, found = content.is_some(), "loaded latest snapshot");
        Ok(content)
    }

    async fn record(
        &mut self,
        root: &str,
        filename: &str,
        content: &[u8],
        modified_at: DateTime<Utc>,
    ) -> Result<()> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO changes (path, filename, file_content, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(root)
        .bind(filename)
        .bind(content)
        .bind(modified_at)
        .fetch_one(&self.pool)
        .await?;

        info!(root = %root, file = %filename, id, "stored snapshot (postgres)");
        Ok(())
    }

    async fn history(&self, root: &str, filename: &str) -> Result<Vec<SnapshotRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, path, filename, file_content, created_at
            FROM changes
            WHERE path = $1 AND filename = $2
            ORDER BY id DESC
            "#,
        )
        .bind(root)
        .bind(filename)
        .fetch_all(&self.pool)
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(SnapshotRecord {
                id: row.try_get("id")?,
                root: row.try_get("path")?,
                filename: row.try_get("filename")?,
                content: row.try_get("file_content")?,
                modified_at: row.try_get("created_at")?,
            });
        }
        Ok(records)
    }

    async fn close(&mut self) {
        self.pool.close().await;
        info!("snapshot database connection closed");
    }
}
