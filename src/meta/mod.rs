//! Build ledger and chunk storage using SQLite
//!
//! This module holds all persistent control state for index builds:
//! - Chunks (the read-only source the pipeline embeds)
//! - Vector indexes (one build ledger row per namespace + collection)
//! - The activation switch that promotes a ready build to serve traffic
//!
//! The controller in `build` is stateless between calls; everything it
//! needs to resume after a crash lives in the ledger row.

mod schema;

pub use schema::*;

use crate::config::Config;
use crate::error::{Error, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use std::str::FromStr;
use tracing::{debug, info};
use uuid::Uuid;

/// Build status of a vector index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexStatus {
    Building,
    Ready,
    Failed,
}

impl std::fmt::Display for IndexStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexStatus::Building => write!(f, "building"),
            IndexStatus::Ready => write!(f, "ready"),
            IndexStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for IndexStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "building" => Ok(IndexStatus::Building),
            "ready" => Ok(IndexStatus::Ready),
            "failed" => Ok(IndexStatus::Failed),
            _ => Err(Error::Config(format!("Unknown index status: {}", s))),
        }
    }
}

/// Composite position of the last successfully processed chunk.
///
/// Field order matters: the derived `Ord` matches the SQL ordering
/// `(source_id, chunk_index, id)` used for keyset pagination.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCursor {
    pub source_id: String,
    pub chunk_index: i64,
    pub chunk_id: String,
}

/// A build ledger row
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct VectorIndex {
    pub id: String,
    pub namespace: String,
    pub collection: String,
    pub embedding_model_id: String,
    pub embedding_dim: i64,
    pub embedding_provider: String,
    pub status: String,
    pub is_active: bool,
    pub chunks_total: i64,
    pub chunks_done: i64,
    pub last_source_id: Option<String>,
    pub last_chunk_index: Option<i64>,
    pub last_chunk_id: Option<String>,
    pub error_message: Option<String>,
    pub built_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl VectorIndex {
    pub fn get_status(&self) -> Result<IndexStatus> {
        self.status.parse()
    }

    /// Cursor of the last committed batch, if the build has consumed anything
    pub fn cursor(&self) -> Option<ChunkCursor> {
        match (
            &self.last_source_id,
            self.last_chunk_index,
            &self.last_chunk_id,
        ) {
            (Some(source_id), Some(chunk_index), Some(chunk_id)) => Some(ChunkCursor {
                source_id: source_id.clone(),
                chunk_index,
                chunk_id: chunk_id.clone(),
            }),
            _ => None,
        }
    }
}

/// A text chunk row
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ChunkRow {
    pub id: String,
    pub source_id: String,
    pub chunk_index: i64,
    pub chunk_text: String,
    pub created_at: String,
}

impl ChunkRow {
    pub fn new(source_id: String, chunk_index: i64, chunk_text: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            source_id,
            chunk_index,
            chunk_text,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    /// This chunk's position under the composite ordering
    pub fn cursor_key(&self) -> ChunkCursor {
        ChunkCursor {
            source_id: self.source_id.clone(),
            chunk_index: self.chunk_index,
            chunk_id: self.id.clone(),
        }
    }
}

/// What the read path needs to query the serving collection
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ActiveIndex {
    pub collection: String,
    pub embedding_model_id: String,
    pub embedding_dim: i64,
    pub embedding_provider: String,
}

/// Metadata database handle
#[derive(Clone)]
pub struct MetaDb {
    pool: SqlitePool,
}

impl MetaDb {
    /// Connect to the metadata database using config paths
    pub async fn connect(config: &Config) -> Result<Self> {
        Self::new(&config.paths.db_file).await
    }

    /// Create database with path directly, auto-initializing the schema
    pub async fn new(db_path: &std::path::Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        debug!("Connecting to SQLite database at {:?}", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let db = Self { pool };

        if !db.is_initialized().await? {
            db.init_schema().await?;
        }

        Ok(db)
    }

    /// Initialize the database schema
    pub async fn init_schema(&self) -> Result<()> {
        info!("Initializing database schema");
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    /// Check if database is initialized
    pub async fn is_initialized(&self) -> Result<bool> {
        let result: Option<(i32,)> = sqlx::query_as(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='vector_indexes'",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(result.is_some())
    }

    // ===== Chunk Source Operations =====

    /// Insert a chunk (used by the import tool; the build pipeline never writes chunks)
    pub async fn insert_chunk(&self, chunk: &ChunkRow) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO chunks (id, source_id, chunk_index, chunk_text, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&chunk.id)
        .bind(&chunk.source_id)
        .bind(chunk.chunk_index)
        .bind(&chunk.chunk_text)
        .bind(&chunk.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Count all chunks visible to the build pipeline
    pub async fn count_chunks(&self) -> Result<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chunks")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    /// Fetch up to `limit` chunks strictly greater than the cursor under the
    /// composite ordering `(source_id, chunk_index, id)`, ascending.
    pub async fn fetch_chunks_after(
        &self,
        cursor: Option<&ChunkCursor>,
        limit: usize,
    ) -> Result<Vec<ChunkRow>> {
        let chunks = match cursor {
            Some(cursor) => {
                sqlx::query_as::<_, ChunkRow>(
                    r#"
                    SELECT * FROM chunks
                    WHERE (source_id, chunk_index, id) > (?, ?, ?)
                    ORDER BY source_id ASC, chunk_index ASC, id ASC
                    LIMIT ?
                    "#,
                )
                .bind(&cursor.source_id)
                .bind(cursor.chunk_index)
                .bind(&cursor.chunk_id)
                .bind(limit as i64)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ChunkRow>(
                    r#"
                    SELECT * FROM chunks
                    ORDER BY source_id ASC, chunk_index ASC, id ASC
                    LIMIT ?
                    "#,
                )
                .bind(limit as i64)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(chunks)
    }

    // ===== Build Ledger Operations =====

    /// Create-or-reset the ledger row for a build. Idempotent: re-running
    /// `start` resets an existing row to a fresh `building` state instead
    /// of duplicating it.
    pub async fn ensure_index(
        &self,
        namespace: &str,
        collection: &str,
        model_id: &str,
        dimension: usize,
        provider: &str,
    ) -> Result<VectorIndex> {
        let now = Utc::now().to_rfc3339();

        let existing: Option<(String,)> = sqlx::query_as(
            "SELECT id FROM vector_indexes WHERE namespace = ? AND collection = ? LIMIT 1",
        )
        .bind(namespace)
        .bind(collection)
        .fetch_optional(&self.pool)
        .await?;

        if existing.is_none() {
            sqlx::query(
                r#"
                INSERT INTO vector_indexes (
                    id, namespace, collection,
                    embedding_model_id, embedding_dim, embedding_provider,
                    status, is_active, chunks_total, chunks_done,
                    created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, 'building', 0, 0, 0, ?, ?)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(namespace)
            .bind(collection)
            .bind(model_id)
            .bind(dimension as i64)
            .bind(provider)
            .bind(&now)
            .bind(&now)
            .execute(&self.pool)
            .await?;
        }

        // Reset to a fresh build state (safe to re-run). The embedding
        // identity is pinned here and stays immutable for the build's life.
        sqlx::query(
            r#"
            UPDATE vector_indexes SET
                embedding_model_id = ?,
                embedding_dim = ?,
                embedding_provider = ?,
                status = 'building',
                built_at = NULL,
                chunks_done = 0,
                last_source_id = NULL,
                last_chunk_index = NULL,
                last_chunk_id = NULL,
                error_message = NULL,
                updated_at = ?
            WHERE namespace = ? AND collection = ?
            "#,
        )
        .bind(model_id)
        .bind(dimension as i64)
        .bind(provider)
        .bind(&now)
        .bind(namespace)
        .bind(collection)
        .execute(&self.pool)
        .await?;

        self.require_index(namespace, collection).await
    }

    /// Get the ledger row for a namespace + collection
    pub async fn get_index(&self, namespace: &str, collection: &str) -> Result<Option<VectorIndex>> {
        let index = sqlx::query_as::<_, VectorIndex>(
            "SELECT * FROM vector_indexes WHERE namespace = ? AND collection = ? LIMIT 1",
        )
        .bind(namespace)
        .bind(collection)
        .fetch_optional(&self.pool)
        .await?;
        Ok(index)
    }

    async fn require_index(&self, namespace: &str, collection: &str) -> Result<VectorIndex> {
        self.get_index(namespace, collection)
            .await?
            .ok_or_else(|| Error::IndexNotFound {
                namespace: namespace.to_string(),
                collection: collection.to_string(),
            })
    }

    /// List all ledger rows
    pub async fn list_indexes(&self) -> Result<Vec<VectorIndex>> {
        let indexes = sqlx::query_as::<_, VectorIndex>(
            "SELECT * FROM vector_indexes ORDER BY namespace, collection",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(indexes)
    }

    /// Snapshot the total chunk count for a freshly started build
    pub async fn set_chunks_total(
        &self,
        namespace: &str,
        collection: &str,
        total: i64,
    ) -> Result<VectorIndex> {
        sqlx::query(
            "UPDATE vector_indexes SET chunks_total = ?, updated_at = ? WHERE namespace = ? AND collection = ?",
        )
        .bind(total)
        .bind(Utc::now().to_rfc3339())
        .bind(namespace)
        .bind(collection)
        .execute(&self.pool)
        .await?;

        self.require_index(namespace, collection).await
    }

    /// Advance cursor and progress in one persisted update.
    ///
    /// This is the commit point of a tick: it runs only after the vector
    /// store acknowledged the batch. `chunks_done` is clamped to
    /// `chunks_total` so the progress invariant holds even when chunks are
    /// written to the source mid-build.
    pub async fn advance_cursor(
        &self,
        namespace: &str,
        collection: &str,
        cursor: &ChunkCursor,
        processed: i64,
    ) -> Result<VectorIndex> {
        sqlx::query(
            r#"
            UPDATE vector_indexes SET
                last_source_id = ?,
                last_chunk_index = ?,
                last_chunk_id = ?,
                chunks_done = min(chunks_done + ?, chunks_total),
                updated_at = ?
            WHERE namespace = ? AND collection = ?
            "#,
        )
        .bind(&cursor.source_id)
        .bind(cursor.chunk_index)
        .bind(&cursor.chunk_id)
        .bind(processed)
        .bind(Utc::now().to_rfc3339())
        .bind(namespace)
        .bind(collection)
        .execute(&self.pool)
        .await?;

        self.require_index(namespace, collection).await
    }

    /// Mark a build ready; `built_at` is set exactly once, here
    pub async fn mark_ready(&self, namespace: &str, collection: &str) -> Result<VectorIndex> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "UPDATE vector_indexes SET status = 'ready', built_at = ?, updated_at = ? WHERE namespace = ? AND collection = ?",
        )
        .bind(&now)
        .bind(&now)
        .bind(namespace)
        .bind(collection)
        .execute(&self.pool)
        .await?;

        self.require_index(namespace, collection).await
    }

    /// Mark a build failed, preserving the cursor for a later resume
    pub async fn mark_failed(
        &self,
        namespace: &str,
        collection: &str,
        message: &str,
    ) -> Result<VectorIndex> {
        sqlx::query(
            "UPDATE vector_indexes SET status = 'failed', error_message = ?, updated_at = ? WHERE namespace = ? AND collection = ?",
        )
        .bind(message)
        .bind(Utc::now().to_rfc3339())
        .bind(namespace)
        .bind(collection)
        .execute(&self.pool)
        .await?;

        self.require_index(namespace, collection).await
    }

    /// Flip a failed build back to `building`, keeping the cursor so ticks
    /// continue from the last committed position
    pub async fn resume_index(&self, namespace: &str, collection: &str) -> Result<VectorIndex> {
        let index = self.require_index(namespace, collection).await?;

        if index.get_status()? == IndexStatus::Ready {
            return Err(Error::InvalidState(format!(
                "index '{}' is already ready; run start to rebuild",
                collection
            )));
        }

        sqlx::query(
            "UPDATE vector_indexes SET status = 'building', error_message = NULL, updated_at = ? WHERE namespace = ? AND collection = ?",
        )
        .bind(Utc::now().to_rfc3339())
        .bind(namespace)
        .bind(collection)
        .execute(&self.pool)
        .await?;

        self.require_index(namespace, collection).await
    }

    // ===== Activation Switch =====

    /// Promote a ready build to active, demoting whichever row currently
    /// serves the namespace. Runs as one transaction: readers observe
    /// either the old active row or the new one, never both or neither
    /// mid-switch.
    pub async fn activate_index(&self, namespace: &str, collection: &str) -> Result<VectorIndex> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        let target: Option<(String,)> = sqlx::query_as(
            "SELECT status FROM vector_indexes WHERE namespace = ? AND collection = ? LIMIT 1",
        )
        .bind(namespace)
        .bind(collection)
        .fetch_optional(&mut *tx)
        .await?;

        let status = match target {
            Some((status,)) => status,
            None => {
                return Err(Error::IndexNotFound {
                    namespace: namespace.to_string(),
                    collection: collection.to_string(),
                })
            }
        };

        if status != IndexStatus::Ready.to_string() {
            return Err(Error::NotReady(format!(
                "index must be 'ready' to activate (currently '{}')",
                status
            )));
        }

        sqlx::query(
            "UPDATE vector_indexes SET is_active = 0, updated_at = ? WHERE namespace = ? AND is_active = 1",
        )
        .bind(&now)
        .bind(namespace)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE vector_indexes SET is_active = 1, updated_at = ? WHERE namespace = ? AND collection = ?",
        )
        .bind(&now)
        .bind(namespace)
        .bind(collection)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(namespace = %namespace, collection = %collection, "Activated vector index");

        self.require_index(namespace, collection).await
    }

    /// Read-path lookup: which collection, model, and dimension serve this
    /// namespace right now. Callers must re-resolve per query rather than
    /// caching, so activation switches take effect promptly.
    pub async fn get_active_index(&self, namespace: &str) -> Result<ActiveIndex> {
        let active = sqlx::query_as::<_, ActiveIndex>(
            r#"
            SELECT collection, embedding_model_id, embedding_dim, embedding_provider
            FROM vector_indexes
            WHERE namespace = ? AND is_active = 1 AND status = 'ready'
            LIMIT 1
            "#,
        )
        .bind(namespace)
        .fetch_optional(&self.pool)
        .await?;

        active.ok_or_else(|| Error::NoActiveIndex(namespace.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn setup_test_db() -> (MetaDb, TempDir) {
        let tmp = TempDir::new().unwrap();
        let db = MetaDb::new(&tmp.path().join("test.db")).await.unwrap();
        (db, tmp)
    }

    async fn seed_chunks(db: &MetaDb, sources: usize, per_source: usize) -> Vec<ChunkRow> {
        let mut rows = Vec::new();
        for s in 0..sources {
            for i in 0..per_source {
                let chunk = ChunkRow::new(
                    format!("source-{:03}", s),
                    i as i64,
                    format!("chunk {} of source {}", i, s),
                );
                db.insert_chunk(&chunk).await.unwrap();
                rows.push(chunk);
            }
        }
        rows
    }

    async fn seed_index(db: &MetaDb, namespace: &str, collection: &str) -> VectorIndex {
        db.ensure_index(namespace, collection, "BAAI/bge-small-en-v1.5", 384, "tei")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_ensure_index_is_idempotent_reset() {
        let (db, _tmp) = setup_test_db().await;

        let first = seed_index(&db, "docs", "docs__a").await;
        assert_eq!(first.get_status().unwrap(), IndexStatus::Building);
        assert!(first.cursor().is_none());

        // Simulate progress and a failure, then re-start
        let cursor = ChunkCursor {
            source_id: "source-000".to_string(),
            chunk_index: 4,
            chunk_id: "some-chunk".to_string(),
        };
        db.set_chunks_total("docs", "docs__a", 10).await.unwrap();
        db.advance_cursor("docs", "docs__a", &cursor, 5).await.unwrap();
        db.mark_failed("docs", "docs__a", "boom").await.unwrap();

        let reset = seed_index(&db, "docs", "docs__a").await;
        assert_eq!(reset.id, first.id, "reset must not duplicate the row");
        assert_eq!(reset.get_status().unwrap(), IndexStatus::Building);
        assert_eq!(reset.chunks_done, 0);
        assert!(reset.cursor().is_none());
        assert!(reset.error_message.is_none());
        assert!(reset.built_at.is_none());

        assert_eq!(db.list_indexes().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_chunks_keyset_pagination() {
        let (db, _tmp) = setup_test_db().await;
        let mut expected = seed_chunks(&db, 3, 4).await;
        expected.sort_by_key(|c| c.cursor_key());

        // First page from the start
        let page = db.fetch_chunks_after(None, 5).await.unwrap();
        assert_eq!(page.len(), 5);
        let got: Vec<String> = page.iter().map(|c| c.id.clone()).collect();
        let want: Vec<String> = expected[..5].iter().map(|c| c.id.clone()).collect();
        assert_eq!(got, want);

        // Subsequent pages are strictly greater than the cursor: no overlap, no gaps
        let cursor = page.last().unwrap().cursor_key();
        let rest = db.fetch_chunks_after(Some(&cursor), 100).await.unwrap();
        assert_eq!(rest.len(), 7);
        assert_eq!(rest[0].id, expected[5].id);
        for chunk in &rest {
            assert!(chunk.cursor_key() > cursor);
        }

        // Exhausted cursor yields an empty page
        let end = rest.last().unwrap().cursor_key();
        assert!(db.fetch_chunks_after(Some(&end), 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_advance_cursor_clamps_progress() {
        let (db, _tmp) = setup_test_db().await;
        seed_index(&db, "docs", "docs__a").await;
        db.set_chunks_total("docs", "docs__a", 3).await.unwrap();

        let cursor = ChunkCursor {
            source_id: "source-000".to_string(),
            chunk_index: 9,
            chunk_id: "z".to_string(),
        };

        // Source grew mid-build; done never exceeds the snapshot
        let index = db.advance_cursor("docs", "docs__a", &cursor, 5).await.unwrap();
        assert_eq!(index.chunks_done, 3);
        assert_eq!(index.cursor().unwrap(), cursor);
    }

    #[tokio::test]
    async fn test_activate_requires_ready() {
        let (db, _tmp) = setup_test_db().await;
        seed_index(&db, "docs", "docs__a").await;

        let err = db.activate_index("docs", "docs__a").await.unwrap_err();
        assert!(matches!(err, Error::NotReady(_)));

        // Ledger unchanged by the failed activation
        let index = db.get_index("docs", "docs__a").await.unwrap().unwrap();
        assert!(!index.is_active);
        assert_eq!(index.get_status().unwrap(), IndexStatus::Building);
    }

    #[tokio::test]
    async fn test_activate_keeps_single_active_row() {
        let (db, _tmp) = setup_test_db().await;
        seed_index(&db, "docs", "docs__a").await;
        seed_index(&db, "docs", "docs__b").await;
        seed_index(&db, "kb", "kb__a").await;
        db.mark_ready("docs", "docs__a").await.unwrap();
        db.mark_ready("docs", "docs__b").await.unwrap();
        db.mark_ready("kb", "kb__a").await.unwrap();

        db.activate_index("docs", "docs__a").await.unwrap();
        db.activate_index("kb", "kb__a").await.unwrap();
        let switched = db.activate_index("docs", "docs__b").await.unwrap();
        assert!(switched.is_active);

        let active: Vec<_> = db
            .list_indexes()
            .await
            .unwrap()
            .into_iter()
            .filter(|i| i.is_active)
            .collect();
        assert_eq!(active.len(), 2);
        assert!(active.iter().any(|i| i.namespace == "docs" && i.collection == "docs__b"));
        assert!(active.iter().any(|i| i.namespace == "kb" && i.collection == "kb__a"));

        let resolved = db.get_active_index("docs").await.unwrap();
        assert_eq!(resolved.collection, "docs__b");
        assert_eq!(resolved.embedding_dim, 384);
    }

    #[tokio::test]
    async fn test_get_active_index_absent() {
        let (db, _tmp) = setup_test_db().await;
        seed_index(&db, "docs", "docs__a").await;

        let err = db.get_active_index("docs").await.unwrap_err();
        assert!(matches!(err, Error::NoActiveIndex(_)));
    }

    #[tokio::test]
    async fn test_resume_keeps_cursor_clears_error() {
        let (db, _tmp) = setup_test_db().await;
        seed_index(&db, "docs", "docs__a").await;
        db.set_chunks_total("docs", "docs__a", 10).await.unwrap();

        let cursor = ChunkCursor {
            source_id: "source-000".to_string(),
            chunk_index: 2,
            chunk_id: "c".to_string(),
        };
        db.advance_cursor("docs", "docs__a", &cursor, 3).await.unwrap();
        db.mark_failed("docs", "docs__a", "embed backend unreachable")
            .await
            .unwrap();

        let resumed = db.resume_index("docs", "docs__a").await.unwrap();
        assert_eq!(resumed.get_status().unwrap(), IndexStatus::Building);
        assert!(resumed.error_message.is_none());
        assert_eq!(resumed.cursor().unwrap(), cursor);
        assert_eq!(resumed.chunks_done, 3);
    }

    #[tokio::test]
    async fn test_resume_ready_index_is_invalid() {
        let (db, _tmp) = setup_test_db().await;
        seed_index(&db, "docs", "docs__a").await;
        db.mark_ready("docs", "docs__a").await.unwrap();

        let err = db.resume_index("docs", "docs__a").await.unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }
}
