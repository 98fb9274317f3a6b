//! Index build pipeline
//!
//! Drives a build as a sequence of small, resumable ticks. Each tick reads
//! one batch of chunks past the persisted cursor, embeds them, upserts the
//! vectors, and only then advances the cursor. A crash between upsert and
//! cursor advance replays the batch on resume; upserts are keyed by chunk
//! id, so replays overwrite rather than duplicate.

use crate::embed::{truncate_chars, Embedder};
use crate::error::{Error, Result};
use crate::meta::{ChunkRow, IndexStatus, MetaDb, VectorIndex};
use crate::store::{ChunkPayload, ChunkPoint, VectorStore};
use tracing::{info, warn};
use uuid::Uuid;

/// Parameters pinned onto the ledger row when a build starts
#[derive(Debug, Clone)]
pub struct StartOptions {
    pub namespace: String,
    pub collection: String,
    pub model_id: String,
    pub dimension: usize,
    pub provider: String,
}

/// Result of one tick
#[derive(Debug, Clone)]
pub struct TickOutcome {
    /// Whether the build looks complete. A short batch sets this as a
    /// heuristic; only an empty batch actually marks the index ready.
    pub finished: bool,
    /// Chunks processed in this tick
    pub processed: usize,
    /// Ledger row after the tick
    pub index: VectorIndex,
}

/// Begin (or restart) a build: create-or-reset the ledger row, provision
/// the target collection, and snapshot the chunk total.
///
/// The ledger row is written before provisioning so a provisioning failure
/// leaves a resumable `building` row behind rather than nothing.
pub async fn start_build(
    db: &MetaDb,
    store: &dyn VectorStore,
    options: &StartOptions,
) -> Result<VectorIndex> {
    db.ensure_index(
        &options.namespace,
        &options.collection,
        &options.model_id,
        options.dimension,
        &options.provider,
    )
    .await?;

    if let Err(e) = store
        .ensure_collection(&options.collection, options.dimension)
        .await
    {
        return Err(Error::NotProvisioned(e.to_string()));
    }

    // Advisory progress denominator; chunks written after this snapshot
    // are still embedded, they just don't move the total.
    let total = db.count_chunks().await?;
    let index = db
        .set_chunks_total(&options.namespace, &options.collection, total)
        .await?;

    info!(
        namespace = %options.namespace,
        collection = %options.collection,
        chunks = total,
        "Started index build"
    );

    Ok(index)
}

/// Process one batch of chunks for a building index.
///
/// An empty batch is the sole completion signal: it marks the index ready.
/// Provider and store failures mark the build `failed` (resumable); state
/// errors are returned without touching the ledger.
pub async fn tick_build(
    db: &MetaDb,
    embedder: &dyn Embedder,
    store: &dyn VectorStore,
    namespace: &str,
    collection: &str,
    batch_size: usize,
    max_embed_chars: usize,
) -> Result<TickOutcome> {
    let index = db
        .get_index(namespace, collection)
        .await?
        .ok_or_else(|| Error::IndexNotFound {
            namespace: namespace.to_string(),
            collection: collection.to_string(),
        })?;

    let status = index.get_status()?;
    if status != IndexStatus::Building {
        return Err(Error::InvalidState(format!(
            "cannot tick index in status '{}'; expected 'building'",
            status
        )));
    }

    let cursor = index.cursor();
    let chunks = db.fetch_chunks_after(cursor.as_ref(), batch_size).await?;

    if chunks.is_empty() {
        let index = db.mark_ready(namespace, collection).await?;
        info!(
            namespace = %namespace,
            collection = %collection,
            done = index.chunks_done,
            "Index build complete"
        );
        return Ok(TickOutcome {
            finished: true,
            processed: 0,
            index,
        });
    }

    let last_key = chunks[chunks.len() - 1].cursor_key();
    let processed = chunks.len();

    if let Err(e) = embed_and_upsert(embedder, store, &index, &chunks, max_embed_chars).await {
        if e.fails_build() {
            warn!(
                namespace = %namespace,
                collection = %collection,
                error = %e,
                "Tick failed, marking build as failed"
            );
            db.mark_failed(namespace, collection, &e.to_string()).await?;
        }
        return Err(e);
    }

    // Commit point: the store acknowledged the batch, so persist the new
    // position and progress in one update.
    let index = db
        .advance_cursor(namespace, collection, &last_key, processed as i64)
        .await?;

    Ok(TickOutcome {
        finished: processed < batch_size,
        processed,
        index,
    })
}

/// Tick until the build reaches `ready`
pub async fn run_build(
    db: &MetaDb,
    embedder: &dyn Embedder,
    store: &dyn VectorStore,
    namespace: &str,
    collection: &str,
    batch_size: usize,
    max_embed_chars: usize,
) -> Result<VectorIndex> {
    loop {
        let outcome = tick_build(
            db,
            embedder,
            store,
            namespace,
            collection,
            batch_size,
            max_embed_chars,
        )
        .await?;

        info!(
            processed = outcome.processed,
            done = outcome.index.chunks_done,
            total = outcome.index.chunks_total,
            "Tick complete"
        );

        if outcome.index.get_status()? == IndexStatus::Ready {
            return Ok(outcome.index);
        }
    }
}

/// Flip a failed build back to `building` so ticks continue from the
/// persisted cursor
pub async fn resume_build(db: &MetaDb, namespace: &str, collection: &str) -> Result<VectorIndex> {
    let index = db.resume_index(namespace, collection).await?;
    info!(
        namespace = %namespace,
        collection = %collection,
        done = index.chunks_done,
        "Resumed index build"
    );
    Ok(index)
}

/// Promote a ready build to serve its namespace
pub async fn activate_build(db: &MetaDb, namespace: &str, collection: &str) -> Result<VectorIndex> {
    db.activate_index(namespace, collection).await
}

/// Embed a batch and upsert the vectors, validating dimensions against the
/// ledger before anything is written to the store.
async fn embed_and_upsert(
    embedder: &dyn Embedder,
    store: &dyn VectorStore,
    index: &VectorIndex,
    chunks: &[ChunkRow],
    max_embed_chars: usize,
) -> Result<()> {
    let texts: Vec<String> = chunks
        .iter()
        .map(|c| truncate_chars(&c.chunk_text, max_embed_chars))
        .collect();

    let vectors = embedder.embed(texts).await?;
    if vectors.len() != chunks.len() {
        return Err(Error::Embedding(format!(
            "embedder returned {} vectors for {} chunks",
            vectors.len(),
            chunks.len()
        )));
    }

    let expected = index.embedding_dim as usize;
    for vector in &vectors {
        if vector.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                got: vector.len(),
            });
        }
    }

    let points: Vec<ChunkPoint> = chunks
        .iter()
        .zip(vectors)
        .map(|(chunk, vector)| ChunkPoint {
            id: point_id_for_chunk(&chunk.id),
            vector,
            payload: ChunkPayload {
                namespace: index.namespace.clone(),
                source_id: chunk.source_id.clone(),
                chunk_index: chunk.chunk_index,
                chunk_id: chunk.id.clone(),
            },
        })
        .collect();

    store.upsert_points(&index.collection, points).await
}

/// Stable point id for a chunk. Chunk ids are UUIDs already; anything else
/// maps deterministically so replays still hit the same point.
fn point_id_for_chunk(chunk_id: &str) -> Uuid {
    Uuid::try_parse(chunk_id)
        .unwrap_or_else(|_| Uuid::new_v5(&Uuid::NAMESPACE_OID, chunk_id.as_bytes()))
}
