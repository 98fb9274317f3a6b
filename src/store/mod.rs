//! Vector store operations (Qdrant)

mod payload;

pub use payload::*;

use crate::config::Config;
use crate::error::{Error, Result};
use async_trait::async_trait;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, UpsertPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::Qdrant;
use tracing::{debug, info};

/// The store operations the build pipeline depends on.
///
/// A trait seam so the build controller can be exercised against an
/// in-memory store in tests.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create the collection if it does not exist. Existence check failures
    /// are fatal; a collection is never created blindly over an unknown state.
    async fn ensure_collection(&self, collection: &str, dimension: usize) -> Result<()>;

    /// Upsert points, waiting for the write to be acknowledged
    async fn upsert_points(&self, collection: &str, points: Vec<ChunkPoint>) -> Result<()>;
}

/// Basic collection facts for the status command
#[derive(Debug, Clone)]
pub struct CollectionInfo {
    pub points_count: u64,
    pub status: String,
}

/// Qdrant-backed vector store
pub struct QdrantStore {
    client: Qdrant,
}

impl QdrantStore {
    /// Connect using config settings
    pub async fn connect(config: &Config) -> Result<Self> {
        Self::new(&config.qdrant_url, config.qdrant_api_key()).await
    }

    /// Connect to Qdrant at the given URL
    pub async fn new(url: &str, api_key: Option<String>) -> Result<Self> {
        debug!("Connecting to Qdrant at {}", url);

        let mut builder = Qdrant::from_url(url).skip_compatibility_check();
        if let Some(key) = api_key {
            builder = builder.api_key(key);
        }
        let client = builder.build()?;

        Ok(Self { client })
    }

    /// Fetch point count and status for a collection, None if it doesn't exist
    pub async fn get_collection_info(&self, collection: &str) -> Result<Option<CollectionInfo>> {
        if !self.client.collection_exists(collection).await? {
            return Ok(None);
        }

        let info = self.client.collection_info(collection).await?;
        let result = info.result.ok_or_else(|| {
            Error::Qdrant(format!("empty collection info for '{}'", collection))
        })?;

        Ok(Some(CollectionInfo {
            points_count: result.points_count.unwrap_or(0),
            status: format!("{:?}", result.status()),
        }))
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn ensure_collection(&self, collection: &str, dimension: usize) -> Result<()> {
        let exists = self.client.collection_exists(collection).await?;
        if exists {
            debug!("Collection '{}' already exists", collection);
            return Ok(());
        }

        info!(
            "Creating collection '{}' (dim {}, cosine distance)",
            collection, dimension
        );

        self.client
            .create_collection(
                CreateCollectionBuilder::new(collection)
                    .vectors_config(VectorParamsBuilder::new(dimension as u64, Distance::Cosine)),
            )
            .await?;

        Ok(())
    }

    async fn upsert_points(&self, collection: &str, points: Vec<ChunkPoint>) -> Result<()> {
        if points.is_empty() {
            return Ok(());
        }

        let count = points.len();
        let point_structs: Vec<_> = points.iter().map(|p| p.to_point_struct()).collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, point_structs).wait(true))
            .await?;

        debug!("Upserted {} points into '{}'", count, collection);
        Ok(())
    }
}
