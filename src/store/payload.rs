//! Point payload construction for the vector store

use qdrant_client::qdrant::{PointStruct, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A fully prepared point ready for upsert
#[derive(Debug, Clone)]
pub struct ChunkPoint {
    pub id: Uuid,
    pub vector: Vec<f32>,
    pub payload: ChunkPayload,
}

impl ChunkPoint {
    pub fn to_point_struct(&self) -> PointStruct {
        PointStruct::new(
            self.id.to_string(),
            self.vector.clone(),
            self.payload.to_qdrant_payload(),
        )
    }
}

/// Payload stored alongside each vector, linking it back to its chunk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkPayload {
    pub namespace: String,
    pub source_id: String,
    pub chunk_index: i64,
    pub chunk_id: String,
}

impl ChunkPayload {
    /// Convert to a Qdrant payload map
    pub fn to_qdrant_payload(&self) -> HashMap<String, Value> {
        let mut payload = HashMap::new();
        payload.insert("namespace".to_string(), string_to_qdrant(&self.namespace));
        payload.insert("source_id".to_string(), string_to_qdrant(&self.source_id));
        payload.insert("chunk_index".to_string(), int_to_qdrant(self.chunk_index));
        payload.insert("chunk_id".to_string(), string_to_qdrant(&self.chunk_id));
        payload
    }
}

fn string_to_qdrant(s: &str) -> Value {
    Value::from(s.to_string())
}

fn int_to_qdrant(i: i64) -> Value {
    Value::from(i)
}
