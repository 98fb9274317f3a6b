//! Default values for configuration

/// Default Qdrant gRPC URL for local development (port 6334, not 6333 REST)
pub fn default_qdrant_url() -> String {
    std::env::var("QDRANT_URL").unwrap_or_else(|_| "http://127.0.0.1:6334".to_string())
}

/// Default environment variable name for Qdrant API key
pub fn default_qdrant_api_key_env() -> String {
    "".to_string()
}

/// Default namespace for the single-corpus setup
pub fn default_namespace() -> String {
    "documents".to_string()
}

/// Default embedding backend URL (TEI-compatible)
pub fn default_embedding_backend_url() -> String {
    std::env::var("CURATOR_EMBEDDING_BACKEND_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:8081".to_string())
}

/// Default embedding model (BAAI/bge-small-en-v1.5)
pub fn default_embedding_model() -> String {
    "BAAI/bge-small-en-v1.5".to_string()
}

/// Default embedding dimension (must match model)
pub fn default_embedding_dimension() -> usize {
    384
}

/// Default embedding provider label recorded on the ledger
pub fn default_embedding_provider() -> String {
    "tei".to_string()
}

/// Default request timeout for the embedding backend, in seconds
pub fn default_embedding_timeout_secs() -> u64 {
    30
}

/// Default number of chunks processed per tick
pub fn default_batch_size() -> usize {
    100
}

/// Default character cap applied to chunk text before embedding.
/// Conservative for a 512-token provider limit (varies by content).
pub fn default_max_embed_chars() -> usize {
    1800
}
