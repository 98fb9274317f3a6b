//! Custom error types for curator

use thiserror::Error;

/// Main error type for curator operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Qdrant error: {0}")]
    Qdrant(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Embedding payload rejected as too large: {0}")]
    SizeRejected(String),

    #[error("Embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("No vector index for namespace '{namespace}' and collection '{collection}'; run 'curator start' first")]
    IndexNotFound {
        namespace: String,
        collection: String,
    },

    #[error("Invalid index state: {0}")]
    InvalidState(String),

    #[error("Index not ready: {0}")]
    NotReady(String),

    #[error("No active vector index for namespace: {0}")]
    NoActiveIndex(String),

    #[error("Collection provisioning failed: {0}")]
    NotProvisioned(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

/// Convert qdrant errors
impl From<qdrant_client::QdrantError> for Error {
    fn from(err: qdrant_client::QdrantError) -> Self {
        Error::Qdrant(err.to_string())
    }
}

impl Error {
    /// Whether a tick that hit this error should mark the build `failed`.
    ///
    /// Provider and store failures during embed/upsert poison the build and
    /// get recorded on the ledger row. Everything else (missing row, wrong
    /// status, local IO) is returned to the caller without touching the row.
    pub fn fails_build(&self) -> bool {
        matches!(
            self,
            Error::Embedding(_)
                | Error::SizeRejected(_)
                | Error::DimensionMismatch { .. }
                | Error::Qdrant(_)
        )
    }
}

/// Result type alias for curator
pub type Result<T> = std::result::Result<T, Error>;
