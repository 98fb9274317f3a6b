//! HTTP client for a TEI-compatible embedding backend
//!
//! Speaks the text-embeddings-inference `/embed` protocol, with tolerant
//! response parsing for the handful of shapes compatible servers return.

use crate::error::{Error, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Request body for the `/embed` endpoint
#[derive(Debug, Serialize)]
pub struct EmbedTextRequest {
    pub model: String,
    pub inputs: Vec<String>,
}

/// Response shapes returned by TEI-compatible servers
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EmbeddingResponse {
    Embeddings { embeddings: Vec<Vec<f32>> },
    Vectors { vectors: Vec<Vec<f32>> },
    Data { data: Vec<EmbeddingDatum> },
    Raw(Vec<Vec<f32>>),
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

impl EmbeddingResponse {
    fn into_vectors(self) -> Vec<Vec<f32>> {
        match self {
            EmbeddingResponse::Embeddings { embeddings } => embeddings,
            EmbeddingResponse::Vectors { vectors } => vectors,
            EmbeddingResponse::Data { data } => data.into_iter().map(|d| d.embedding).collect(),
            EmbeddingResponse::Raw(vectors) => vectors,
        }
    }
}

/// Classify whether a backend rejection was about input size.
///
/// Matches HTTP 413 plus the error strings TEI and compatible proxies
/// return for oversized inputs. Classification happens here, at the wire
/// boundary, and nowhere else.
pub fn is_size_rejection(status: StatusCode, body: &str) -> bool {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        return true;
    }
    let lower = body.to_lowercase();
    lower.contains("payload too large")
        || (lower.contains("must have less than") && lower.contains("tokens"))
}

/// Client for a remote embedding backend
pub struct EmbeddingBackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl EmbeddingBackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Embed a batch of texts. Failures are classified into `SizeRejected`
    /// (the caller may shrink and retry) and `Embedding` (everything else,
    /// returned to the caller without retries).
    pub async fn embed_text(&self, model: &str, inputs: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let count = inputs.len();
        let url = format!("{}/embed", self.base_url);
        let request = EmbedTextRequest {
            model: model.to_string(),
            inputs,
        };

        debug!("Embedding {} texts via {}", count, url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Embedding(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = format!("{} returned {}: {}", url, status, body);
            return if is_size_rejection(status, &body) {
                Err(Error::SizeRejected(detail))
            } else {
                Err(Error::Embedding(detail))
            };
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| Error::Embedding(format!("invalid response from {}: {}", url, e)))?;

        let vectors = parsed.into_vectors();
        if vectors.len() != count {
            return Err(Error::Embedding(format!(
                "backend returned {} vectors for {} inputs",
                vectors.len(),
                count
            )));
        }

        Ok(vectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_rejection_classification() {
        assert!(is_size_rejection(StatusCode::PAYLOAD_TOO_LARGE, ""));
        assert!(is_size_rejection(
            StatusCode::BAD_REQUEST,
            "Payload Too Large"
        ));
        assert!(is_size_rejection(
            StatusCode::BAD_REQUEST,
            r#"{"error":"Input must have less than 512 tokens"}"#
        ));

        assert!(!is_size_rejection(StatusCode::BAD_REQUEST, "bad input"));
        assert!(!is_size_rejection(
            StatusCode::BAD_REQUEST,
            "must have less than 3 fields"
        ));
        assert!(!is_size_rejection(
            StatusCode::INTERNAL_SERVER_ERROR,
            "model failed to load"
        ));
    }

    #[test]
    fn test_response_shape_parsing() {
        let shapes = [
            r#"{"embeddings":[[0.1,0.2]]}"#,
            r#"{"vectors":[[0.1,0.2]]}"#,
            r#"{"data":[{"embedding":[0.1,0.2]}]}"#,
            r#"[[0.1,0.2]]"#,
        ];

        for raw in shapes {
            let parsed: EmbeddingResponse = serde_json::from_str(raw).unwrap();
            let vectors = parsed.into_vectors();
            assert_eq!(vectors, vec![vec![0.1, 0.2]], "shape: {}", raw);
        }
    }
}
