//! HTTP embedder with oversized-input fallback
//!
//! Sends whole batches to the backend; when the backend rejects a batch as
//! too large, degrades to per-text requests and shrinks individual texts
//! until they fit or the shrink floor is reached.

use super::{truncate_chars, Embedder};
use crate::config::EmbeddingConfig;
use crate::embedding_backend::EmbeddingBackendClient;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

/// Texts at or below this length are never shrunk further; a rejection at
/// the floor is a real provider limit and propagates as an error.
const FALLBACK_SAFE_CHARS: usize = 600;

/// Embedder backed by a TEI-compatible HTTP service
pub struct HttpEmbedder {
    client: EmbeddingBackendClient,
    model_id: String,
    dimension: usize,
}

impl HttpEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let client = EmbeddingBackendClient::new(
            &config.backend_url,
            Duration::from_secs(config.timeout_secs),
        )?;

        Ok(Self {
            client,
            model_id: config.model.clone(),
            dimension: config.resolved_dimension(),
        })
    }

    fn validate_dimensions(&self, vectors: &[Vec<f32>]) -> Result<()> {
        for vector in vectors {
            if vector.len() != self.dimension {
                return Err(Error::DimensionMismatch {
                    expected: self.dimension,
                    got: vector.len(),
                });
            }
        }
        Ok(())
    }

    /// Embed one text, shrinking it on size rejections. Only size-classified
    /// errors trigger a retry; anything else propagates immediately.
    async fn embed_single_with_shrink(&self, text: String) -> Result<Vec<f32>> {
        let mut current = text;
        loop {
            match self.client.embed_text(&self.model_id, vec![current.clone()]).await {
                Ok(mut vectors) => {
                    return vectors
                        .pop()
                        .ok_or_else(|| Error::Embedding("backend returned no vector".to_string()));
                }
                Err(Error::SizeRejected(detail)) => match shrink(&current) {
                    Some(smaller) => {
                        debug!(
                            "Text rejected at {} chars, retrying at {}",
                            current.chars().count(),
                            smaller.chars().count()
                        );
                        current = smaller;
                    }
                    None => return Err(Error::SizeRejected(detail)),
                },
                Err(e) => return Err(e),
            }
        }
    }
}

/// One shrink step: halve long texts, clamp medium ones to the floor,
/// give up at or below the floor.
fn shrink(text: &str) -> Option<String> {
    let len = text.chars().count();
    if len > FALLBACK_SAFE_CHARS * 2 {
        Some(truncate_chars(text, len / 2))
    } else if len > FALLBACK_SAFE_CHARS {
        Some(truncate_chars(text, FALLBACK_SAFE_CHARS))
    } else {
        None
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        match self.client.embed_text(&self.model_id, texts.clone()).await {
            Ok(vectors) => {
                self.validate_dimensions(&vectors)?;
                Ok(vectors)
            }
            Err(Error::SizeRejected(detail)) => {
                warn!(
                    "Batch of {} rejected as too large, falling back to per-text requests: {}",
                    texts.len(),
                    detail
                );

                let mut vectors = Vec::with_capacity(texts.len());
                for text in texts {
                    vectors.push(self.embed_single_with_shrink(text).await?);
                }
                self.validate_dimensions(&vectors)?;
                Ok(vectors)
            }
            Err(e) => Err(e),
        }
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};
    use wiremock::matchers::{method, path};

    const DIM: usize = 4;

    fn test_config(url: &str) -> EmbeddingConfig {
        EmbeddingConfig {
            backend_url: url.to_string(),
            model: "test-model".to_string(),
            dimension: DIM,
            provider: "tei".to_string(),
            timeout_secs: 5,
        }
    }

    /// Fake TEI server that rejects any request containing an input longer
    /// than `max_chars`, and otherwise answers each input with a vector
    /// whose entries equal the input's char count.
    struct SizeLimitedProvider {
        max_chars: usize,
        dimension: usize,
    }

    impl Respond for SizeLimitedProvider {
        fn respond(&self, request: &Request) -> ResponseTemplate {
            let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
            let inputs: Vec<String> = body["inputs"]
                .as_array()
                .unwrap()
                .iter()
                .map(|v| v.as_str().unwrap().to_string())
                .collect();

            if inputs.iter().any(|t| t.chars().count() > self.max_chars) {
                return ResponseTemplate::new(413)
                    .set_body_string("Input must have less than 512 tokens");
            }

            let embeddings: Vec<Vec<f32>> = inputs
                .iter()
                .map(|t| vec![t.chars().count() as f32; self.dimension])
                .collect();
            ResponseTemplate::new(200).set_body_json(json!({ "embeddings": embeddings }))
        }
    }

    async fn serve(max_chars: usize, dimension: usize) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embed"))
            .respond_with(SizeLimitedProvider { max_chars, dimension })
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_batch_embed_preserves_order() {
        let server = serve(10_000, DIM).await;
        let embedder = HttpEmbedder::new(&test_config(&server.uri())).unwrap();

        let vectors = embedder
            .embed(vec!["abc".to_string(), "hello".to_string()])
            .await
            .unwrap();

        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0], vec![3.0; DIM]);
        assert_eq!(vectors[1], vec![5.0; DIM]);
    }

    #[tokio::test]
    async fn test_size_rejection_falls_back_and_shrinks() {
        // Cap at 900: the 2000-char text is rejected, halved to 1000,
        // rejected again, clamped to 600, accepted.
        let server = serve(900, DIM).await;
        let embedder = HttpEmbedder::new(&test_config(&server.uri())).unwrap();

        let mut texts: Vec<String> = (0..4).map(|i| format!("text-{}", i)).collect();
        texts.insert(0, "x".repeat(2000));

        let vectors = embedder.embed(texts).await.unwrap();

        assert_eq!(vectors.len(), 5);
        assert_eq!(vectors[0], vec![600.0; DIM]);
        for v in &vectors[1..] {
            assert_eq!(*v, vec![6.0; DIM]);
        }
    }

    #[tokio::test]
    async fn test_rejection_at_floor_propagates() {
        // Cap below the floor: the text shrinks to 600 and is still
        // rejected, so the error propagates instead of looping.
        let server = serve(100, DIM).await;
        let embedder = HttpEmbedder::new(&test_config(&server.uri())).unwrap();

        let err = embedder.embed(vec!["y".repeat(2000)]).await.unwrap_err();
        assert!(matches!(err, Error::SizeRejected(_)));
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embed"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model failed to load"))
            .expect(1)
            .mount(&server)
            .await;

        let embedder = HttpEmbedder::new(&test_config(&server.uri())).unwrap();
        let err = embedder.embed(vec!["hello".to_string()]).await.unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
    }

    #[tokio::test]
    async fn test_wrong_dimension_is_rejected() {
        let server = serve(10_000, DIM + 1).await;
        let embedder = HttpEmbedder::new(&test_config(&server.uri())).unwrap();

        let err = embedder.embed(vec!["hello".to_string()]).await.unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch { expected: 4, got: 5 }
        ));
    }

    #[test]
    fn test_shrink_steps() {
        assert_eq!(shrink(&"a".repeat(2000)).unwrap().chars().count(), 1000);
        assert_eq!(shrink(&"a".repeat(1201)).unwrap().chars().count(), 600);
        assert_eq!(shrink(&"a".repeat(1000)).unwrap().chars().count(), 600);
        assert_eq!(shrink(&"a".repeat(601)).unwrap().chars().count(), 600);
        assert!(shrink(&"a".repeat(600)).is_none());
        assert!(shrink("short").is_none());
    }
}
