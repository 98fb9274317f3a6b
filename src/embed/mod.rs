//! Embedding generation
//!
//! The pipeline talks to embedders through the [`Embedder`] trait; the only
//! production implementation is the HTTP backend in [`http_backend`].

mod http_backend;

pub use http_backend::HttpEmbedder;

use crate::config::EmbeddingConfig;
use crate::error::Result;
use async_trait::async_trait;

/// Trait for embedding providers
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, returning one vector per input in order
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>>;

    /// Embedding dimension this provider produces
    fn dimension(&self) -> usize;

    /// Model identifier recorded on the build ledger
    fn model_name(&self) -> &str;
}

/// Create an embedder from configuration
pub fn create_embedder(config: &EmbeddingConfig) -> Result<Box<dyn Embedder>> {
    Ok(Box::new(HttpEmbedder::new(config)?))
}

/// Truncate text to at most `max_chars` characters, respecting char
/// boundaries. A zero-width result only happens for `max_chars == 0`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_long_text() {
        assert_eq!(truncate_chars("hello world", 5), "hello");
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        // Each of these is multiple bytes in UTF-8
        let text = "héllo wörld ünïcode";
        let out = truncate_chars(text, 7);
        assert_eq!(out, "héllo w");
        assert_eq!(out.chars().count(), 7);
    }
}
