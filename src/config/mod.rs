//! Configuration management for curator
//!
//! Handles loading, saving, and validating configuration from TOML files.

mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Qdrant connection URL
    #[serde(default = "default_qdrant_url")]
    pub qdrant_url: String,

    /// Environment variable name for Qdrant API key
    #[serde(default = "default_qdrant_api_key_env")]
    pub qdrant_api_key_env: String,

    /// Logical index namespace served by this deployment
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Embedding backend configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Build pipeline configuration
    #[serde(default)]
    pub build: BuildConfig,

    /// Paths configuration (internal, not user-editable)
    #[serde(skip)]
    pub paths: PathsConfig,
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Embedding backend base URL
    #[serde(default = "default_embedding_backend_url")]
    pub backend_url: String,

    /// Model name/identifier
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Embedding dimension (must match model)
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,

    /// Provider label recorded on the build ledger (e.g. "tei")
    #[serde(default = "default_embedding_provider")]
    pub provider: String,

    /// Request timeout in seconds
    #[serde(default = "default_embedding_timeout_secs")]
    pub timeout_secs: u64,
}

/// Build pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Chunks processed per tick
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Character cap applied to chunk text before embedding
    #[serde(default = "default_max_embed_chars")]
    pub max_embed_chars: usize,
}

/// Lookup the expected embedding dimension for a known model
pub fn embedding_dimension_for_model(model: &str) -> Option<usize> {
    match model {
        "BAAI/bge-small-en-v1.5" => Some(384),
        "BAAI/bge-base-en-v1.5" => Some(768),
        "BAAI/bge-large-en-v1.5" => Some(1024),
        "sentence-transformers/all-MiniLM-L6-v2" => Some(384),
        _ => None,
    }
}

impl EmbeddingConfig {
    /// Resolve the effective embedding dimension based on the configured model
    pub fn resolved_dimension(&self) -> usize {
        if let Some(expected) = embedding_dimension_for_model(&self.model) {
            if expected != self.dimension {
                warn!(
                    "Embedding dimension {} does not match model '{}' ({}); using {}",
                    self.dimension, self.model, expected, expected
                );
            }
            expected
        } else {
            self.dimension
        }
    }
}

/// Internal paths configuration
#[derive(Debug, Clone, Default)]
pub struct PathsConfig {
    /// Base directory for curator data
    pub base_dir: PathBuf,

    /// Path to config file
    pub config_file: PathBuf,

    /// Path to SQLite database
    pub db_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            qdrant_url: default_qdrant_url(),
            qdrant_api_key_env: default_qdrant_api_key_env(),
            namespace: default_namespace(),
            embedding: EmbeddingConfig::default(),
            build: BuildConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend_url: default_embedding_backend_url(),
            model: default_embedding_model(),
            dimension: default_embedding_dimension(),
            provider: default_embedding_provider(),
            timeout_secs: default_embedding_timeout_secs(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            max_embed_chars: default_max_embed_chars(),
        }
    }
}

impl Config {
    /// Get the default base directory for curator (~/.curator)
    pub fn default_base_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".curator")
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        Self::default_base_dir().join("config.toml")
    }

    /// Initialize paths configuration
    pub fn init_paths(&mut self, base_dir: Option<PathBuf>) {
        let base = base_dir.unwrap_or_else(Self::default_base_dir);
        self.paths = PathsConfig {
            config_file: base.join("config.toml"),
            db_file: base.join("metadata.db"),
            base_dir: base,
        };
    }

    /// Load configuration from a specific file path
    pub fn load(config_path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", config_path);

        if !config_path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        let content = std::fs::read_to_string(config_path)?;
        let mut config: Config = toml::from_str(&content)?;

        // Set up paths based on config file location
        let base = config_path.parent().unwrap_or(Path::new(".")).to_path_buf();
        config.paths = PathsConfig {
            config_file: config_path.to_path_buf(),
            db_file: base.join("metadata.db"),
            base_dir: base,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific base directory, falling back to defaults
    pub fn load_from(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = Config::default();
        config.init_paths(base_dir);

        if config.paths.config_file.exists() {
            debug!("Loading config from {:?}", config.paths.config_file);
            let content = std::fs::read_to_string(&config.paths.config_file)?;
            let mut loaded: Config = toml::from_str(&content)?;
            loaded.paths = config.paths;
            config = loaded;
        } else {
            debug!("No config file found, using defaults");
        }

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.paths.config_file.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&self.paths.config_file, content)?;
        info!("Saved config to {:?}", self.paths.config_file);
        Ok(())
    }

    /// Get the Qdrant API key from environment
    pub fn qdrant_api_key(&self) -> Option<String> {
        if self.qdrant_api_key_env.is_empty() {
            return None;
        }
        std::env::var(&self.qdrant_api_key_env).ok()
    }

    /// Physical collection name for this namespace + model + dimension.
    ///
    /// The model and dimension are baked into the name so that switching
    /// either one targets a fresh collection and never mixes vector spaces.
    pub fn collection_name(&self) -> String {
        collection_name_for(
            &self.namespace,
            &self.embedding.model,
            self.embedding.resolved_dimension(),
        )
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.namespace.is_empty() {
            return Err(Error::Config("namespace must not be empty".to_string()));
        }

        if self.embedding.dimension == 0 {
            return Err(Error::Config(
                "embedding.dimension must be positive".to_string(),
            ));
        }

        if self.build.batch_size == 0 {
            return Err(Error::Config(
                "build.batch_size must be positive".to_string(),
            ));
        }

        if self.build.max_embed_chars == 0 {
            return Err(Error::Config(
                "build.max_embed_chars must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Derive a physical collection name like `documents__bge_small_en_v1_5__384`
pub fn collection_name_for(namespace: &str, model: &str, dimension: usize) -> String {
    let model_part = model.rsplit('/').next().unwrap_or(model);
    let slug: String = model_part
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{}__{}__{}", namespace, slug, dimension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.namespace, "documents");
        assert_eq!(config.embedding.dimension, 384);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_save_load() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.init_paths(Some(tmp.path().to_path_buf()));
        config.namespace = "kb".to_string();

        config.save().unwrap();
        assert!(config.paths.config_file.exists());

        let loaded = Config::load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(loaded.namespace, "kb");
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.build.batch_size = 0;
        assert!(config.validate().is_err());

        config.build.batch_size = 100;
        assert!(config.validate().is_ok());

        config.embedding.dimension = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_collection_name_derivation() {
        assert_eq!(
            collection_name_for("documents", "BAAI/bge-small-en-v1.5", 384),
            "documents__bge_small_en_v1_5__384"
        );
        assert_eq!(
            collection_name_for("kb", "custom model", 512),
            "kb__custom_model__512"
        );
    }

    #[test]
    fn test_resolved_dimension_matches_model() {
        let mut config = Config::default();
        config.embedding.model = "BAAI/bge-base-en-v1.5".to_string();
        // Intentionally wrong dimension to ensure resolver corrects it
        config.embedding.dimension = 384;

        assert_eq!(config.embedding.resolved_dimension(), 768);
    }

    #[test]
    fn test_resolved_dimension_unknown_model_falls_back() {
        let mut config = Config::default();
        config.embedding.model = "custom-model".to_string();
        config.embedding.dimension = 512;

        assert_eq!(config.embedding.resolved_dimension(), 512);
    }
}
