//! Engine configuration.
//!
//! Every section is optional in the JSON file; missing fields take their
//! defaults.
//!
//! ```
//! use vitrine::config::EngineConfig;
//!
//! let config = EngineConfig::from_json_str(
//!     r#"{"classifier": {"keyword_weight": 0.8}, "semantic": {"enabled": false}}"#,
//!     "inline",
//! )
//! .unwrap();
//! assert_eq!(config.classifier.keyword_weight, 0.8);
//! assert_eq!(config.insights.top_k, 5);
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::classifier::ClassifierConfig;
use crate::embedding::{
    DEFAULT_HASHING_DIMENSION, EmbeddingProvider, HashingProvider, UnavailableProvider,
};
use crate::error::{Result, VitrineError};
use crate::patterns::InsightConfig;
use crate::scoring::{KeywordScorerConfig, SemanticConfig};

/// Which embedding provider the engine builds from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Offline feature-hashing embedder.
    #[default]
    Hashing,
    /// No provider: keyword-only classification.
    None,
}

/// Embedding provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: ProviderKind,
    /// Vector dimension of the hashing provider.
    pub dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Hashing,
            dimension: DEFAULT_HASHING_DIMENSION,
        }
    }
}

impl EmbeddingConfig {
    /// Build the configured provider.
    pub fn build_provider(&self) -> Result<Arc<dyn EmbeddingProvider>> {
        Ok(match self.provider {
            ProviderKind::Hashing => Arc::new(HashingProvider::new(self.dimension)?),
            ProviderKind::None => Arc::new(UnavailableProvider::with_reason(
                "semantic scoring disabled by configuration",
            )),
        })
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Taxonomy file; the built-in taxonomy when unset.
    pub taxonomy: Option<PathBuf>,
    /// Pattern catalog file; the built-in catalog when unset.
    pub patterns: Option<PathBuf>,
    pub classifier: ClassifierConfig,
    pub keyword: KeywordScorerConfig,
    pub semantic: SemanticConfig,
    pub embedding: EmbeddingConfig,
    pub insights: InsightConfig,
    /// Worker threads for batch scoring; number of CPUs when unset.
    pub threads: Option<usize>,
}

impl EngineConfig {
    /// Load a configuration file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let content = fs::read_to_string(path)
            .map_err(|e| VitrineError::config(&source, format!("cannot read configuration: {e}")))?;
        Self::from_json_str(&content, &source)
    }

    /// Parse and validate a configuration; `source` names it in errors.
    pub fn from_json_str(json: &str, source: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)
            .map_err(|e| VitrineError::config(source, format!("malformed configuration: {e}")))?;
        config.validate().map_err(|e| match e {
            VitrineError::Config { message, .. } => VitrineError::config(source, message),
            other => other,
        })?;
        Ok(config)
    }

    /// Number of worker threads to use.
    pub fn thread_count(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get).max(1)
    }

    /// Check value ranges across all sections.
    pub fn validate(&self) -> Result<()> {
        self.classifier.validate()?;

        let checks = [
            (self.keyword.saturation_top_n == 0, "keyword.saturation_top_n must be at least 1"),
            (self.semantic.batch_size == 0, "semantic.batch_size must be at least 1"),
            (self.semantic.timeout_ms == 0, "semantic.timeout_ms must be at least 1"),
            (
                self.embedding.provider == ProviderKind::Hashing && self.embedding.dimension == 0,
                "embedding.dimension must be at least 1",
            ),
            (self.insights.ngram_min == 0, "insights.ngram_min must be at least 1"),
            (
                self.insights.ngram_min > self.insights.ngram_max,
                "insights.ngram_min must not exceed insights.ngram_max",
            ),
            (self.threads == Some(0), "threads must be at least 1"),
        ];
        for (failed, message) in checks {
            if failed {
                return Err(VitrineError::config("engine configuration", message));
            }
        }
        Ok(())
    }
}
