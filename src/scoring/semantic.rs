//! Semantic scoring against category anchors through an injected provider.
//!
//! Anchor phrases are embedded once per registry; a title is embedded once and
//! compared with every anchor of a category, keeping the best cosine
//! similarity mapped into [0, 1]. Provider calls run under a timeout. When the
//! provider fails or times out the scorer reports "unavailable" (`None`)
//! instead of an error and the classifier falls back to keyword scores alone.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::embedding::{EmbeddingProvider, Vector};
use crate::error::{Result, VitrineError};
use crate::taxonomy::{Category, CategoryRegistry};

/// How a raw cosine similarity is mapped into [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMapping {
    /// Negative similarities become 0, positive ones are kept as is.
    #[default]
    Clamp,
    /// `(cosine + 1) / 2`, for models whose similarities spread over [-1, 1].
    Shift,
}

impl SimilarityMapping {
    /// Map a cosine similarity into [0, 1].
    pub fn apply(&self, cosine: f32) -> f32 {
        let mapped = match self {
            SimilarityMapping::Clamp => cosine,
            SimilarityMapping::Shift => (cosine + 1.0) / 2.0,
        };
        if mapped.is_finite() {
            mapped.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Configuration for semantic scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticConfig {
    /// Whether to call the embedding provider at all.
    pub enabled: bool,
    /// Timeout for each provider call, in milliseconds.
    pub timeout_ms: u64,
    /// Maximum number of texts per `embed_batch` call.
    pub batch_size: usize,
    /// Cosine to score mapping.
    pub similarity_mapping: SimilarityMapping,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: 10_000,
            batch_size: 64,
            similarity_mapping: SimilarityMapping::Clamp,
        }
    }
}

/// Anchor embeddings of every category, in registry order.
#[derive(Debug, Clone)]
pub struct AnchorEmbeddings {
    per_category: Vec<Vec<Vector>>,
}

impl AnchorEmbeddings {
    /// Anchor vectors of the category at a registry position.
    pub fn for_position(&self, position: usize) -> &[Vector] {
        self.per_category
            .get(position)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of categories covered.
    pub fn len(&self) -> usize {
        self.per_category.len()
    }

    pub fn is_empty(&self) -> bool {
        self.per_category.is_empty()
    }
}

/// Scores titles by embedding similarity with category anchors.
#[derive(Clone)]
pub struct SemanticScorer {
    provider: Arc<dyn EmbeddingProvider>,
    config: SemanticConfig,
}

impl std::fmt::Debug for SemanticScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticScorer")
            .field("provider", &self.provider.name())
            .field("config", &self.config)
            .finish()
    }
}

impl SemanticScorer {
    /// Create a scorer over the given provider.
    pub fn new(provider: Arc<dyn EmbeddingProvider>, config: SemanticConfig) -> Self {
        Self { provider, config }
    }

    /// Same provider, different settings.
    pub fn with_config(self, config: SemanticConfig) -> Self {
        Self {
            provider: self.provider,
            config,
        }
    }

    pub fn config(&self) -> &SemanticConfig {
        &self.config
    }

    /// Name of the underlying provider.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Map a raw cosine similarity into [0, 1].
    pub fn map_similarity(&self, cosine: f32) -> f32 {
        self.config.similarity_mapping.apply(cosine)
    }

    /// Best mapped similarity between a title vector and a set of anchors.
    pub fn similarity(&self, title: &Vector, anchors: &[Vector]) -> f32 {
        anchors
            .iter()
            .map(|anchor| self.map_similarity(title.cosine_similarity(anchor)))
            .fold(0.0, f32::max)
    }

    /// Score one title against one category.
    ///
    /// Embeds the title and the category anchors; any provider failure gives 0.
    pub async fn score(&self, title: &str, category: &Category) -> f32 {
        if !self.config.enabled || title.trim().is_empty() {
            return 0.0;
        }
        let mut texts: Vec<&str> = vec![title];
        texts.extend(category.anchors.iter().map(String::as_str));

        match self.embed_chunked(&texts).await {
            Ok(mut vectors) => {
                let anchors = vectors.split_off(1);
                self.similarity(&vectors[0], &anchors)
            }
            Err(e) => {
                self.log_fallback(&e);
                0.0
            }
        }
    }

    /// Embed every anchor of every category, or `None` if the provider fails.
    pub async fn embed_anchors(&self, registry: &CategoryRegistry) -> Option<AnchorEmbeddings> {
        if !self.config.enabled {
            return None;
        }
        let texts: Vec<&str> = registry
            .categories()
            .iter()
            .flat_map(|c| c.anchors.iter().map(String::as_str))
            .collect();

        match self.embed_chunked(&texts).await {
            Ok(vectors) => {
                let mut vectors = vectors.into_iter();
                let per_category = registry
                    .categories()
                    .iter()
                    .map(|c| vectors.by_ref().take(c.anchors.len()).collect())
                    .collect();
                debug!(
                    "Embedded {} anchors for {} categories with '{}'",
                    texts.len(),
                    registry.len(),
                    self.provider.name()
                );
                Some(AnchorEmbeddings { per_category })
            }
            Err(e) => {
                self.log_fallback(&e);
                None
            }
        }
    }

    /// Embed a batch of titles.
    ///
    /// Blank titles are not sent to the provider and get `None`. Returns
    /// `None` altogether when the provider fails.
    pub async fn embed_titles(&self, titles: &[&str]) -> Option<Vec<Option<Vector>>> {
        if !self.config.enabled {
            return None;
        }
        let non_blank: Vec<(usize, &str)> = titles
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.trim().is_empty())
            .map(|(i, t)| (i, *t))
            .collect();
        let texts: Vec<&str> = non_blank.iter().map(|(_, t)| *t).collect();

        match self.embed_chunked(&texts).await {
            Ok(vectors) => {
                let mut out = vec![None; titles.len()];
                for ((index, _), vector) in non_blank.into_iter().zip(vectors) {
                    out[index] = Some(vector);
                }
                Some(out)
            }
            Err(e) => {
                self.log_fallback(&e);
                None
            }
        }
    }

    /// Call `embed_batch` in chunks of `batch_size`, each under the timeout.
    async fn embed_chunked(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        let timeout = Duration::from_millis(self.config.timeout_ms);
        let mut vectors = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(self.config.batch_size.max(1)) {
            let batch = tokio::time::timeout(timeout, self.provider.embed_batch(chunk))
                .await
                .map_err(|_| {
                    VitrineError::timeout(format!(
                        "{} texts not embedded within {}ms",
                        chunk.len(),
                        self.config.timeout_ms
                    ))
                })??;

            if batch.len() != chunk.len() {
                return Err(VitrineError::provider(format!(
                    "provider returned {} vectors for {} texts",
                    batch.len(),
                    chunk.len()
                )));
            }
            vectors.extend(batch);
        }

        Ok(vectors)
    }

    fn log_fallback(&self, error: &VitrineError) {
        warn!(
            "Embedding provider '{}' failed, falling back to keyword-only scoring: {error}",
            self.provider.name()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::embedding::UnavailableProvider;

    /// Maps a handful of words onto fixed axes.
    struct AxisProvider;

    #[async_trait]
    impl EmbeddingProvider for AxisProvider {
        async fn embed(&self, text: &str) -> Result<Vector> {
            let lower = text.to_lowercase();
            let mut data = vec![0.0; 3];
            if lower.contains("cuisine") {
                data[0] = 1.0;
            }
            if lower.contains("sport") {
                data[1] = 1.0;
            }
            if lower.contains("anti") {
                data[2] = -1.0;
                data[0] = -1.0;
            }
            Ok(Vector::new(data))
        }

        fn dimension(&self) -> usize {
            3
        }

        fn name(&self) -> &str {
            "axis"
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl EmbeddingProvider for SlowProvider {
        async fn embed(&self, _text: &str) -> Result<Vector> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(Vector::new(vec![1.0]))
        }

        fn dimension(&self) -> usize {
            1
        }
    }

    fn registry() -> CategoryRegistry {
        CategoryRegistry::from_json_str(
            r#"{"categories": [
                {"id": "A", "keywords": ["recette"], "anchors": ["cuisine du monde", "sport"]},
                {"id": "B", "keywords": ["sport"], "anchors": ["sport"]}
            ]}"#,
            "test",
        )
        .unwrap()
    }

    #[test]
    fn test_similarity_mapping() {
        assert_eq!(SimilarityMapping::Clamp.apply(-0.4), 0.0);
        assert_eq!(SimilarityMapping::Clamp.apply(0.7), 0.7);
        assert_eq!(SimilarityMapping::Shift.apply(0.0), 0.5);
        assert_eq!(SimilarityMapping::Shift.apply(-1.0), 0.0);
        assert_eq!(SimilarityMapping::Clamp.apply(f32::NAN), 0.0);
    }

    #[tokio::test]
    async fn test_score_takes_best_anchor() {
        let registry = registry();
        let scorer = SemanticScorer::new(Arc::new(AxisProvider), SemanticConfig::default());
        let a = registry.lookup("A").unwrap();
        assert!((scorer.score("La cuisine", a).await - 1.0).abs() < 1e-6);
        assert!((scorer.score("Le sport", a).await - 1.0).abs() < 1e-6);
        assert_eq!(scorer.score("anti", a).await, 0.0);
        assert_eq!(scorer.score("   ", a).await, 0.0);
    }

    #[tokio::test]
    async fn test_embed_anchors_groups_by_category() {
        let registry = registry();
        let scorer = SemanticScorer::new(
            Arc::new(AxisProvider),
            SemanticConfig {
                batch_size: 1,
                ..Default::default()
            },
        );
        let anchors = scorer.embed_anchors(&registry).await.unwrap();
        assert_eq!(anchors.len(), 2);
        assert_eq!(anchors.for_position(0).len(), 2);
        assert_eq!(anchors.for_position(1).len(), 1);
        assert!(anchors.for_position(7).is_empty());
    }

    #[tokio::test]
    async fn test_embed_titles_skips_blank() {
        let scorer = SemanticScorer::new(Arc::new(AxisProvider), SemanticConfig::default());
        let vectors = scorer.embed_titles(&["cuisine", "", "sport"]).await.unwrap();
        assert!(vectors[0].is_some());
        assert!(vectors[1].is_none());
        assert!(vectors[2].is_some());
    }

    #[tokio::test]
    async fn test_provider_failure_degrades() {
        let registry = registry();
        let scorer = SemanticScorer::new(
            Arc::new(UnavailableProvider::new()),
            SemanticConfig::default(),
        );
        assert!(scorer.embed_anchors(&registry).await.is_none());
        assert!(scorer.embed_titles(&["cuisine"]).await.is_none());
        assert_eq!(scorer.score("cuisine", registry.lookup("A").unwrap()).await, 0.0);
    }

    #[tokio::test]
    async fn test_timeout_degrades() {
        let scorer = SemanticScorer::new(
            Arc::new(SlowProvider),
            SemanticConfig {
                timeout_ms: 10,
                ..Default::default()
            },
        );
        assert!(scorer.embed_titles(&["cuisine"]).await.is_none());
    }

    #[tokio::test]
    async fn test_disabled() {
        let registry = registry();
        let scorer = SemanticScorer::new(
            Arc::new(AxisProvider),
            SemanticConfig {
                enabled: false,
                ..Default::default()
            },
        );
        assert!(scorer.embed_anchors(&registry).await.is_none());
        assert_eq!(scorer.score("cuisine", registry.lookup("A").unwrap()).await, 0.0);
    }
}
