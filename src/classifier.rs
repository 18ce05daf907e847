//! Hybrid classifier: blends keyword and semantic scores per category.
//!
//! Every registered category is scored independently with
//! `combined = α · keyword + (1 - α) · semantic`. The best category becomes
//! the primary one; ties go to the higher keyword score, then to the
//! lexicographically smaller id. Categories clearing
//! `max(relative · primary, floor)` become secondaries.
//!
//! When the embedding provider is unavailable the classifier scores with
//! keywords alone (`combined = keyword`) and flags the result with
//! `semantic_available = false`. Classification itself never fails.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use vitrine::classifier::{ClassifierConfig, HybridClassifier};
//! use vitrine::embedding::UnavailableProvider;
//! use vitrine::taxonomy::CategoryRegistry;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let registry = CategoryRegistry::from_json_str(
//!     r#"{"categories": [
//!         {"id": "A", "keywords": ["recette", "cuisine"], "anchors": ["cuisine"]},
//!         {"id": "B", "keywords": ["sport", "fitness"], "anchors": ["sport"]}
//!     ]}"#,
//!     "inline",
//! )
//! .unwrap();
//!
//! let classifier = HybridClassifier::new(
//!     Arc::new(registry),
//!     Arc::new(UnavailableProvider::new()),
//!     ClassifierConfig::default(),
//! )
//! .unwrap();
//!
//! let result = classifier.classify("Programme de fitness intense").await;
//! assert_eq!(result.primary_category, "B");
//! assert!(!result.semantic_available);
//! # });
//! ```

pub mod calibration;
pub mod config;
pub mod distribution;
pub mod types;

pub use calibration::Calibration;
pub use config::ClassifierConfig;
pub use distribution::{CategoryShare, DistributionReport};
pub use types::{CategoryScore, ClassificationResult};

use std::cmp::Ordering;
use std::sync::Arc;

use log::debug;
use rayon::ThreadPool;
use rayon::prelude::*;
use tokio::sync::OnceCell;

use crate::embedding::{EmbeddingProvider, Vector};
use crate::error::Result;
use crate::scoring::{
    AnchorEmbeddings, KeywordScorer, KeywordScorerConfig, SemanticConfig, SemanticScorer,
};
use crate::taxonomy::CategoryRegistry;

/// Classifies titles into the categories of a registry.
pub struct HybridClassifier {
    registry: Arc<CategoryRegistry>,
    keyword: KeywordScorer,
    semantic: SemanticScorer,
    config: ClassifierConfig,
    anchors: OnceCell<Arc<AnchorEmbeddings>>,
    pool: Option<Arc<ThreadPool>>,
}

impl std::fmt::Debug for HybridClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HybridClassifier")
            .field("categories", &self.registry.len())
            .field("semantic", &self.semantic)
            .field("config", &self.config)
            .finish()
    }
}

impl HybridClassifier {
    /// Create a classifier with default keyword and semantic settings.
    pub fn new(
        registry: Arc<CategoryRegistry>,
        provider: Arc<dyn EmbeddingProvider>,
        config: ClassifierConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            registry,
            keyword: KeywordScorer::default(),
            semantic: SemanticScorer::new(provider, SemanticConfig::default()),
            config,
            anchors: OnceCell::new(),
            pool: None,
        })
    }

    pub fn with_keyword_config(mut self, config: KeywordScorerConfig) -> Self {
        self.keyword = KeywordScorer::new(config);
        self
    }

    /// Replace the semantic settings, keeping the provider.
    pub fn with_semantic_config(self, config: SemanticConfig) -> Self {
        let semantic = self.semantic.with_config(config);
        Self {
            semantic,
            anchors: OnceCell::new(),
            ..self
        }
    }

    /// Run batch scoring on a dedicated rayon pool instead of the global one.
    pub fn with_thread_pool(mut self, pool: Arc<ThreadPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn registry(&self) -> &Arc<CategoryRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn keyword_scorer(&self) -> &KeywordScorer {
        &self.keyword
    }

    pub fn semantic_scorer(&self) -> &SemanticScorer {
        &self.semantic
    }

    /// Classify one title.
    pub async fn classify(&self, title: &str) -> ClassificationResult {
        let anchors = self.anchor_embeddings().await;
        let title_vector = match anchors {
            Some(_) => self
                .semantic
                .embed_titles(&[title])
                .await
                .and_then(|mut vectors| vectors.pop().flatten()),
            None => None,
        };
        self.classify_with(title, title_vector.as_ref(), anchors.as_deref())
    }

    /// Classify a batch of titles; output order equals input order.
    ///
    /// Titles are embedded in batches first, then scored in parallel.
    pub async fn classify_batch<S>(&self, titles: &[S]) -> Vec<ClassificationResult>
    where
        S: AsRef<str> + Sync,
    {
        let anchors = self.anchor_embeddings().await;
        let vectors = match anchors {
            Some(_) => {
                let texts: Vec<&str> = titles.iter().map(AsRef::as_ref).collect();
                self.semantic.embed_titles(&texts).await
            }
            None => None,
        };
        debug!(
            "Classifying {} titles (semantic scoring {})",
            titles.len(),
            if vectors.is_some() { "on" } else { "off" }
        );

        let score_all = || {
            titles
                .par_iter()
                .enumerate()
                .map(|(i, title)| {
                    let vector = vectors.as_ref().and_then(|v| v.get(i)).and_then(Option::as_ref);
                    self.classify_with(title.as_ref(), vector, anchors.as_deref())
                })
                .collect()
        };

        match &self.pool {
            Some(pool) => pool.install(score_all),
            None => score_all(),
        }
    }

    /// Classify with precomputed embeddings.
    ///
    /// Semantic scores are used only when both the title vector and the
    /// anchors are given; otherwise the keyword score alone decides.
    pub fn classify_with(
        &self,
        title: &str,
        title_vector: Option<&Vector>,
        anchors: Option<&AnchorEmbeddings>,
    ) -> ClassificationResult {
        let terms = self.keyword.terms(title);
        let embeddings = title_vector.zip(anchors);
        let alpha = self.config.keyword_weight;

        let scores: Vec<CategoryScore> = self
            .registry
            .categories()
            .iter()
            .enumerate()
            .map(|(position, category)| {
                let keyword = self.keyword.score_terms(&terms, category);
                let (semantic, combined) = match embeddings {
                    Some((vector, anchors)) => {
                        let s = self.semantic.similarity(vector, anchors.for_position(position));
                        (s, alpha * keyword + (1.0 - alpha) * s)
                    }
                    None => (0.0, keyword),
                };
                CategoryScore {
                    category_id: category.id.clone(),
                    keyword,
                    semantic,
                    combined: combined.clamp(0.0, 1.0),
                }
            })
            .collect();

        self.decide(title, scores, embeddings.is_some())
    }

    /// Pick primary and secondary categories from the per-category scores.
    fn decide(
        &self,
        title: &str,
        scores: Vec<CategoryScore>,
        semantic_available: bool,
    ) -> ClassificationResult {
        let ranking = rank(&scores);

        let primary = &scores[ranking[0]];
        let raw_confidence = primary.combined;
        let runner_up = ranking.get(1).map(|&i| scores[i].combined);
        let margin = match runner_up {
            Some(second) => (2.0 * (raw_confidence - second)).min(1.0),
            None => 1.0,
        };

        let threshold = self.config.secondary_threshold(raw_confidence);
        let secondary_categories: Vec<String> = ranking[1..]
            .iter()
            .map(|&i| &scores[i])
            .filter(|s| s.combined > 0.0 && s.combined >= threshold)
            .take(self.config.max_secondary.unwrap_or(usize::MAX))
            .map(|s| s.category_id.clone())
            .collect();

        let confidence = match &self.config.calibration {
            Some(curve) => curve.apply(raw_confidence),
            None => raw_confidence,
        };

        ClassificationResult {
            title: title.to_string(),
            primary_category: primary.category_id.clone(),
            secondary_categories,
            confidence,
            raw_confidence,
            margin,
            semantic_available,
            scores,
        }
    }

    /// Anchor embeddings, computed on first use.
    ///
    /// A failed attempt is not cached, so a recovered provider is picked up
    /// by the next call.
    async fn anchor_embeddings(&self) -> Option<Arc<AnchorEmbeddings>> {
        if !self.semantic.config().enabled {
            return None;
        }
        self.anchors
            .get_or_try_init(|| async {
                self.semantic
                    .embed_anchors(&self.registry)
                    .await
                    .map(Arc::new)
                    .ok_or(())
            })
            .await
            .ok()
            .cloned()
    }
}

/// Indices of `scores` best first: combined desc, keyword desc, id asc.
fn rank(scores: &[CategoryScore]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| compare(&scores[a], &scores[b]));
    order
}

fn compare(a: &CategoryScore, b: &CategoryScore) -> Ordering {
    b.combined
        .total_cmp(&a.combined)
        .then_with(|| b.keyword.total_cmp(&a.keyword))
        .then_with(|| a.category_id.cmp(&b.category_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::embedding::UnavailableProvider;

    /// One axis per word of interest.
    struct AxisProvider;

    #[async_trait]
    impl EmbeddingProvider for AxisProvider {
        async fn embed(&self, text: &str) -> Result<Vector> {
            let lower = text.to_lowercase();
            Ok(Vector::new(vec![
                if lower.contains("cuisine") { 1.0 } else { 0.0 },
                if lower.contains("sport") { 1.0 } else { 0.0 },
            ]))
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    fn registry() -> Arc<CategoryRegistry> {
        Arc::new(
            CategoryRegistry::from_json_str(
                r#"{"categories": [
                    {"id": "B", "keywords": ["sport", "fitness"], "anchors": ["sport"]},
                    {"id": "A", "keywords": ["recette", "cuisine"], "anchors": ["cuisine"]},
                    {"id": "C", "keywords": ["voyage"], "anchors": ["voyage"]}
                ]}"#,
                "test",
            )
            .unwrap(),
        )
    }

    fn keyword_only(config: ClassifierConfig) -> HybridClassifier {
        HybridClassifier::new(registry(), Arc::new(UnavailableProvider::new()), config).unwrap()
    }

    #[test]
    fn test_rank_tie_break() {
        let score = |id: &str, keyword, combined| CategoryScore {
            category_id: id.to_string(),
            keyword,
            semantic: 0.0,
            combined,
        };
        let scores = vec![
            score("B", 0.2, 0.5),
            score("A", 0.2, 0.5),
            score("C", 0.4, 0.5),
            score("D", 0.9, 0.6),
        ];
        assert_eq!(rank(&scores), vec![3, 2, 1, 0]);
    }

    #[tokio::test]
    async fn test_keyword_only_fallback() {
        let classifier = keyword_only(ClassifierConfig::default());
        let result = classifier.classify("Meilleure recette de cuisine").await;
        assert_eq!(result.primary_category, "A");
        assert!(!result.semantic_available);
        assert_eq!(result.scores.len(), 3);
        assert!(result.scores.iter().all(|s| s.semantic == 0.0));
        assert_eq!(result.confidence, result.primary_score().unwrap().keyword);
        assert_eq!(result.margin, 1.0);
    }

    #[tokio::test]
    async fn test_empty_title_goes_to_smallest_id() {
        let classifier = keyword_only(ClassifierConfig::default());
        let result = classifier.classify("").await;
        assert_eq!(result.primary_category, "A");
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.margin, 0.0);
        assert!(result.secondary_categories.is_empty());
    }

    #[tokio::test]
    async fn test_unmatched_title_scores_positive_zero() {
        let classifier = keyword_only(ClassifierConfig::default());
        let result = classifier.classify("Rien à voir ici").await;
        assert_eq!(result.primary_category, "A");
        for score in &result.scores {
            assert!(score.keyword.is_sign_positive());
            assert!(score.combined.is_sign_positive());
        }
    }

    #[tokio::test]
    async fn test_secondaries() {
        let classifier = keyword_only(ClassifierConfig::default());
        let result = classifier.classify("Recette sport et fitness").await;
        assert_eq!(result.primary_category, "B");
        assert_eq!(result.secondary_categories, vec!["A".to_string()]);
        assert!(result.is_multi_label());

        let classifier = keyword_only(ClassifierConfig {
            max_secondary: Some(0),
            ..Default::default()
        });
        let result = classifier.classify("Recette sport et fitness").await;
        assert!(result.secondary_categories.is_empty());
    }

    #[tokio::test]
    async fn test_semantic_blend() {
        let classifier = HybridClassifier::new(
            registry(),
            Arc::new(AxisProvider),
            ClassifierConfig::default(),
        )
        .unwrap();
        let result = classifier.classify("Le sport en salle").await;
        assert!(result.semantic_available);
        let b = result.primary_score().unwrap();
        assert_eq!(b.category_id, "B");
        assert!((b.semantic - 1.0).abs() < 1e-6);
        assert!((b.combined - (0.65 * b.keyword + 0.35)).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let classifier = HybridClassifier::new(
            registry(),
            Arc::new(AxisProvider),
            ClassifierConfig::default(),
        )
        .unwrap();
        let titles = vec!["fitness", "cuisine maison", "", "voyage au bout du monde"];
        let results = classifier.classify_batch(&titles).await;
        let primaries: Vec<&str> = results.iter().map(|r| r.primary_category.as_str()).collect();
        assert_eq!(primaries, vec!["B", "A", "A", "C"]);
        for (result, title) in results.iter().zip(&titles) {
            assert_eq!(&result.title, title);
        }
    }

    #[tokio::test]
    async fn test_calibration_applied() {
        let classifier = keyword_only(ClassifierConfig {
            calibration: Some(Calibration::new(vec![(0.0, 0.0), (1.0, 0.5)]).unwrap()),
            ..Default::default()
        });
        let result = classifier.classify("sport fitness").await;
        assert!((result.raw_confidence - 1.0).abs() < 1e-6);
        assert!((result.confidence - 0.5).abs() < 1e-6);
    }
}
