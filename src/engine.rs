//! Batch engine tying classification, pattern detection and reporting together.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use vitrine::config::EngineConfig;
//! use vitrine::embedding::UnavailableProvider;
//! use vitrine::engine::DiscoverEngine;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let engine = DiscoverEngine::builtin(
//!     Arc::new(UnavailableProvider::new()),
//!     EngineConfig::default(),
//! )
//! .unwrap();
//!
//! let report = engine
//!     .analyze(&["5 remèdes naturels contre le mal de dos"])
//!     .await
//!     .unwrap();
//! assert_eq!(report.classifications[0].primary_category, "SANTE_NATURELLE");
//! assert!(report.pattern_matches[0].contains("numeric_leading_number"));
//! # });
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::info;
use rayon::ThreadPoolBuilder;
use serde::{Deserialize, Serialize};

use crate::classifier::{ClassificationResult, DistributionReport, HybridClassifier};
use crate::config::EngineConfig;
use crate::embedding::EmbeddingProvider;
use crate::error::{Result, VitrineError};
use crate::features::{FeatureExtractor, FeatureSummary};
use crate::patterns::{PatternCatalog, PatternDetector, PatternInsight, PatternMatch};
use crate::taxonomy::CategoryRegistry;

/// Everything computed for one batch of titles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub generated_at: DateTime<Utc>,
    pub taxonomy_version: Option<String>,
    pub catalog_version: Option<String>,
    pub total_titles: usize,
    /// Whether semantic scores contributed to the classifications.
    pub semantic_available: bool,
    /// One per title, in input order.
    pub classifications: Vec<ClassificationResult>,
    /// One per title, in input order.
    pub pattern_matches: Vec<PatternMatch>,
    /// One per registered category.
    pub insights: BTreeMap<String, PatternInsight>,
    pub distribution: DistributionReport,
    pub features: FeatureSummary,
}

/// Shared registry, catalog and scorers for batch analysis.
pub struct DiscoverEngine {
    registry: Arc<CategoryRegistry>,
    catalog: Arc<PatternCatalog>,
    classifier: HybridClassifier,
    detector: PatternDetector,
    features: FeatureExtractor,
    config: EngineConfig,
}

impl DiscoverEngine {
    /// Create an engine; the catalog is checked against the registry.
    pub fn new(
        registry: Arc<CategoryRegistry>,
        catalog: Arc<PatternCatalog>,
        provider: Arc<dyn EmbeddingProvider>,
        config: EngineConfig,
    ) -> Result<Self> {
        config.validate()?;
        catalog.validate_against(&registry)?;

        let threads = config.thread_count();
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("vitrine-worker-{i}"))
            .build()
            .map_err(|e| VitrineError::internal(format!("Failed to create thread pool: {e}")))?;
        let pool = Arc::new(pool);

        let classifier = HybridClassifier::new(
            Arc::clone(&registry),
            Arc::clone(&provider),
            config.classifier.clone(),
        )?
        .with_keyword_config(config.keyword.clone())
        .with_semantic_config(config.semantic.clone())
        .with_thread_pool(Arc::clone(&pool));
        let detector = PatternDetector::new(Arc::clone(&catalog)).with_thread_pool(pool);

        info!(
            "Engine ready: {} categories, {} patterns, provider '{}', {} threads",
            registry.len(),
            catalog.len(),
            provider.name(),
            threads
        );

        Ok(Self {
            registry,
            catalog,
            classifier,
            detector,
            features: FeatureExtractor::new(),
            config,
        })
    }

    /// Engine over the built-in taxonomy and pattern catalog.
    pub fn builtin(provider: Arc<dyn EmbeddingProvider>, config: EngineConfig) -> Result<Self> {
        Self::new(
            Arc::new(CategoryRegistry::builtin()?),
            Arc::new(PatternCatalog::builtin()?),
            provider,
            config,
        )
    }

    /// Engine built entirely from configuration: files named in it, or the
    /// built-in documents, and the configured provider.
    pub fn from_config(config: EngineConfig) -> Result<Self> {
        let registry = match &config.taxonomy {
            Some(path) => CategoryRegistry::from_path(path)?,
            None => CategoryRegistry::builtin()?,
        };
        let catalog = match &config.patterns {
            Some(path) => PatternCatalog::from_path(path)?,
            None => PatternCatalog::builtin()?,
        };
        let provider = config.embedding.build_provider()?;
        Self::new(Arc::new(registry), Arc::new(catalog), provider, config)
    }

    pub fn registry(&self) -> &Arc<CategoryRegistry> {
        &self.registry
    }

    pub fn catalog(&self) -> &Arc<PatternCatalog> {
        &self.catalog
    }

    pub fn classifier(&self) -> &HybridClassifier {
        &self.classifier
    }

    pub fn detector(&self) -> &PatternDetector {
        &self.detector
    }

    pub fn feature_extractor(&self) -> &FeatureExtractor {
        &self.features
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Classify titles, in input order.
    pub async fn classify<S>(&self, titles: &[S]) -> Vec<ClassificationResult>
    where
        S: AsRef<str> + Sync,
    {
        self.classifier.classify_batch(titles).await
    }

    /// Detect patterns, in input order.
    pub fn detect<S>(&self, titles: &[S]) -> Vec<PatternMatch>
    where
        S: AsRef<str> + Sync,
    {
        self.detector.detect_structures(titles)
    }

    /// Classify, detect and aggregate a whole batch.
    pub async fn analyze<S>(&self, titles: &[S]) -> Result<BatchReport>
    where
        S: AsRef<str> + Sync,
    {
        info!("Analyzing {} titles", titles.len());

        let classifications = self.classify(titles).await;
        let pattern_matches = self.detect(titles);
        let insights = self.detector.aggregate_insights(
            &self.registry,
            &pattern_matches,
            &classifications,
            &self.config.insights,
        )?;
        let distribution = DistributionReport::compute(&self.registry, &classifications);
        let features = FeatureSummary::compute(&self.features.extract_batch(titles));
        let semantic_available = classifications.iter().any(|c| c.semantic_available);

        info!(
            "Analysis done: {} titles, {} multi-category, semantic scoring {}",
            classifications.len(),
            distribution.multi_category,
            if semantic_available { "on" } else { "off" }
        );

        Ok(BatchReport {
            generated_at: Utc::now(),
            taxonomy_version: self.registry.version().map(str::to_string),
            catalog_version: self.catalog.version().map(str::to_string),
            total_titles: titles.len(),
            semantic_available,
            classifications,
            pattern_matches,
            insights,
            distribution,
            features,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::ProviderKind;
    use crate::embedding::{HashingProvider, UnavailableProvider};

    #[tokio::test]
    async fn test_analyze_builtin() {
        let engine = DiscoverEngine::builtin(
            Arc::new(HashingProvider::new(128).unwrap()),
            EngineConfig {
                threads: Some(2),
                ..Default::default()
            },
        )
        .unwrap();

        let titles = vec![
            "5 remèdes naturels contre le mal de dos",
            "La recette du gratin dauphinois en 30 minutes",
            "",
        ];
        let report = engine.analyze(&titles).await.unwrap();
        assert_eq!(report.total_titles, 3);
        assert_eq!(report.classifications.len(), 3);
        assert_eq!(report.pattern_matches.len(), 3);
        assert_eq!(report.insights.len(), 12);
        assert_eq!(report.distribution.total_titles, 3);
        assert_eq!(report.features.count, 3);
        assert!(report.semantic_available);
        assert_eq!(report.taxonomy_version.as_deref(), Some("2024.1"));
        assert_eq!(report.classifications[0].primary_category, "SANTE_NATURELLE");
        assert_eq!(report.classifications[1].primary_category, "RECETTES_CUISINE");
        assert!(report.pattern_matches[1].contains("closing_minutes"));
        assert!(!report.classifications[2].semantic_available);
    }

    #[tokio::test]
    async fn test_keyword_only_engine() {
        let engine = DiscoverEngine::builtin(
            Arc::new(UnavailableProvider::new()),
            EngineConfig::default(),
        )
        .unwrap();
        let report = engine.analyze(&["Programme de fitness"]).await.unwrap();
        assert!(!report.semantic_available);
        assert_eq!(report.classifications[0].primary_category, "SPORT_FITNESS");
    }

    #[test]
    fn test_from_config_rejects_unknown_affinity() {
        let mut catalog = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut catalog,
            br#"{"patterns": [{"id": "a", "family": "seasonal",
                "matcher": {"type": "phrases", "phrases": ["noel"]},
                "category_affinity": "NOPE"}]}"#,
        )
        .unwrap();

        let config = EngineConfig {
            patterns: Some(catalog.path().to_path_buf()),
            embedding: crate::config::EmbeddingConfig {
                provider: ProviderKind::None,
                ..Default::default()
            },
            ..Default::default()
        };
        let err = DiscoverEngine::from_config(config).err().unwrap();
        assert!(err.is_config());
    }
}
