//! Per-title pattern detection and per-category aggregation.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;
use rayon::ThreadPool;
use rayon::prelude::*;

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use crate::classifier::ClassificationResult;
use crate::error::{Result, VitrineError};
use crate::patterns::insight::{InsightConfig, PatternInsight};
use crate::patterns::{PatternCatalog, PatternMatch, PreparedTitle};
use crate::taxonomy::CategoryRegistry;

/// Detects catalog patterns in titles.
#[derive(Debug, Clone)]
pub struct PatternDetector {
    catalog: Arc<PatternCatalog>,
    matching: PipelineAnalyzer,
    words: PipelineAnalyzer,
    pool: Option<Arc<ThreadPool>>,
}

impl PatternDetector {
    pub fn new(catalog: Arc<PatternCatalog>) -> Self {
        Self {
            catalog,
            matching: PipelineAnalyzer::matching(),
            words: PipelineAnalyzer::lowercase(),
            pool: None,
        }
    }

    /// Run batch detection on a dedicated rayon pool instead of the global one.
    pub fn with_thread_pool(mut self, pool: Arc<ThreadPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn catalog(&self) -> &Arc<PatternCatalog> {
        &self.catalog
    }

    /// Patterns matched by one title.
    ///
    /// Leading and trailing whitespace and letter case do not matter.
    pub fn detect(&self, title: &str) -> PatternMatch {
        let trimmed = title.trim();
        let prepared = PreparedTitle {
            trimmed,
            lower: trimmed.to_lowercase(),
            terms: self.matching.terms(trimmed).unwrap_or_default(),
        };

        let matched_pattern_ids = self
            .catalog
            .patterns()
            .iter()
            .filter(|pattern| pattern.matcher.matches(&prepared))
            .map(|pattern| pattern.id.clone())
            .collect();

        PatternMatch {
            title: title.to_string(),
            matched_pattern_ids,
        }
    }

    /// Detect patterns in every title; output order equals input order.
    pub fn detect_structures<S>(&self, titles: &[S]) -> Vec<PatternMatch>
    where
        S: AsRef<str> + Sync,
    {
        let detect_all = || {
            titles
                .par_iter()
                .map(|title| self.detect(title.as_ref()))
                .collect()
        };
        match &self.pool {
            Some(pool) => pool.install(detect_all),
            None => detect_all(),
        }
    }

    /// Group matches by primary category and aggregate them.
    ///
    /// `matches` and `classifications` are paired by index. Every registered
    /// category gets an insight, including categories no title was assigned
    /// to.
    pub fn aggregate_insights(
        &self,
        registry: &CategoryRegistry,
        matches: &[PatternMatch],
        classifications: &[ClassificationResult],
        config: &InsightConfig,
    ) -> Result<BTreeMap<String, PatternInsight>> {
        if matches.len() != classifications.len() {
            return Err(VitrineError::invalid_argument(format!(
                "{} pattern matches for {} classifications",
                matches.len(),
                classifications.len()
            )));
        }

        let mut groups: Vec<Vec<(&PatternMatch, Vec<String>)>> = vec![Vec::new(); registry.len()];
        for (found, classification) in matches.iter().zip(classifications) {
            let position = registry
                .position(&classification.primary_category)
                .ok_or_else(|| {
                    VitrineError::not_found(format!(
                        "category '{}'",
                        classification.primary_category
                    ))
                })?;
            let tokens = self.words.terms(found.title.trim()).unwrap_or_default();
            groups[position].push((found, tokens));
        }
        debug!(
            "Aggregating {} pattern matches over {} categories",
            matches.len(),
            registry.len()
        );

        let build_all = || {
            registry
                .categories()
                .par_iter()
                .zip(groups.par_iter())
                .map(|(category, group)| {
                    (
                        category.id.clone(),
                        PatternInsight::build(category, &self.catalog, group, config),
                    )
                })
                .collect()
        };
        Ok(match &self.pool {
            Some(pool) => pool.install(build_all),
            None => build_all(),
        })
    }
}
