//! Lexical scoring of a title against a category's weighted keywords.
//!
//! The title is analyzed (accents folded, lowercased, split on word
//! boundaries, plurals stemmed) and every keyword whose terms appear contiguously and in order
//! among the title's tokens contributes its weight once. The sum is divided by
//! the category's saturation constant, the sum of its `saturation_top_n`
//! heaviest weights, and clamped to [0, 1].

use log::debug;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use crate::taxonomy::{Category, Keyword};

/// Configuration of the keyword scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordScorerConfig {
    /// How many of the heaviest keyword weights make a saturated (1.0) score.
    pub saturation_top_n: usize,
}

impl Default for KeywordScorerConfig {
    fn default() -> Self {
        Self {
            saturation_top_n: 3,
        }
    }
}

/// Weighted keyword scorer.
#[derive(Debug, Clone)]
pub struct KeywordScorer {
    analyzer: PipelineAnalyzer,
    config: KeywordScorerConfig,
}

impl Default for KeywordScorer {
    fn default() -> Self {
        Self::new(KeywordScorerConfig::default())
    }
}

impl KeywordScorer {
    /// Create a scorer with the given configuration.
    pub fn new(config: KeywordScorerConfig) -> Self {
        Self {
            analyzer: PipelineAnalyzer::matching(),
            config,
        }
    }

    pub fn config(&self) -> &KeywordScorerConfig {
        &self.config
    }

    /// Normalized terms of a title.
    ///
    /// Text the analyzer cannot handle is treated as an empty title.
    pub fn terms(&self, title: &str) -> Vec<String> {
        self.analyzer.terms(title).unwrap_or_else(|e| {
            debug!("Treating unanalyzable title as empty: {e}");
            Vec::new()
        })
    }

    /// Score a raw title against a category.
    pub fn score(&self, title: &str, category: &Category) -> f32 {
        self.score_terms(&self.terms(title), category)
    }

    /// Score already-normalized title terms against a category.
    pub fn score_terms(&self, terms: &[String], category: &Category) -> f32 {
        if terms.is_empty() {
            return 0.0;
        }
        let saturation = self.saturation(category);
        if saturation <= 0.0 {
            return 0.0;
        }

        // Folded from +0.0: an empty f32 sum is -0.0.
        let matched = self
            .matched_keywords(terms, category)
            .fold(0.0_f32, |sum, keyword| sum + keyword.weight);

        (matched / saturation).clamp(0.0, 1.0)
    }

    /// Keywords of the category present in the title terms.
    pub fn matched_keywords<'a>(
        &self,
        terms: &'a [String],
        category: &'a Category,
    ) -> impl Iterator<Item = &'a Keyword> + 'a {
        category
            .keywords
            .iter()
            .filter(move |keyword| contains_phrase(terms, &keyword.terms))
    }

    /// Sum of the category's `saturation_top_n` heaviest keyword weights.
    pub fn saturation(&self, category: &Category) -> f32 {
        let mut weights: Vec<f32> = category.keywords.iter().map(|k| k.weight).collect();
        weights.sort_by(|a, b| b.total_cmp(a));
        weights
            .iter()
            .take(self.config.saturation_top_n.max(1))
            .sum()
    }
}

/// Whether `phrase` occurs as a contiguous run of whole tokens in `terms`.
pub fn contains_phrase(terms: &[String], phrase: &[String]) -> bool {
    if phrase.is_empty() || phrase.len() > terms.len() {
        return false;
    }
    terms.windows(phrase.len()).any(|window| window == phrase)
}
