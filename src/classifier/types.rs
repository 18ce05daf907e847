//! Classification result types.

use serde::{Deserialize, Serialize};

/// Score components of one category for one title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category_id: String,
    /// Keyword score in [0, 1].
    pub keyword: f32,
    /// Semantic score in [0, 1]; 0 when semantic scoring was unavailable.
    pub semantic: f32,
    /// Blended score in [0, 1].
    pub combined: f32,
}

/// Classification of one title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// The input title, unchanged.
    pub title: String,
    /// One entry per registered category, in registry order.
    pub scores: Vec<CategoryScore>,
    /// Category with the highest combined score.
    pub primary_category: String,
    /// Other categories clearing the multi-label threshold, best first.
    pub secondary_categories: Vec<String>,
    /// Primary's combined score, calibrated when a curve is configured.
    pub confidence: f32,
    /// Primary's combined score before calibration.
    pub raw_confidence: f32,
    /// `min(2 * (best - runner_up), 1)`; 1 with a single category.
    pub margin: f32,
    /// Whether the semantic scores come from the provider.
    pub semantic_available: bool,
}

impl ClassificationResult {
    /// Combined score of a category, if registered.
    pub fn score(&self, category_id: &str) -> Option<f32> {
        self.scores
            .iter()
            .find(|s| s.category_id == category_id)
            .map(|s| s.combined)
    }

    /// Score components of the primary category.
    pub fn primary_score(&self) -> Option<&CategoryScore> {
        self.scores
            .iter()
            .find(|s| s.category_id == self.primary_category)
    }

    /// Whether the title was assigned more than one category.
    pub fn is_multi_label(&self) -> bool {
        !self.secondary_categories.is_empty()
    }

    /// Primary followed by secondaries.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary_category.as_str())
            .chain(self.secondary_categories.iter().map(String::as_str))
    }
}
