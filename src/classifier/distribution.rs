//! Category distribution over a batch of classifications.

use serde::{Deserialize, Serialize};

use crate::classifier::types::ClassificationResult;
use crate::taxonomy::CategoryRegistry;

/// Confidence above which a classification counts as high-confidence.
pub const HIGH_CONFIDENCE: f32 = 0.7;

/// Confidence below which a classification counts as low-confidence.
pub const LOW_CONFIDENCE: f32 = 0.3;

/// Number of titles assigned to one category as primary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category_id: String,
    pub name: String,
    pub count: usize,
    /// Percentage of the batch, rounded to 2 decimals.
    pub percentage: f64,
}

/// How a batch spreads over the taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionReport {
    pub total_titles: usize,
    /// Every registered category, in registry order.
    pub categories: Vec<CategoryShare>,
    pub high_confidence: usize,
    pub low_confidence: usize,
    pub multi_category: usize,
}

impl DistributionReport {
    /// Compute the distribution of `results` over `registry`.
    ///
    /// Results naming an unregistered primary category are counted in the
    /// total only.
    pub fn compute(registry: &CategoryRegistry, results: &[ClassificationResult]) -> Self {
        let mut counts = vec![0usize; registry.len()];
        for result in results {
            if let Some(position) = registry.position(&result.primary_category) {
                counts[position] += 1;
            }
        }

        let total = results.len();
        let categories = registry
            .categories()
            .iter()
            .zip(counts)
            .map(|(category, count)| CategoryShare {
                category_id: category.id.clone(),
                name: category.name.clone(),
                count,
                percentage: percentage(count, total),
            })
            .collect();

        DistributionReport {
            total_titles: total,
            categories,
            high_confidence: results
                .iter()
                .filter(|r| r.confidence > HIGH_CONFIDENCE)
                .count(),
            low_confidence: results
                .iter()
                .filter(|r| r.confidence < LOW_CONFIDENCE)
                .count(),
            multi_category: results.iter().filter(|r| r.is_multi_label()).count(),
        }
    }

    /// Share of a category, if registered.
    pub fn share(&self, category_id: &str) -> Option<&CategoryShare> {
        self.categories
            .iter()
            .find(|share| share.category_id == category_id)
    }
}

/// `part / total` as a percentage rounded to 2 decimals; 0 for an empty total.
pub(crate) fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 * 10_000.0 / total as f64).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(primary: &str, confidence: f32, secondaries: &[&str]) -> ClassificationResult {
        ClassificationResult {
            title: String::new(),
            scores: Vec::new(),
            primary_category: primary.to_string(),
            secondary_categories: secondaries.iter().map(|s| s.to_string()).collect(),
            confidence,
            raw_confidence: confidence,
            margin: 0.0,
            semantic_available: false,
        }
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(2, 3), 66.67);
        assert_eq!(percentage(0, 0), 0.0);
    }

    #[test]
    fn test_compute() {
        let registry = CategoryRegistry::from_json_str(
            r#"{"categories": [
                {"id": "A", "name": "Alpha", "keywords": ["a"], "anchors": ["a"]},
                {"id": "B", "keywords": ["b"], "anchors": ["b"]},
                {"id": "C", "keywords": ["c"], "anchors": ["c"]}
            ]}"#,
            "test",
        )
        .unwrap();
        let results = vec![
            result("A", 0.9, &["B"]),
            result("A", 0.5, &[]),
            result("B", 0.1, &[]),
            result("ZZZ", 0.5, &[]),
        ];

        let report = DistributionReport::compute(&registry, &results);
        assert_eq!(report.total_titles, 4);
        assert_eq!(report.categories.len(), 3);
        assert_eq!(report.categories[0].name, "Alpha");
        assert_eq!(report.share("A").unwrap().count, 2);
        assert_eq!(report.share("A").unwrap().percentage, 50.0);
        assert_eq!(report.share("C").unwrap().count, 0);
        assert_eq!(report.high_confidence, 1);
        assert_eq!(report.low_confidence, 1);
        assert_eq!(report.multi_category, 1);
    }
}
