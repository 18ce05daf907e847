//! Per-category aggregation of pattern matches.

use serde::{Deserialize, Serialize};

use crate::analysis::token_filter::StopFilter;
use crate::classifier::distribution::percentage;
use crate::patterns::ngrams::{TermCount, top_ngrams, top_words};
use crate::patterns::{PatternCatalog, PatternFamily, PatternMatch};
use crate::taxonomy::Category;

/// Settings of the insight aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    /// Most frequent patterns reported per category.
    pub top_k: usize,
    /// Example titles kept per pattern.
    pub examples_per_pattern: usize,
    pub ngram_min: usize,
    pub ngram_max: usize,
    /// N-grams seen fewer times are dropped.
    pub min_ngram_count: usize,
    pub top_ngrams: usize,
    pub top_words: usize,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            examples_per_pattern: 3,
            ngram_min: 2,
            ngram_max: 5,
            min_ngram_count: 3,
            top_ngrams: 20,
            top_words: 20,
        }
    }
}

/// How often one pattern matched within a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternFrequency {
    pub pattern_id: String,
    pub family: PatternFamily,
    pub count: usize,
    /// Share of the category's titles, rounded to 2 decimals.
    pub percentage: f64,
    pub examples: Vec<String>,
}

/// Matches of one family within a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyCount {
    pub family: PatternFamily,
    pub count: usize,
}

/// Pattern statistics of the titles whose primary category is `category_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternInsight {
    pub category_id: String,
    pub category_name: String,
    pub titles_count: usize,
    /// Family with the most matches; `None` without any match.
    pub dominant_family: Option<PatternFamily>,
    /// Every family, in family order.
    pub family_counts: Vec<FamilyCount>,
    /// Every matched pattern, most frequent first, ties in catalog order.
    pub patterns: Vec<PatternFrequency>,
    /// The first `top_k` of `patterns`.
    pub top_patterns: Vec<PatternFrequency>,
    /// Mean title length in characters.
    pub avg_length: f64,
    /// Shortest and longest title length.
    pub length_range: Option<(usize, usize)>,
    pub top_ngrams: Vec<TermCount>,
    pub top_words: Vec<TermCount>,
    pub advice: Vec<String>,
}

impl PatternInsight {
    /// Aggregate the matches of the titles assigned to `category`.
    ///
    /// `group` pairs each title's match record with its lowercase tokens.
    pub(crate) fn build(
        category: &Category,
        catalog: &PatternCatalog,
        group: &[(&PatternMatch, Vec<String>)],
        config: &InsightConfig,
    ) -> Self {
        let titles_count = group.len();

        let mut pattern_counts = vec![0usize; catalog.len()];
        let mut examples: Vec<Vec<String>> = vec![Vec::new(); catalog.len()];
        for (found, _) in group {
            for id in &found.matched_pattern_ids {
                if let Some(position) = catalog.position(id) {
                    pattern_counts[position] += 1;
                    if examples[position].len() < config.examples_per_pattern {
                        examples[position].push(found.title.clone());
                    }
                }
            }
        }

        let mut family_totals = [0usize; PatternFamily::ALL.len()];
        let mut patterns: Vec<PatternFrequency> = Vec::new();
        for ((definition, count), examples) in catalog
            .patterns()
            .iter()
            .zip(pattern_counts)
            .zip(examples)
        {
            if count == 0 {
                continue;
            }
            family_totals[definition.family.index()] += count;
            patterns.push(PatternFrequency {
                pattern_id: definition.id.clone(),
                family: definition.family,
                count,
                percentage: percentage(count, titles_count),
                examples,
            });
        }
        // Stable sort keeps catalog order among equal counts.
        patterns.sort_by(|a, b| b.count.cmp(&a.count));
        let top_patterns: Vec<PatternFrequency> =
            patterns.iter().take(config.top_k).cloned().collect();

        let family_counts: Vec<FamilyCount> = PatternFamily::ALL
            .iter()
            .map(|&family| FamilyCount {
                family,
                count: family_totals[family.index()],
            })
            .collect();
        let dominant_family = family_counts
            .iter()
            .filter(|f| f.count > 0)
            .fold(None::<&FamilyCount>, |best, f| match best {
                Some(b) if b.count >= f.count => Some(b),
                _ => Some(f),
            })
            .map(|f| f.family);

        let lengths: Vec<usize> = group
            .iter()
            .map(|(found, _)| found.title.trim().chars().count())
            .collect();
        let avg_length = if lengths.is_empty() {
            0.0
        } else {
            lengths.iter().sum::<usize>() as f64 / lengths.len() as f64
        };
        let length_range = lengths
            .iter()
            .min()
            .copied()
            .zip(lengths.iter().max().copied());

        let tokens: Vec<Vec<String>> = group.iter().map(|(_, t)| t.clone()).collect();
        let top_ngrams = top_ngrams(
            &tokens,
            config.ngram_min,
            config.ngram_max,
            config.min_ngram_count,
            config.top_ngrams,
        );
        let top_words = top_words(&tokens, &StopFilter::new(), config.top_words);

        let mut insight = PatternInsight {
            category_id: category.id.clone(),
            category_name: category.name.clone(),
            titles_count,
            dominant_family,
            family_counts,
            patterns,
            top_patterns,
            avg_length,
            length_range,
            top_ngrams,
            top_words,
            advice: Vec::new(),
        };
        insight.advice = insight.compute_advice();
        insight
    }

    /// Matches of a family.
    pub fn family_count(&self, family: PatternFamily) -> usize {
        self.family_counts
            .iter()
            .find(|f| f.family == family)
            .map_or(0, |f| f.count)
    }

    /// Frequency of a pattern, if it matched at least once.
    pub fn pattern(&self, pattern_id: &str) -> Option<&PatternFrequency> {
        self.patterns.iter().find(|p| p.pattern_id == pattern_id)
    }

    fn compute_advice(&self) -> Vec<String> {
        let mut advice = Vec::new();
        if self.titles_count == 0 {
            return advice;
        }

        let avg = self.avg_length as i64;
        advice.push(format!(
            "Longueur optimale : {} à {} caractères",
            (avg - 10).max(0),
            avg + 10
        ));
        if let Some(dominant) = self.top_patterns.first() {
            advice.push(format!(
                "Pattern dominant : {}",
                dominant.pattern_id.replace('_', " ")
            ));
        }
        if !self.top_words.is_empty() {
            let words: Vec<&str> = self
                .top_words
                .iter()
                .take(5)
                .map(|w| w.term.as_str())
                .collect();
            advice.push(format!("Mots-clés performants : {}", words.join(", ")));
        }
        if self.family_count(PatternFamily::Quantified) > 0 {
            advice.push("Les chiffres augmentent l'engagement".to_string());
        }
        if self.family_count(PatternFamily::Emotional) > 0 {
            advice.push("Les déclencheurs émotionnels sont efficaces".to_string());
        }
        advice
    }
}
