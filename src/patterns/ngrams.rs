//! Frequent n-grams and words of a group of titles.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::analysis::char_filter::{AccentFoldingCharFilter, CharFilter};
use crate::analysis::token_filter::StopFilter;

/// A term with its number of occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCount {
    pub term: String,
    pub count: usize,
}

/// Count every n-gram with `min_n <= n <= max_n` over tokenized titles.
///
/// N-grams never span two titles.
pub fn ngram_counts(titles: &[Vec<String>], min_n: usize, max_n: usize) -> AHashMap<String, usize> {
    let mut counts = AHashMap::new();
    for tokens in titles {
        for n in min_n.max(1)..=max_n {
            for gram in tokens.windows(n) {
                *counts.entry(gram.join(" ")).or_insert(0) += 1;
            }
        }
    }
    counts
}

/// N-grams seen at least `min_count` times, most frequent first.
pub fn top_ngrams(
    titles: &[Vec<String>],
    min_n: usize,
    max_n: usize,
    min_count: usize,
    limit: usize,
) -> Vec<TermCount> {
    let counts = ngram_counts(titles, min_n, max_n)
        .into_iter()
        .filter(|(_, count)| *count >= min_count);
    ranked(counts, limit)
}

/// Most frequent words longer than three characters, stop words excluded.
pub fn top_words(titles: &[Vec<String>], stop_words: &StopFilter, limit: usize) -> Vec<TermCount> {
    let folding = AccentFoldingCharFilter::new();
    let mut counts: AHashMap<String, usize> = AHashMap::new();
    for word in titles.iter().flatten() {
        if word.chars().count() > 3 && !stop_words.is_stop_word(&folding.filter(word)) {
            *counts.entry(word.clone()).or_insert(0) += 1;
        }
    }
    ranked(counts, limit)
}

/// Sort by count desc then term asc, keep `limit`.
fn ranked(counts: impl IntoIterator<Item = (String, usize)>, limit: usize) -> Vec<TermCount> {
    let mut terms: Vec<TermCount> = counts
        .into_iter()
        .map(|(term, count)| TermCount { term, count })
        .collect();
    terms.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));
    terms.truncate(limit);
    terms
}
