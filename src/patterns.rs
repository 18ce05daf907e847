//! Headline pattern detection.
//!
//! A [`PatternCatalog`] holds pattern definitions grouped in families
//! (structural, authority, emotional, quantified, narrative, seasonal). The
//! [`PatternDetector`] tests every title against every definition
//! independently, then aggregates the matches per primary category into
//! [`PatternInsight`]s.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use vitrine::patterns::{PatternCatalog, PatternDetector};
//!
//! let detector = PatternDetector::new(Arc::new(PatternCatalog::builtin().unwrap()));
//! let found = detector.detect("5 remèdes naturels contre le mal de dos");
//! assert!(found.contains("numeric_leading_number"));
//! ```

pub mod catalog;
pub mod detector;
pub mod document;
pub mod insight;
pub mod ngrams;

pub use catalog::PatternCatalog;
pub use detector::PatternDetector;
pub use insight::{FamilyCount, InsightConfig, PatternFrequency, PatternInsight};
pub use ngrams::TermCount;

use std::fmt;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{Result, VitrineError};
use crate::features::{QUESTION_WORDS, is_all_caps};
use crate::scoring::keyword::contains_phrase;

/// Family a pattern belongs to.
///
/// Declaration order is the tie-break order when picking a dominant family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternFamily {
    Structural,
    Authority,
    Emotional,
    Quantified,
    Narrative,
    Seasonal,
}

impl PatternFamily {
    /// All families in declaration order.
    pub const ALL: [PatternFamily; 6] = [
        PatternFamily::Structural,
        PatternFamily::Authority,
        PatternFamily::Emotional,
        PatternFamily::Quantified,
        PatternFamily::Narrative,
        PatternFamily::Seasonal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternFamily::Structural => "structural",
            PatternFamily::Authority => "authority",
            PatternFamily::Emotional => "emotional",
            PatternFamily::Quantified => "quantified",
            PatternFamily::Narrative => "narrative",
            PatternFamily::Seasonal => "seasonal",
        }
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for PatternFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a phrase must occur in the title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhraseAnchor {
    #[default]
    Anywhere,
    Start,
    End,
}

/// Position-anchored tests on the raw title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralTest {
    StartsWithNumber,
    EndsWithQuestion,
    EndsWithExclamation,
    ContainsColon,
    ContainsQuote,
    StartsWithQuestionWord,
    /// Looks at the title's casing, unlike every other test.
    AllCapsWord,
    ContainsEllipsis,
    ContainsParentheses,
}

/// A title prepared once for all matchers.
#[derive(Debug, Clone)]
pub struct PreparedTitle<'a> {
    /// Trimmed original text.
    pub trimmed: &'a str,
    /// Trimmed, lowercased text.
    pub lower: String,
    /// Matching-analyzer terms.
    pub terms: Vec<String>,
}

impl StructuralTest {
    pub fn matches(&self, title: &PreparedTitle<'_>) -> bool {
        let text = title.trimmed;
        match self {
            StructuralTest::StartsWithNumber => text.starts_with(|c: char| c.is_ascii_digit()),
            StructuralTest::EndsWithQuestion => text.ends_with('?'),
            StructuralTest::EndsWithExclamation => text.ends_with('!'),
            StructuralTest::ContainsColon => text.contains(':'),
            StructuralTest::ContainsQuote => text.contains(['«', '»', '"', '“', '”']),
            StructuralTest::StartsWithQuestionWord => title
                .terms
                .first()
                .is_some_and(|first| QUESTION_WORDS.contains(&first.as_str())),
            StructuralTest::AllCapsWord => text.split_whitespace().any(is_all_caps),
            StructuralTest::ContainsEllipsis => text.contains("...") || text.contains('…'),
            StructuralTest::ContainsParentheses => text.contains(['(', ')']),
        }
    }
}

/// A compiled matcher.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Case-insensitive regular expression over the trimmed title.
    Regex(Regex),
    /// Any of the phrases, as whole analyzed words.
    Phrases {
        /// Analyzed terms of each phrase.
        phrases: Vec<Vec<String>>,
        anchor: PhraseAnchor,
    },
    Structural(StructuralTest),
}

impl Matcher {
    /// Compile a case-insensitive regular expression matcher.
    pub fn regex(pattern: &str) -> Result<Self> {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map(Matcher::Regex)
            .map_err(|e| VitrineError::pattern(format!("{pattern:?}: {e}")))
    }

    pub fn matches(&self, title: &PreparedTitle<'_>) -> bool {
        match self {
            Matcher::Regex(regex) => regex.is_match(&title.lower),
            Matcher::Phrases { phrases, anchor } => phrases.iter().any(|phrase| match anchor {
                PhraseAnchor::Anywhere => contains_phrase(&title.terms, phrase),
                PhraseAnchor::Start => title.terms.starts_with(phrase),
                PhraseAnchor::End => title.terms.ends_with(phrase),
            }),
            Matcher::Structural(test) => test.matches(title),
        }
    }
}

/// One pattern of the catalog.
#[derive(Debug, Clone)]
pub struct PatternDefinition {
    pub id: String,
    pub family: PatternFamily,
    pub matcher: Matcher,
    /// Category this pattern is usually associated with.
    pub category_affinity: Option<String>,
}

/// Patterns found in one title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternMatch {
    pub title: String,
    /// Matched pattern ids, in catalog order.
    pub matched_pattern_ids: Vec<String>,
}

impl PatternMatch {
    pub fn contains(&self, pattern_id: &str) -> bool {
        self.matched_pattern_ids.iter().any(|id| id == pattern_id)
    }

    pub fn is_empty(&self) -> bool {
        self.matched_pattern_ids.is_empty()
    }
}
