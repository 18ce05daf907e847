//! Serialized form of a taxonomy.
//!
//! Taxonomy files are loosely typed: a keyword may be a bare phrase, a
//! `["phrase", weight]` pair or a `{"phrase", "weight"}` object. These types
//! only mirror the file; [`crate::taxonomy::CategoryRegistry`] turns them into
//! the strict runtime schema and rejects anything malformed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default weight of a keyword given without one.
pub const DEFAULT_KEYWORD_WEIGHT: f64 = 1.0;

/// Top-level taxonomy document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyDocument {
    /// Free-form version label of the taxonomy.
    #[serde(default)]
    pub version: Option<String>,
    /// Categories in display order.
    #[serde(default)]
    pub categories: Vec<CategoryDocument>,
}

/// One category as written in the taxonomy file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDocument {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<KeywordEntry>,
    #[serde(default)]
    pub anchors: Vec<String>,
}

/// A keyword entry in any of the accepted shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeywordEntry {
    /// `"phrase"`, weighted [`DEFAULT_KEYWORD_WEIGHT`].
    Plain(String),
    /// `["phrase", weight]`
    Pair(String, Value),
    /// `{"phrase": "...", "weight": ...}`
    Weighted {
        phrase: String,
        #[serde(default)]
        weight: Option<Value>,
    },
}

impl KeywordEntry {
    /// The phrase text.
    pub fn phrase(&self) -> &str {
        match self {
            KeywordEntry::Plain(phrase)
            | KeywordEntry::Pair(phrase, _)
            | KeywordEntry::Weighted { phrase, .. } => phrase,
        }
    }

    /// The raw weight value, if one was written.
    pub fn raw_weight(&self) -> Option<&Value> {
        match self {
            KeywordEntry::Plain(_) => None,
            KeywordEntry::Pair(_, weight) => Some(weight),
            KeywordEntry::Weighted { weight, .. } => weight.as_ref(),
        }
    }
}
