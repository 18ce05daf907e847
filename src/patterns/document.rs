//! Serialized form of a pattern catalog.

use serde::{Deserialize, Serialize};

use crate::patterns::{PatternFamily, PhraseAnchor, StructuralTest};

/// Top-level catalog document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub patterns: Vec<PatternDocument>,
}

/// One pattern as written in the catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternDocument {
    pub id: String,
    pub family: PatternFamily,
    pub matcher: MatcherDocument,
    #[serde(default)]
    pub category_affinity: Option<String>,
}

/// Matcher description, tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatcherDocument {
    Regex {
        pattern: String,
    },
    Phrases {
        phrases: Vec<String>,
        #[serde(default)]
        anchor: PhraseAnchor,
    },
    Structural {
        test: StructuralTest,
    },
}
