//! Category registry: the topical taxonomy titles are classified into.
//!
//! A registry is loaded once from a taxonomy document (see
//! [`document::TaxonomyDocument`]), validated strictly, and is immutable
//! afterwards. It is shared by reference (usually through an `Arc`) with every
//! scorer; no synchronization is needed since nothing mutates it.
//!
//! # Examples
//!
//! ```
//! use vitrine::taxonomy::CategoryRegistry;
//!
//! let registry = CategoryRegistry::from_json_str(
//!     r#"{"categories": [
//!         {"id": "A", "keywords": ["recette", "cuisine"], "anchors": ["cuisine"]},
//!         {"id": "B", "keywords": [["sport", 2.0]], "anchors": ["sport"]}
//!     ]}"#,
//!     "inline",
//! )
//! .unwrap();
//!
//! assert_eq!(registry.len(), 2);
//! assert_eq!(registry.lookup("B").unwrap().keywords[0].weight, 2.0);
//! assert!(registry.lookup("C").is_err());
//! ```

pub mod document;

use std::fs;
use std::path::Path;

use ahash::AHashMap;
use log::info;
use serde::Serialize;

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use crate::error::{Result, VitrineError};
use crate::taxonomy::document::{
    CategoryDocument, DEFAULT_KEYWORD_WEIGHT, KeywordEntry, TaxonomyDocument,
};

/// Number of categories in the Discover taxonomy.
pub const DISCOVER_CATEGORY_COUNT: usize = 12;

const BUILTIN_TAXONOMY: &str = include_str!("taxonomy/discover_taxonomy.json");
const BUILTIN_SOURCE: &str = "<builtin taxonomy>";

/// A weighted keyword phrase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Keyword {
    /// Phrase as written in the taxonomy.
    pub phrase: String,
    /// Signal strength, always > 0.
    pub weight: f32,
    /// Normalized (matching-analyzer) tokens of the phrase; matched
    /// contiguously against title tokens.
    pub terms: Vec<String>,
}

/// A category of the taxonomy.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    /// Stable short code.
    pub id: String,
    /// Display name.
    pub name: String,
    pub emoji: Option<String>,
    pub description: Option<String>,
    /// Keywords in taxonomy order.
    pub keywords: Vec<Keyword>,
    /// Reference phrases describing the semantic center of the category.
    pub anchors: Vec<String>,
}

impl Category {
    /// Name prefixed with the emoji when there is one.
    pub fn display_label(&self) -> String {
        match &self.emoji {
            Some(emoji) => format!("{emoji} {}", self.name),
            None => self.name.clone(),
        }
    }
}

/// The loaded, validated, immutable taxonomy.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
    index: AHashMap<String, usize>,
    version: Option<String>,
    source: String,
}

impl CategoryRegistry {
    /// The built-in 12-category Discover taxonomy.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_TAXONOMY, BUILTIN_SOURCE)
    }

    /// Load a taxonomy from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|e| {
            VitrineError::config(&source, format!("cannot read taxonomy file: {e}"))
        })?;
        Self::from_json_str(&content, &source)
    }

    /// Load a taxonomy from a JSON string; `source` names it in errors.
    pub fn from_json_str(json: &str, source: &str) -> Result<Self> {
        let document: TaxonomyDocument = serde_json::from_str(json)
            .map_err(|e| VitrineError::config(source, format!("malformed taxonomy: {e}")))?;
        Self::from_document(document, source)
    }

    /// Validate a parsed document and build the registry.
    pub fn from_document(document: TaxonomyDocument, source: &str) -> Result<Self> {
        if document.categories.is_empty() {
            return Err(VitrineError::config(source, "taxonomy defines no categories"));
        }

        let analyzer = PipelineAnalyzer::matching();
        let mut categories = Vec::with_capacity(document.categories.len());
        let mut index = AHashMap::with_capacity(document.categories.len());

        for raw in document.categories {
            let category = build_category(raw, &analyzer, source)?;
            if index.contains_key(&category.id) {
                return Err(VitrineError::config(
                    source,
                    format!("duplicate category id '{}'", category.id),
                ));
            }
            index.insert(category.id.clone(), categories.len());
            categories.push(category);
        }

        info!(
            "Loaded {} categories from {} (version {})",
            categories.len(),
            source,
            document.version.as_deref().unwrap_or("unversioned")
        );

        Ok(CategoryRegistry {
            categories,
            index,
            version: document.version,
            source: source.to_string(),
        })
    }

    /// Look up a category by id.
    pub fn lookup(&self, id: &str) -> Result<&Category> {
        self.get(id)
            .ok_or_else(|| VitrineError::not_found(format!("category '{id}'")))
    }

    /// Look up a category by id, returning `None` when absent.
    pub fn get(&self, id: &str) -> Option<&Category> {
        self.index.get(id).map(|&i| &self.categories[i])
    }

    /// Registry position of a category id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Whether the id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Categories in registry order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Category ids in registry order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Where the taxonomy was loaded from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

fn build_category(
    raw: CategoryDocument,
    analyzer: &PipelineAnalyzer,
    source: &str,
) -> Result<Category> {
    let id = raw.id.trim().to_string();
    if id.is_empty() {
        return Err(VitrineError::config(source, "category with an empty id"));
    }

    if raw.keywords.is_empty() {
        return Err(VitrineError::config(
            source,
            format!("category '{id}' has no keywords"),
        ));
    }

    let keywords = raw
        .keywords
        .iter()
        .map(|entry| build_keyword(entry, &id, analyzer, source))
        .collect::<Result<Vec<_>>>()?;
    let total_weight: f32 = keywords.iter().map(|k| k.weight).sum();
    if !total_weight.is_finite() {
        return Err(VitrineError::config(
            source,
            format!("category '{id}': keyword weights sum to {total_weight}"),
        ));
    }

    let anchors: Vec<String> = raw
        .anchors
        .into_iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect();
    if anchors.is_empty() {
        return Err(VitrineError::config(
            source,
            format!("category '{id}' has no similarity anchors"),
        ));
    }

    let name = raw
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| id.clone());

    Ok(Category {
        id,
        name,
        emoji: raw.emoji.filter(|e| !e.trim().is_empty()),
        description: raw.description,
        keywords,
        anchors,
    })
}

fn build_keyword(
    entry: &KeywordEntry,
    category_id: &str,
    analyzer: &PipelineAnalyzer,
    source: &str,
) -> Result<Keyword> {
    let phrase = entry.phrase().trim();

    let weight = match entry.raw_weight() {
        None => DEFAULT_KEYWORD_WEIGHT as f32,
        Some(value) => value.as_f64().ok_or_else(|| {
            VitrineError::config(
                source,
                format!("category '{category_id}': keyword '{phrase}' has non-numeric weight {value}"),
            )
        })? as f32,
    };
    // Checked after narrowing: huge values overflow to inf, tiny ones round to 0.
    if !weight.is_finite() || weight <= 0.0 {
        return Err(VitrineError::config(
            source,
            format!("category '{category_id}': keyword '{phrase}' has invalid weight {weight} (must be > 0)"),
        ));
    }

    let terms = analyzer.terms(phrase)?;
    if terms.is_empty() {
        return Err(VitrineError::config(
            source,
            format!("category '{category_id}': keyword '{phrase}' contains no words"),
        ));
    }

    Ok(Keyword {
        phrase: phrase.to_string(),
        weight,
        terms,
    })
}
