//! The pattern catalog: validated, compiled pattern definitions.

use std::fs;
use std::path::Path;

use ahash::AHashMap;
use log::info;

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use crate::error::{Result, VitrineError};
use crate::patterns::document::{CatalogDocument, MatcherDocument, PatternDocument};
use crate::patterns::{Matcher, PatternDefinition, PatternFamily};
use crate::taxonomy::CategoryRegistry;

const BUILTIN_CATALOG: &str = include_str!("discover_patterns.json");
const BUILTIN_SOURCE: &str = "<builtin patterns>";

/// Compiled, immutable pattern catalog.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    patterns: Vec<PatternDefinition>,
    index: AHashMap<String, usize>,
    version: Option<String>,
    source: String,
}

impl PatternCatalog {
    /// The built-in Discover headline catalog.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_CATALOG, BUILTIN_SOURCE)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|e| {
            VitrineError::config(&source, format!("cannot read pattern catalog: {e}"))
        })?;
        Self::from_json_str(&content, &source)
    }

    pub fn from_json_str(json: &str, source: &str) -> Result<Self> {
        let document: CatalogDocument = serde_json::from_str(json)
            .map_err(|e| VitrineError::config(source, format!("malformed pattern catalog: {e}")))?;
        Self::from_document(document, source)
    }

    /// Validate and compile a parsed document.
    pub fn from_document(document: CatalogDocument, source: &str) -> Result<Self> {
        if document.patterns.is_empty() {
            return Err(VitrineError::config(source, "pattern catalog defines no patterns"));
        }

        let analyzer = PipelineAnalyzer::matching();
        let mut patterns = Vec::with_capacity(document.patterns.len());
        let mut index = AHashMap::with_capacity(document.patterns.len());

        for raw in document.patterns {
            let pattern = compile(raw, &analyzer, source)?;
            if index.contains_key(&pattern.id) {
                return Err(VitrineError::config(
                    source,
                    format!("duplicate pattern id '{}'", pattern.id),
                ));
            }
            index.insert(pattern.id.clone(), patterns.len());
            patterns.push(pattern);
        }

        info!(
            "Loaded {} patterns from {} (version {})",
            patterns.len(),
            source,
            document.version.as_deref().unwrap_or("unversioned")
        );

        Ok(Self {
            patterns,
            index,
            version: document.version,
            source: source.to_string(),
        })
    }

    /// Check that every category affinity names a registered category.
    pub fn validate_against(&self, registry: &CategoryRegistry) -> Result<()> {
        for pattern in &self.patterns {
            if let Some(category) = &pattern.category_affinity
                && !registry.contains(category)
            {
                return Err(VitrineError::config(
                    &self.source,
                    format!(
                        "pattern '{}' refers to unknown category '{category}'",
                        pattern.id
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Look up a pattern by id.
    pub fn lookup(&self, id: &str) -> Result<&PatternDefinition> {
        self.get(id)
            .ok_or_else(|| VitrineError::not_found(format!("pattern '{id}'")))
    }

    pub fn get(&self, id: &str) -> Option<&PatternDefinition> {
        self.index.get(id).map(|&i| &self.patterns[i])
    }

    /// Catalog position of a pattern id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Patterns in catalog order.
    pub fn patterns(&self) -> &[PatternDefinition] {
        &self.patterns
    }

    /// Patterns of one family, in catalog order.
    pub fn family(&self, family: PatternFamily) -> impl Iterator<Item = &PatternDefinition> {
        self.patterns.iter().filter(move |p| p.family == family)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

fn compile(
    raw: PatternDocument,
    analyzer: &PipelineAnalyzer,
    source: &str,
) -> Result<PatternDefinition> {
    let id = raw.id.trim().to_string();
    if id.is_empty() {
        return Err(VitrineError::config(source, "pattern with an empty id"));
    }

    let matcher = match raw.matcher {
        MatcherDocument::Regex { pattern } => Matcher::regex(&pattern)
            .map_err(|e| VitrineError::config(source, format!("pattern '{id}': {e}")))?,
        MatcherDocument::Phrases { phrases, anchor } => {
            let mut compiled = Vec::with_capacity(phrases.len());
            for phrase in &phrases {
                let terms = analyzer.terms(phrase)?;
                if terms.is_empty() {
                    return Err(VitrineError::config(
                        source,
                        format!("pattern '{id}' has a phrase with no words: {phrase:?}"),
                    ));
                }
                compiled.push(terms);
            }
            if compiled.is_empty() {
                return Err(VitrineError::config(
                    source,
                    format!("pattern '{id}' has no phrases"),
                ));
            }
            Matcher::Phrases {
                phrases: compiled,
                anchor,
            }
        }
        MatcherDocument::Structural { test } => Matcher::Structural(test),
    };

    Ok(PatternDefinition {
        id,
        family: raw.family,
        matcher,
        category_affinity: raw
            .category_affinity
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty()),
    })
}
