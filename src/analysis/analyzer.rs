//! Analyzers combining char filters, a tokenizer and token filters.
//!
//! The [`PipelineAnalyzer`] applies processing in this order:
//! 1. Char filters normalize the raw text
//! 2. The tokenizer splits it into tokens
//! 3. Token filters are applied in the order they were added
//!
//! [`PipelineAnalyzer::title`] folds accents, splits words and lowercases.
//! [`PipelineAnalyzer::matching`] adds plural stemming and is used for both
//! keyword phrases and titles whenever they are compared, which is what makes
//! all matching case-, accent- and plural-insensitive.
//!
//! ```
//! use vitrine::analysis::analyzer::{Analyzer, PipelineAnalyzer};
//!
//! let analyzer = PipelineAnalyzer::title();
//! assert_eq!(
//!     analyzer.terms("5 Remèdes NATURELS").unwrap(),
//!     vec!["5", "remedes", "naturels"]
//! );
//! ```

use std::sync::Arc;

use crate::analysis::char_filter::{AccentFoldingCharFilter, CharFilter};
use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::{Filter, LightStemFilter, LowercaseFilter, StopFilter};
use crate::analysis::tokenizer::{Tokenizer, UnicodeWordTokenizer};
use crate::error::Result;

/// Trait for analyzers that turn text into a token stream.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer.
    fn name(&self) -> &str;

    /// Analyze and collect the token texts.
    fn terms(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.analyze(text)?.map(|t| t.text).collect())
    }

    /// Analyze and collect the tokens.
    fn tokens(&self, text: &str) -> Result<Vec<Token>> {
        Ok(self.analyze(text)?.collect())
    }
}

/// A configurable analyzer that combines a tokenizer with a chain of filters.
#[derive(Clone)]
pub struct PipelineAnalyzer {
    tokenizer: Arc<dyn Tokenizer>,
    char_filters: Vec<Arc<dyn CharFilter>>,
    filters: Vec<Arc<dyn Filter>>,
    name: String,
}

impl std::fmt::Debug for PipelineAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineAnalyzer")
            .field("name", &self.name)
            .field("tokenizer", &self.tokenizer.name())
            .field(
                "char_filters",
                &self.char_filters.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .field(
                "filters",
                &self.filters.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl PipelineAnalyzer {
    /// Create a new pipeline analyzer with the given tokenizer.
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        PipelineAnalyzer {
            name: format!("pipeline_{}", tokenizer.name()),
            tokenizer,
            char_filters: Vec::new(),
            filters: Vec::new(),
        }
    }

    /// Headline analyzer: accent folding, word tokenization, lowercasing.
    pub fn title() -> Self {
        PipelineAnalyzer::new(Arc::new(UnicodeWordTokenizer::new()))
            .add_char_filter(Arc::new(AccentFoldingCharFilter::new()))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .with_name("title")
    }

    /// Headline analyzer with plural stemming, for keyword and phrase matching.
    pub fn matching() -> Self {
        PipelineAnalyzer::title()
            .add_filter(Arc::new(LightStemFilter::new()))
            .with_name("matching")
    }

    /// Word tokenization and lowercasing only; accents are kept for display.
    pub fn lowercase() -> Self {
        PipelineAnalyzer::new(Arc::new(UnicodeWordTokenizer::new()))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .with_name("lowercase")
    }

    /// Headline analyzer that also drops French stop words.
    pub fn content_words() -> Self {
        PipelineAnalyzer::title()
            .add_filter(Arc::new(StopFilter::new()))
            .with_name("content_words")
    }

    /// Add a char filter to the pipeline.
    pub fn add_char_filter(mut self, char_filter: Arc<dyn CharFilter>) -> Self {
        self.char_filters.push(char_filter);
        self
    }

    /// Add a filter to the pipeline.
    pub fn add_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set the analyzer name.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }
}

impl Analyzer for PipelineAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let mut filtered = text.to_string();
        for char_filter in &self.char_filters {
            filtered = char_filter.filter(&filtered);
        }

        let mut tokens = self.tokenizer.tokenize(&filtered)?;
        for filter in &self.filters {
            tokens = filter.filter(tokens)?;
        }
        Ok(tokens)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_analyzer() {
        let analyzer = PipelineAnalyzer::title();
        assert_eq!(
            analyzer.terms("L'Exposition Picasso à Paris").unwrap(),
            vec!["l", "exposition", "picasso", "a", "paris"]
        );
        assert_eq!(analyzer.name(), "title");
    }

    #[test]
    fn test_matching_analyzer() {
        let analyzer = PipelineAnalyzer::matching();
        assert_eq!(
            analyzer.terms("5 Remèdes naturels").unwrap(),
            vec!["5", "remede", "naturel"]
        );
        assert_eq!(analyzer.name(), "matching");
    }

    #[test]
    fn test_lowercase_analyzer_keeps_accents() {
        let analyzer = PipelineAnalyzer::lowercase();
        assert_eq!(
            analyzer.terms("Noël à Québec").unwrap(),
            vec!["noël", "à", "québec"]
        );
    }

    #[test]
    fn test_content_words_analyzer() {
        let analyzer = PipelineAnalyzer::content_words();
        assert_eq!(
            analyzer.terms("Recette facile : le gratin dauphinois").unwrap(),
            vec!["recette", "facile", "gratin", "dauphinois"]
        );
    }

    #[test]
    fn test_empty_text() {
        let analyzer = PipelineAnalyzer::title();
        assert!(analyzer.terms("").unwrap().is_empty());
        assert!(analyzer.terms("   ").unwrap().is_empty());
    }
}
