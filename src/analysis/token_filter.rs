//! Token filters applied after tokenization.

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform a token stream.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter.
    fn name(&self) -> &'static str;
}

/// A filter that converts tokens to lowercase.
#[derive(Clone, Debug, Default)]
pub struct LowercaseFilter;

impl LowercaseFilter {
    /// Create a new lowercase filter.
    pub fn new() -> Self {
        LowercaseFilter
    }
}

impl Filter for LowercaseFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(tokens.map(|mut token| {
            if token.text.is_ascii() {
                token.text.make_ascii_lowercase();
            } else {
                token.text = token.text.to_lowercase();
            }
            token
        })))
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}

/// Minimal French plural stemmer.
///
/// Strips the plural mark of alphabetic tokens longer than three characters:
/// "-eaux" → "-eau", "-aux" → "-al", otherwise a final "s" (but not "ss") or
/// "x". Applied identically to keywords and titles, so "remèdes naturels"
/// matches the keywords "remède" and "naturel".
#[derive(Clone, Debug, Default)]
pub struct LightStemFilter;

impl LightStemFilter {
    /// Create a new light stem filter.
    pub fn new() -> Self {
        LightStemFilter
    }

    /// Stem a single lowercase word.
    pub fn stem(word: &str) -> String {
        let len = word.chars().count();
        if len <= 3 || !word.chars().all(char::is_alphabetic) {
            return word.to_string();
        }
        if let Some(stripped) = word.strip_suffix("eaux") {
            return format!("{stripped}eau");
        }
        if len > 4
            && let Some(stripped) = word.strip_suffix("aux")
        {
            return format!("{stripped}al");
        }
        if word.ends_with("ss") {
            return word.to_string();
        }
        word.strip_suffix('s')
            .or_else(|| word.strip_suffix('x'))
            .unwrap_or(word)
            .to_string()
    }
}

impl Filter for LightStemFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(tokens.map(|mut token| {
            token.text = LightStemFilter::stem(&token.text);
            token
        })))
    }

    fn name(&self) -> &'static str {
        "light_stem"
    }
}

/// French stop words, in folded (accent-free, lowercase) form.
const DEFAULT_FRENCH_STOP_WORDS: &[&str] = &[
    "le", "la", "les", "un", "une", "des", "de", "du", "pour", "et", "ou", "a", "avec", "sans",
    "sur", "dans", "par", "en", "ce", "ces", "cet", "cette", "qui", "que", "dont", "l", "d",
];

/// Default French stop words as a HashSet.
pub static DEFAULT_FRENCH_STOP_WORDS_SET: LazyLock<HashSet<String>> = LazyLock::new(|| {
    DEFAULT_FRENCH_STOP_WORDS
        .iter()
        .map(|&s| s.to_string())
        .collect()
});

/// A filter that removes stop words from the token stream.
///
/// Expects lowercase, accent-folded tokens; place it after
/// [`LowercaseFilter`] in a pipeline.
#[derive(Clone, Debug)]
pub struct StopFilter {
    stop_words: HashSet<String>,
}

impl Default for StopFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl StopFilter {
    /// Create a stop filter with the default French list.
    pub fn new() -> Self {
        StopFilter {
            stop_words: DEFAULT_FRENCH_STOP_WORDS_SET.clone(),
        }
    }

    /// Create a stop filter from a custom word list.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StopFilter {
            stop_words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Check whether a word is a stop word.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }
}

impl Filter for StopFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let stop_words = self.stop_words.clone();
        Ok(Box::new(
            tokens.filter(move |token| !stop_words.contains(&token.text)),
        ))
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    fn run(filter: &dyn Filter, words: &[&str]) -> Vec<String> {
        let tokens: Vec<Token> = words
            .iter()
            .enumerate()
            .map(|(i, w)| Token::new(*w, i))
            .collect();
        filter
            .filter(Box::new(tokens.into_iter()))
            .unwrap()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_lowercase_filter() {
        let filter = LowercaseFilter::new();
        assert_eq!(run(&filter, &["Recette", "ÉTÉ"]), vec!["recette", "été"]);
    }

    #[test]
    fn test_stop_filter() {
        let filter = StopFilter::new();
        assert_eq!(
            run(&filter, &["la", "meilleure", "recette", "de", "cuisine"]),
            vec!["meilleure", "recette", "cuisine"]
        );
        assert!(filter.is_stop_word("cette"));
        assert!(!filter.is_stop_word("cuisine"));
    }

    #[test]
    fn test_light_stem() {
        assert_eq!(LightStemFilter::stem("remedes"), "remede");
        assert_eq!(LightStemFilter::stem("naturels"), "naturel");
        assert_eq!(LightStemFilter::stem("chateaux"), "chateau");
        assert_eq!(LightStemFilter::stem("journaux"), "journal");
        assert_eq!(LightStemFilter::stem("stress"), "stress");
        assert_eq!(LightStemFilter::stem("ans"), "ans");
        assert_eq!(LightStemFilter::stem("2024"), "2024");

        let filter = LightStemFilter::new();
        assert_eq!(run(&filter, &["recettes", "faciles"]), vec!["recette", "facile"]);
    }

    #[test]
    fn test_custom_stop_words() {
        let filter = StopFilter::from_words(["foo"]);
        assert_eq!(run(&filter, &["foo", "le"]), vec!["le"]);
    }
}
