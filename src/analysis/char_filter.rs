//! Char filters that normalize raw text before tokenization.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Trait for character filters that transform text before tokenization.
pub trait CharFilter: Send + Sync {
    /// Apply this filter to the input text.
    fn filter(&self, input: &str) -> String;

    /// Get the name of this char filter.
    fn name(&self) -> &'static str;
}

/// Removes diacritics so that "Remède" and "remede" analyze identically.
///
/// Text is decomposed (NFD), combining marks are dropped, and the common
/// ligatures and typographic apostrophes of French headlines are mapped to
/// their plain forms.
#[derive(Clone, Debug, Default)]
pub struct AccentFoldingCharFilter;

impl AccentFoldingCharFilter {
    /// Create a new accent folding filter.
    pub fn new() -> Self {
        AccentFoldingCharFilter
    }
}

impl CharFilter for AccentFoldingCharFilter {
    fn filter(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        for c in input.nfd().filter(|c| !is_combining_mark(*c)) {
            match c {
                'œ' => out.push_str("oe"),
                'Œ' => out.push_str("OE"),
                'æ' => out.push_str("ae"),
                'Æ' => out.push_str("AE"),
                '\u{2019}' | '\u{2018}' | '\u{02BC}' => out.push('\''),
                _ => out.push(c),
            }
        }
        out
    }

    fn name(&self) -> &'static str {
        "accent_folding"
    }
}
