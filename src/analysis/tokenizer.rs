//! Tokenizer splitting text on Unicode word boundaries (UAX #29).
//!
//! On top of the standard word segmentation, apostrophes split elisions
//! ("l'immobilier" → "l", "immobilier") and digit/letter transitions split
//! glued units ("10kg" → "10", "kg"), which is what French headlines need for
//! whole-token keyword matching.
//!
//! ```
//! use vitrine::analysis::tokenizer::{Tokenizer, UnicodeWordTokenizer};
//!
//! let tokenizer = UnicodeWordTokenizer::new();
//! let tokens: Vec<_> = tokenizer.tokenize("J'ai perdu 10kg !").unwrap().collect();
//! let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(texts, vec!["J", "ai", "perdu", "10", "kg"]);
//! ```

use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

/// A tokenizer that splits text on Unicode word boundaries.
#[derive(Clone, Debug)]
pub struct UnicodeWordTokenizer {
    split_alnum_transitions: bool,
}

impl Default for UnicodeWordTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl UnicodeWordTokenizer {
    /// Create a new Unicode word tokenizer.
    pub fn new() -> Self {
        UnicodeWordTokenizer {
            split_alnum_transitions: true,
        }
    }

    /// Keep "10kg"-style words whole.
    pub fn without_alnum_split(mut self) -> Self {
        self.split_alnum_transitions = false;
        self
    }

    /// Split a UAX #29 word into sub-words, reporting (offset, text) pairs.
    fn split_word<'a>(&self, word: &'a str, base: usize, out: &mut Vec<(usize, &'a str)>) {
        let mut start: Option<usize> = None;
        let mut prev_digit = false;

        for (i, c) in word.char_indices() {
            if !c.is_alphanumeric() {
                if let Some(s) = start.take() {
                    out.push((base + s, &word[s..i]));
                }
                continue;
            }
            let digit = c.is_numeric();
            match start {
                Some(s) if self.split_alnum_transitions && digit != prev_digit => {
                    out.push((base + s, &word[s..i]));
                    start = Some(i);
                }
                Some(_) => {}
                None => start = Some(i),
            }
            prev_digit = digit;
        }
        if let Some(s) = start {
            out.push((base + s, &word[s..]));
        }
    }
}

impl Tokenizer for UnicodeWordTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let mut pieces = Vec::new();
        for (offset, word) in text.split_word_bound_indices() {
            if word.chars().any(char::is_alphanumeric) {
                self.split_word(word, offset, &mut pieces);
            }
        }

        let tokens: Vec<Token> = pieces
            .into_iter()
            .enumerate()
            .map(|(position, (start, piece))| {
                Token::with_offsets(piece, position, start, start + piece.len())
            })
            .collect();

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "unicode_word"
    }
}
