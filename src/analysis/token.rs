//! Token types for text analysis.
//!
//! A [`Token`] is the unit flowing through the analysis pipeline: its text, its
//! position in the stream and its byte offsets in the (char-filtered) input.
//!
//! ```
//! use vitrine::analysis::token::{Token, TokenType};
//!
//! let token = Token::with_offsets("recette", 0, 0, 7).with_token_type(TokenType::Alpha);
//! assert_eq!(token.text, "recette");
//! assert_eq!(token.end_offset, 7);
//! ```

use serde::{Deserialize, Serialize};

/// A single analyzed token.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The text content of the token
    pub text: String,

    /// The position of the token in the token stream (0-based)
    pub position: usize,

    /// The byte offset where this token starts in the analyzed text
    pub start_offset: usize,

    /// The byte offset where this token ends in the analyzed text
    pub end_offset: usize,

    /// Content classification
    pub token_type: TokenType,
}

/// Token type classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenType {
    /// Alphabetic text
    Alpha,
    /// Numeric values
    Num,
    /// Mixed or other content
    Other,
}

impl TokenType {
    /// Classify a word by its characters.
    pub fn detect(word: &str) -> Self {
        if word.is_empty() {
            TokenType::Other
        } else if word.chars().all(char::is_numeric) {
            TokenType::Num
        } else if word.chars().all(char::is_alphabetic) {
            TokenType::Alpha
        } else {
            TokenType::Other
        }
    }
}

impl Token {
    /// Create a new token with the given text and position.
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        let text = text.into();
        let token_type = TokenType::detect(&text);
        Token {
            text,
            position,
            start_offset: 0,
            end_offset: 0,
            token_type,
        }
    }

    /// Create a new token with text, position, and byte offsets.
    pub fn with_offsets<S: Into<String>>(
        text: S,
        position: usize,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Token {
            start_offset,
            end_offset,
            ..Token::new(text, position)
        }
    }

    /// Override the token type.
    pub fn with_token_type(mut self, token_type: TokenType) -> Self {
        self.token_type = token_type;
        self
    }

    /// Whether the token is purely numeric.
    pub fn is_numeric(&self) -> bool {
        self.token_type == TokenType::Num
    }
}

/// Type alias for a stream of tokens.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_type_detection() {
        assert_eq!(TokenType::detect("2024"), TokenType::Num);
        assert_eq!(TokenType::detect("cuisine"), TokenType::Alpha);
        assert_eq!(TokenType::detect("remède"), TokenType::Alpha);
        assert_eq!(TokenType::detect("60ans"), TokenType::Other);
        assert_eq!(TokenType::detect(""), TokenType::Other);
    }

    #[test]
    fn test_token_with_offsets() {
        let token = Token::with_offsets("5", 0, 0, 1);
        assert!(token.is_numeric());
        assert_eq!(token.start_offset, 0);
        assert_eq!(token.end_offset, 1);
    }
}
