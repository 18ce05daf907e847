//! Text analysis for headlines.
//!
//! Char filters, tokenizers and token filters composed into analyzers. Every
//! component of the crate that compares words (keyword scoring, phrase
//! matchers, n-gram mining) goes through the same [`analyzer::PipelineAnalyzer`].

pub mod analyzer;
pub mod char_filter;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::{Analyzer, PipelineAnalyzer};
pub use token::{Token, TokenStream, TokenType};
