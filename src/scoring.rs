//! Per-category scorers combined by the hybrid classifier.
//!
//! - [`keyword::KeywordScorer`] - weighted whole-token phrase matching
//! - [`semantic::SemanticScorer`] - max cosine similarity against category anchors
//!
//! Both produce scores in [0, 1] and neither holds mutable state, so they can
//! be called from any number of worker threads at once.

pub mod keyword;
pub mod semantic;

pub use keyword::{KeywordScorer, KeywordScorerConfig};
pub use semantic::{AnchorEmbeddings, SemanticConfig, SemanticScorer, SimilarityMapping};
