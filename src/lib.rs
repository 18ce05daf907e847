//! # Vitrine
//!
//! Topic classification and headline pattern mining for content-discovery
//! feeds.
//!
//! ## Features
//!
//! - Hybrid classifier blending weighted keyword matching with embedding similarity
//! - Multi-label output with primary/secondary categories and a confidence score
//! - Keyword-only fallback when the embedding provider is unavailable
//! - Declarative pattern catalog (regex, anchored phrases, structural tests)
//! - Per-category pattern insights, recurring n-grams and editorial advice
//! - Parallel batch processing on a rayon thread pool

pub mod analysis;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod features;
pub mod patterns;
pub mod scoring;
pub mod taxonomy;

pub mod prelude {
    pub use crate::classifier::{ClassificationResult, ClassifierConfig, HybridClassifier};
    pub use crate::embedding::{EmbeddingProvider, HashingProvider, Vector};
    pub use crate::engine::{BatchReport, DiscoverEngine};
    pub use crate::error::{Result, VitrineError};
    pub use crate::patterns::{PatternCatalog, PatternDetector, PatternMatch};
    pub use crate::taxonomy::CategoryRegistry;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
