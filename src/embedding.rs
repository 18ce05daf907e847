//! Embedding provider capability consumed by the semantic scorer.
//!
//! The crate never trains or runs a model itself: anything able to turn text
//! into a fixed-length vector can implement [`EmbeddingProvider`] and be
//! injected into the classifier. Provider failures are expected and handled by
//! the semantic scorer's keyword-only fallback.
//!
//! Two providers ship with the crate:
//!
//! - [`hashing::HashingProvider`] - deterministic feature-hashing embedder, no model needed
//! - [`unavailable::UnavailableProvider`] - always fails, forcing keyword-only scoring
//!
//! # Custom implementation
//!
//! ```
//! use async_trait::async_trait;
//! use vitrine::embedding::{EmbeddingProvider, Vector};
//! use vitrine::error::Result;
//!
//! struct ConstantProvider;
//!
//! #[async_trait]
//! impl EmbeddingProvider for ConstantProvider {
//!     async fn embed(&self, _text: &str) -> Result<Vector> {
//!         Ok(Vector::new(vec![1.0, 0.0, 0.0]))
//!     }
//!
//!     fn dimension(&self) -> usize {
//!         3
//!     }
//! }
//! ```

pub mod hashing;
pub mod unavailable;
pub mod vector;

use async_trait::async_trait;

use crate::error::Result;

pub use hashing::{DEFAULT_HASHING_DIMENSION, HashingProvider};
pub use unavailable::UnavailableProvider;
pub use vector::Vector;

/// Trait for converting text to vector embeddings.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for the given text.
    async fn embed(&self, text: &str) -> Result<Vector>;

    /// Generate embeddings for multiple texts in batch.
    ///
    /// The default implementation calls `embed` sequentially.
    /// Override this method when the backend supports batch requests.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Get the dimension of generated embeddings.
    fn dimension(&self) -> usize;

    /// Get the name/identifier of this provider, used in logs.
    fn name(&self) -> &str {
        "unknown"
    }
}
