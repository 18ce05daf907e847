//! Deterministic feature-hashing embedder.
//!
//! Each analyzed word (stop words removed) and each of its character
//! trigrams is hashed into a fixed number of buckets with a signed
//! contribution; the result is L2-normalized. Titles sharing words or word
//! stems ("recette" / "recettes") end up close in cosine space. This is a
//! lexical stand-in for a sentence-embedding model, good enough to run the
//! pipeline offline and fully reproducible.


use ahash::RandomState;
use async_trait::async_trait;

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use crate::embedding::{EmbeddingProvider, Vector};
use crate::error::{Result, VitrineError};

/// Default number of hash buckets.
pub const DEFAULT_HASHING_DIMENSION: usize = 256;

const WORD_WEIGHT: f32 = 1.0;
const TRIGRAM_WEIGHT: f32 = 0.5;

/// Feature-hashing embedding provider.
#[derive(Debug, Clone)]
pub struct HashingProvider {
    dimension: usize,
    analyzer: PipelineAnalyzer,
    hasher: RandomState,
}

impl Default for HashingProvider {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_HASHING_DIMENSION,
            analyzer: PipelineAnalyzer::content_words(),
            hasher: RandomState::with_seeds(
                0x5157_8a2d,
                0x9e37_79b9,
                0x7f4a_7c15,
                0x2545_f491,
            ),
        }
    }
}

impl HashingProvider {
    /// Create a provider with the given number of buckets.
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(VitrineError::invalid_argument(
                "hashing dimension must be greater than 0",
            ));
        }
        Ok(Self {
            dimension,
            ..Self::default()
        })
    }

    fn add_feature(&self, data: &mut [f32], feature: &str, weight: f32) {
        let hash = self.hasher.hash_one(feature);
        let bucket = (hash % self.dimension as u64) as usize;
        let sign = if (hash >> 63) == 0 { 1.0 } else { -1.0 };
        data[bucket] += sign * weight;
    }

    fn embed_sync(&self, text: &str) -> Result<Vector> {
        let mut data = vec![0.0; self.dimension];
        for term in self.analyzer.terms(text)? {
            self.add_feature(&mut data, &term, WORD_WEIGHT);

            let chars: Vec<char> = format!("^{term}$").chars().collect();
            for window in chars.windows(3) {
                let trigram: String = window.iter().collect();
                self.add_feature(&mut data, &trigram, TRIGRAM_WEIGHT);
            }
        }
        Ok(Vector::new(data).normalized())
    }
}

#[async_trait]
impl EmbeddingProvider for HashingProvider {
    async fn embed(&self, text: &str) -> Result<Vector> {
        self.embed_sync(text)
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        texts.iter().map(|text| self.embed_sync(text)).collect()
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "hashing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deterministic() {
        let provider = HashingProvider::default();
        let a = provider.embed("Recette de cuisine").await.unwrap();
        let b = provider.embed("Recette de cuisine").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.dimension(), DEFAULT_HASHING_DIMENSION);
    }

    #[tokio::test]
    async fn test_related_text_is_closer() {
        let provider = HashingProvider::default();
        let title = provider.embed("Les meilleures recettes de gâteau").await.unwrap();
        let cooking = provider.embed("recette gateau dessert").await.unwrap();
        let cars = provider.embed("voiture électrique permis").await.unwrap();
        assert!(title.cosine_similarity(&cooking) > title.cosine_similarity(&cars));
    }

    #[tokio::test]
    async fn test_empty_text_is_zero_vector() {
        let provider = HashingProvider::new(16).unwrap();
        let v = provider.embed("").await.unwrap();
        assert_eq!(v.norm(), 0.0);
    }

    #[tokio::test]
    async fn test_batch_matches_single() {
        let provider = HashingProvider::new(64).unwrap();
        let batch = provider.embed_batch(&["sport", "cuisine"]).await.unwrap();
        assert_eq!(batch[1], provider.embed("cuisine").await.unwrap());
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(HashingProvider::new(0).is_err());
    }
}
