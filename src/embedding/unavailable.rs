//! Provider that never produces embeddings.
//!
//! Used when semantic scoring is switched off: every call fails with a
//! provider error, so the classifier runs on keyword scores alone through its
//! regular fallback path.

use async_trait::async_trait;

use crate::embedding::{EmbeddingProvider, Vector};
use crate::error::{Result, VitrineError};

/// An embedding provider that is always unavailable.
#[derive(Debug, Clone, Default)]
pub struct UnavailableProvider {
    reason: Option<String>,
}

impl UnavailableProvider {
    /// Creates a new `UnavailableProvider`.
    pub fn new() -> Self {
        Self { reason: None }
    }

    /// Creates a provider whose errors carry the given reason.
    pub fn with_reason<S: Into<String>>(reason: S) -> Self {
        Self {
            reason: Some(reason.into()),
        }
    }

    fn error(&self) -> VitrineError {
        VitrineError::provider(
            self.reason
                .clone()
                .unwrap_or_else(|| "no embedding provider configured".to_string()),
        )
    }
}

#[async_trait]
impl EmbeddingProvider for UnavailableProvider {
    async fn embed(&self, _text: &str) -> Result<Vector> {
        Err(self.error())
    }

    async fn embed_batch(&self, _texts: &[&str]) -> Result<Vec<Vector>> {
        Err(self.error())
    }

    fn dimension(&self) -> usize {
        0
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_embed_returns_error() {
        let provider = UnavailableProvider::new();
        assert!(provider.embed("bonjour").await.is_err());
        assert!(provider.embed_batch(&["a", "b"]).await.is_err());
    }

    #[tokio::test]
    async fn test_reason_in_error() {
        let provider = UnavailableProvider::with_reason("semantic scoring disabled");
        let err = provider.embed("x").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Embedding provider error: semantic scoring disabled"
        );
    }

    #[test]
    fn test_name_and_dimension() {
        let provider = UnavailableProvider::default();
        assert_eq!(provider.name(), "unavailable");
        assert_eq!(provider.dimension(), 0);
    }
}
