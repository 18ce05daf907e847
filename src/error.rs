//! Error types for the Vitrine library.
//!
//! All fallible operations return [`VitrineError`]. Configuration problems are
//! fatal and reported at load time, unknown category lookups are surfaced to the
//! caller, and embedding provider failures are recovered inside the semantic
//! scorer (they only reach the caller through the provider API itself).
//!
//! # Examples
//!
//! ```
//! use vitrine::error::{Result, VitrineError};
//!
//! fn load() -> Result<()> {
//!     Err(VitrineError::config("taxonomy.json", "category 'x' has no keywords"))
//! }
//!
//! match load() {
//!     Ok(_) => println!("loaded"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Vitrine operations.
#[derive(Error, Debug)]
pub enum VitrineError {
    /// Malformed or incomplete taxonomy, pattern catalog or engine configuration.
    #[error("Configuration error in {source_name}: {message}")]
    Config {
        /// Where the configuration came from (file path, `<builtin>`, ...).
        source_name: String,
        /// What is wrong with it.
        message: String,
    },

    /// Lookup of an unknown category or pattern id.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Embedding provider unavailable or failed.
    #[error("Embedding provider error: {0}")]
    Provider(String),

    /// A matcher expression could not be compiled.
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// Invalid argument supplied by the caller
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O errors (reading configuration or title files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with VitrineError.
pub type Result<T> = std::result::Result<T, VitrineError>;

impl VitrineError {
    /// Create a new configuration error tied to its source.
    pub fn config<S: Into<String>, M: Into<String>>(source: S, message: M) -> Self {
        VitrineError::Config {
            source_name: source.into(),
            message: message.into(),
        }
    }

    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        VitrineError::NotFound(msg.into())
    }

    /// Create a new provider error.
    pub fn provider<S: Into<String>>(msg: S) -> Self {
        VitrineError::Provider(msg.into())
    }

    /// Create a new pattern error.
    pub fn pattern<S: Into<String>>(msg: S) -> Self {
        VitrineError::Pattern(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        VitrineError::InvalidArgument(msg.into())
    }

    /// Create a new timeout error.
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        VitrineError::Provider(format!("Timeout: {}", msg.into()))
    }

    /// Create a new internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        VitrineError::Other(format!("Internal error: {}", msg.into()))
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        VitrineError::Other(msg.into())
    }

    /// Whether this error is a configuration error.
    pub fn is_config(&self) -> bool {
        matches!(self, VitrineError::Config { .. })
    }

    /// Whether this error is a not found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, VitrineError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = VitrineError::config("taxonomy.json", "duplicate id 'sport'");
        assert_eq!(
            error.to_string(),
            "Configuration error in taxonomy.json: duplicate id 'sport'"
        );
        assert!(error.is_config());

        let error = VitrineError::not_found("category 'zzz'");
        assert_eq!(error.to_string(), "Not found: category 'zzz'");
        assert!(error.is_not_found());

        let error = VitrineError::timeout("embed_batch after 10ms");
        assert_eq!(
            error.to_string(),
            "Embedding provider error: Timeout: embed_batch after 10ms"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = VitrineError::from(io_error);

        match error {
            VitrineError::Io(_) => {}
            _ => panic!("Expected IO error variant"),
        }
    }
}
