//! Error types for the `ragloop-rag` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building or querying the retrieval engine.
#[derive(Debug, Error)]
pub enum RagError {
    /// The embedding service failed, was unreachable, or returned malformed data.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A vector did not match the dimensionality of the index.
    #[error("Dimension mismatch: index holds {expected}-dimensional vectors, got {actual}")]
    DimensionMismatch {
        /// Length of the vectors already stored.
        expected: usize,
        /// Length of the offending vector.
        actual: usize,
    },

    /// A corpus file exists but could not be read.
    #[error("Corpus error ({}): {message}", path.display())]
    CorpusError {
        /// The file that failed.
        path: PathBuf,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
