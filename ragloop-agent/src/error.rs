//! Error types for the `ragloop-agent` crate.

use ragloop_rag::RagError;
use thiserror::Error;

/// Errors that abort a reasoning run.
///
/// Protocol violations in the model's output are not errors; they end the run
/// with the raw output as the answer.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The text-completion oracle failed or returned a malformed response.
    #[error("Oracle error ({provider}): {message}")]
    OracleError {
        /// The oracle backend that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// Retrieval failed, typically because the query could not be embedded.
    #[error(transparent)]
    Retrieval(#[from] RagError),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// A convenience result type for agent operations.
pub type Result<T> = std::result::Result<T, AgentError>;
