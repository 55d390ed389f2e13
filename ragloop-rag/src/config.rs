//! Configuration for the retrieval engine.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Configuration parameters for [`RagPipeline`](crate::RagPipeline).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Number of documents returned per retrieval.
    pub max_chunks: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self { max_chunks: 3 }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the number of documents returned per retrieval.
    pub fn max_chunks(mut self, k: usize) -> Self {
        self.config.max_chunks = k;
        self
    }

    /// Build the [`RagConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if `max_chunks == 0`.
    pub fn build(self) -> Result<RagConfig> {
        if self.config.max_chunks == 0 {
            return Err(RagError::ConfigError("max_chunks must be greater than zero".to_string()));
        }
        Ok(self.config)
    }
}
