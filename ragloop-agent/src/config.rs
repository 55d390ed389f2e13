//! Configuration for the reasoning loop.

use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};

/// Configuration parameters for [`ReactAgent`](crate::ReactAgent).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentConfig {
    /// Maximum number of oracle calls per question.
    pub max_steps: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self { max_steps: 3 }
    }
}

impl AgentConfig {
    /// Create a new builder for constructing an [`AgentConfig`].
    pub fn builder() -> AgentConfigBuilder {
        AgentConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`AgentConfig`].
#[derive(Debug, Clone, Default)]
pub struct AgentConfigBuilder {
    config: AgentConfig,
}

impl AgentConfigBuilder {
    /// Set the maximum number of oracle calls per question.
    pub fn max_steps(mut self, steps: usize) -> Self {
        self.config.max_steps = steps;
        self
    }

    /// Build the [`AgentConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ConfigError`] if `max_steps == 0`.
    pub fn build(self) -> Result<AgentConfig> {
        if self.config.max_steps == 0 {
            return Err(AgentError::ConfigError("max_steps must be greater than zero".to_string()));
        }
        Ok(self.config)
    }
}
