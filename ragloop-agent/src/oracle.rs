//! The text-completion oracle and the conversation it consumes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Who authored a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions that frame the whole conversation.
    System,
    /// The user, and observations fed back on the user's side.
    User,
    /// Earlier model outputs.
    Assistant,
}

/// One role-tagged message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// The author of the message.
    pub role: Role,
    /// The message text.
    pub content: String,
}

impl Turn {
    /// A system turn.
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    /// A user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    /// An assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// A language model treated as an untrusted text generator.
///
/// Given the conversation so far, returns one completion. Failures are
/// reported as [`AgentError::OracleError`](crate::AgentError::OracleError) and
/// are never retried by the caller.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Model name, used in logs.
    fn name(&self) -> &str;

    /// Complete the conversation.
    async fn complete(&self, turns: &[Turn]) -> Result<String>;
}
