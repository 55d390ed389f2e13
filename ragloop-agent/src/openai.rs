//! OpenAI chat-completions oracle.
//!
//! This module is only available when the `openai` feature is enabled.
//! Works with any server that speaks the OpenAI `/chat/completions` API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{AgentError, Result};
use crate::oracle::{Oracle, Role, Turn};

/// The default OpenAI API base.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// The default chat model.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

/// The default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

const PROVIDER: &str = "OpenAI";

/// Connection settings for [`OpenAIChatOracle`].
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAIConfig {
    /// Bearer token sent with every request.
    pub api_key: String,
    /// Chat model name.
    pub model: String,
    /// API base, without the trailing `/chat/completions`.
    pub base_url: String,
    /// Sampling temperature.
    pub temperature: f32,
}

impl OpenAIConfig {
    /// Settings for the public OpenAI API.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: OPENAI_API_BASE.into(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Settings for an OpenAI-compatible API (Ollama, vLLM, ...).
    pub fn compatible(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, ..Self::new(api_key, model) }
    }

    /// Override the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// An [`Oracle`] backed by the chat-completions endpoint.
pub struct OpenAIChatOracle {
    client: reqwest::Client,
    config: OpenAIConfig,
}

impl OpenAIChatOracle {
    /// Create a new oracle.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ConfigError`] if the API key is empty.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(AgentError::ConfigError("API key must not be empty".into()));
        }
        Ok(Self { client: reqwest::Client::new(), config })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }
}

// ── OpenAI API request/response types ──────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

fn oracle_error(message: impl Into<String>) -> AgentError {
    AgentError::OracleError { provider: PROVIDER.into(), message: message.into() }
}

// ── Oracle implementation ──────────────────────────────────────────

#[async_trait]
impl Oracle for OpenAIChatOracle {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, turns: &[Turn]) -> Result<String> {
        debug!(
            provider = PROVIDER,
            model = %self.config.model,
            turn_count = turns.len(),
            "chat completion"
        );

        let request_body = ChatRequest {
            model: &self.config.model,
            messages: turns
                .iter()
                .map(|t| ChatMessage { role: role_name(t.role), content: &t.content })
                .collect(),
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = PROVIDER, error = %e, "request failed");
                oracle_error(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(provider = PROVIDER, %status, "API error");
            return Err(oracle_error(format!("API returned {status}: {detail}")));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to parse response");
            oracle_error(format!("failed to parse response: {e}"))
        })?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                error!(provider = PROVIDER, "response had no message content");
                oracle_error("response had no message content")
            })
    }
}
