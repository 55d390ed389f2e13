//! # ragloop-agent
//!
//! A bounded reasoning loop that answers questions over a `ragloop-rag`
//! knowledge base.
//!
//! ## Overview
//!
//! The model is prompted to reply with a `Thought:` line and an `Action:` line
//! naming one of two actions:
//!
//! - `Search[<query>]` - retrieve documents and show them to the model
//! - `Answer[<text>]` - stop with this answer
//!
//! [`parse_response`] turns model text into an [`Action`]; [`ReactAgent`]
//! drives the loop for at most [`AgentConfig::max_steps`] oracle calls and
//! returns an [`AgentResponse`] with the answer, the step trace, and every
//! retrieved document.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ragloop_agent::{AgentConfig, ReactAgent};
//! use ragloop_agent::openai::{OpenAIChatOracle, OpenAIConfig};
//!
//! let oracle = OpenAIChatOracle::new(OpenAIConfig::new(api_key, "gpt-4o-mini"))?;
//! let agent = ReactAgent::builder()
//!     .oracle(Arc::new(oracle))
//!     .pipeline(Arc::new(pipeline))
//!     .config(AgentConfig::default())
//!     .build()?;
//!
//! let response = agent.run("What is the refund window?").await?;
//! ```

pub mod action;
pub mod config;
pub mod error;
pub mod mock;
#[cfg(feature = "openai")]
pub mod openai;
pub mod oracle;
pub mod react;
pub mod response;

pub use action::{Action, ParsedResponse, parse_response};
pub use config::{AgentConfig, AgentConfigBuilder};
pub use error::{AgentError, Result};
pub use mock::MockOracle;
pub use oracle::{Oracle, Role, Turn};
pub use react::{ReactAgent, ReactAgentBuilder, SEARCH_OBSERVATION, system_prompt};
pub use response::{AgentResponse, EXHAUSTED_ANSWER, ReasoningStep, RetrievedChunk};
