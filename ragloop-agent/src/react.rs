//! The bounded Thought/Action loop.
//!
//! Each iteration asks the oracle for a `Thought:` and an `Action:`, then
//! either searches the knowledge base and feeds the result back, or stops with
//! an answer. Output that does not follow the protocol ends the run with the
//! raw output as the answer, so a run always terminates with some answer
//! unless a collaborator fails.

use std::sync::Arc;

use ragloop_rag::RagPipeline;
use tracing::{debug, info, warn};

use crate::action::{Action, parse_response};
use crate::config::AgentConfig;
use crate::error::{AgentError, Result};
use crate::oracle::{Oracle, Turn};
use crate::response::{AgentResponse, EXHAUSTED_ANSWER, ReasoningStep, RetrievedChunk};

/// Observation recorded for every search step.
pub const SEARCH_OBSERVATION: &str = "Retrieved documents from the knowledge base.";

/// Instructions sent as the system turn of every run.
pub fn system_prompt() -> &'static str {
    "You are a helpful assistant that uses a ReAct pattern.\n\
     You have access to one tool:\n\n\
     Tool: Search[query]\n \
     - Use this when you need to look up information in the knowledge base.\n \
     - It returns relevant document chunks.\n\n\
     When reasoning, follow this format:\n\
     Thought: ...\n\
     Action: Search[query]\n\
     or\n\
     Thought: ...\n\
     Action: Answer[final answer here]\n"
}

/// Answers questions by alternating model reasoning with knowledge-base search.
///
/// Holds no per-question state; one agent can serve concurrent callers.
///
/// # Example
///
/// ```rust,ignore
/// let agent = ReactAgent::builder()
///     .oracle(Arc::new(oracle))
///     .pipeline(Arc::new(pipeline))
///     .config(AgentConfig::default())
///     .build()?;
///
/// let response = agent.run("What is the refund window?").await?;
/// println!("{}", response.answer);
/// ```
pub struct ReactAgent {
    oracle: Arc<dyn Oracle>,
    pipeline: Arc<RagPipeline>,
    config: AgentConfig,
}

impl ReactAgent {
    /// Create a new [`ReactAgentBuilder`].
    pub fn builder() -> ReactAgentBuilder {
        ReactAgentBuilder::default()
    }

    /// Return a reference to the agent configuration.
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Answer `query`.
    ///
    /// Runs at most `max_steps` oracle calls. Exhausting the budget is not an
    /// error: the response carries [`EXHAUSTED_ANSWER`] and the steps so far.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::OracleError`] if a completion fails, or
    /// [`AgentError::Retrieval`] if a search fails. Nothing is retried.
    pub async fn run(&self, query: &str) -> Result<AgentResponse> {
        let mut conversation =
            vec![Turn::system(system_prompt()), Turn::user(format!("User question: {query}"))];
        let mut steps = Vec::new();
        let mut retrieved_chunks = Vec::new();

        for iteration in 1..=self.config.max_steps {
            debug!(iteration, oracle = self.oracle.name(), "calling oracle");
            let output = self.oracle.complete(&conversation).await?;
            let parsed = parse_response(&output);

            let search_query = match parsed.action {
                Action::Search(arg) if arg.is_empty() => query.to_string(),
                Action::Search(arg) => arg,
                Action::Answer(answer) => {
                    steps.push(answer_step(parsed.thought));
                    info!(iteration, step_count = steps.len(), "answered");
                    return Ok(AgentResponse { answer, steps, retrieved_chunks });
                }
                Action::Unparsed(raw) => {
                    warn!(iteration, "oracle output did not follow the action protocol");
                    steps.push(answer_step(parsed.thought));
                    return Ok(AgentResponse { answer: raw, steps, retrieved_chunks });
                }
            };

            debug!(iteration, query = %search_query, "searching");
            let context = self.pipeline.build_context(&search_query).await?;

            conversation.push(Turn::assistant(output));
            conversation.push(Turn::user(format!(
                "Observation: Retrieved documents:\n{}",
                context.text
            )));

            steps.push(ReasoningStep {
                thought: parsed.thought,
                action: Action::Search(search_query).to_string(),
                observation: SEARCH_OBSERVATION.to_string(),
            });
            retrieved_chunks.extend(context.documents.iter().map(RetrievedChunk::from));
        }

        info!(
            max_steps = self.config.max_steps,
            chunk_count = retrieved_chunks.len(),
            "step budget exhausted"
        );
        Ok(AgentResponse { answer: EXHAUSTED_ANSWER.to_string(), steps, retrieved_chunks })
    }
}

fn answer_step(thought: String) -> ReasoningStep {
    ReasoningStep { thought, action: "Answer".to_string(), observation: String::new() }
}

/// Builder for constructing a [`ReactAgent`].
///
/// The oracle and pipeline are required; the config defaults to
/// [`AgentConfig::default()`].
#[derive(Default)]
pub struct ReactAgentBuilder {
    oracle: Option<Arc<dyn Oracle>>,
    pipeline: Option<Arc<RagPipeline>>,
    config: Option<AgentConfig>,
}

impl ReactAgentBuilder {
    /// Set the text-completion oracle.
    pub fn oracle(mut self, oracle: Arc<dyn Oracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Set the retrieval pipeline used for `Search[...]` actions.
    pub fn pipeline(mut self, pipeline: Arc<RagPipeline>) -> Self {
        self.pipeline = Some(pipeline);
        self
    }

    /// Set the agent configuration.
    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the [`ReactAgent`].
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ConfigError`] if the oracle or pipeline is missing,
    /// or if `max_steps == 0`.
    pub fn build(self) -> Result<ReactAgent> {
        let oracle =
            self.oracle.ok_or_else(|| AgentError::ConfigError("oracle is required".to_string()))?;
        let pipeline = self
            .pipeline
            .ok_or_else(|| AgentError::ConfigError("pipeline is required".to_string()))?;
        let config = self.config.unwrap_or_default();
        if config.max_steps == 0 {
            return Err(AgentError::ConfigError("max_steps must be greater than zero".to_string()));
        }

        Ok(ReactAgent { oracle, pipeline, config })
    }
}
