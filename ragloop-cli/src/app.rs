//! Wiring: settings from the command line and environment, then the commands.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use ragloop_agent::openai::{OpenAIChatOracle, OpenAIConfig};
use ragloop_agent::{AgentConfig, AgentResponse, ReactAgent};
use ragloop_rag::openai::OpenAIEmbeddingProvider;
use ragloop_rag::{DirectoryCorpus, RagConfig, RagPipeline, RenderedContext};
use tracing::info;

use crate::cli::{Cli, Command};

/// Everything needed to build the pipeline and the agent.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub base_url: Option<String>,
    pub data_dir: PathBuf,
    pub max_chunks: usize,
    pub chat_model: String,
    pub embedding_model: String,
}

impl Settings {
    /// Combine parsed arguments with `OPENAI_API_KEY`.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .context("OPENAI_API_KEY not set in environment or .env")?;

        Ok(Self {
            api_key,
            base_url: cli.base_url.clone(),
            data_dir: cli.data_dir.clone(),
            max_chunks: cli.max_chunks,
            chat_model: cli.chat_model.clone(),
            embedding_model: cli.embedding_model.clone(),
        })
    }
}

/// Embed the data directory into a ready-to-query pipeline.
pub async fn load_pipeline(settings: &Settings) -> Result<RagPipeline> {
    let mut embedder =
        OpenAIEmbeddingProvider::new(&settings.api_key)?.with_model(&settings.embedding_model);
    if let Some(base_url) = &settings.base_url {
        embedder = embedder.with_base_url(base_url);
    }

    let mut pipeline = RagPipeline::builder()
        .config(RagConfig::builder().max_chunks(settings.max_chunks).build()?)
        .embedding_provider(Arc::new(embedder))
        .build()?;

    let corpus = DirectoryCorpus::markdown(&settings.data_dir);
    pipeline
        .load(&corpus)
        .await
        .with_context(|| format!("failed to load corpus from {}", settings.data_dir.display()))?;
    Ok(pipeline)
}

/// Run the parsed command, printing results to stdout.
pub async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::from_cli(&cli)?;
    let pipeline = Arc::new(load_pipeline(&settings).await?);

    match cli.command {
        Command::Ask { question, max_steps, json } => {
            let oracle_config = match &settings.base_url {
                Some(base_url) => {
                    OpenAIConfig::compatible(&settings.api_key, base_url, &settings.chat_model)
                }
                None => OpenAIConfig::new(&settings.api_key, &settings.chat_model),
            };
            let agent = ReactAgent::builder()
                .oracle(Arc::new(OpenAIChatOracle::new(oracle_config)?))
                .pipeline(pipeline)
                .config(AgentConfig::builder().max_steps(max_steps).build()?)
                .build()?;

            info!(question = %question, "answering");
            let response = agent.run(&question).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print!("{}", render_response(&response));
            }
        }
        Command::Search { query } => {
            let context = pipeline.build_context(&query).await?;
            print!("{}", render_search(&context));
        }
    }
    Ok(())
}

/// Human-readable answer followed by the reasoning trace.
pub fn render_response(response: &AgentResponse) -> String {
    let mut out = format!("{}\n", response.answer);
    if !response.steps.is_empty() {
        out.push_str("\nSteps:\n");
        for (i, step) in response.steps.iter().enumerate() {
            out.push_str(&format!("  {}. {}", i + 1, step.action));
            if !step.thought.is_empty() {
                out.push_str(&format!(" ({})", step.thought));
            }
            out.push('\n');
        }
    }
    if !response.retrieved_chunks.is_empty() {
        out.push_str("\nSources:\n");
        for chunk in &response.retrieved_chunks {
            out.push_str(&format!("  - {} [{}]\n", chunk.filename, chunk.id));
        }
    }
    out
}

fn render_search(context: &RenderedContext) -> String {
    if context.documents.is_empty() {
        return "No documents found.\n".to_string();
    }
    format!("{}\n", context.text.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragloop_agent::{ReasoningStep, RetrievedChunk};

    #[test]
    fn renders_answer_steps_and_sources() {
        let response = AgentResponse {
            answer: "Fourteen days.".into(),
            steps: vec![
                ReasoningStep {
                    thought: "need policy".into(),
                    action: "Search[refund window]".into(),
                    observation: "Retrieved documents from the knowledge base.".into(),
                },
                ReasoningStep {
                    thought: String::new(),
                    action: "Answer".into(),
                    observation: String::new(),
                },
            ],
            retrieved_chunks: vec![RetrievedChunk {
                id: "doc-0".into(),
                filename: "refunds.md".into(),
                text: "Refunds within 14 days.".into(),
            }],
        };

        assert_eq!(
            render_response(&response),
            concat!(
                "Fourteen days.\n\n",
                "Steps:\n  1. Search[refund window] (need policy)\n  2. Answer\n\n",
                "Sources:\n  - refunds.md [doc-0]\n",
            )
        );
    }

    #[test]
    fn empty_search_says_so() {
        assert_eq!(render_search(&RenderedContext::default()), "No documents found.\n");
    }
}
