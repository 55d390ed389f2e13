//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Answer questions over a folder of markdown documents.
#[derive(Debug, Parser)]
#[command(name = "ragloop", version, about)]
pub struct Cli {
    /// Directory whose top-level `*.md` files form the knowledge base.
    #[arg(long, global = true, default_value = "data")]
    pub data_dir: PathBuf,

    /// Documents retrieved per search.
    #[arg(long, global = true, default_value_t = 3)]
    pub max_chunks: usize,

    /// Chat model used for reasoning.
    #[arg(long, global = true, default_value = "gpt-4o-mini")]
    pub chat_model: String,

    /// Embedding model used for documents and queries.
    #[arg(long, global = true, default_value = "text-embedding-3-small")]
    pub embedding_model: String,

    /// OpenAI-compatible API base URL.
    #[arg(long, global = true, env = "OPENAI_BASE_URL")]
    pub base_url: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Answer a question with the reasoning loop.
    Ask {
        /// The question.
        question: String,

        /// Maximum number of model calls.
        #[arg(long, default_value_t = 3)]
        max_steps: usize,

        /// Print the full response as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show the documents retrieved for a query.
    Search {
        /// The search query.
        query: String,
    },
}
