//! # ragloop-cli
//!
//! The `ragloop` binary: loads `.env`, reads `OPENAI_API_KEY`, embeds the
//! markdown files of a data directory once, then answers a question with the
//! reasoning loop (`ragloop ask`) or shows raw retrieval (`ragloop search`).
//!
//! Log output goes to stderr and is controlled by `RAGLOOP_LOG` or `-v`.

pub mod app;
pub mod cli;
pub mod logging;

pub use app::{Settings, load_pipeline, render_response, run};
pub use cli::{Cli, Command};
