//! # ragloop-rag
//!
//! Retrieval for ragloop: embed a small local corpus once, then find the
//! documents most similar to a query by exact cosine similarity.
//!
//! ## Overview
//!
//! - [`EmbeddingProvider`] - text to vectors, backed by an external service
//! - [`VectorIndex`] - ordered (document, vector) entries with k-NN search
//! - [`CorpusSource`] - where documents come from ([`DirectoryCorpus`], [`InMemoryCorpus`])
//! - [`RagPipeline`] - loads a corpus and renders retrieved documents as prompt context
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ragloop_rag::{DirectoryCorpus, RagConfig, RagPipeline};
//! use ragloop_rag::openai::OpenAIEmbeddingProvider;
//!
//! let mut pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(OpenAIEmbeddingProvider::from_env()?))
//!     .build()?;
//! pipeline.load(&DirectoryCorpus::markdown("data")).await?;
//!
//! let context = pipeline.build_context("how are refunds handled?").await?;
//! println!("{}", context.text);
//! ```
//!
//! ## Features
//!
//! - `openai` (default) - [`openai::OpenAIEmbeddingProvider`]

pub mod config;
pub mod corpus;
pub mod document;
pub mod embedding;
pub mod error;
pub mod index;
pub mod mock;
#[cfg(feature = "openai")]
pub mod openai;
pub mod pipeline;

pub use config::{RagConfig, RagConfigBuilder};
pub use corpus::{CorpusSource, DirectoryCorpus, InMemoryCorpus, SourceText};
pub use document::{Document, FILENAME_KEY, IndexEntry, RenderedContext, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use index::{VectorIndex, cosine_similarity};
#[cfg(feature = "openai")]
pub use openai::OpenAIEmbeddingProvider;
pub use pipeline::{RagPipeline, RagPipelineBuilder};
