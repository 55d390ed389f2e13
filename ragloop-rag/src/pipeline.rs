//! Retrieval engine.
//!
//! The [`RagPipeline`] loads a corpus into a fresh [`VectorIndex`] and answers
//! "which documents are relevant to this query" either as structured
//! [`Document`]s or as a labeled context block for a prompt.
//!
//! # Example
//!
//! ```rust,ignore
//! use ragloop_rag::{DirectoryCorpus, RagConfig, RagPipeline};
//!
//! let mut pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(my_embedder))
//!     .build()?;
//!
//! pipeline.load(&DirectoryCorpus::markdown("data")).await?;
//! let context = pipeline.render_context("search query", 3).await?;
//! ```

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::RagConfig;
use crate::corpus::CorpusSource;
use crate::document::{Document, RenderedContext, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::VectorIndex;

/// The retrieval engine.
///
/// Built once at startup, then only read. Share it as `Arc<RagPipeline>`.
pub struct RagPipeline {
    config: RagConfig,
    index: VectorIndex,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the underlying index.
    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    /// Read every document from `source` into a fresh index.
    ///
    /// Documents get ids `doc-0`, `doc-1`, ... in discovery order, with their
    /// text trimmed. Documents that are empty after trimming are skipped. An
    /// empty corpus is valid and produces an index that never returns results.
    ///
    /// Returns the number of documents indexed.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::CorpusError`] if the source cannot be read, or
    /// [`RagError::EmbeddingError`] if the documents cannot be embedded. On
    /// error the previously loaded index is kept.
    pub async fn load(&mut self, source: &dyn CorpusSource) -> Result<usize> {
        let texts = source.read().map_err(|e| {
            error!(error = %e, "failed to read corpus");
            e
        })?;

        let mut documents = Vec::with_capacity(texts.len());
        for raw in texts {
            let text = raw.text.trim();
            if text.is_empty() {
                warn!(label = %raw.label, "skipping empty document");
                continue;
            }
            let id = format!("doc-{}", documents.len());
            documents.push(Document::new(id, text, raw.label));
        }

        let mut index = VectorIndex::new(self.index.embedding_provider());
        if documents.is_empty() {
            warn!("corpus is empty; retrieval will return no documents");
        } else {
            index.add(documents).await.map_err(|e| {
                error!(error = %e, "failed to index corpus");
                e
            })?;
        }

        let document_count = index.len();
        self.index = index;
        info!(document_count, "corpus loaded");
        Ok(document_count)
    }

    /// Find the `max_chunks` documents most relevant to `query`, best first.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmbeddingError`] if the query cannot be embedded.
    pub async fn retrieve(&self, query: &str, max_chunks: usize) -> Result<Vec<Document>> {
        Ok(self.search(query, max_chunks).await?.into_iter().map(|r| r.document).collect())
    }

    /// Like [`retrieve`](Self::retrieve) but keeps the similarity scores.
    pub async fn search(&self, query: &str, max_chunks: usize) -> Result<Vec<SearchResult>> {
        let results = self.index.search(query, max_chunks).await.map_err(|e| {
            error!(error = %e, "vector search failed");
            e
        })?;
        info!(result_count = results.len(), "query completed");
        Ok(results)
    }

    /// Retrieve and render documents as labeled blocks for a prompt.
    ///
    /// Each block is `[Document {rank} | {label}]` followed by the text; blocks
    /// are separated by a blank line. Zero hits render as an empty string.
    pub async fn render_context(&self, query: &str, max_chunks: usize) -> Result<RenderedContext> {
        let documents = self.retrieve(query, max_chunks).await?;
        let text = render_blocks(&documents);
        Ok(RenderedContext { text, documents })
    }

    /// [`render_context`](Self::render_context) with the configured `max_chunks`.
    pub async fn build_context(&self, query: &str) -> Result<RenderedContext> {
        self.render_context(query, self.config.max_chunks).await
    }
}

fn render_blocks(documents: &[Document]) -> String {
    documents
        .iter()
        .enumerate()
        .map(|(i, doc)| format!("[Document {} | {}]\n{}\n", i + 1, doc.label(), doc.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

impl std::fmt::Debug for RagPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagPipeline")
            .field("config", &self.config)
            .field("index", &self.index)
            .finish()
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// The embedding provider is required; the config defaults to
/// [`RagConfig::default()`].
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Build an empty [`RagPipeline`]; call [`RagPipeline::load`] to fill it.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if the embedding provider is missing.
    pub fn build(self) -> Result<RagPipeline> {
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;

        Ok(RagPipeline {
            config: self.config.unwrap_or_default(),
            index: VectorIndex::new(embedding_provider),
        })
    }
}
