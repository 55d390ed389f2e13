//! Exact in-memory vector index using cosine similarity.
//!
//! [`VectorIndex`] keeps its entries in insertion order and answers queries
//! with a full linear scan. It is mutated only through `&mut self`, so a loaded
//! index can be shared behind an `Arc` and searched concurrently without locks.

use std::sync::Arc;

use tracing::{debug, error};

use crate::document::{Document, IndexEntry, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// Norms below this are clamped to avoid dividing by zero.
const NORM_EPSILON: f32 = 1e-8;

/// Compute cosine similarity between two vectors.
///
/// Each L2 norm is floor-clamped at `1e-8`, so an all-zero vector scores 0.0
/// against everything instead of producing NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt().max(NORM_EPSILON);
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt().max(NORM_EPSILON);
    dot / (norm_a * norm_b)
}

/// An ordered collection of (document, embedding) pairs with k-NN search.
///
/// # Example
///
/// ```rust,ignore
/// use ragloop_rag::VectorIndex;
///
/// let mut index = VectorIndex::new(Arc::new(embedder));
/// index.add(documents).await?;
/// let hits = index.search("how do I reset my key?", 3).await?;
/// ```
pub struct VectorIndex {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Create an empty index that embeds through `embedding_provider`.
    pub fn new(embedding_provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { embedding_provider, entries: Vec::new() }
    }

    /// The provider used for both stored documents and queries.
    pub fn embedding_provider(&self) -> Arc<dyn EmbeddingProvider> {
        Arc::clone(&self.embedding_provider)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored entries in insertion order.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Dimensionality of the stored vectors, if any are stored.
    pub fn dimensions(&self) -> Option<usize> {
        self.entries.first().map(|e| e.embedding.len())
    }

    /// Embed `documents` in one batched call and append them in order.
    ///
    /// The call is all-or-nothing: if embedding fails, the provider returns the
    /// wrong number of vectors, or a vector has the wrong length, the index is
    /// left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmbeddingError`] or [`RagError::DimensionMismatch`].
    pub async fn add(&mut self, documents: Vec<Document>) -> Result<()> {
        if documents.is_empty() {
            return Ok(());
        }

        let texts: Vec<&str> = documents.iter().map(|d| d.text.as_str()).collect();
        let embeddings = self.embedding_provider.embed_batch(&texts).await?;

        if embeddings.len() != documents.len() {
            error!(
                expected = documents.len(),
                actual = embeddings.len(),
                "embedding provider returned wrong number of vectors"
            );
            return Err(RagError::EmbeddingError {
                provider: self.embedding_provider.name().to_string(),
                message: format!(
                    "expected {} embeddings, got {}",
                    documents.len(),
                    embeddings.len()
                ),
            });
        }

        let expected = self.dimensions().or_else(|| embeddings.first().map(Vec::len));
        if let Some(expected) = expected {
            if let Some(bad) = embeddings.iter().find(|e| e.len() != expected) {
                return Err(RagError::DimensionMismatch { expected, actual: bad.len() });
            }
        }

        let start = self.entries.len();
        self.entries.extend(documents.into_iter().zip(embeddings).enumerate().map(
            |(offset, (document, embedding))| IndexEntry {
                document,
                embedding,
                position: start + offset,
            },
        ));

        debug!(added = self.entries.len() - start, total = self.entries.len(), "index grown");
        Ok(())
    }

    /// Return the `k` entries most similar to `query`, best first.
    ///
    /// Equal scores keep insertion order. An empty index or `k == 0` yields an
    /// empty result without calling the embedding provider.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmbeddingError`] if the query cannot be embedded,
    /// or [`RagError::DimensionMismatch`] if its vector has the wrong length.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        let Some(expected) = self.dimensions() else {
            return Ok(Vec::new());
        };
        if k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedding_provider.embed(query).await?;
        if query_embedding.len() != expected {
            error!(expected, actual = query_embedding.len(), "query vector has wrong length");
            return Err(RagError::DimensionMismatch { expected, actual: query_embedding.len() });
        }
        Ok(self.rank(&query_embedding, k))
    }

    /// Score every entry against an already computed query vector.
    pub fn rank(&self, query_embedding: &[f32], k: usize) -> Vec<SearchResult> {
        let mut scored: Vec<(f32, &IndexEntry)> = self
            .entries
            .iter()
            .map(|entry| (cosine_similarity(query_embedding, &entry.embedding), entry))
            .collect();

        // Stable sort: entries with equal scores stay in insertion order.
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored
            .into_iter()
            .take(k)
            .map(|(score, entry)| SearchResult { document: entry.document.clone(), score })
            .collect()
    }
}

impl std::fmt::Debug for VectorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorIndex")
            .field("provider", &self.embedding_provider.name())
            .field("len", &self.entries.len())
            .finish()
    }
}
