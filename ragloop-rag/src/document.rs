//! Data types for documents, index entries, and retrieved context.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Metadata key holding the human-readable label of a document.
pub const FILENAME_KEY: &str = "filename";

/// A source document containing text content and metadata.
///
/// Documents are immutable once loaded; the index hands out clones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Synthetic identifier, unique within one loaded corpus (`doc-0`, `doc-1`, ...).
    pub id: String,
    /// The trimmed text content of the document.
    pub text: String,
    /// Key-value metadata; carries at least [`FILENAME_KEY`] for file-backed corpora.
    pub metadata: HashMap<String, String>,
}

impl Document {
    /// Create a document with a display label stored under [`FILENAME_KEY`].
    pub fn new(id: impl Into<String>, text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata: HashMap::from([(FILENAME_KEY.to_string(), label.into())]),
        }
    }

    /// The display label, falling back to the document id.
    pub fn label(&self) -> &str {
        self.metadata.get(FILENAME_KEY).map(String::as_str).unwrap_or(&self.id)
    }
}

/// A [`Document`] paired with its embedding inside a [`VectorIndex`](crate::VectorIndex).
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    /// The stored document.
    pub document: Document,
    /// The embedding computed for the document's text.
    pub embedding: Vec<f32>,
    /// Position at which the entry was inserted; used only for tie-breaking.
    pub position: usize,
}

/// A retrieved [`Document`] paired with its cosine similarity to the query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved document.
    pub document: Document,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}

/// The output of [`RagPipeline::render_context`](crate::RagPipeline::render_context).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedContext {
    /// Labeled document blocks joined by blank lines, ready for a prompt.
    pub text: String,
    /// The documents behind `text`, in rank order.
    pub documents: Vec<Document>,
}
