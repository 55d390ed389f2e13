//! The caller-facing result of a reasoning run.

use ragloop_rag::Document;
use serde::{Deserialize, Serialize};

/// Answer returned when the step budget runs out before an answer.
pub const EXHAUSTED_ANSWER: &str = "maximum reasoning steps exceeded";

/// One iteration of the loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningStep {
    /// The model's stated thought; empty when it gave none.
    pub thought: String,
    /// `Search[<query>]` or `Answer`.
    pub action: String,
    /// Short summary of what the action produced.
    pub observation: String,
}

/// A document surfaced by a search step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// Document id (`doc-N`).
    pub id: String,
    /// Display label of the document.
    pub filename: String,
    /// Full document text.
    pub text: String,
}

impl From<&Document> for RetrievedChunk {
    fn from(doc: &Document) -> Self {
        Self { id: doc.id.clone(), filename: doc.label().to_string(), text: doc.text.clone() }
    }
}

/// Final answer plus the audit trail that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentResponse {
    /// The final answer, the raw model output on protocol failure, or
    /// [`EXHAUSTED_ANSWER`].
    pub answer: String,
    /// Every iteration, in order.
    pub steps: Vec<ReasoningStep>,
    /// Every document retrieved across all searches, in order, duplicates kept.
    pub retrieved_chunks: Vec<RetrievedChunk>,
}

impl AgentResponse {
    /// Whether the run ended by exhausting its step budget.
    pub fn is_exhausted(&self) -> bool {
        self.answer == EXHAUSTED_ANSWER
    }
}
