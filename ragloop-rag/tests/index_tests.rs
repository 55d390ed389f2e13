//! Property and behaviour tests for vector index search.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use proptest::prelude::*;
use ragloop_rag::document::Document;
use ragloop_rag::embedding::EmbeddingProvider;
use ragloop_rag::error::{RagError, Result};
use ragloop_rag::index::VectorIndex;
use ragloop_rag::mock::MockEmbeddingProvider;

/// Returns a fixed vector per known text; unknown texts are an error.
struct TableEmbeddingProvider {
    table: HashMap<String, Vec<f32>>,
    dimensions: usize,
}

impl TableEmbeddingProvider {
    fn new(dimensions: usize, pairs: impl IntoIterator<Item = (String, Vec<f32>)>) -> Self {
        Self { table: pairs.into_iter().collect(), dimensions }
    }
}

#[async_trait]
impl EmbeddingProvider for TableEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.table.get(text).cloned().ok_or_else(|| RagError::EmbeddingError {
            provider: "Table".into(),
            message: format!("no vector for '{text}'"),
        })
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Drops the last vector of every batch.
struct ShortBatchProvider;

#[async_trait]
impl EmbeddingProvider for ShortBatchProvider {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(vec![1.0, 0.0])
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().skip(1).map(|_| vec![1.0, 0.0]).collect())
    }

    fn dimensions(&self) -> usize {
        2
    }

    fn name(&self) -> &str {
        "ShortBatch"
    }
}

fn doc(i: usize, text: &str) -> Document {
    Document::new(format!("doc-{i}"), text, format!("{i}.md"))
}

/// Generate a non-zero embedding of the given dimension.
fn arb_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter("non-zero embedding", |v| {
        v.iter().map(|x| x * x).sum::<f32>().sqrt() > 1e-6
    })
}

/// *For any* stored vectors and query, search returns `min(k, n)` results in
/// descending score order, and the entry count tracks the document count.
mod prop_search_ordering {
    use super::*;

    const DIM: usize = 16;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn results_ordered_descending_and_sized_min_k_n(
            vectors in proptest::collection::vec(arb_embedding(DIM), 1..20),
            query in arb_embedding(DIM),
            k in 0usize..25,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let (results, len) = rt.block_on(async {
                let mut pairs: Vec<(String, Vec<f32>)> = vectors
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (format!("text-{i}"), v.clone()))
                    .collect();
                pairs.push(("query".to_string(), query.clone()));
                let provider = Arc::new(TableEmbeddingProvider::new(DIM, pairs));

                let mut index = VectorIndex::new(provider);
                let docs = (0..vectors.len()).map(|i| doc(i, &format!("text-{i}"))).collect();
                index.add(docs).await.unwrap();
                let results = index.search("query", k).await.unwrap();
                (results, index.len())
            });

            prop_assert_eq!(len, vectors.len());
            prop_assert_eq!(results.len(), k.min(vectors.len()));

            for window in results.windows(2) {
                prop_assert!(
                    window[0].score >= window[1].score,
                    "results not in descending order: {} < {}",
                    window[0].score,
                    window[1].score,
                );
            }
        }
    }
}

#[tokio::test]
async fn empty_index_returns_nothing_without_embedding() {
    let provider = Arc::new(MockEmbeddingProvider::new(8));
    let index = VectorIndex::new(provider.clone());

    assert!(index.search("anything", 5).await.unwrap().is_empty());
    assert!(index.search("", 0).await.unwrap().is_empty());
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn equal_scores_keep_insertion_order() {
    let same = vec![1.0, 0.0, 0.0];
    let provider = Arc::new(TableEmbeddingProvider::new(
        3,
        [
            ("first".to_string(), same.clone()),
            ("second".to_string(), same.clone()),
            ("third".to_string(), vec![0.0, 1.0, 0.0]),
            ("fourth".to_string(), same.clone()),
            ("q".to_string(), vec![2.0, 0.0, 0.0]),
        ],
    ));

    let mut index = VectorIndex::new(provider);
    index
        .add(vec![doc(0, "first"), doc(1, "second"), doc(2, "third"), doc(3, "fourth")])
        .await
        .unwrap();

    let ids: Vec<_> =
        index.search("q", 4).await.unwrap().into_iter().map(|r| r.document.id).collect();
    assert_eq!(ids, vec!["doc-0", "doc-1", "doc-3", "doc-2"]);
}

#[tokio::test]
async fn exact_text_match_ranks_first() {
    let provider = Arc::new(MockEmbeddingProvider::new(64));
    let texts = [
        "Refunds are issued within 14 days of a return.",
        "Shipping takes three to five business days.",
        "Support is available around the clock via chat.",
        "Gift cards never expire and can be combined.",
    ];

    let mut index = VectorIndex::new(provider);
    index.add(texts.iter().enumerate().map(|(i, t)| doc(i, t)).collect()).await.unwrap();

    for (i, text) in texts.iter().enumerate() {
        let results = index.search(text, 2).await.unwrap();
        assert_eq!(results[0].document.id, format!("doc-{i}"));
        assert!((results[0].score - 1.0).abs() < 1e-4);
    }
}

#[tokio::test]
async fn add_appends_without_reordering() {
    let provider = Arc::new(MockEmbeddingProvider::new(8));
    let mut index = VectorIndex::new(provider);

    index.add(vec![doc(0, "a"), doc(1, "b")]).await.unwrap();
    index.add(vec![doc(2, "c")]).await.unwrap();
    index.add(Vec::new()).await.unwrap();

    let positions: Vec<_> =
        index.entries().iter().map(|e| (e.position, e.document.id.as_str())).collect();
    assert_eq!(positions, vec![(0, "doc-0"), (1, "doc-1"), (2, "doc-2")]);
    assert_eq!(index.dimensions(), Some(8));
}

#[tokio::test]
async fn mismatched_dimensions_are_rejected_atomically() {
    let provider = Arc::new(TableEmbeddingProvider::new(
        2,
        [("short".to_string(), vec![1.0, 0.0]), ("long".to_string(), vec![1.0, 0.0, 0.0])],
    ));
    let mut index = VectorIndex::new(provider);
    index.add(vec![doc(0, "short")]).await.unwrap();

    let err = index.add(vec![doc(1, "long")]).await.unwrap_err();
    assert!(matches!(err, RagError::DimensionMismatch { expected: 2, actual: 3 }));
    assert_eq!(index.len(), 1);
}

#[tokio::test]
async fn embedding_failure_surfaces_and_leaves_index_unchanged() {
    let mut index = VectorIndex::new(Arc::new(MockEmbeddingProvider::failing(8)));
    let err = index.add(vec![doc(0, "a")]).await.unwrap_err();
    assert!(matches!(err, RagError::EmbeddingError { .. }));
    assert!(index.is_empty());
}

#[tokio::test]
async fn short_batch_is_rejected_and_leaves_index_unchanged() {
    let mut index = VectorIndex::new(Arc::new(ShortBatchProvider));
    let err = index.add(vec![doc(0, "a"), doc(1, "b"), doc(2, "c")]).await.unwrap_err();
    match err {
        RagError::EmbeddingError { provider, message } => {
            assert_eq!(provider, "ShortBatch");
            assert!(message.contains("expected 3 embeddings, got 2"), "{message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(index.is_empty());
}

#[tokio::test]
async fn query_with_wrong_dimensions_is_rejected() {
    let provider = Arc::new(TableEmbeddingProvider::new(
        3,
        [
            ("a".to_string(), vec![1.0, 0.0, 0.0]),
            ("b".to_string(), vec![0.0, 1.0, 0.01]),
            ("q".to_string(), vec![1.0, 0.0]),
        ],
    ));
    let mut index = VectorIndex::new(provider);
    index.add(vec![doc(0, "a"), doc(1, "b")]).await.unwrap();

    let err = index.search("q", 2).await.unwrap_err();
    assert!(matches!(err, RagError::DimensionMismatch { expected: 3, actual: 2 }));
}
