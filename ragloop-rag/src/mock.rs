//! Deterministic embedding providers for tests and offline demos.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// Hash-based embeddings: identical text always maps to the identical unit vector.
#[derive(Debug)]
pub struct MockEmbeddingProvider {
    dimensions: usize,
    calls: AtomicUsize,
    fail: bool,
}

impl MockEmbeddingProvider {
    /// Create a provider producing `dimensions`-long vectors.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions, calls: AtomicUsize::new(0), fail: false }
    }

    /// A provider whose every call fails with [`RagError::EmbeddingError`].
    pub fn failing(dimensions: usize) -> Self {
        Self { fail: true, ..Self::new(dimensions) }
    }

    /// Number of `embed`/`embed_batch` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vector(&self, text: &str) -> Vec<f32> {
        let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        let mut emb = vec![0.0f32; self.dimensions];
        for (i, v) in emb.iter_mut().enumerate() {
            // Mix in integer space; casting the raw hash to f32 drops the low bits.
            let x = mix(hash.wrapping_add(i as u64));
            *v = (x >> 40) as f32 / (1u64 << 24) as f32 * 2.0 - 1.0;
        }
        normalize(&mut emb);
        emb
    }

    fn check(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RagError::EmbeddingError {
                provider: "Mock".into(),
                message: "embedding service unavailable".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.check()?;
        Ok(self.vector(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.check()?;
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "Mock"
    }
}

/// Bag-of-words embeddings over a fixed vocabulary.
///
/// Dimension `i` counts case-insensitive occurrences of `vocabulary[i]` among
/// the whitespace-separated words of the text (punctuation stripped). Texts
/// sharing no vocabulary word embed to the zero vector.
#[derive(Debug, Clone)]
pub struct KeywordEmbeddingProvider {
    vocabulary: Vec<String>,
}

impl KeywordEmbeddingProvider {
    /// Create a provider over `vocabulary`.
    pub fn new<S: Into<String>>(vocabulary: impl IntoIterator<Item = S>) -> Self {
        Self { vocabulary: vocabulary.into_iter().map(|w| w.into().to_lowercase()).collect() }
    }

    fn vector(&self, text: &str) -> Vec<f32> {
        let mut emb = vec![0.0f32; self.vocabulary.len()];
        for word in text.split_whitespace() {
            let word = word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
            if let Some(i) = self.vocabulary.iter().position(|v| *v == word) {
                emb[i] += 1.0;
            }
        }
        emb
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.vector(text))
    }

    fn dimensions(&self) -> usize {
        self.vocabulary.len()
    }

    fn name(&self) -> &str {
        "Keyword"
    }
}

/// splitmix64 finalizer.
fn mix(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

fn normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
}
