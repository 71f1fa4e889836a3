//! Deterministic mock embedding provider for tests and offline runs.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::embedding::EmbeddingProvider;
use crate::error::Result;

/// A deterministic bag-of-words embedding provider.
///
/// Each whitespace-separated token is lowercased, stripped of punctuation,
/// and hashed into one of `dimensions` buckets; the resulting count vector
/// is L2-normalized. Texts sharing vocabulary score high under cosine
/// similarity, which is enough for retrieval tests without a real model.
///
/// # Example
///
/// ```rust,ignore
/// use aidkit_rag::MockEmbeddingProvider;
///
/// let provider = MockEmbeddingProvider::new(64);
/// let a = provider.embed("stop the bleeding").await?;
/// let b = provider.embed("how do I stop bleeding").await?;
/// // a and b share token buckets and have positive cosine similarity
/// ```
#[derive(Debug)]
pub struct MockEmbeddingProvider {
    dimensions: usize,
    model_id: String,
    calls: AtomicUsize,
}

impl MockEmbeddingProvider {
    /// Create a provider emitting vectors of the given dimensionality.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            model_id: "mock-bag-of-words".to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Override the reported model identity (for mismatch tests).
    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    /// Number of `embed` calls made so far (side channel for tests).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn bucket(&self, token: &str) -> usize {
        // FNV-1a, stable across platforms and runs
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in token.bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
        (hash % self.dimensions as u64) as usize
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut vector = vec![0.0f32; self.dimensions];
        for token in text.split_whitespace() {
            let token: String =
                token.chars().filter(|c| c.is_alphanumeric()).collect::<String>().to_lowercase();
            if token.is_empty() {
                continue;
            }
            vector[self.bucket(&token)] += 1.0;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn embedding_is_deterministic() {
        let provider = MockEmbeddingProvider::new(32);
        let a = provider.embed("apply direct pressure").await.unwrap();
        let b = provider.embed("apply direct pressure").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn shared_vocabulary_scores_higher() {
        let provider = MockEmbeddingProvider::new(64);
        let doc = provider.embed("apply direct pressure to stop bleeding").await.unwrap();
        let near = provider.embed("how do I stop bleeding").await.unwrap();
        let far = provider.embed("quarterly revenue forecast spreadsheet").await.unwrap();

        let dot = |a: &[f32], b: &[f32]| a.iter().zip(b).map(|(x, y)| x * y).sum::<f32>();
        assert!(dot(&doc, &near) > dot(&doc, &far));
    }
}
