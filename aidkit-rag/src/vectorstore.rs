//! Vector store trait for storing and searching vector embeddings.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::document::{Chunk, SearchResult};
use crate::error::Result;

/// Parameters recorded when a collection is created.
///
/// The embedding model identity is stored alongside the vectors so that a
/// persisted collection is never queried with a different model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionSpec {
    /// Dimensionality of the stored vectors.
    pub dimensions: usize,
    /// Stable identity of the embedding model that produced the vectors.
    pub embedding_model: String,
}

/// The observed state of a named collection.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionStatus {
    /// The collection has never been created (or was deleted).
    Missing,
    /// Persisted state exists but cannot be read back.
    Corrupt,
    /// The collection is readable and queryable.
    Ready {
        /// Number of stored chunks.
        entries: usize,
        /// The collection's recorded creation parameters.
        spec: CollectionSpec,
    },
}

/// A storage backend for vector embeddings with similarity search.
///
/// Implementations manage named collections of [`Chunk`]s and support
/// upserting, deleting, and searching by vector similarity.
///
/// # Example
///
/// ```rust,ignore
/// use aidkit_rag::{VectorStore, InMemoryVectorStore, CollectionSpec};
///
/// let store = InMemoryVectorStore::new();
/// let spec = CollectionSpec { dimensions: 384, embedding_model: "mock".into() };
/// store.create_collection("manuals", &spec).await?;
/// store.upsert("manuals", &chunks).await?;
/// let results = store.search("manuals", &query_embedding, 5).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create a named collection. No-op if it already exists with the same spec.
    async fn create_collection(&self, name: &str, spec: &CollectionSpec) -> Result<()>;

    /// Delete a named collection and all its data. No-op if absent.
    async fn delete_collection(&self, name: &str) -> Result<()>;

    /// Report the state of a named collection without mutating it.
    async fn status(&self, name: &str) -> Result<CollectionStatus>;

    /// Upsert chunks into a collection. Chunks must have embeddings set.
    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()>;

    /// Delete chunks by their IDs from a collection.
    async fn delete(&self, collection: &str, ids: &[&str]) -> Result<()>;

    /// Search for the `top_k` most similar chunks to the given embedding.
    ///
    /// Returns results ordered by descending similarity score.
    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>>;
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Score every chunk against `embedding` and keep the best `top_k`.
///
/// Ties are broken by chunk id so repeated searches over an unchanged
/// collection return identical ordered results.
pub(crate) fn rank_chunks<'a, I>(chunks: I, embedding: &[f32], top_k: usize) -> Vec<SearchResult>
where
    I: Iterator<Item = &'a Chunk>,
{
    let mut scored: Vec<SearchResult> = chunks
        .map(|chunk| {
            let score = cosine_similarity(&chunk.embedding, embedding);
            SearchResult { chunk: chunk.clone(), score }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.chunk.id.cmp(&b.chunk.id))
    });
    scored.truncate(top_k);
    scored
}
