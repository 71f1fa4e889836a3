//! Query-time retrieval over the first-aid index.
//!
//! The [`Retriever`] is the read-only counterpart of the
//! [`IndexManager`](crate::IndexManager): it ensures the index is ready
//! (building lazily on first use), embeds the query with the same provider
//! the index was built with, and returns the best-matching passages.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, info};

use crate::document::SearchResult;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::manager::IndexManager;
use crate::vectorstore::VectorStore;

/// Searches the indexed reference manuals for passages relevant to a query.
///
/// Holds the [`IndexManager`] behind an `Arc` and performs reads only;
/// concurrent searches are safe once the index is ready.
///
/// # Example
///
/// ```rust,ignore
/// use aidkit_rag::Retriever;
///
/// let retriever = Retriever::new(manager.clone());
/// let results = retriever.search("how do I treat a burn", 5).await?;
/// ```
pub struct Retriever {
    manager: Arc<IndexManager>,
    invocations: AtomicUsize,
}

impl Retriever {
    /// Create a retriever over the given index manager.
    pub fn new(manager: Arc<IndexManager>) -> Self {
        Self { manager, invocations: AtomicUsize::new(0) }
    }

    /// The `top_k` configured for the underlying index.
    pub fn default_top_k(&self) -> usize {
        self.manager.config().top_k
    }

    /// Number of `search` calls made so far (observability side channel).
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    /// Return up to `top_k` passages most similar to `query`, best first.
    ///
    /// The index is built lazily on first use. Returns fewer than `top_k`
    /// results only if the index holds fewer entries, or if results fall
    /// below the configured similarity threshold. Never mutates the index;
    /// deterministic for a fixed index, query, and `top_k`.
    ///
    /// # Errors
    ///
    /// - [`RagError::ConfigError`] for an empty query or `top_k == 0`
    /// - [`RagError::IndexUnavailable`] if the lazy build failed
    /// - [`RagError::EmbeddingUnavailable`] if the query cannot be embedded
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Err(RagError::ConfigError("query must not be empty".to_string()));
        }
        if top_k == 0 {
            return Err(RagError::ConfigError("top_k must be greater than zero".to_string()));
        }

        self.invocations.fetch_add(1, Ordering::SeqCst);

        let handle = self.manager.ensure_ready().await.map_err(|e| match e {
            embedding @ RagError::EmbeddingUnavailable { .. } => embedding,
            other => RagError::IndexUnavailable(Box::new(other)),
        })?;

        debug!(query_len = query.len(), top_k, collection = handle.collection(), "searching");

        let embedding = self.manager.embedder().embed(query).await?;
        let results =
            self.manager.store().search(handle.collection(), &embedding, top_k).await?;

        let threshold = self.manager.config().similarity_threshold;
        let filtered: Vec<SearchResult> =
            results.into_iter().filter(|r| r.score >= threshold).collect();

        info!(result_count = filtered.len(), "search completed");
        Ok(filtered)
    }
}
