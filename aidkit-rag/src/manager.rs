//! Index lifecycle management.
//!
//! The [`IndexManager`] owns the persisted collection and is the only
//! component that writes to it. It orchestrates loader → chunker → embedder
//! → vector store to build the index from scratch, or detects an existing
//! persisted collection and reuses it. The lifecycle is explicit:
//! missing/corrupt/empty/model-mismatch states all funnel into a rebuild,
//! and a ready collection is returned as an [`IndexHandle`] without
//! re-indexing.
//!
//! Builds are serialized: concurrent [`ensure_ready`](IndexManager::ensure_ready)
//! calls for the same collection result in exactly one build, with the
//! other callers waiting and reusing the result.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::chunking::Chunker;
use crate::config::{IndexSettings, RagConfig};
use crate::document::Chunk;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::loader::load_corpus;
use crate::vectorstore::{CollectionSpec, CollectionStatus, VectorStore};

/// Proof that a collection is ready to be queried.
///
/// Holds no storage access of its own; the [`Retriever`](crate::Retriever)
/// combines it with read-only store access.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHandle {
    collection: String,
    entries: usize,
    embedding_model: String,
}

impl IndexHandle {
    /// Name of the ready collection.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Number of indexed passages.
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Identity of the embedding model the collection was built with.
    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }
}

/// Orchestrates corpus loading, chunking, embedding, and persistence.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use aidkit_rag::{IndexManager, IndexSettings, RagConfig, LocalVectorStore,
///                  MockEmbeddingProvider, RecursiveChunker};
///
/// let manager = IndexManager::new(
///     IndexSettings::new("./manuals"),
///     RagConfig::default(),
///     Arc::new(MockEmbeddingProvider::new(64)),
///     Arc::new(LocalVectorStore::new("./index")),
///     Arc::new(RecursiveChunker::new(512, 100)),
/// );
/// let handle = manager.ensure_ready().await?;
/// ```
pub struct IndexManager {
    settings: IndexSettings,
    config: RagConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    chunker: Arc<dyn Chunker>,
    build_lock: Mutex<()>,
    builds_completed: AtomicUsize,
}

impl IndexManager {
    /// Create a manager for the given settings and capabilities.
    pub fn new(
        settings: IndexSettings,
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        chunker: Arc<dyn Chunker>,
    ) -> Self {
        Self {
            settings,
            config,
            embedder,
            store,
            chunker,
            build_lock: Mutex::new(()),
            builds_completed: AtomicUsize::new(0),
        }
    }

    /// The chunking and query configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// The embedding provider used at both build and query time.
    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    /// The vector store backing the collection.
    pub fn store(&self) -> &Arc<dyn VectorStore> {
        &self.store
    }

    /// Number of completed builds (observability side channel).
    pub fn builds_completed(&self) -> usize {
        self.builds_completed.load(Ordering::SeqCst)
    }

    /// Return a handle to the ready index, building it first if necessary.
    ///
    /// The fast path — a persisted, non-empty collection built with the
    /// configured embedding model — returns without touching the corpus.
    /// Otherwise a full build runs: load → chunk → embed → publish. A
    /// caller arriving while another build is in flight waits for it and
    /// reuses its result.
    ///
    /// # Errors
    ///
    /// [`RagError::CorpusUnavailable`], [`RagError::EmbeddingUnavailable`],
    /// or [`RagError::StoreWriteError`]; any prior valid index is left
    /// untouched by a failed build.
    pub async fn ensure_ready(&self) -> Result<IndexHandle> {
        if let Some(handle) = self.check_ready().await? {
            return Ok(handle);
        }

        let _guard = self.build_lock.lock().await;

        // Another caller may have finished the build while we waited.
        if let Some(handle) = self.check_ready().await? {
            return Ok(handle);
        }

        self.build_bounded().await
    }

    /// Non-blocking variant of [`ensure_ready`](IndexManager::ensure_ready).
    ///
    /// # Errors
    ///
    /// Returns [`RagError::BuildInProgress`] if another build is in flight,
    /// plus everything `ensure_ready` can return.
    pub async fn try_ensure_ready(&self) -> Result<IndexHandle> {
        if let Some(handle) = self.check_ready().await? {
            return Ok(handle);
        }

        let Ok(_guard) = self.build_lock.try_lock() else {
            return Err(RagError::BuildInProgress);
        };

        if let Some(handle) = self.check_ready().await? {
            return Ok(handle);
        }

        self.build_bounded().await
    }

    /// Force a full rebuild, discarding any existing collection state.
    pub async fn rebuild(&self) -> Result<IndexHandle> {
        let _guard = self.build_lock.lock().await;
        self.build_bounded().await
    }

    /// Check whether the persisted collection can be served as-is.
    async fn check_ready(&self) -> Result<Option<IndexHandle>> {
        let collection = &self.settings.collection;
        match self.store.status(collection).await? {
            CollectionStatus::Ready { entries, spec } if entries > 0 => {
                if spec.embedding_model == self.embedder.model_id() {
                    Ok(Some(IndexHandle {
                        collection: collection.clone(),
                        entries,
                        embedding_model: spec.embedding_model,
                    }))
                } else {
                    warn!(
                        collection = %collection,
                        indexed_with = %spec.embedding_model,
                        configured = %self.embedder.model_id(),
                        "embedding model mismatch, collection will be rebuilt"
                    );
                    Ok(None)
                }
            }
            CollectionStatus::Ready { .. } => Ok(None),
            CollectionStatus::Corrupt => {
                warn!(collection = %collection, "persisted collection is corrupt, rebuilding");
                Ok(None)
            }
            CollectionStatus::Missing => Ok(None),
        }
    }

    /// Run a build under the configured timeout, cleaning up partial state.
    ///
    /// Must be called with the build lock held.
    async fn build_bounded(&self) -> Result<IndexHandle> {
        let mutated = AtomicBool::new(false);

        let outcome =
            tokio::time::timeout(self.settings.build_timeout, self.build(&mutated)).await;

        let result = match outcome {
            Ok(result) => result,
            Err(_) => Err(RagError::StoreWriteError {
                backend: "IndexManager".to_string(),
                message: format!(
                    "index build exceeded {}s timeout",
                    self.settings.build_timeout.as_secs()
                ),
            }),
        };

        match result {
            Ok(handle) => {
                self.builds_completed.fetch_add(1, Ordering::SeqCst);
                Ok(handle)
            }
            Err(e) => {
                // Never leave a half-built collection looking ready. The
                // store was only touched after `mutated` was set; before
                // that, whatever state existed on disk is still intact.
                if mutated.load(Ordering::SeqCst) {
                    let _ = self.store.delete_collection(&self.settings.collection).await;
                }
                Err(e)
            }
        }
    }

    /// Full build: enumerate documents, chunk, embed, atomically publish.
    async fn build(&self, mutated: &AtomicBool) -> Result<IndexHandle> {
        let collection = &self.settings.collection;
        info!(collection = %collection, corpus = %self.settings.corpus_dir.display(), "building index");

        let documents = load_corpus(&self.settings.corpus_dir).await?;

        let mut all_chunks: Vec<Chunk> = Vec::new();
        for document in &documents {
            let mut chunks = self.chunker.chunk(document);
            if chunks.is_empty() {
                continue;
            }

            let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
            let embeddings = self.embedder.embed_batch(&texts).await?;

            for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
                chunk.embedding = embedding;
            }

            info!(document.id = %document.id, chunk_count = chunks.len(), "indexed document");
            all_chunks.extend(chunks);
        }

        if all_chunks.is_empty() {
            return Err(RagError::CorpusUnavailable {
                location: self.settings.corpus_dir.display().to_string(),
                message: "corpus produced no indexable passages".to_string(),
            });
        }

        let spec = CollectionSpec {
            dimensions: self.embedder.dimensions(),
            embedding_model: self.embedder.model_id().to_string(),
        };

        // Everything below mutates the persisted collection.
        mutated.store(true, Ordering::SeqCst);

        self.store.delete_collection(collection).await.map_err(as_store_write)?;
        self.store.create_collection(collection, &spec).await.map_err(as_store_write)?;
        self.store.upsert(collection, &all_chunks).await.map_err(as_store_write)?;

        let entries = all_chunks.len();
        info!(collection = %collection, entries, "index build complete");

        Ok(IndexHandle {
            collection: collection.clone(),
            entries,
            embedding_model: spec.embedding_model,
        })
    }
}

/// Build-time persistence failures surface as `StoreWriteError`.
fn as_store_write(e: RagError) -> RagError {
    match e {
        RagError::VectorStoreError { backend, message } => {
            RagError::StoreWriteError { backend, message }
        }
        other => other,
    }
}
