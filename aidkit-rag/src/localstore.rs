//! Persistent local vector store.
//!
//! [`LocalVectorStore`] keeps each collection in a single JSON file under a
//! root directory and serves searches from an in-memory copy loaded on
//! first access. Writes replace the whole file through a temp-file rename,
//! so on disk a collection is always either absent, the previous complete
//! state, or the new complete state.
//!
//! The file records the [`CollectionSpec`] (embedding model identity and
//! dimensionality) next to the chunks; an unreadable or structurally
//! unexpected file reports [`CollectionStatus::Corrupt`] instead of failing
//! hard, which lets the index manager rebuild it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::{CollectionSpec, CollectionStatus, VectorStore, rank_chunks};

/// Bumped when the persisted layout changes; older files trigger a rebuild.
const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Clone)]
struct CollectionFile {
    version: u32,
    spec: CollectionSpec,
    chunks: HashMap<String, Chunk>,
}

/// What a collection file on disk turned out to be.
enum DiskState {
    Missing,
    Corrupt,
    Loaded(CollectionFile),
}

/// A [`VectorStore`] persisted as one JSON file per collection.
///
/// # Example
///
/// ```rust,ignore
/// use aidkit_rag::{LocalVectorStore, VectorStore, CollectionSpec};
///
/// let store = LocalVectorStore::new("./index");
/// let spec = CollectionSpec { dimensions: 768, embedding_model: "text-embedding-004".into() };
/// store.create_collection("first_aid", &spec).await?;
/// ```
pub struct LocalVectorStore {
    root: PathBuf,
    cache: RwLock<HashMap<String, CollectionFile>>,
}

impl LocalVectorStore {
    /// Create a store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), cache: RwLock::new(HashMap::new()) }
    }

    /// The directory collections are persisted under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Sanitize a collection name for use as a file name.
    /// Only allows alphanumeric characters, dashes, and underscores.
    fn sanitize(name: &str) -> Result<String> {
        let sanitized: String = name
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        if sanitized.is_empty() {
            return Err(RagError::VectorStoreError {
                backend: "Local".to_string(),
                message: "collection name is empty after sanitization".to_string(),
            });
        }
        Ok(sanitized)
    }

    fn collection_path(&self, name: &str) -> Result<PathBuf> {
        Ok(self.root.join(format!("{}.json", Self::sanitize(name)?)))
    }

    fn write_err(message: impl Into<String>) -> RagError {
        RagError::StoreWriteError { backend: "Local".to_string(), message: message.into() }
    }

    /// Read a collection file from disk.
    ///
    /// `Err` is reserved for I/O failures; a file that exists but cannot be
    /// parsed comes back as [`DiskState::Corrupt`].
    async fn read_file(&self, name: &str) -> Result<DiskState> {
        let path = self.collection_path(name)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(DiskState::Missing),
            Err(e) => {
                return Err(RagError::VectorStoreError {
                    backend: "Local".to_string(),
                    message: format!("failed to read '{}': {e}", path.display()),
                });
            }
        };

        match serde_json::from_slice::<CollectionFile>(&bytes) {
            Ok(file) if file.version == FORMAT_VERSION => Ok(DiskState::Loaded(file)),
            Ok(file) => {
                warn!(
                    collection = name,
                    version = file.version,
                    "collection file has unsupported format version"
                );
                Ok(DiskState::Corrupt)
            }
            Err(e) => {
                warn!(collection = name, error = %e, "collection file is unreadable");
                Ok(DiskState::Corrupt)
            }
        }
    }

    /// Load a collection into the cache, returning an error if it is
    /// missing or corrupt.
    async fn load(&self, name: &str) -> Result<()> {
        {
            let cache = self.cache.read().await;
            if cache.contains_key(name) {
                return Ok(());
            }
        }

        let file = match self.read_file(name).await? {
            DiskState::Loaded(file) => file,
            DiskState::Corrupt => {
                return Err(RagError::VectorStoreError {
                    backend: "Local".to_string(),
                    message: format!("collection '{name}' is corrupt"),
                });
            }
            DiskState::Missing => {
                return Err(RagError::VectorStoreError {
                    backend: "Local".to_string(),
                    message: format!("collection '{name}' does not exist"),
                });
            }
        };

        let mut cache = self.cache.write().await;
        cache.entry(name.to_string()).or_insert(file);
        Ok(())
    }

    /// Persist a collection atomically: write a temp file, then rename.
    async fn persist(&self, name: &str, file: &CollectionFile) -> Result<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| Self::write_err(format!("failed to create store root: {e}")))?;

        let path = self.collection_path(name)?;
        let tmp = path.with_extension("json.tmp");

        let bytes = serde_json::to_vec(file)
            .map_err(|e| Self::write_err(format!("failed to serialize collection: {e}")))?;

        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| Self::write_err(format!("failed to write '{}': {e}", tmp.display())))?;

        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(Self::write_err(format!(
                "failed to publish '{}': {e}",
                path.display()
            )));
        }

        debug!(collection = name, chunks = file.chunks.len(), "persisted collection");
        Ok(())
    }
}

#[async_trait]
impl VectorStore for LocalVectorStore {
    async fn create_collection(&self, name: &str, spec: &CollectionSpec) -> Result<()> {
        if let CollectionStatus::Ready { .. } = self.status(name).await? {
            return Ok(());
        }

        let file = CollectionFile {
            version: FORMAT_VERSION,
            spec: spec.clone(),
            chunks: HashMap::new(),
        };
        self.persist(name, &file).await?;

        let mut cache = self.cache.write().await;
        cache.insert(name.to_string(), file);
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        {
            let mut cache = self.cache.write().await;
            cache.remove(name);
        }

        let path = self.collection_path(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::write_err(format!(
                "failed to delete '{}': {e}",
                path.display()
            ))),
        }
    }

    async fn status(&self, name: &str) -> Result<CollectionStatus> {
        {
            let cache = self.cache.read().await;
            if let Some(file) = cache.get(name) {
                return Ok(CollectionStatus::Ready {
                    entries: file.chunks.len(),
                    spec: file.spec.clone(),
                });
            }
        }

        Ok(match self.read_file(name).await? {
            DiskState::Missing => CollectionStatus::Missing,
            DiskState::Corrupt => CollectionStatus::Corrupt,
            DiskState::Loaded(file) => {
                CollectionStatus::Ready { entries: file.chunks.len(), spec: file.spec }
            }
        })
    }

    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        self.load(collection).await?;

        let mut cache = self.cache.write().await;
        let file = cache.get_mut(collection).ok_or_else(|| RagError::VectorStoreError {
            backend: "Local".to_string(),
            message: format!("collection '{collection}' does not exist"),
        })?;

        for chunk in chunks {
            file.chunks.insert(chunk.id.clone(), chunk.clone());
        }

        let snapshot = file.clone();
        drop(cache);
        self.persist(collection, &snapshot).await
    }

    async fn delete(&self, collection: &str, ids: &[&str]) -> Result<()> {
        self.load(collection).await?;

        let mut cache = self.cache.write().await;
        let file = cache.get_mut(collection).ok_or_else(|| RagError::VectorStoreError {
            backend: "Local".to_string(),
            message: format!("collection '{collection}' does not exist"),
        })?;

        for id in ids {
            file.chunks.remove(*id);
        }

        let snapshot = file.clone();
        drop(cache);
        self.persist(collection, &snapshot).await
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        self.load(collection).await?;

        let cache = self.cache.read().await;
        let file = cache.get(collection).ok_or_else(|| RagError::VectorStoreError {
            backend: "Local".to_string(),
            message: format!("collection '{collection}' does not exist"),
        })?;
        Ok(rank_chunks(file.chunks.values(), embedding, top_k))
    }
}
