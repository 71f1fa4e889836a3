//! Error types for the `aidkit-rag` crate.

use thiserror::Error;

/// Errors that can occur while building or querying the first-aid index.
#[derive(Debug, Error)]
pub enum RagError {
    /// The corpus directory does not exist or contains no readable documents.
    #[error("Corpus unavailable at '{location}': {message}")]
    CorpusUnavailable {
        /// The corpus location that was checked.
        location: String,
        /// A description of the failure.
        message: String,
    },

    /// The embedding capability could not be initialized or reached.
    #[error("Embedding unavailable ({provider}): {message}")]
    EmbeddingUnavailable {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// Persistence could not be completed during an index build.
    #[error("Store write error ({backend}): {message}")]
    StoreWriteError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// The index is not ready at query time and the build failed.
    #[error("Index unavailable: {0}")]
    IndexUnavailable(#[source] Box<RagError>),

    /// A build for this collection is already in flight.
    #[error("Index build already in progress")]
    BuildInProgress,

    /// An error occurred in the vector store backend outside of a build.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during document chunking.
    #[error("Chunking error: {0}")]
    ChunkingError(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
