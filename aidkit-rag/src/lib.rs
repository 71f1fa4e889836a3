//! # aidkit-rag
//!
//! Retrieval subsystem for aidkit: loads a corpus of first-aid reference
//! manuals, chunks and embeds them, persists the result as a named
//! collection, and serves similarity searches over it.
//!
//! ## Overview
//!
//! - [`load_corpus`] reads `.txt`/`.md`/`.pdf` files from a directory
//! - [`Chunker`] implementations split documents into bounded passages
//! - [`EmbeddingProvider`] turns text into fixed-dimension vectors
//! - [`VectorStore`] backends hold `(vector, text, metadata)` entries:
//!   [`InMemoryVectorStore`] for tests, [`LocalVectorStore`] for durable
//!   on-disk collections
//! - [`IndexManager::ensure_ready`] builds the index once and reuses it
//!   across process restarts
//! - [`Retriever::search`] embeds a query and returns the top passages
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use aidkit_rag::{
//!     IndexManager, IndexSettings, LocalVectorStore, MockEmbeddingProvider,
//!     RagConfig, RecursiveChunker, Retriever,
//! };
//!
//! let config = RagConfig::builder().chunk_size(512).chunk_overlap(100).top_k(5).build()?;
//! let manager = Arc::new(IndexManager::new(
//!     IndexSettings::new("./manuals"),
//!     config,
//!     Arc::new(MockEmbeddingProvider::new(64)),
//!     Arc::new(LocalVectorStore::new("./index")),
//!     Arc::new(RecursiveChunker::new(512, 100)),
//! ));
//!
//! let retriever = Retriever::new(manager);
//! let results = retriever.search("how do I stop bleeding", 5).await?;
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
#[cfg(feature = "gemini")]
pub mod gemini;
pub mod inmemory;
pub mod loader;
pub mod localstore;
pub mod manager;
pub mod mock;
#[cfg(feature = "openai")]
pub mod openai;
pub mod retrieval;
pub mod vectorstore;

pub use chunking::{Chunker, FixedSizeChunker, RecursiveChunker};
pub use config::{IndexSettings, RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, DocumentFormat, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
#[cfg(feature = "gemini")]
pub use gemini::GeminiEmbeddingProvider;
pub use inmemory::InMemoryVectorStore;
pub use loader::load_corpus;
pub use localstore::LocalVectorStore;
pub use manager::{IndexHandle, IndexManager};
pub use mock::MockEmbeddingProvider;
#[cfg(feature = "openai")]
pub use openai::OpenAIEmbeddingProvider;
pub use retrieval::Retriever;
pub use vectorstore::{CollectionSpec, CollectionStatus, VectorStore};
