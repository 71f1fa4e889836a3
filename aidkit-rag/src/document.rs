//! Data types for documents, chunks, and search results.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The on-disk format a source document was loaded from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DocumentFormat {
    /// A PDF file, converted to text at load time.
    Pdf,
    /// A plain text or markdown file.
    Text,
}

/// A source document containing text content and metadata.
///
/// Documents are immutable once loaded; their lifetime is a single
/// indexing pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier for the document (its source filename).
    pub id: String,
    /// The text content of the document.
    pub text: String,
    /// The format the document was loaded from.
    pub format: DocumentFormat,
    /// Key-value metadata associated with the document.
    pub metadata: HashMap<String, String>,
}

impl Document {
    /// Create a plain-text document with the given id and text.
    pub fn text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            format: DocumentFormat::Text,
            metadata: HashMap::new(),
        }
    }
}

/// A segment of a [`Document`] with its vector embedding.
///
/// Chunk ids are `{document_id}_{chunk_index}`; the `chunk_index` metadata
/// field preserves document order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier for the chunk.
    pub id: String,
    /// The text content of the chunk.
    pub text: String,
    /// The vector embedding for this chunk's text.
    pub embedding: Vec<f32>,
    /// Key-value metadata inherited from the parent document plus chunk-specific fields.
    pub metadata: HashMap<String, String>,
    /// The ID of the parent [`Document`].
    pub document_id: String,
}

/// A retrieved [`Chunk`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}
