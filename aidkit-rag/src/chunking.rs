//! Document chunking strategies.
//!
//! This module provides the [`Chunker`] trait and two implementations:
//!
//! - [`FixedSizeChunker`] — splits by character count with configurable overlap
//! - [`RecursiveChunker`] — splits hierarchically by paragraphs, sentences, then words
//!
//! Chunks from one document always preserve document order: the
//! `chunk_index` metadata field is the passage's position in the source.

use crate::document::{Chunk, Document};

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text and metadata but no
/// embeddings. Embeddings are attached later by the index manager.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` if the document has empty text.
    /// Each returned chunk has an empty embedding vector.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Build a [`Chunk`] for `document` from a piece of its text.
fn make_chunk(document: &Document, text: String, chunk_index: usize) -> Chunk {
    let mut metadata = document.metadata.clone();
    metadata.insert("chunk_index".to_string(), chunk_index.to_string());
    metadata.insert("source".to_string(), document.id.clone());

    Chunk {
        id: format!("{}_{chunk_index}", document.id),
        text,
        embedding: Vec::new(),
        metadata,
        document_id: document.id.clone(),
    }
}

/// Round `index` down to the nearest UTF-8 character boundary in `text`.
fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Round `index` up to the nearest UTF-8 character boundary in `text`.
fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

/// Splits text into fixed-size chunks by character count with configurable overlap.
///
/// # Example
///
/// ```rust,ignore
/// use aidkit_rag::FixedSizeChunker;
///
/// let chunker = FixedSizeChunker::new(256, 50);
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl FixedSizeChunker {
    /// Create a new `FixedSizeChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` — maximum number of bytes per chunk (UTF-8 safe)
    /// * `chunk_overlap` — overlapping bytes between consecutive chunks
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }
}

impl Chunker for FixedSizeChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.is_empty() {
            return Vec::new();
        }

        split_by_size(&document.text, self.chunk_size, self.chunk_overlap)
            .into_iter()
            .enumerate()
            .map(|(i, text)| make_chunk(document, text, i))
            .collect()
    }
}

/// Splits text hierarchically: paragraphs → sentences → words.
///
/// First splits by paragraph separators (`\n\n`). If a paragraph exceeds
/// `chunk_size`, splits by sentence boundaries (`. `, `! `, `? `). If a
/// sentence still exceeds `chunk_size`, splits by word boundaries.
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveChunker {
    /// Create a new `RecursiveChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` — maximum number of bytes per chunk (UTF-8 safe)
    /// * `chunk_overlap` — overlapping bytes between consecutive chunks
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.is_empty() {
            return Vec::new();
        }

        let separators = ["\n\n", ". ", "! ", "? ", " "];
        let raw_chunks =
            split_and_merge(&document.text, self.chunk_size, self.chunk_overlap, &separators);

        raw_chunks
            .into_iter()
            .enumerate()
            .map(|(i, text)| make_chunk(document, text, i))
            .collect()
    }
}

/// Split text by a separator, then merge segments into chunks that respect
/// `chunk_size`. If a segment exceeds `chunk_size`, it is split further
/// using the next-level separator.
fn split_and_merge(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    separators: &[&str],
) -> Vec<String> {
    if text.len() <= chunk_size || separators.is_empty() {
        return split_by_size(text, chunk_size, chunk_overlap);
    }

    let separator = separators[0];
    let remaining_separators = &separators[1..];

    let segments: Vec<&str> = if separator == " " {
        text.split(' ').collect()
    } else {
        split_keeping_separator(text, separator)
    };

    let mut chunks = Vec::new();
    let mut current = String::new();

    for segment in segments {
        if current.is_empty() {
            current = segment.to_string();
        } else if current.len() + segment.len() <= chunk_size {
            current.push_str(segment);
        } else {
            // Current chunk is full — flush it
            if current.len() > chunk_size {
                chunks.extend(split_and_merge(
                    &current,
                    chunk_size,
                    chunk_overlap,
                    remaining_separators,
                ));
            } else {
                chunks.push(current);
            }
            current = segment.to_string();
        }
    }

    if !current.is_empty() {
        if current.len() > chunk_size {
            chunks.extend(split_and_merge(&current, chunk_size, chunk_overlap, remaining_separators));
        } else {
            chunks.push(current);
        }
    }

    chunks
}

/// Split text at a separator while keeping the separator attached to the preceding segment.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut result = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        result.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        result.push(&text[start..]);
    }

    result
}

/// Simple size-bounded splitting with overlap, snapped to character boundaries.
fn split_by_size(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let step = chunk_size.saturating_sub(chunk_overlap);
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = floor_char_boundary(text, (start + chunk_size).min(text.len()));
        if end <= start {
            // A single character wider than the window still moves forward
            end = ceil_char_boundary(text, start + 1);
        }
        chunks.push(text[start..end].to_string());

        if step == 0 || end == text.len() {
            break;
        }
        let next = ceil_char_boundary(text, start + step);
        start = if next > start { next } else { end };
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn doc(text: &str) -> Document {
        Document::text("manual.txt", text)
    }

    #[test]
    fn empty_document_produces_no_chunks() {
        let chunker = FixedSizeChunker::new(100, 10);
        assert!(chunker.chunk(&doc("")).is_empty());
    }

    #[test]
    fn fixed_size_respects_bound() {
        let text = "a".repeat(1000);
        let chunker = FixedSizeChunker::new(128, 32);
        for chunk in chunker.chunk(&doc(&text)) {
            assert!(chunk.text.len() <= 128);
        }
    }

    #[test]
    fn fixed_size_preserves_document_order() {
        let text = "abcdefghij".repeat(50);
        let chunker = FixedSizeChunker::new(100, 0);
        let chunks = chunker.chunk(&doc(&text));
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.id, format!("manual.txt_{i}"));
            assert_eq!(chunk.metadata["chunk_index"], i.to_string());
        }
    }

    #[test]
    fn fixed_size_overlap_repeats_tail() {
        let text: String = ('a'..='z').collect();
        let chunker = FixedSizeChunker::new(10, 5);
        let chunks = chunker.chunk(&doc(&text));
        assert!(chunks.len() > 2);
        // Each chunk after the first starts with the last 5 bytes of the previous one
        for pair in chunks.windows(2) {
            let tail = &pair[0].text[pair[0].text.len() - 5..];
            assert!(pair[1].text.starts_with(tail));
        }
    }

    #[test]
    fn fixed_size_survives_multibyte_text() {
        let text = "épinglé à la plaie — compression directe. ".repeat(30);
        let chunker = FixedSizeChunker::new(64, 16);
        let chunks = chunker.chunk(&doc(&text));
        assert!(!chunks.is_empty());
        let rebuilt_len: usize = chunks.iter().map(|c| c.text.len()).sum();
        assert!(rebuilt_len >= text.len());
    }

    #[test]
    fn recursive_prefers_paragraph_boundaries() {
        let text = format!("{}\n\n{}", "first paragraph. ".repeat(4), "second paragraph. ".repeat(4));
        let chunker = RecursiveChunker::new(100, 0);
        let chunks = chunker.chunk(&doc(&text));
        assert!(chunks.len() >= 2);
        for chunk in &chunks {
            assert!(chunk.text.len() <= 100, "chunk over bound: {}", chunk.text.len());
        }
    }

    #[test]
    fn recursive_small_document_is_single_chunk() {
        let chunker = RecursiveChunker::new(512, 64);
        let chunks = chunker.chunk(&doc("Apply direct pressure to stop bleeding."));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Apply direct pressure to stop bleeding.");
        assert_eq!(chunks[0].document_id, "manual.txt");
    }
}
