//! Document chunking.
//!
//! [`RecursiveChunker`] splits text hierarchically, preferring paragraph,
//! sentence, and word boundaries before falling back to raw character cuts.
//! Consecutive chunks share a configurable character overlap so that
//! concepts spanning a split point are not lost for retrieval.

use crate::document::{Chunk, Document};

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text and metadata but no
/// embeddings. Embeddings are attached later, when the chunks are indexed.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` if the document has empty text — never a
    /// single empty chunk. Every produced chunk's metadata is an
    /// independent copy of the document's metadata.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Default maximum chunk size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Default overlap between consecutive chunks in characters.
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Splits text hierarchically: paragraphs → sentences → words → characters.
///
/// First splits by paragraph separators (`\n\n`). If a paragraph exceeds
/// `chunk_size`, splits by sentence boundaries (`. `, `! `, `? `), then by
/// word boundaries, then by raw character cuts. Consecutive chunks share
/// `chunk_overlap` characters at every level: merged chunks are seeded
/// with the tail of their predecessor, and raw cuts step by
/// `chunk_size − chunk_overlap`.
///
/// # Example
///
/// ```rust,ignore
/// use recall_rag::RecursiveChunker;
///
/// let chunker = RecursiveChunker::new(1000, 200);
/// let chunks = chunker.chunk(&document);
/// ```
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
    /// * `chunk_size` — maximum number of characters per chunk
    /// * `chunk_overlap` — number of overlapping characters between
    ///   consecutive chunks
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }
}

impl Default for RecursiveChunker {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP)
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.is_empty() {
            return Vec::new();
        }

        let separators = ["\n\n", ". ", "! ", "? ", " "];
        let pieces =
            split_and_merge(&document.text, self.chunk_size, self.chunk_overlap, &separators);

        pieces
            .into_iter()
            .map(|text| Chunk::new(text, document.metadata.clone()))
            .collect()
    }
}

/// Split text by a separator, then merge segments into chunks that respect
/// `chunk_size`. A segment that exceeds `chunk_size` on its own is split
/// further using the next-level separator.
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
    let deeper = &separators[1..];

    // Separators stay attached to the preceding segment, so merged chunks
    // concatenate back to the original text.
    let segments = split_keeping_separator(text, separator);

    let mut pieces = Vec::new();
    let mut current = String::new();

    for segment in segments {
        if current.is_empty() {
            current = segment.to_string();
        } else if current.len() + segment.len() <= chunk_size {
            current.push_str(segment);
        } else {
            // Carry the tail of the full chunk into the next one so
            // consecutive chunks share the configured overlap.
            let tail = overlap_tail(&current, chunk_overlap);
            flush(&mut pieces, current, chunk_size, chunk_overlap, deeper);
            current = tail;
            current.push_str(segment);
        }
    }

    if !current.is_empty() {
        flush(&mut pieces, current, chunk_size, chunk_overlap, deeper);
    }

    pieces
}

/// The trailing `chunk_overlap` characters of a chunk, snapped to a char
/// boundary, used to seed the next chunk.
fn overlap_tail(text: &str, chunk_overlap: usize) -> String {
    if chunk_overlap == 0 {
        return String::new();
    }
    if text.len() <= chunk_overlap {
        return text.to_string();
    }
    let start = ceil_char_boundary(text, text.len() - chunk_overlap);
    text[start..].to_string()
}

/// Emit an accumulated piece, recursing to the next separator level if it
/// is still oversized.
fn flush(
    pieces: &mut Vec<String>,
    piece: String,
    chunk_size: usize,
    chunk_overlap: usize,
    deeper: &[&str],
) {
    if piece.len() > chunk_size {
        pieces.extend(split_and_merge(&piece, chunk_size, chunk_overlap, deeper));
    } else {
        pieces.push(piece);
    }
}

/// Split text at a separator while keeping the separator attached to the
/// preceding segment, so concatenating the segments reproduces the input.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut segments = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        segments.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        segments.push(&text[start..]);
    }

    segments
}

/// Raw character-cut splitting with overlap. Cut points are snapped to
/// char boundaries so multi-byte input never splits mid-character.
fn split_by_size(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let step = chunk_size.saturating_sub(chunk_overlap);
    let mut pieces = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let end = floor_char_boundary(text, start + chunk_size);
        pieces.push(text[start..end].to_string());
        if step == 0 || end >= text.len() {
            break;
        }
        let next = floor_char_boundary(text, start + step);
        if next <= start {
            break;
        }
        start = next;
    }

    pieces
}

/// Largest char boundary at or below `index`.
fn floor_char_boundary(text: &str, index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    let mut i = index;
    while !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Smallest char boundary at or above `index`.
fn ceil_char_boundary(text: &str, index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    let mut i = index;
    while !text.is_char_boundary(i) {
        i += 1;
    }
    i
}
