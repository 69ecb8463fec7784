//! Data types for documents, chunks, and search results.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A metadata value: either a string or a number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MetaValue {
    /// A string value.
    Str(String),
    /// A numeric value.
    Num(f64),
}

impl MetaValue {
    /// Return the string form if this value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Str(s) => Some(s),
            MetaValue::Num(_) => None,
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Str(s) => write!(f, "{s}"),
            MetaValue::Num(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        MetaValue::Str(s.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        MetaValue::Str(s)
    }
}

impl From<f64> for MetaValue {
    fn from(n: f64) -> Self {
        MetaValue::Num(n)
    }
}

/// Key-value metadata attached to documents and chunks.
///
/// Always carries `source` (origin identifier) and `type` (one of
/// `pdf`, `text`, `wikipedia`); Wikipedia-sourced entries also carry `title`.
pub type Metadata = HashMap<String, MetaValue>;

/// A loaded source document before chunking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// The raw text content of the document.
    pub text: String,
    /// Key-value metadata describing the document's origin.
    pub metadata: Metadata,
}

impl Document {
    /// Create a new document from text and metadata.
    pub fn new(text: impl Into<String>, metadata: Metadata) -> Self {
        Self { text: text.into(), metadata }
    }
}

/// A contiguous slice of a source document, the atomic unit of indexing
/// and retrieval.
///
/// Chunks are immutable once created; `embedding` is populated once, at
/// index-add time, and never changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// The text content of the chunk.
    pub text: String,
    /// Metadata copied from the parent document.
    pub metadata: Metadata,
    /// The L2-normalized embedding vector, set when the chunk is indexed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl Chunk {
    /// Create a new chunk without an embedding.
    pub fn new(text: impl Into<String>, metadata: Metadata) -> Self {
        Self { text: text.into(), metadata, embedding: None }
    }

    /// The `source` metadata field, or `"Unknown"` if absent.
    pub fn source(&self) -> &str {
        self.metadata.get("source").and_then(MetaValue::as_str).unwrap_or("Unknown")
    }

    /// The `title` metadata field, if present.
    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").and_then(MetaValue::as_str)
    }
}

/// A retrieved [`Chunk`] paired with a similarity score.
///
/// Transient: produced by nearest-neighbor queries, never persisted.
/// The score is in `[-1, 1]`, computed as `1 − L2distance` on unit vectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The similarity score (higher is more relevant).
    pub similarity: f32,
}
