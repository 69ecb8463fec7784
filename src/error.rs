//! Error types for the `recall-rag` crate.

use thiserror::Error;

/// Errors that can occur in RAG operations.
///
/// Failures are surfaced as explicit results at the call site that hit them:
/// indexing and search errors propagate to the caller, while generation
/// failures are recovered locally with a fallback answer and never reach the
/// caller as errors (see [`compose_answer`](crate::generator::compose_answer)).
#[derive(Debug, Error)]
pub enum RagError {
    /// A source file or page could not be found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A persisted index was corrupt or partial.
    ///
    /// Always recoverable: callers treat this as "no index present".
    #[error("Load error: {0}")]
    Load(String),

    /// The embedding collaborator failed.
    ///
    /// Fatal to the in-progress `add_documents` or `search` call,
    /// not fatal to the process.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// The generation collaborator failed.
    #[error("Generation error: {0}")]
    Generation(String),

    /// An index invariant or dimension check was violated.
    #[error("Index error: {0}")]
    Index(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An HTTP request to an external collaborator failed.
    #[error("Request error: {0}")]
    Request(String),

    /// An underlying I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A serialization or deserialization error.
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
