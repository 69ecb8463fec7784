//! # recall-rag
//!
//! A Retrieval-Augmented Generation engine: ingest documents (plain text,
//! pre-extracted PDF text, Wikipedia articles), chunk and embed them, index
//! the chunks in an append-only vector index persisted to disk, and answer
//! queries by top-K cosine retrieval plus hosted-LLM generation with a
//! local fallback.
//!
//! ## Architecture
//!
//! - [`RecursiveChunker`] splits raw text into overlapping chunks at
//!   paragraph, sentence, and word boundaries.
//! - [`Embedder`] is the embedding boundary; [`HostedEmbedder`] speaks the
//!   OpenAI-compatible embeddings protocol.
//! - [`VectorIndex`] stores chunks and their L2-normalized vectors,
//!   searches by brute-force L2 (similarity reported as `1 − distance`),
//!   and persists wholesale to a directory.
//! - [`Retriever`] runs top-K queries and formats results into a labeled
//!   context string.
//! - [`Generator`] is the generation boundary; [`GeminiGenerator`] calls
//!   the Gemini REST API, and [`compose_answer`] substitutes a template
//!   answer when generation fails.
//! - [`RagEngine`] ties the pieces together behind a
//!   `init → serve → save` lifecycle.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use recall_rag::{HostedEmbedder, RagConfig, RagEngine, loader};
//!
//! let engine = RagEngine::builder()
//!     .config(RagConfig::default())
//!     .embedder(Arc::new(HostedEmbedder::from_env()?))
//!     .build()?;
//!
//! engine.init("./data/vector_store").await?;
//! let document = loader::load_text_file("notes.txt").await?;
//! engine.ingest(&document).await?;
//!
//! let outcome = engine.chat("What do my notes say about Rust?").await?;
//! println!("{}", outcome.response);
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod generator;
pub mod history;
pub mod index;
pub mod loader;
pub mod retriever;

pub use chunking::{Chunker, RecursiveChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, MetaValue, Metadata, SearchResult};
pub use embedding::{Embedder, HostedEmbedder};
pub use engine::{ChatOutcome, RagEngine, RagEngineBuilder};
pub use error::{RagError, Result};
pub use generator::{Answer, GeminiGenerator, Generator, compose_answer, fallback_answer};
pub use history::{ConversationHistory, HistoryEntry, SourceAttribution};
pub use index::VectorIndex;
pub use loader::SourceType;
pub use retriever::Retriever;
