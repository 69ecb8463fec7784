//! The RAG engine: one explicit context object for the whole workflow.
//!
//! [`RagEngine`] composes the chunker, the [`VectorIndex`], a [`Retriever`],
//! and an optional [`Generator`] behind a lifecycle of
//! `init (load-or-empty) → serve → explicit save`. Construct one via
//! [`RagEngine::builder()`].
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use recall_rag::{RagConfig, RagEngine};
//!
//! let engine = RagEngine::builder()
//!     .config(RagConfig::default())
//!     .embedder(Arc::new(embedder))
//!     .generator(Arc::new(generator))  // optional
//!     .build()?;
//!
//! engine.init("./data/vector_store").await?;
//! engine.ingest(&document).await?;
//! let outcome = engine.chat("What is RAG?").await?;
//! engine.save("./data/vector_store").await?;
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::info;

use crate::chunking::{Chunker, RecursiveChunker};
use crate::config::RagConfig;
use crate::document::{Document, SearchResult};
use crate::embedding::Embedder;
use crate::error::{RagError, Result};
use crate::generator::{Generator, compose_answer};
use crate::history::SourceAttribution;
use crate::index::VectorIndex;
use crate::retriever::Retriever;

/// The outcome of one chat turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatOutcome {
    /// The answer text.
    pub response: String,
    /// `true` if a language model produced the answer, `false` for the
    /// local fallback template.
    pub using_llm: bool,
    /// The model that produced the answer, when `using_llm` is `true`.
    pub model: Option<String>,
    /// Sources cited by the answer, in descending-similarity order.
    pub sources: Vec<SourceAttribution>,
}

/// The RAG engine.
///
/// Owns the vector index and coordinates ingestion
/// (chunk → embed → index) and querying (retrieve → format → generate,
/// with local fallback). Share it across request handlers by reference or
/// inside an `Arc`; all methods take `&self`.
pub struct RagEngine {
    config: RagConfig,
    chunker: RecursiveChunker,
    index: Arc<VectorIndex>,
    retriever: Retriever,
    generator: Option<Arc<dyn Generator>>,
}

impl std::fmt::Debug for RagEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagEngine")
            .field("config", &self.config)
            .field("chunker", &self.chunker)
            .field("generator", &self.generator.as_ref().map(|_| "dyn Generator"))
            .finish_non_exhaustive()
    }
}

impl RagEngine {
    /// Create a new [`RagEngineBuilder`].
    pub fn builder() -> RagEngineBuilder {
        RagEngineBuilder::default()
    }

    /// Return the engine configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a shared handle to the vector index.
    pub fn index(&self) -> &Arc<VectorIndex> {
        &self.index
    }

    /// Restore the index from `directory` if a persisted copy exists.
    ///
    /// Returns `Ok(false)` — and serves from an empty index — when no
    /// usable persisted index is present. Never fails on a corrupt index.
    pub async fn init(&self, directory: impl AsRef<Path>) -> Result<bool> {
        let loaded = self.index.load(directory).await?;
        if !loaded {
            info!("no persisted index found, starting empty");
        }
        Ok(loaded)
    }

    /// Persist the index to `directory`.
    pub async fn save(&self, directory: impl AsRef<Path>) -> Result<()> {
        self.index.save(directory).await
    }

    /// Ingest a document: chunk it and add the chunks to the index.
    ///
    /// Returns the number of chunks indexed. Embedding runs under the
    /// configured timeout budget; a failed or timed-out embed aborts the
    /// whole ingest and leaves the index unchanged.
    pub async fn ingest(&self, document: &Document) -> Result<usize> {
        let chunks = self.chunker.chunk(document);
        if chunks.is_empty() {
            info!("document produced no chunks, nothing to ingest");
            return Ok(0);
        }

        timeout(self.config.request_timeout, self.index.add_documents(chunks))
            .await
            .map_err(|_| RagError::Embedding("embedding timed out during ingest".into()))?
    }

    /// Search the index for the chunks most relevant to `query`.
    ///
    /// Uses the configured `top_k` unless overridden. An empty index
    /// returns an empty result, not an error.
    pub async fn search(&self, query: &str, top_k: Option<usize>) -> Result<Vec<SearchResult>> {
        let top_k = top_k.unwrap_or(self.config.top_k);
        timeout(self.config.request_timeout, self.index.search(query, top_k))
            .await
            .map_err(|_| RagError::Embedding("embedding timed out during search".into()))?
    }

    /// Answer a query: retrieve context, then generate with local fallback.
    ///
    /// Retrieval errors propagate; generation errors (including timeout)
    /// never do — they degrade to a template answer built from the top
    /// retrieved chunk, with `using_llm` set to `false`.
    pub async fn chat(&self, query: &str) -> Result<ChatOutcome> {
        let results = timeout(self.config.request_timeout, self.retriever.retrieve(query))
            .await
            .map_err(|_| RagError::Embedding("embedding timed out during chat".into()))??;

        let sources: Vec<SourceAttribution> =
            results.iter().map(SourceAttribution::from).collect();
        let context = Retriever::format_context(&results);

        let answer = match &self.generator {
            Some(generator) => {
                match timeout(
                    self.config.request_timeout,
                    compose_answer(Some(generator.as_ref()), query, &context, &results),
                )
                .await
                {
                    Ok(answer) => answer,
                    Err(_) => {
                        info!("generation timed out, falling back to template answer");
                        crate::generator::fallback_answer(query, &results)
                    }
                }
            }
            None => compose_answer(None, query, &context, &results).await,
        };

        Ok(ChatOutcome {
            response: answer.text,
            using_llm: answer.using_llm,
            model: answer.model,
            sources,
        })
    }
}

/// Builder for constructing a [`RagEngine`].
///
/// The embedder is required; the generator is optional (without one, every
/// chat answer is the local fallback template).
#[derive(Default)]
pub struct RagEngineBuilder {
    config: Option<RagConfig>,
    embedder: Option<Arc<dyn Embedder>>,
    generator: Option<Arc<dyn Generator>>,
}

impl RagEngineBuilder {
    /// Set the engine configuration. Defaults to [`RagConfig::default`].
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the optional generation collaborator.
    pub fn generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Build the [`RagEngine`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if no embedder was set.
    pub fn build(self) -> Result<RagEngine> {
        let config = self.config.unwrap_or_default();
        let embedder = self
            .embedder
            .ok_or_else(|| RagError::Config("embedder is required".to_string()))?;

        let chunker = RecursiveChunker::new(config.chunk_size, config.chunk_overlap);
        let index = Arc::new(VectorIndex::new(embedder));
        let retriever = Retriever::new(Arc::clone(&index)).with_top_k(config.top_k);

        Ok(RagEngine { config, chunker, index, retriever, generator: self.generator })
    }
}
