//! Shared test doubles: deterministic embedder and generator stubs so no
//! test needs network access.

#![allow(dead_code)]

use async_trait::async_trait;

use recall_rag::{Embedder, Generator, MetaValue, Metadata, RagError, Result};

/// Keyword vocabulary for the stub embedder. One dimension per keyword plus
/// a shared bias dimension so every vector has a nonzero component.
const VOCAB: [&str; 7] = ["rag", "retrieval", "generation", "vector", "index", "weather", "paris"];

pub const STUB_DIM: usize = VOCAB.len() + 1;

/// Deterministic keyword-count embedder. Identical texts map to identical
/// vectors, so an exact-text query always scores 1.0 against its own chunk.
pub struct StubEmbedder;

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let lowered = text.to_lowercase();
        let mut vector = vec![0.0f32; STUB_DIM];
        for (i, keyword) in VOCAB.iter().enumerate() {
            vector[i] = lowered.matches(keyword).count() as f32;
        }
        vector[VOCAB.len()] = 1.0;
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        STUB_DIM
    }
}

/// An embedder with a caller-chosen dimensionality, for exercising
/// dimension checks against persisted state.
pub struct FixedDimEmbedder {
    pub dim: usize,
}

#[async_trait]
impl Embedder for FixedDimEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(vec![1.0; self.dim])
    }

    fn dimensions(&self) -> usize {
        self.dim
    }
}

/// An embedder that always fails, for exercising abort paths.
pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(RagError::Embedding("stub embedder failure".into()))
    }

    fn dimensions(&self) -> usize {
        STUB_DIM
    }
}

/// A generator that returns a canned reply.
pub struct StubGenerator {
    pub reply: String,
}

impl StubGenerator {
    pub fn new(reply: impl Into<String>) -> Self {
        Self { reply: reply.into() }
    }
}

#[async_trait]
impl Generator for StubGenerator {
    async fn generate(&self, _query: &str, _context: &str) -> Result<String> {
        Ok(self.reply.clone())
    }

    fn model_name(&self) -> &str {
        "stub-model"
    }
}

/// A generator that always fails, for exercising the fallback policy.
pub struct FailingGenerator;

#[async_trait]
impl Generator for FailingGenerator {
    async fn generate(&self, _query: &str, _context: &str) -> Result<String> {
        Err(RagError::Generation("stub generator failure".into()))
    }

    fn model_name(&self) -> &str {
        "failing-model"
    }
}

/// Build `source`/`type` metadata for a test chunk or document.
pub fn meta(source: &str, source_type: &str) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("source".into(), MetaValue::from(source));
    metadata.insert("type".into(), MetaValue::from(source_type));
    metadata
}
