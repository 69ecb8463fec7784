//! Top-K retrieval and context formatting.

use std::sync::Arc;

use crate::document::SearchResult;
use crate::error::Result;
use crate::index::VectorIndex;

/// Default number of chunks to retrieve per query.
pub const DEFAULT_TOP_K: usize = 5;

/// Retrieves relevant chunks for a query and formats them into a single
/// context string for the generator.
///
/// Holds a shared handle to a [`VectorIndex`] for query purposes only; it
/// never mutates the index.
pub struct Retriever {
    index: Arc<VectorIndex>,
    top_k: usize,
}

impl Retriever {
    /// Create a retriever over the given index with the default `top_k`.
    pub fn new(index: Arc<VectorIndex>) -> Self {
        Self { index, top_k: DEFAULT_TOP_K }
    }

    /// Override the number of chunks retrieved per query.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Retrieve the top-K chunks for a query, ordered by descending
    /// similarity. Delegates to [`VectorIndex::search`].
    pub async fn retrieve(&self, query: &str) -> Result<Vec<SearchResult>> {
        self.index.search(query, self.top_k).await
    }

    /// Format retrieved results into a single labeled context string.
    ///
    /// Results are re-sorted by descending similarity first — callers must
    /// not assume pre-sorted input. Each result becomes a block
    /// `"[Document i] Source: <source>\n\n<text>\n\n"` with `i` 1-based in
    /// the sorted order; Wikipedia results render the source as
    /// `<title> (<source>)`. Empty input yields an empty string.
    pub fn format_context(results: &[SearchResult]) -> String {
        if results.is_empty() {
            return String::new();
        }

        let mut sorted: Vec<&SearchResult> = results.iter().collect();
        sorted.sort_by(|a, b| {
            b.similarity.partial_cmp(&a.similarity).unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut context = String::new();
        for (i, result) in sorted.iter().enumerate() {
            let source = result.chunk.source();
            let label = match result.chunk.title() {
                Some(title) => format!("{title} ({source})"),
                None => source.to_string(),
            };
            context.push_str(&format!(
                "[Document {}] Source: {label}\n\n{}\n\n",
                i + 1,
                result.chunk.text
            ));
        }

        context
    }
}
