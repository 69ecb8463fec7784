//! Durable, append-only vector index with nearest-neighbor query.
//!
//! [`VectorIndex`] owns an ordered sequence of [`Chunk`]s and a flat `f32`
//! buffer of their L2-normalized embeddings (insertion order is the implicit
//! integer ID; deletion is unsupported). Search is brute-force L2 over the
//! buffer, with raw distance `d` mapped to a similarity score as `1 − d`.
//!
//! That mapping is deliberately the simple approximation rather than the
//! exact cosine transform (`cos θ = 1 − d²/2` for unit vectors). Persisted
//! indexes were built against the approximate score, and consumers only use
//! it for ranking, where monotonicity is what matters — do not "correct" it.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::document::{Chunk, SearchResult};
use crate::embedding::Embedder;
use crate::error::{RagError, Result};

/// File name of the persisted vector buffer artifact.
pub const VECTORS_FILE: &str = "vectors.json";

/// File name of the persisted chunk sequence artifact.
pub const CHUNKS_FILE: &str = "chunks.json";

/// Owned index state, guarded by one lock so the chunk sequence and the
/// vector buffer can never be observed out of sync.
///
/// Invariant: `vectors.len() == chunks.len() * dim` after every completed
/// operation.
struct IndexState {
    dim: usize,
    vectors: Vec<f32>,
    chunks: Vec<Chunk>,
}

/// Serialized form of the vector buffer artifact.
#[derive(Serialize, Deserialize)]
struct VectorsArtifact {
    dim: usize,
    vectors: Vec<f32>,
}

/// An append-only store of chunk vectors with nearest-neighbor query and
/// wholesale persistence.
///
/// All operations go through a `tokio::sync::RwLock`: mutation
/// (`add_documents`, `load`) is serialized, and concurrent read-only
/// `search` calls are safe while no mutation is in flight.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use recall_rag::VectorIndex;
///
/// let index = VectorIndex::new(Arc::new(embedder));
/// index.add_documents(chunks).await?;
/// let results = index.search("what is RAG?", 5).await?;
/// ```
pub struct VectorIndex {
    embedder: Arc<dyn Embedder>,
    state: RwLock<IndexState>,
}

impl VectorIndex {
    /// Create an empty index using the given embedder.
    ///
    /// The index dimensionality is taken from
    /// [`Embedder::dimensions`](crate::Embedder::dimensions).
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        let dim = embedder.dimensions();
        Self { embedder, state: RwLock::new(IndexState { dim, vectors: Vec::new(), chunks: Vec::new() }) }
    }

    /// Number of indexed chunks.
    pub async fn len(&self) -> usize {
        self.state.read().await.chunks.len()
    }

    /// Whether the index holds no chunks.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.chunks.is_empty()
    }

    /// Append chunks to the index, embedding any that lack a vector.
    ///
    /// Embeddings are computed and normalized before the write lock is
    /// taken, so a failed embed call aborts the whole add and leaves the
    /// index untouched — the chunk sequence and vector buffer are never
    /// left out of sync. Returns the number of chunks added.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Embedding`] if the embedder fails or returns the
    /// wrong number of vectors, and [`RagError::Index`] on a dimension
    /// mismatch.
    pub async fn add_documents(&self, mut chunks: Vec<Chunk>) -> Result<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let pending: Vec<usize> = chunks
            .iter()
            .enumerate()
            .filter(|(_, c)| c.embedding.is_none())
            .map(|(i, _)| i)
            .collect();

        if !pending.is_empty() {
            let texts: Vec<&str> = pending.iter().map(|&i| chunks[i].text.as_str()).collect();
            let vectors = self.embedder.embed_batch(&texts).await?;
            if vectors.len() != texts.len() {
                return Err(RagError::Embedding(format!(
                    "embedder returned {} vectors for {} texts",
                    vectors.len(),
                    texts.len()
                )));
            }
            for (&i, vector) in pending.iter().zip(vectors) {
                chunks[i].embedding = Some(vector);
            }
        }

        let dim = self.state.read().await.dim;
        let mut flat = Vec::with_capacity(chunks.len() * dim);
        for chunk in &mut chunks {
            let Some(vector) = chunk.embedding.as_mut() else {
                return Err(RagError::Index("chunk missing embedding after embed pass".into()));
            };
            if vector.len() != dim {
                return Err(RagError::Index(format!(
                    "embedding has {} dimensions, index expects {dim}",
                    vector.len()
                )));
            }
            l2_normalize(vector);
            flat.extend_from_slice(vector);
        }

        let added = chunks.len();
        let mut state = self.state.write().await;
        state.chunks.append(&mut chunks);
        state.vectors.extend_from_slice(&flat);
        info!(added, total = state.chunks.len(), "added chunks to index");
        Ok(added)
    }

    /// Search for the chunks most similar to a natural-language query.
    ///
    /// `top_k` is clamped to the number of indexed chunks. Returns results
    /// sorted by descending similarity; an empty index yields an empty
    /// sequence for any query. Tie order among equal scores is unspecified.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Embedding`] if the query embed fails and
    /// [`RagError::Index`] on a dimension mismatch.
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        if self.is_empty().await {
            return Ok(Vec::new());
        }

        let mut query_vector = self.embedder.embed(query).await?;

        let state = self.state.read().await;
        if query_vector.len() != state.dim {
            return Err(RagError::Index(format!(
                "query embedding has {} dimensions, index expects {}",
                query_vector.len(),
                state.dim
            )));
        }
        l2_normalize(&mut query_vector);

        let limit = top_k.min(state.chunks.len());
        let mut scored: Vec<(usize, f32)> = state
            .vectors
            .chunks_exact(state.dim)
            .enumerate()
            .map(|(i, row)| (i, 1.0 - l2_distance(row, &query_vector)))
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);

        Ok(scored
            .into_iter()
            .map(|(i, similarity)| SearchResult { chunk: state.chunks[i].clone(), similarity })
            .collect())
    }

    /// Persist the vector buffer and the chunk sequence under `directory`.
    ///
    /// Creates the directory if absent and fully overwrites both artifacts
    /// ([`VECTORS_FILE`] and [`CHUNKS_FILE`]).
    pub async fn save(&self, directory: impl AsRef<Path>) -> Result<()> {
        let directory = directory.as_ref();
        tokio::fs::create_dir_all(directory).await?;

        let state = self.state.read().await;
        let vectors = serde_json::to_vec(&VectorsArtifact {
            dim: state.dim,
            vectors: state.vectors.clone(),
        })?;
        let chunks = serde_json::to_vec(&state.chunks)?;

        tokio::fs::write(directory.join(VECTORS_FILE), vectors).await?;
        tokio::fs::write(directory.join(CHUNKS_FILE), chunks).await?;

        info!(directory = %directory.display(), chunks = state.chunks.len(), "index saved");
        Ok(())
    }

    /// Restore the index from `directory`, replacing in-memory state.
    ///
    /// Returns `Ok(false)` — leaving the current state untouched — if either
    /// artifact is missing, fails to read or deserialize, the two artifacts
    /// disagree on chunk count (a partial save), or the persisted
    /// dimensionality differs from the configured embedder's. The cause is
    /// logged. On success the whole state is swapped in atomically under the
    /// write lock and `Ok(true)` is returned.
    pub async fn load(&self, directory: impl AsRef<Path>) -> Result<bool> {
        let directory = directory.as_ref();
        let vectors_path = directory.join(VECTORS_FILE);
        let chunks_path = directory.join(CHUNKS_FILE);

        if !vectors_path.exists() || !chunks_path.exists() {
            return Ok(false);
        }

        let artifact: VectorsArtifact = match read_artifact(&vectors_path).await {
            Ok(a) => a,
            Err(e) => {
                warn!(path = %vectors_path.display(), error = %e, "failed to load vector artifact");
                return Ok(false);
            }
        };
        let chunks: Vec<Chunk> = match read_artifact(&chunks_path).await {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %chunks_path.display(), error = %e, "failed to load chunk artifact");
                return Ok(false);
            }
        };

        if artifact.dim == 0 || artifact.vectors.len() != chunks.len() * artifact.dim {
            warn!(
                directory = %directory.display(),
                chunks = chunks.len(),
                dim = artifact.dim,
                values = artifact.vectors.len(),
                "persisted artifacts are inconsistent, ignoring them"
            );
            return Ok(false);
        }

        if artifact.dim != self.embedder.dimensions() {
            // Accepting the artifact would leave an index whose every query
            // embed fails the dimension check.
            warn!(
                loaded_dim = artifact.dim,
                embedder_dim = self.embedder.dimensions(),
                "persisted dimensionality differs from the configured embedder, ignoring artifacts"
            );
            return Ok(false);
        }

        let mut state = self.state.write().await;
        state.dim = artifact.dim;
        state.vectors = artifact.vectors;
        state.chunks = chunks;
        info!(directory = %directory.display(), chunks = state.chunks.len(), "index loaded");
        Ok(true)
    }
}

/// Read and deserialize one persisted artifact, folding I/O and parse
/// failures into [`RagError::Load`].
async fn read_artifact<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| RagError::Load(format!("{}: {e}", path.display())))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| RagError::Load(format!("{}: {e}", path.display())))
}

/// Scale a vector to unit L2 norm. Zero vectors are left unchanged.
fn l2_normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}

/// Euclidean distance between two equal-length vectors.
fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum::<f32>().sqrt()
}
