//! Property tests for vector index search ordering.

mod common;

use std::sync::Arc;

use common::{StubEmbedder, meta};
use proptest::prelude::*;
use recall_rag::{Chunk, VectorIndex};

/// **Property: search ordering and bounds.**
/// *For any* set of indexed chunks and any query, `search` SHALL return
/// results ordered by descending similarity, with at most
/// `min(top_k, indexed_chunks)` entries.
mod prop_search_ordering {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn results_ordered_descending_and_bounded_by_top_k(
            texts in proptest::collection::vec("[a-z ]{1,40}", 1..20),
            query in "[a-z ]{1,40}",
            top_k in 1usize..25,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let (results, indexed) = rt.block_on(async {
                let index = VectorIndex::new(Arc::new(StubEmbedder));
                let chunks: Vec<Chunk> = texts
                    .iter()
                    .enumerate()
                    .map(|(i, text)| Chunk::new(text.clone(), meta(&format!("doc{i}"), "text")))
                    .collect();
                let indexed = index.add_documents(chunks).await.unwrap();
                let results = index.search(&query, top_k).await.unwrap();
                (results, indexed)
            });

            prop_assert_eq!(indexed, texts.len());
            prop_assert!(results.len() <= top_k);
            prop_assert!(results.len() <= indexed);
            prop_assert_eq!(results.len(), top_k.min(indexed));

            for window in results.windows(2) {
                prop_assert!(
                    window[0].similarity >= window[1].similarity,
                    "results not in descending order: {} < {}",
                    window[0].similarity,
                    window[1].similarity,
                );
            }

            // Scores stay within the 1 − L2 range for unit vectors.
            for result in &results {
                prop_assert!(result.similarity <= 1.0 + 1e-6);
                prop_assert!(result.similarity >= -1.0 - 1e-6);
            }
        }
    }
}
