//! Tests for prompt composition and the answer-fallback policy.

mod common;

use common::{FailingGenerator, StubGenerator, meta};
use recall_rag::generator::{build_prompt, compose_answer, fallback_answer};
use recall_rag::{Chunk, Retriever, SearchResult};

fn results() -> Vec<SearchResult> {
    vec![
        SearchResult {
            chunk: Chunk::new("RAG combines retrieval with generation.", meta("doc1", "text")),
            similarity: 0.9,
        },
        SearchResult {
            chunk: Chunk::new("A vector index answers queries.", meta("doc2", "text")),
            similarity: 0.4,
        },
    ]
}

#[test]
fn prompt_embeds_the_query_and_the_labeled_context_verbatim() {
    let context = Retriever::format_context(&results());
    let prompt = build_prompt("What is RAG?", &context);

    assert!(prompt.contains("What is RAG?"));
    // The retriever's context blocks pass through unchanged.
    assert!(prompt.contains(&context));
    assert!(prompt.contains("[Document 1] Source: doc1"));
    assert!(prompt.contains("[Document 2] Source: doc2"));
}

#[test]
fn fallback_quotes_the_top_chunk_and_its_source() {
    let answer = fallback_answer("What is RAG?", &results());
    assert!(!answer.using_llm);
    assert!(answer.model.is_none());
    assert!(answer.text.contains("RAG combines retrieval with generation."));
    assert!(answer.text.contains("Source: doc1"));
}

#[test]
fn fallback_excerpt_is_capped_at_300_characters() {
    let long_text = "word ".repeat(200);
    let results = vec![SearchResult {
        chunk: Chunk::new(long_text.clone(), meta("doc1", "text")),
        similarity: 0.8,
    }];

    let answer = fallback_answer("anything", &results);
    assert!(answer.text.contains(&format!("{}...", &long_text[..300])));
    assert!(!answer.text.contains(&long_text[..301]));
}

#[test]
fn fallback_without_results_says_so() {
    let answer = fallback_answer("What is RAG?", &[]);
    assert!(!answer.using_llm);
    assert!(answer.text.contains("don't have specific information"));
    assert!(answer.text.contains("What is RAG?"));
}

#[tokio::test]
async fn successful_generation_is_marked_as_llm_output() {
    let generator = StubGenerator::new("A generated reply.");
    let results = results();
    let context = Retriever::format_context(&results);

    let answer = compose_answer(Some(&generator), "What is RAG?", &context, &results).await;
    assert!(answer.using_llm);
    assert_eq!(answer.text, "A generated reply.");
    assert_eq!(answer.model.as_deref(), Some("stub-model"));
}

#[tokio::test]
async fn generator_failure_degrades_to_the_fallback() {
    let results = results();
    let context = Retriever::format_context(&results);

    let answer = compose_answer(Some(&FailingGenerator), "What is RAG?", &context, &results).await;
    assert!(!answer.using_llm);
    assert!(answer.text.contains("RAG combines retrieval with generation."));

    let absent = compose_answer(None, "What is RAG?", &context, &results).await;
    assert!(!absent.using_llm);
    assert_eq!(absent.text, answer.text);
}
