//! Tests for recursive chunking: boundary preference, overlap, and
//! metadata propagation.

mod common;

use common::meta;
use recall_rag::{Chunker, Document, MetaValue, RecursiveChunker};

#[test]
fn empty_text_produces_zero_chunks() {
    let chunker = RecursiveChunker::new(100, 20);
    let document = Document::new("", meta("doc", "text"));
    assert!(chunker.chunk(&document).is_empty());
}

#[test]
fn short_text_produces_one_chunk() {
    let chunker = RecursiveChunker::default();
    let document = Document::new("A single short paragraph.", meta("doc", "text"));
    let chunks = chunker.chunk(&document);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "A single short paragraph.");
    assert!(chunks[0].embedding.is_none());
}

#[test]
fn every_chunk_respects_size_limit() {
    let chunker = RecursiveChunker::new(80, 10);
    let paragraphs: Vec<String> = (0..12)
        .map(|i| format!("Paragraph number {i} talks about retrieval and vector indexes."))
        .collect();
    let document = Document::new(paragraphs.join("\n\n"), meta("doc", "text"));

    let chunks = chunker.chunk(&document);
    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert!(chunk.text.len() <= 80, "chunk of {} chars exceeds limit", chunk.text.len());
    }
}

#[test]
fn metadata_is_copied_to_every_chunk() {
    let chunker = RecursiveChunker::new(40, 5);
    let mut metadata = meta("wiki-url", "wikipedia");
    metadata.insert("title".into(), MetaValue::from("Retrieval"));
    let text = "First paragraph about retrieval.\n\nSecond paragraph about generation.\n\nThird paragraph about vectors.";
    let document = Document::new(text, metadata);

    let chunks = chunker.chunk(&document);
    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert_eq!(chunk.source(), "wiki-url");
        assert_eq!(chunk.title(), Some("Retrieval"));
        assert_eq!(chunk.metadata, document.metadata);
    }
}

#[test]
fn raw_cuts_overlap_and_reconstruct_the_input() {
    // No separators at all, forcing character cuts.
    let text: String = (0..52).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
    let chunker = RecursiveChunker::new(10, 3);
    let chunks = chunker.chunk(&Document::new(text.clone(), meta("doc", "text")));

    // Consecutive chunks share the overlap.
    for window in chunks.windows(2) {
        let prev = &window[0].text;
        let next = &window[1].text;
        assert!(prev.ends_with(&next[..3.min(next.len())]) || prev.len() < 10);
    }

    // De-overlapped concatenation reproduces the input.
    let mut rebuilt = chunks[0].text.clone();
    for chunk in &chunks[1..] {
        rebuilt.extend(chunk.text.chars().skip(3));
    }
    assert_eq!(rebuilt, text);
}

/// Longest suffix of `prev` that is also a prefix of `next`.
fn shared_overlap(prev: &str, next: &str) -> usize {
    (1..=prev.len().min(next.len()))
        .rev()
        .find(|&k| next.starts_with(&prev[prev.len() - k..]))
        .unwrap_or(0)
}

#[test]
fn paragraph_splitting_preserves_all_content() {
    let paragraphs = ["Alpha paragraph, forty characters long....",
        "Beta paragraph is about the same length...",
        "Gamma paragraph closes out the document..."];
    let text = paragraphs.join("\n\n");
    let chunker = RecursiveChunker::new(60, 10);

    let chunks = chunker.chunk(&Document::new(text.clone(), meta("doc", "text")));
    assert!(chunks.len() > 1);

    // De-overlapped concatenation reproduces the input.
    let mut rebuilt = chunks[0].text.clone();
    for window in chunks.windows(2) {
        let shared = shared_overlap(&window[0].text, &window[1].text);
        rebuilt.push_str(&window[1].text[shared..]);
    }
    assert_eq!(rebuilt, text);
}

#[test]
fn merged_chunks_share_the_configured_overlap() {
    let text = "Alpha sentence one is here. Beta sentence two is here. \
                Gamma sentence three is here. Delta sentence four is here. \
                Epsilon sentence five is here. Zeta sentence six is here.";
    let chunker = RecursiveChunker::new(60, 20);

    let chunks = chunker.chunk(&Document::new(text, meta("doc", "text")));
    assert!(chunks.len() > 1);

    // Each chunk is seeded with the 20-character tail of its predecessor.
    for (i, window) in chunks.windows(2).enumerate() {
        let shared = shared_overlap(&window[0].text, &window[1].text);
        assert!(
            shared >= 20,
            "chunks {i} and {} share only {shared} overlap chars: prev={:?} next={:?}",
            i + 1,
            window[0].text,
            window[1].text,
        );
    }
}

#[test]
fn oversized_paragraph_falls_back_to_sentence_boundaries() {
    let sentences = "One short sentence. Another short sentence. A third short sentence. \
                     A fourth short sentence. A fifth short sentence.";
    let chunker = RecursiveChunker::new(60, 10);

    let chunks = chunker.chunk(&Document::new(sentences, meta("doc", "text")));
    assert!(chunks.len() > 1);
    // Sentence-boundary splits end at the separator, not mid-word.
    for chunk in &chunks[..chunks.len() - 1] {
        assert!(chunk.text.ends_with(". "), "unexpected cut point: {:?}", chunk.text);
    }
}

#[test]
fn multibyte_text_never_splits_mid_character() {
    let chunker = RecursiveChunker::new(25, 5);

    // Raw-cut path (no separators) and merge path (spaces) would both
    // panic on a byte-boundary bug.
    for text in ["日本語のテキスト".repeat(20), "日本語の テキスト 処理は 楽しい ".repeat(10)] {
        let chunks = chunker.chunk(&Document::new(text, meta("doc", "text")));
        assert!(!chunks.is_empty());
    }
}
