//! Tests for document loaders and their metadata.

use recall_rag::loader::{self, SourceType};
use recall_rag::{MetaValue, RagError};

#[tokio::test]
async fn text_file_loads_with_source_and_type_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    tokio::fs::write(&path, "Some notes about retrieval.").await.unwrap();

    let document = loader::load_text_file(&path).await.unwrap();
    assert_eq!(document.text, "Some notes about retrieval.");
    assert_eq!(
        document.metadata.get("source").and_then(MetaValue::as_str),
        Some(path.display().to_string().as_str())
    );
    assert_eq!(document.metadata.get("type").and_then(MetaValue::as_str), Some("text"));
}

#[tokio::test]
async fn missing_text_file_is_not_found() {
    let err = loader::load_text_file("/definitely/not/here.txt").await.unwrap_err();
    assert!(matches!(err, RagError::NotFound(_)));
}

#[test]
fn pdf_documents_wrap_pre_extracted_text() {
    let document = loader::pdf_document("Extracted page text.", "report.pdf");
    assert_eq!(document.text, "Extracted page text.");
    assert_eq!(document.metadata.get("source").and_then(MetaValue::as_str), Some("report.pdf"));
    assert_eq!(document.metadata.get("type").and_then(MetaValue::as_str), Some("pdf"));
}

#[test]
fn source_types_map_to_metadata_strings() {
    assert_eq!(SourceType::Pdf.as_str(), "pdf");
    assert_eq!(SourceType::Text.as_str(), "text");
    assert_eq!(SourceType::Wikipedia.as_str(), "wikipedia");
}
