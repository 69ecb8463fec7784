//! Document loaders for plain text files and Wikipedia articles.
//!
//! Loaders produce [`Document`]s with well-formed `source`/`type` metadata
//! ready for chunking and indexing. PDF byte extraction is left to external
//! collaborators; pre-extracted PDF text enters through [`pdf_document`].

use std::path::Path;

use tracing::info;

use crate::document::{Document, MetaValue, Metadata};
use crate::error::{RagError, Result};

/// The origin category of a document, recorded as the `type` metadata field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    /// Pre-extracted PDF text.
    Pdf,
    /// A plain text file.
    Text,
    /// A Wikipedia article.
    Wikipedia,
}

impl SourceType {
    /// The metadata string for this source type.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Pdf => "pdf",
            SourceType::Text => "text",
            SourceType::Wikipedia => "wikipedia",
        }
    }
}

/// Build the base `source`/`type` metadata shared by all loaders.
fn base_metadata(source: &str, source_type: SourceType) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("source".into(), MetaValue::from(source));
    metadata.insert("type".into(), MetaValue::from(source_type.as_str()));
    metadata
}

/// Wrap pre-extracted PDF text as a document with `type: pdf` metadata.
pub fn pdf_document(text: impl Into<String>, source: &str) -> Document {
    Document::new(text, base_metadata(source, SourceType::Pdf))
}

/// Load a UTF-8 text file as a document with `type: text` metadata.
///
/// # Errors
///
/// Returns [`RagError::NotFound`] if the file does not exist and
/// [`RagError::Io`] on other read failures.
pub async fn load_text_file(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(RagError::NotFound(format!("text file not found: {}", path.display())));
    }

    let text = tokio::fs::read_to_string(path).await?;
    let source = path.display().to_string();
    info!(source = %source, bytes = text.len(), "loaded text file");

    Ok(Document::new(text, base_metadata(&source, SourceType::Text)))
}

const WIKIPEDIA_API_URL: &str = "https://en.wikipedia.org/w/api.php";

/// Fetch a Wikipedia article's plain-text extract as a document.
///
/// `query` is resolved through full-text search first, so an inexact
/// phrasing ("rust programming") still lands on the best-matching page.
/// Metadata carries the article URL as `source`, the resolved page title
/// as `title`, and `type: wikipedia`.
///
/// # Errors
///
/// Returns [`RagError::NotFound`] if the search yields no page and
/// [`RagError::Request`] on transport failures.
pub async fn load_wikipedia(client: &reqwest::Client, query: &str) -> Result<Document> {
    let body = wikipedia_get(
        client,
        &[
            ("action", "query"),
            ("list", "search"),
            ("srlimit", "1"),
            ("format", "json"),
            ("srsearch", query),
        ],
    )
    .await?;
    let hit = top_search_hit(&body)
        .ok_or_else(|| RagError::NotFound(format!("no Wikipedia page found for: {query}")))?;

    let body = wikipedia_get(
        client,
        &[
            ("action", "query"),
            ("prop", "extracts"),
            ("explaintext", "1"),
            ("redirects", "1"),
            ("format", "json"),
            ("titles", &hit),
        ],
    )
    .await?;
    let (resolved_title, extract) = extract_page(&body)
        .ok_or_else(|| RagError::NotFound(format!("empty Wikipedia extract for: {hit}")))?;

    let url = format!("https://en.wikipedia.org/wiki/{}", resolved_title.replace(' ', "_"));
    let mut metadata = base_metadata(&url, SourceType::Wikipedia);
    metadata.insert("title".into(), MetaValue::from(resolved_title.clone()));

    info!(title = %resolved_title, bytes = extract.len(), "loaded wikipedia article");

    Ok(Document::new(extract, metadata))
}

/// Issue one MediaWiki API call and parse the JSON body.
async fn wikipedia_get(
    client: &reqwest::Client,
    params: &[(&str, &str)],
) -> Result<serde_json::Value> {
    let response = client
        .get(WIKIPEDIA_API_URL)
        .query(params)
        .send()
        .await
        .map_err(|e| RagError::Request(format!("wikipedia request failed: {e}")))?;

    if !response.status().is_success() {
        return Err(RagError::Request(format!(
            "wikipedia API returned {}",
            response.status()
        )));
    }

    response
        .json()
        .await
        .map_err(|e| RagError::Request(format!("failed to parse wikipedia response: {e}")))
}

/// Title of the first full-text search hit, if any.
fn top_search_hit(body: &serde_json::Value) -> Option<String> {
    body.get("query")?
        .get("search")?
        .as_array()?
        .first()?
        .get("title")?
        .as_str()
        .map(str::to_string)
}

/// Resolved title and non-empty extract of the first present page in an
/// `extracts` response.
fn extract_page(body: &serde_json::Value) -> Option<(String, String)> {
    let pages = body.get("query")?.get("pages")?.as_object()?;
    let page = pages
        .values()
        .find(|p| p.get("missing").is_none() && p.get("extract").is_some())?;

    let title = page.get("title")?.as_str()?.to_string();
    let extract = page.get("extract")?.as_str().filter(|e| !e.is_empty())?.to_string();
    Some((title, extract))
}
