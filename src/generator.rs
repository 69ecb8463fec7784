//! Generation boundary: the [`Generator`] trait, a Gemini-backed
//! implementation, and the answer-composition policy.
//!
//! The core is responsible only for building the `(query, context)` pair
//! and recovering from generator failure: a failed or absent generator is
//! replaced by a template answer built from the top retrieved chunk, and
//! the [`Answer`] carries a flag distinguishing model-generated from
//! fallback responses. Generation failures never surface to the caller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::document::SearchResult;
use crate::error::{RagError, Result};

/// A text-generation collaborator accepting a query and a retrieved context.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate an answer to `query` grounded in `context`.
    async fn generate(&self, query: &str, context: &str) -> Result<String>;

    /// The model identifier reported in answers.
    fn model_name(&self) -> &str;
}

/// An answer produced by [`compose_answer`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// The response text.
    pub text: String,
    /// `true` if the text came from the language model, `false` if it is
    /// the local fallback template.
    pub using_llm: bool,
    /// The model that produced the text, when `using_llm` is `true`.
    pub model: Option<String>,
}

/// Build the prompt sent to the generator.
pub fn build_prompt(query: &str, context: &str) -> String {
    format!(
        "You are a helpful assistant that answers questions based on the \
         provided context.\n\n\
         Answer the following question: '{query}'\n\n\
         Use the following context to inform your answer:\n\n\
         {context}\
         Based on the provided context, please answer the question: '{query}'\n\
         If the context doesn't contain the answer, please say so. \
         Cite the sources used."
    )
}

/// Maximum number of characters of the top chunk quoted in a fallback answer.
const FALLBACK_EXCERPT_CHARS: usize = 300;

/// Build the degraded-but-successful answer used when no generator is
/// available: the first 300 characters of the top retrieved chunk plus its
/// source attribution.
pub fn fallback_answer(query: &str, results: &[SearchResult]) -> Answer {
    let Some(top) = results.first() else {
        return Answer {
            text: format!("I don't have specific information to answer your question: '{query}'"),
            using_llm: false,
            model: None,
        };
    };

    let excerpt: String = top.chunk.text.chars().take(FALLBACK_EXCERPT_CHARS).collect();
    let text = format!(
        "I found some information that might help with your question: '{query}'\n\n\
         {excerpt}...\n\n\
         Source: {}",
        top.chunk.source()
    );

    Answer { text, using_llm: false, model: None }
}

/// Compose an answer from a query and its retrieved results.
///
/// The single policy point for generator failure: try the generator if one
/// is configured; on any error, substitute [`fallback_answer`] built from
/// the top result. `results` must be in descending-similarity order (as
/// returned by retrieval).
pub async fn compose_answer(
    generator: Option<&dyn Generator>,
    query: &str,
    context: &str,
    results: &[SearchResult],
) -> Answer {
    let Some(generator) = generator else {
        return fallback_answer(query, results);
    };

    match generator.generate(query, context).await {
        Ok(text) => {
            Answer { text, using_llm: true, model: Some(generator.model_name().to_string()) }
        }
        Err(e) => {
            warn!(error = %e, "generation failed, falling back to template answer");
            fallback_answer(query, results)
        }
    }
}

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 500;
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// A [`Generator`] backed by the Gemini `generateContent` REST endpoint.
///
/// # Example
///
/// ```rust,ignore
/// use recall_rag::GeminiGenerator;
///
/// let generator = GeminiGenerator::from_env()?;
/// let answer = generator.generate("What is RAG?", &context).await?;
/// ```
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    max_output_tokens: u32,
    temperature: f32,
}

impl GeminiGenerator {
    /// Create a new generator with the given API key and the default model
    /// (`gemini-2.0-flash`).
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::Generation("API key must not be empty".into()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_GEMINI_MODEL.into(),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        })
    }

    /// Create a new generator from the `GOOGLE_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GOOGLE_API_KEY").map_err(|_| {
            RagError::Generation("GOOGLE_API_KEY environment variable not set".into())
        })?;
        Self::new(api_key)
    }

    /// Set the model name (e.g. `gemini-2.5-flash`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Cap the number of output tokens.
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

// ── Gemini API request/response types ──────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[async_trait]
impl Generator for GeminiGenerator {
    async fn generate(&self, query: &str, context: &str) -> Result<String> {
        let prompt = build_prompt(query, context);
        debug!(model = %self.model, prompt_len = prompt.len(), "generating answer");

        let request = GenerateRequest {
            contents: vec![Content { parts: vec![Part { text: prompt }] }],
            generation_config: GenerationConfig {
                max_output_tokens: self.max_output_tokens,
                temperature: self.temperature,
            },
        };

        let url = format!("{GEMINI_BASE_URL}/{}:generateContent", self.model);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "generation request failed");
                RagError::Generation(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(%status, "generation API error");
            return Err(RagError::Generation(format!("API returned {status}: {body}")));
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            error!(error = %e, "failed to parse generation response");
            RagError::Generation(format!("failed to parse response: {e}"))
        })?;

        let text: String = parsed
            .candidates
            .first()
            .map(|c| c.content.parts.iter().map(|p| p.text.as_str()).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(RagError::Generation("API returned no candidates".into()));
        }

        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
