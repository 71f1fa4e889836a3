//! Gemini embedding provider using the Generative Language API.
//!
//! This module is only available when the `gemini` feature is enabled.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// The default Generative Language API base URL.
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The default model for Gemini embeddings.
const DEFAULT_MODEL: &str = "text-embedding-004";

/// The dimensionality of `text-embedding-004` vectors.
const DEFAULT_DIMENSIONS: usize = 768;

/// An [`EmbeddingProvider`] backed by the Gemini embeddings API.
///
/// Uses `reqwest` to call the `embedContent` and `batchEmbedContents`
/// endpoints directly.
///
/// # Configuration
///
/// - `model` – defaults to `text-embedding-004`.
/// - `api_key` – from the constructor or the `GOOGLE_API_KEY` /
///   `GEMINI_API_KEY` environment variables.
///
/// # Example
///
/// ```rust,ignore
/// use aidkit_rag::gemini::GeminiEmbeddingProvider;
///
/// let provider = GeminiEmbeddingProvider::new("your-api-key")?;
/// let embedding = provider.embed("hello world").await?;
/// ```
pub struct GeminiEmbeddingProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    dimensions: usize,
    base_url: String,
}

impl GeminiEmbeddingProvider {
    /// Create a new provider with the given API key and the default model.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::EmbeddingUnavailable {
                provider: "Gemini".into(),
                message: "API key must not be empty".into(),
            });
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_MODEL.into(),
            dimensions: DEFAULT_DIMENSIONS,
            base_url: GEMINI_API_BASE.into(),
        })
    }

    /// Create a new provider using the `GOOGLE_API_KEY` or `GEMINI_API_KEY`
    /// environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GOOGLE_API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .map_err(|_| RagError::EmbeddingUnavailable {
                provider: "Gemini".into(),
                message: "GOOGLE_API_KEY or GEMINI_API_KEY environment variable not set".into(),
            })?;
        Self::new(api_key)
    }

    /// Set the model name and its output dimensionality.
    pub fn with_model(mut self, model: impl Into<String>, dimensions: usize) -> Self {
        self.model = model.into();
        self.dimensions = dimensions;
        self
    }

    /// Override the API base URL (for proxies or tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn content_request(&self, text: &str) -> EmbedContentRequest {
        EmbedContentRequest {
            model: format!("models/{}", self.model),
            content: ContentPayload { parts: vec![TextPart { text: text.to_string() }] },
        }
    }

    async fn check_status(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let detail = response.text().await.unwrap_or_default();
        error!(provider = "Gemini", %status, "embedding API error");
        Err(RagError::EmbeddingUnavailable {
            provider: "Gemini".into(),
            message: format!("API returned {status}: {detail}"),
        })
    }
}

// ── Gemini API request/response types ──────────────────────────────

#[derive(Serialize)]
struct TextPart {
    text: String,
}

#[derive(Serialize)]
struct ContentPayload {
    parts: Vec<TextPart>,
}

#[derive(Serialize)]
struct EmbedContentRequest {
    model: String,
    content: ContentPayload,
}

#[derive(Serialize)]
struct BatchEmbedRequest {
    requests: Vec<EmbedContentRequest>,
}

#[derive(Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

#[derive(Deserialize)]
struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Deserialize)]
struct BatchEmbedResponse {
    embeddings: Vec<ContentEmbedding>,
}

// ── EmbeddingProvider implementation ───────────────────────────────

#[async_trait]
impl EmbeddingProvider for GeminiEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = "Gemini", text_len = text.len(), "embedding single text");

        let url = format!("{}/models/{}:embedContent", self.base_url, self.model);
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&self.content_request(text))
            .send()
            .await
            .map_err(|e| {
                error!(provider = "Gemini", error = %e, "request failed");
                RagError::EmbeddingUnavailable {
                    provider: "Gemini".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        let response = self.check_status(response).await?;
        let parsed: EmbedContentResponse = response.json().await.map_err(|e| {
            RagError::EmbeddingUnavailable {
                provider: "Gemini".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        Ok(parsed.embedding.values)
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(provider = "Gemini", batch_size = texts.len(), "embedding batch");

        let url = format!("{}/models/{}:batchEmbedContents", self.base_url, self.model);
        let body = BatchEmbedRequest {
            requests: texts.iter().map(|t| self.content_request(t)).collect(),
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "Gemini", error = %e, "batch request failed");
                RagError::EmbeddingUnavailable {
                    provider: "Gemini".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        let response = self.check_status(response).await?;
        let parsed: BatchEmbedResponse = response.json().await.map_err(|e| {
            RagError::EmbeddingUnavailable {
                provider: "Gemini".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        Ok(parsed.embeddings.into_iter().map(|e| e.values).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
