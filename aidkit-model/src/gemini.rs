//! Gemini model client using the Generative Language API.
//!
//! This module is only available when the `gemini` feature is enabled.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{ModelError, Result};
use crate::llm::Llm;

/// The default Generative Language API base URL.
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The default generation model.
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// A [`Llm`] backed by the Gemini `generateContent` endpoint.
///
/// # Example
///
/// ```rust,ignore
/// use aidkit_model::GeminiModel;
///
/// let model = GeminiModel::new(std::env::var("GOOGLE_API_KEY")?)?;
/// let reply = model.generate("You are a helpful assistant.", "Say hello.").await?;
/// ```
pub struct GeminiModel {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiModel {
    /// Create a new client with the given API key and the default model.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ModelError::ConfigError("API key must not be empty".to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_MODEL.into(),
            base_url: GEMINI_API_BASE.into(),
        })
    }

    /// Create a new client using the `GOOGLE_API_KEY` or `GEMINI_API_KEY`
    /// environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GOOGLE_API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .map_err(|_| {
                ModelError::ConfigError(
                    "GOOGLE_API_KEY or GEMINI_API_KEY environment variable not set".to_string(),
                )
            })?;
        Self::new(api_key)
    }

    /// Set the model name (e.g. `gemini-2.5-pro`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL (for proxies or tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

// ── Gemini API request/response types ──────────────────────────────

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct InstructionPayload<'a> {
    parts: Vec<TextPart<'a>>,
}

#[derive(Serialize)]
struct ContentPayload<'a> {
    role: &'a str,
    parts: Vec<TextPart<'a>>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    system_instruction: InstructionPayload<'a>,
    contents: Vec<ContentPayload<'a>>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// Extract the first candidate's concatenated text parts.
fn response_text(response: GenerateResponse) -> Option<String> {
    let candidate = response.candidates.into_iter().next()?;
    let content = candidate.content?;
    let text: String =
        content.parts.into_iter().filter_map(|part| part.text).collect::<Vec<_>>().join("");
    if text.is_empty() { None } else { Some(text) }
}

// ── Llm implementation ─────────────────────────────────────────────

#[async_trait]
impl Llm for GeminiModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, instructions: &str, context: &str) -> Result<String> {
        debug!(
            model = %self.model,
            instructions_len = instructions.len(),
            context_len = context.len(),
            "generating content"
        );

        let body = GenerateRequest {
            system_instruction: InstructionPayload { parts: vec![TextPart { text: instructions }] },
            contents: vec![ContentPayload { role: "user", parts: vec![TextPart { text: context }] }],
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "Gemini", error = %e, "request failed");
                ModelError::GenerationUnavailable {
                    provider: "Gemini".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            error!(provider = "Gemini", %status, "API error");
            return Err(ModelError::GenerationUnavailable {
                provider: "Gemini".into(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            ModelError::InvalidResponse {
                provider: "Gemini".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        response_text(parsed).ok_or_else(|| ModelError::InvalidResponse {
            provider: "Gemini".into(),
            message: "response contained no text candidates".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_simple_text_response() {
        let body = json!({
            "candidates": [{
                "content": {
                    "parts": [{"text": "Apply firm, direct pressure."}],
                    "role": "model"
                },
                "finishReason": "STOP",
                "index": 0
            }],
            "usageMetadata": {
                "promptTokenCount": 12,
                "candidatesTokenCount": 6,
                "totalTokenCount": 18
            }
        });

        let parsed: GenerateResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response_text(parsed).as_deref(), Some("Apply firm, direct pressure."));
    }

    #[test]
    fn parse_multi_part_candidate_concatenates_text() {
        let body = json!({
            "candidates": [{
                "content": {
                    "parts": [{"text": "First, "}, {"text": "call for help."}],
                    "role": "model"
                }
            }]
        });

        let parsed: GenerateResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response_text(parsed).as_deref(), Some("First, call for help."));
    }

    #[test]
    fn empty_candidates_yield_no_text() {
        let parsed: GenerateResponse = serde_json::from_value(json!({"candidates": []})).unwrap();
        assert!(response_text(parsed).is_none());
    }

    #[test]
    fn blocked_response_without_content_yields_no_text() {
        let body = json!({
            "candidates": [{"finishReason": "SAFETY"}],
            "promptFeedback": {"blockReason": "SAFETY"}
        });

        let parsed: GenerateResponse = serde_json::from_value(body).unwrap();
        assert!(response_text(parsed).is_none());
    }

    #[test]
    fn empty_api_key_is_rejected() {
        assert!(matches!(GeminiModel::new(""), Err(ModelError::ConfigError(_))));
    }
}
