//! Gemini hosted model provider.
//!
//! Talks to the `generateContent` REST endpoint. When an output schema is
//! requested the call sets `responseMimeType: application/json` and passes
//! the schema as `responseJsonSchema`.
//!
//! # Example
//!
//! ```ignore
//! use parley_models::providers::GeminiProvider;
//!
//! let provider = GeminiProvider::from_env()?;  // GEMINI_API_KEY or GOOGLE_API_KEY
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{GenerateRequest, GenerateResponse, GenerationProvider, Usage, structured_payload};
use crate::auth::ApiKey;

/// Default Gemini API base URL.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

// ────────────────────────────────────────────────────────────────────────────
// Gemini API Types
// ────────────────────────────────────────────────────────────────────────────

/// A text part of a Gemini content block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// A content block (one turn).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

impl GeminiContent {
    fn text(role: Option<&str>, text: String) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![GeminiPart { text: Some(text) }],
        }
    }
}

/// Generation settings.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_json_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,
    pub contents: Vec<GeminiContent>,
    pub generation_config: GeminiGenerationConfig,
}

/// One candidate in a Gemini response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: Option<GeminiContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token accounting in a Gemini response.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiUsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u64,
    #[serde(default)]
    pub candidates_token_count: u64,
}

/// Response from `models/{model}:generateContent`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerateResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    pub usage_metadata: Option<GeminiUsageMetadata>,
    #[serde(default)]
    pub model_version: Option<String>,
}

impl GeminiGenerateRequest {
    /// Build the wire request from a generation request.
    pub fn from_request(request: GenerateRequest) -> Self {
        let structured = request.output_schema.is_some();
        Self {
            system_instruction: request.system.map(|s| GeminiContent::text(None, s)),
            contents: vec![GeminiContent::text(Some("user"), request.content)],
            generation_config: GeminiGenerationConfig {
                response_mime_type: structured.then(|| "application/json".to_string()),
                response_json_schema: request.output_schema.map(|s| s.schema),
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            },
        }
    }
}

impl GeminiGenerateResponse {
    /// Concatenated text of the first candidate, if any.
    pub fn first_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!text.is_empty()).then_some(text)
    }

    /// Convert to a generation response.
    pub fn into_response(self, model: &str, schema_requested: bool) -> GenerateResponse {
        let text = self.first_text();
        let usage = self
            .usage_metadata
            .as_ref()
            .map(|u| Usage::new(u.prompt_token_count, u.candidates_token_count))
            .unwrap_or_default();
        GenerateResponse {
            model: self.model_version.unwrap_or_else(|| model.to_string()),
            parsed: text
                .as_deref()
                .and_then(|t| structured_payload(t, schema_requested)),
            text,
            usage,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// GeminiProvider
// ────────────────────────────────────────────────────────────────────────────

/// Gemini hosted model provider.
pub struct GeminiProvider {
    base_url: String,
    api_key: ApiKey,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a provider with an explicit API key and the default base URL.
    pub fn new(api_key: ApiKey) -> Self {
        Self::with_base_url(api_key, DEFAULT_GEMINI_BASE_URL)
    }

    /// Create a provider against a custom base URL.
    pub fn with_base_url(api_key: ApiKey, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    /// Create a provider with the API key read from the environment.
    pub fn from_env() -> crate::Result<Self> {
        Ok(Self::new(ApiKey::from_env("gemini")?))
    }

    /// Get the base URL for this provider.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait::async_trait]
impl GenerationProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: GenerateRequest) -> crate::Result<GenerateResponse> {
        let model = request.model.clone();
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, model
        );
        let schema_requested = request.output_schema.is_some();
        let body = GeminiGenerateRequest::from_request(request);

        debug!(model = %model, schema_requested, "Sending Gemini generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| crate::Error::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(crate::Error::ProviderApi(format!(
                "Gemini API returned {}: {}",
                status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| crate::Error::Request(e.to_string()))?;
        let gemini_response: GeminiGenerateResponse = serde_json::from_str(&body)?;

        if let Some(reason) = gemini_response
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
            && reason != "STOP"
        {
            debug!(model = %model, finish_reason = reason, "Gemini candidate did not finish normally");
        }

        Ok(gemini_response.into_response(&model, schema_requested))
    }
}
