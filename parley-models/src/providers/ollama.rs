//! Ollama local model provider.
//!
//! Connects to a local Ollama instance. Structured output uses the `format`
//! field of `/api/chat`, which accepts a JSON Schema.
//!
//! # Example
//!
//! ```ignore
//! use parley_models::providers::OllamaProvider;
//!
//! let provider = OllamaProvider::new();  // Uses localhost:11434
//! let provider = OllamaProvider::with_base_url("http://192.168.1.100:11434");
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{GenerateRequest, GenerateResponse, GenerationProvider, Usage, structured_payload};

/// Default Ollama API base URL.
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

// ────────────────────────────────────────────────────────────────────────────
// Ollama API Types
// ────────────────────────────────────────────────────────────────────────────

/// Message in an Ollama chat request/response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OllamaChatMessage {
    pub role: String,
    pub content: String,
}

/// Request body for Ollama's `/api/chat` endpoint.
#[derive(Debug, Serialize)]
pub struct OllamaChatRequest {
    pub model: String,
    pub messages: Vec<OllamaChatMessage>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<OllamaChatOptions>,
}

/// Chat options for Ollama.
#[derive(Debug, Serialize)]
pub struct OllamaChatOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<u32>,
}

/// Response from Ollama's `/api/chat` endpoint.
#[derive(Debug, Deserialize)]
pub struct OllamaChatResponse {
    pub model: String,
    pub message: OllamaChatMessage,
    #[serde(default)]
    pub prompt_eval_count: Option<u64>,
    #[serde(default)]
    pub eval_count: Option<u64>,
}

impl OllamaChatRequest {
    /// Build the wire request from a generation request.
    pub fn from_request(request: GenerateRequest) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system {
            messages.push(OllamaChatMessage {
                role: "system".to_string(),
                content: system,
            });
        }
        messages.push(OllamaChatMessage {
            role: "user".to_string(),
            content: request.content,
        });

        let options = if request.temperature.is_some() || request.max_tokens.is_some() {
            Some(OllamaChatOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            })
        } else {
            None
        };

        Self {
            model: request.model,
            messages,
            stream: false,
            format: request.output_schema.map(|s| s.schema),
            options,
        }
    }
}

impl OllamaChatResponse {
    /// Convert to a generation response.
    pub fn into_response(self, schema_requested: bool) -> GenerateResponse {
        let text = self.message.content;
        GenerateResponse {
            model: self.model,
            parsed: structured_payload(&text, schema_requested),
            text: (!text.is_empty()).then_some(text),
            usage: Usage::new(
                self.prompt_eval_count.unwrap_or(0),
                self.eval_count.unwrap_or(0),
            ),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// OllamaProvider
// ────────────────────────────────────────────────────────────────────────────

/// Ollama local model provider.
pub struct OllamaProvider {
    base_url: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    /// Create a new Ollama provider with default URL (localhost:11434).
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_OLLAMA_BASE_URL)
    }

    /// Create a new Ollama provider with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Get the base URL for this provider.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for OllamaProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl GenerationProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, request: GenerateRequest) -> crate::Result<GenerateResponse> {
        let url = format!("{}/api/chat", self.base_url);
        let schema_requested = request.output_schema.is_some();
        let ollama_request = OllamaChatRequest::from_request(request);

        debug!(
            model = %ollama_request.model,
            schema_requested,
            "Sending Ollama chat request"
        );

        let response = self
            .client
            .post(&url)
            .json(&ollama_request)
            .send()
            .await
            .map_err(|e| crate::Error::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(crate::Error::ProviderApi(format!(
                "Ollama API returned {}: {}",
                status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| crate::Error::Request(e.to_string()))?;
        let ollama_response: OllamaChatResponse = serde_json::from_str(&body)?;

        Ok(ollama_response.into_response(schema_requested))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::SchemaDescriptor;
    use serde_json::json;

    #[test]
    fn new_creates_provider_with_default_url() {
        let provider = OllamaProvider::new();
        assert_eq!(provider.base_url(), "http://localhost:11434");
    }

    #[test]
    fn with_base_url_trims_trailing_slash() {
        let provider = OllamaProvider::with_base_url("http://192.168.1.100:11434/");
        assert_eq!(provider.base_url(), "http://192.168.1.100:11434");
    }

    #[test]
    fn name_returns_ollama() {
        let provider = OllamaProvider::new();
        assert_eq!(provider.name(), "ollama");
    }

    #[test]
    fn request_carries_system_schema_and_options() {
        let request = GenerateRequest::new("llama3", "transcript")
            .system("examiner")
            .output_schema(SchemaDescriptor::new("Eval", json!({"type": "object"})))
            .temperature(0.1);

        let wire = OllamaChatRequest::from_request(request);
        let json = serde_json::to_value(&wire).unwrap();

        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "transcript");
        assert_eq!(json["format"], json!({"type": "object"}));
        assert_eq!(json["stream"], false);
        assert!((json["options"]["temperature"].as_f64().unwrap() - 0.1).abs() < 1e-6);
        assert!(json["options"].get("num_predict").is_none());
    }

    #[test]
    fn request_without_options_omits_them() {
        let wire = OllamaChatRequest::from_request(GenerateRequest::new("llama3", "hi"));
        let json = serde_json::to_value(&wire).unwrap();

        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
        assert!(json.get("format").is_none());
        assert!(json.get("options").is_none());
    }

    #[test]
    fn parse_chat_response_extracts_content() {
        let json = r#"{
            "model": "llama3",
            "created_at": "2024-01-15T10:00:00Z",
            "message": {
                "role": "assistant",
                "content": "{\"ok\": true}"
            },
            "done": true,
            "prompt_eval_count": 10,
            "eval_count": 15
        }"#;

        let response: OllamaChatResponse = serde_json::from_str(json).unwrap();
        let converted = response.into_response(true);

        assert_eq!(converted.parsed, Some(json!({"ok": true})));
        assert_eq!(converted.text.as_deref(), Some("{\"ok\": true}"));
        assert_eq!(converted.usage.input_tokens, 10);
        assert_eq!(converted.usage.output_tokens, 15);
    }

    #[test]
    fn unstructured_response_keeps_only_text() {
        let response = OllamaChatResponse {
            model: "llama3".to_string(),
            message: OllamaChatMessage {
                role: "assistant".to_string(),
                content: "{\"ok\": true}".to_string(),
            },
            prompt_eval_count: None,
            eval_count: None,
        };

        let converted = response.into_response(false);
        assert!(converted.parsed.is_none());
        assert!(converted.text.is_some());
    }

    #[test]
    fn empty_content_yields_no_payload() {
        let response = OllamaChatResponse {
            model: "llama3".to_string(),
            message: OllamaChatMessage {
                role: "assistant".to_string(),
                content: String::new(),
            },
            prompt_eval_count: None,
            eval_count: None,
        };

        let converted = response.into_response(true);
        assert!(converted.parsed.is_none());
        assert!(converted.text.is_none());
    }
}
