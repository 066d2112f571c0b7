//! Request and response types for generation providers.

use serde::{Deserialize, Serialize};

/// A JSON Schema the model output is asked to conform to.
///
/// Providers pass the schema through to their structured-output feature.
/// Conformance is never assumed: callers validate the response themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    /// Short name for the schema (used in logs and by some providers).
    pub name: String,
    /// The JSON Schema document.
    pub schema: serde_json::Value,
}

impl SchemaDescriptor {
    /// Create a new schema descriptor.
    pub fn new(name: impl Into<String>, schema: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

/// Token usage statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Number of input/prompt tokens.
    pub input_tokens: u64,
    /// Number of output/completion tokens.
    pub output_tokens: u64,
    /// Total tokens (input + output).
    pub total_tokens: u64,
}

impl Usage {
    /// Create new usage statistics.
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
        }
    }
}

/// Request for a single generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model ID to use.
    pub model: String,
    /// System instruction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// User content to generate from.
    pub content: String,
    /// Schema the output should follow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<SchemaDescriptor>,
    /// Sampling temperature (0.0 to 2.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Maximum tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl GenerateRequest {
    /// Create a new generation request.
    pub fn new(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: None,
            content: content.into(),
            output_schema: None,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Set the system instruction.
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Request output shaped by `schema`.
    pub fn output_schema(mut self, schema: SchemaDescriptor) -> Self {
        self.output_schema = Some(schema);
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Set the maximum tokens.
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }
}

/// Response from a generation.
///
/// A provider returns the structured payload when it has one, the raw text
/// otherwise, or both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Model that produced the response.
    pub model: String,
    /// Output already decoded as structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed: Option<serde_json::Value>,
    /// Raw textual output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Token usage statistics.
    #[serde(default)]
    pub usage: Usage,
}

impl GenerateResponse {
    /// Create a response carrying only raw text.
    pub fn from_text(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Create a response carrying a structured payload.
    pub fn from_parsed(model: impl Into<String>, parsed: serde_json::Value) -> Self {
        Self {
            model: model.into(),
            parsed: Some(parsed),
            ..Self::default()
        }
    }

    /// Attach usage statistics.
    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = usage;
        self
    }
}
