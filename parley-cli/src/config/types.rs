use clap::ValueEnum;
use parley_models::providers::{DEFAULT_GEMINI_BASE_URL, DEFAULT_OLLAMA_BASE_URL};
use serde::{Deserialize, Serialize};

/// Default model when the Gemini provider is selected
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Default model when the Ollama provider is selected
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.1";

/// Default limit on a single evaluation, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Which generation backend to call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    Ollama,
}

impl ProviderKind {
    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Gemini => DEFAULT_GEMINI_MODEL,
            ProviderKind::Ollama => DEFAULT_OLLAMA_MODEL,
        }
    }
}

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawParleyConfig {
    #[serde(default)]
    pub model: RawModelConfig,

    #[serde(default)]
    pub ollama: RawOllamaSection,

    #[serde(default)]
    pub gemini: RawGeminiSection,
}

/// Model config as stored in TOML (optional fields for proper merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawModelConfig {
    pub provider: Option<ProviderKind>,
    pub name: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawOllamaSection {
    pub host: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawGeminiSection {
    pub base_url: Option<String>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ParleyConfig {
    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub ollama: OllamaSection,

    #[serde(default)]
    pub gemini: GeminiSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub provider: ProviderKind,

    /// Model id passed to the provider
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Upper bound on one evaluation; 0 disables the limit
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            name: ProviderKind::default().default_model().to_string(),
            temperature: None,
            max_tokens: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaSection {
    pub host: String,
}

impl Default for OllamaSection {
    fn default() -> Self {
        Self {
            host: DEFAULT_OLLAMA_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiSection {
    pub base_url: String,
}

impl Default for GeminiSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }
}
