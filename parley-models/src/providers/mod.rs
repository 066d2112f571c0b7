//! Generation provider trait and implementations.
//!
//! The [`GenerationProvider`] trait is the only surface the evaluator sees:
//! a model id, some content and an optional output schema go in, a
//! structured payload and/or raw text come out.
//!
//! # Example
//!
//! ```ignore
//! use parley_models::providers::{GenerationProvider, GenerateRequest, OllamaProvider};
//!
//! async fn run(provider: &dyn GenerationProvider) {
//!     let request = GenerateRequest::new("llama3", "Hello!");
//!     let response = provider.generate(request).await?;
//!     println!("{:?}", response.text);
//! }
//! ```

mod gemini;
mod ollama;
mod types;

use async_trait::async_trait;

pub use gemini::{DEFAULT_GEMINI_BASE_URL, GeminiProvider};
pub use ollama::{DEFAULT_OLLAMA_BASE_URL, OllamaProvider};
pub use types::*;

use crate::Result;

/// Trait for generation providers (hosted and local).
///
/// # Required Methods
///
/// - [`name`](GenerationProvider::name) - Provider identifier (e.g., "ollama", "gemini")
/// - [`generate`](GenerationProvider::generate) - One request, one response
///
/// Implementations must not retry; retry policy belongs to the caller.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Returns the provider name.
    fn name(&self) -> &str;

    /// Perform a single generation request.
    ///
    /// # Errors
    ///
    /// Returns an error when the provider is unreachable or answers with a
    /// non-success status.
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;
}

/// Decode `text` as a structured payload when a schema was requested.
///
/// Returns `None` when no schema was asked for or the text is not JSON;
/// callers then fall back to the raw text.
pub(crate) fn structured_payload(text: &str, schema_requested: bool) -> Option<serde_json::Value> {
    if !schema_requested {
        return None;
    }
    serde_json::from_str(text.trim()).ok()
}
