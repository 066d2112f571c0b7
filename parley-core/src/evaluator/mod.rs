//! Schema-constrained evaluation of a transcript.
//!
//! One transcript in, one outbound generation request, one validated
//! [`SpeakingEvaluation`] (or a descriptive error) out. The evaluator never
//! retries and never touches session storage.

mod decode;
mod prompt;

use std::sync::Arc;

use parley_models::providers::{GenerateRequest, GenerationProvider};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{EvaluateError, GenerationError, Result};
use crate::rubric::{CefrLevel, SpeakingEvaluation, schema_descriptor};

/// Default model id.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Settings for outbound generation requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: None,
            max_tokens: None,
        }
    }
}

impl EvaluatorConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// A transcript plus optional framing for the examiner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationRequest {
    pub transcript: String,
    /// Level the learner is working towards.
    pub target_level: Option<CefrLevel>,
    /// The communicative task the learner was given.
    pub task: Option<String>,
}

impl EvaluationRequest {
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            ..Self::default()
        }
    }

    pub fn target_level(mut self, level: CefrLevel) -> Self {
        self.target_level = Some(level);
        self
    }

    pub fn task(mut self, task: impl Into<String>) -> Self {
        self.task = Some(task.into());
        self
    }
}

/// Scores transcripts against the CEFR rubric through a generation provider.
pub struct Evaluator {
    provider: Arc<dyn GenerationProvider>,
    config: EvaluatorConfig,
}

impl Evaluator {
    pub fn new(provider: Arc<dyn GenerationProvider>, config: EvaluatorConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluate a bare transcript.
    ///
    /// # Errors
    ///
    /// - [`EvaluateError::EmptyInput`] for an empty or whitespace-only
    ///   transcript, without contacting the provider
    /// - [`EvaluateError::Generation`] when the provider fails or returns
    ///   nothing usable
    /// - [`EvaluateError::Validation`] when the output does not match the rubric
    pub async fn evaluate(&self, transcript: &str) -> Result<SpeakingEvaluation> {
        self.evaluate_request(&EvaluationRequest::new(transcript))
            .await
    }

    /// Evaluate a transcript with a target level and task description.
    ///
    /// # Errors
    ///
    /// See [`Evaluator::evaluate`].
    pub async fn evaluate_request(&self, request: &EvaluationRequest) -> Result<SpeakingEvaluation> {
        if request.transcript.trim().is_empty() {
            return Err(EvaluateError::EmptyInput);
        }

        let mut generate = GenerateRequest::new(&self.config.model, request.transcript.as_str())
            .system(prompt::system_prompt(
                request.target_level,
                request.task.as_deref(),
            ))
            .output_schema(schema_descriptor());
        if let Some(temperature) = self.config.temperature {
            generate = generate.temperature(temperature);
        }
        if let Some(max_tokens) = self.config.max_tokens {
            generate = generate.max_tokens(max_tokens);
        }

        debug!(
            provider = self.provider.name(),
            model = %self.config.model,
            transcript_chars = request.transcript.len(),
            target_level = ?request.target_level,
            "Requesting evaluation"
        );

        let response = self
            .provider
            .generate(generate)
            .await
            .map_err(GenerationError::Provider)?;

        let evaluation = decode::decode_response(&response)?;

        for advisory in evaluation.advisories() {
            warn!(%advisory, "Inconsistent levels in evaluation");
        }
        for unquoted in evaluation.unquoted_excerpts(&request.transcript) {
            warn!(
                criterion = unquoted.criterion.key(),
                facet = unquoted.facet,
                excerpt = %unquoted.excerpt,
                "Evidence excerpt not found in transcript"
            );
        }

        info!(
            model = %response.model,
            overall_level = %evaluation.overall_level,
            output_tokens = response.usage.output_tokens,
            "Evaluation complete"
        );

        Ok(evaluation)
    }
}
