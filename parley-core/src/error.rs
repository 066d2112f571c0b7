//! Error types for parley-core

use thiserror::Error;

use crate::rubric::ValidationError;

/// Failure of a single evaluation.
#[derive(Error, Debug)]
pub enum EvaluateError {
    /// The transcript was empty or only whitespace. No request was sent.
    #[error("Transcript is empty")]
    EmptyInput,

    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// The model answered, but not with a valid evaluation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl EvaluateError {
    /// The validation issues, when the failure was a schema mismatch.
    #[must_use]
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            EvaluateError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

/// Errors from the generation collaborator
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Provider error: {0}")]
    Provider(#[from] parley_models::Error),

    #[error("Model returned neither a structured payload nor text")]
    NoPayload,
}

pub type Result<T> = std::result::Result<T, EvaluateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_converts_through_generation() {
        let err: EvaluateError =
            GenerationError::from(parley_models::Error::Request("connection refused".into())).into();
        assert!(matches!(
            err,
            EvaluateError::Generation(GenerationError::Provider(_))
        ));
        assert!(err.to_string().contains("connection refused"));
        assert!(err.validation().is_none());
    }

    #[test]
    fn validation_error_is_transparent() {
        let err = EvaluateError::from(ValidationError::malformed("EOF while parsing"));
        assert!(err.to_string().starts_with("payload failed rubric validation"));
        assert!(err.validation().is_some_and(ValidationError::is_malformed));
    }
}
