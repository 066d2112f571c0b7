//! Caller-facing operations for one scoring session.
//!
//! EVALUATE, LOG and RETRIEVE map onto [`ScoringSession::evaluate`],
//! [`ScoringSession::log`] and [`ScoringSession::retrieve`]. Evaluating does
//! not log; callers chain the two explicitly.

use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::evaluator::{EvaluationRequest, Evaluator};
use crate::rubric::SpeakingEvaluation;
use crate::store::{ScoreStore, SessionContext};

/// Confirmation returned by [`ScoringSession::log`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LogConfirmation {
    pub message: &'static str,
}

impl LogConfirmation {
    pub const MESSAGE: &'static str = "Scores logged successfully.";
}

impl Default for LogConfirmation {
    fn default() -> Self {
        Self {
            message: Self::MESSAGE,
        }
    }
}

impl fmt::Display for LogConfirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)
    }
}

/// An evaluator bound to one session's storage.
pub struct ScoringSession {
    evaluator: Evaluator,
    context: SessionContext,
}

impl ScoringSession {
    pub fn new(evaluator: Evaluator, context: SessionContext) -> Self {
        Self { evaluator, context }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// EVALUATE: score a transcript. Nothing is stored.
    pub async fn evaluate(&self, transcript: &str) -> Result<SpeakingEvaluation> {
        self.evaluator.evaluate(transcript).await
    }

    /// EVALUATE with a target level and task.
    pub async fn evaluate_request(&self, request: &EvaluationRequest) -> Result<SpeakingEvaluation> {
        self.evaluator.evaluate_request(request).await
    }

    /// LOG: make `evaluation` the session's current scores.
    pub fn log(&mut self, evaluation: SpeakingEvaluation) -> LogConfirmation {
        ScoreStore::put(self.context.memory_mut(), evaluation);
        info!(session = %self.context.id(), "Scores logged");
        LogConfirmation::default()
    }

    /// RETRIEVE: the last logged evaluation, if any.
    pub fn retrieve(&self) -> Option<&SpeakingEvaluation> {
        ScoreStore::get(self.context.memory())
    }
}
