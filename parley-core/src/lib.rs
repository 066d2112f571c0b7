//! parley-core - CEFR speaking evaluation
//!
//! This crate provides:
//! - [`rubric`]: the typed rubric, strict payload validation and the JSON
//!   Schema sent to the model
//! - [`evaluator`]: transcript in, one generation request, validated
//!   [`SpeakingEvaluation`](rubric::SpeakingEvaluation) out
//! - [`store`]: single-slot, last-write-wins score storage per session
//! - [`tools`]: the EVALUATE / LOG / RETRIEVE operations a host exposes
//!
//! ```text
//! transcript ──▶ Evaluator ──▶ GenerationProvider
//!                    │
//!                    ▼
//!             rubric::validate ──▶ SpeakingEvaluation ──▶ ScoreStore
//! ```

pub mod error;
pub mod evaluator;
pub mod rubric;
pub mod store;
pub mod tools;

pub use error::{EvaluateError, GenerationError, Result};
pub use evaluator::{EvaluationRequest, Evaluator, EvaluatorConfig};
pub use rubric::{CefrLevel, SpeakingEvaluation, ValidationError};
pub use store::{ScoreStore, SessionContext, SessionId, SessionMemory};
pub use tools::{LogConfirmation, ScoringSession};
