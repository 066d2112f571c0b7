//! The CEFR speaking rubric.
//!
//! Defines the shape of a valid [`SpeakingEvaluation`], checks arbitrary
//! payloads against it with [`validate`], and publishes the same shape as a
//! JSON Schema via [`schema_descriptor`].

mod consistency;
mod criteria;
mod evaluation;
mod level;
mod schema;
mod subscore;
mod validation;

pub use consistency::{Advisory, MAX_BAND_GAP, UnquotedExcerpt};
pub use criteria::{
    CoherenceJudgment, Criterion, CriterionJudgment, Facet, FluencyJudgment, GrammarJudgment,
    InteractionJudgment, Judgment, PronunciationJudgment, TaskAchievementJudgment,
    VocabularyJudgment,
};
pub use evaluation::SpeakingEvaluation;
pub use level::{CefrLevel, UnknownLevel};
pub use schema::{SCHEMA_NAME, evaluation_schema, schema_descriptor};
pub use subscore::{Evidence, Subscore};
pub use validation::{FieldIssue, FieldPath, MAX_SCORE, Problem, ValidationError, validate, validate_json};
