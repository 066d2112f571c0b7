//! Subscores and the evidence backing them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::level::CefrLevel;
use super::validation::MAX_SCORE;

/// A transcript excerpt supporting a score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Evidence {
    /// Quoted text or concise summary that supports the score.
    #[schemars(length(min = 1))]
    pub excerpt: String,
    /// Why this excerpt matters for the criterion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Evidence {
    /// Evidence without a note.
    #[must_use]
    pub fn quote(excerpt: impl Into<String>) -> Self {
        Self {
            excerpt: excerpt.into(),
            note: None,
        }
    }
}

/// One scored facet of a criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Subscore {
    /// 0-5 rubric band (0 = not evidenced, 5 = consistently at target).
    #[schemars(range(min = 0, max = MAX_SCORE))]
    pub score: u8,
    /// Best-fit CEFR level for this facet.
    pub cefr_level: CefrLevel,
    /// Short justification tying observations to CEFR descriptors.
    #[schemars(length(min = 1))]
    pub rationale: String,
    /// Verbatim transcript excerpts supporting the score.
    #[serde(default)]
    pub evidence: Vec<Evidence>,
    /// Concrete, level-appropriate next steps for improvement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<String>,
}
