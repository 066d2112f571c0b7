//! The aggregate evaluation record.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::criteria::{
    CoherenceJudgment, CriterionJudgment, FluencyJudgment, GrammarJudgment, InteractionJudgment,
    PronunciationJudgment, TaskAchievementJudgment, VocabularyJudgment,
};
use super::level::CefrLevel;

/// A complete CEFR speaking evaluation.
///
/// Untrusted payloads go through [`validate`](super::validate), which checks
/// them against the published schema before deserializing. Plain
/// `Deserialize` is for values that were already validated, such as ones
/// read back from a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SpeakingEvaluation {
    /// Target level set for the task, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_level: Option<CefrLevel>,
    #[serde(rename = "vocab")]
    pub vocabulary: VocabularyJudgment,
    pub grammar: GrammarJudgment,
    pub fluency: FluencyJudgment,
    pub coherence: CoherenceJudgment,
    pub interaction: InteractionJudgment,
    pub pronunciation: PronunciationJudgment,
    /// Include when the prompt has an explicit communicative task.
    #[serde(rename = "task", skip_serializing_if = "Option::is_none")]
    pub task_achievement: Option<TaskAchievementJudgment>,
    /// Holistic CEFR level for the whole performance. A considered judgment, not an average.
    pub overall_level: CefrLevel,
    /// Short narrative tying the subscores to a single CEFR decision.
    #[schemars(length(min = 1))]
    pub overall_summary: String,
    /// Top 3-5 priorities for moving toward the next band.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_recommendations: Option<String>,
}

impl SpeakingEvaluation {
    /// Present judgments in rubric order.
    pub fn criteria(&self) -> impl Iterator<Item = CriterionJudgment<'_>> {
        [
            Some(CriterionJudgment::Vocabulary(&self.vocabulary)),
            Some(CriterionJudgment::Grammar(&self.grammar)),
            Some(CriterionJudgment::Fluency(&self.fluency)),
            Some(CriterionJudgment::Coherence(&self.coherence)),
            Some(CriterionJudgment::Interaction(&self.interaction)),
            Some(CriterionJudgment::Pronunciation(&self.pronunciation)),
            self.task_achievement
                .as_ref()
                .map(CriterionJudgment::TaskAchievement),
        ]
        .into_iter()
        .flatten()
    }
}
