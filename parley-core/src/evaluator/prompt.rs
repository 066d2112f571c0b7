//! Examiner instructions sent as the system prompt.

use std::fmt::Write;

use crate::rubric::{CefrLevel, SCHEMA_NAME};

const EXAMINER: &str = "\
You are an experienced English language examiner working with the Common European \
Framework of Reference for Languages (CEFR). You assess a learner's spoken English \
from a transcript of their speech.";

const CRITERIA: &str = "\
Assess the performance on each criterion:
1. vocab: range and control of lexical resource.
2. grammar: grammatical range and accuracy.
3. fluency: flow, tempo and continuity of speech.
4. coherence: logical sequencing and linking of ideas.
5. interaction: turn-taking and cooperative strategies, as far as the sample shows them.
6. pronunciation: intelligibility, sound articulation and prosody.
7. task: whether the communicative goal of the task was met.";

const SUBSCORES: &str = "\
For every facet of every criterion give:
- score: an integer from 0 to 5, where 0 means not evidenced and 5 means consistently at target.
- cefr_level: the best-fit level, exactly one of A1, A2, B1, B2, C1, C2.
- rationale: a concise justification phrased in terms of CEFR descriptors.
- evidence: two or three verbatim excerpts from the transcript, each with a short note on why it matters.
- suggestions: concrete, actionable advice for improving this facet.
For each criterion also give overall_cefr_level and overall_comment.";

const OVERALL: &str = "\
Then give:
- overall_level: one holistic CEFR level for the whole performance. Weigh strengths \
against weaknesses; do not average the criterion levels.
- overall_summary: a short narrative that ties the criteria together and justifies the overall level.
- overall_recommendations: the three to five most important priorities for reaching the next level.";

/// Build the examiner system prompt.
pub(crate) fn system_prompt(target_level: Option<CefrLevel>, task: Option<&str>) -> String {
    let mut prompt = String::with_capacity(2048);
    prompt.push_str(EXAMINER);
    prompt.push_str("\n\n");

    if let Some(level) = target_level {
        let _ = write!(
            prompt,
            "The learner is working towards {level}. Set target_level to \"{level}\" and judge each \
             criterion against {level} descriptors.\n\n"
        );
    }

    prompt.push_str(CRITERIA);
    prompt.push_str("\n\n");

    match task.map(str::trim).filter(|t| !t.is_empty()) {
        Some(task) => {
            let _ = write!(
                prompt,
                "The speaking task was: {task}\nFill the task judgment for it.\n\n"
            );
        }
        None => {
            prompt.push_str("No explicit task was set. Omit the task judgment.\n\n");
        }
    }

    prompt.push_str(SUBSCORES);
    prompt.push_str("\n\n");
    prompt.push_str(OVERALL);
    prompt.push_str("\n\n");
    let _ = write!(
        prompt,
        "Answer with a single JSON object that conforms to the {SCHEMA_NAME} schema. \
         Quote evidence exactly as it appears in the transcript."
    );
    prompt
}
