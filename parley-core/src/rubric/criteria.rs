//! The seven rubric criteria and their judgments.
//!
//! Every judgment is a fixed group of named [`Subscore`]s plus a holistic
//! level and comment. The set is closed: [`Criterion`] names the kinds and
//! [`CriterionJudgment`] borrows one of them uniformly.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::level::CefrLevel;
use super::subscore::Subscore;

/// A rubric criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Vocabulary,
    Grammar,
    Fluency,
    Coherence,
    Interaction,
    Pronunciation,
    TaskAchievement,
}

impl Criterion {
    /// All criteria in rubric order.
    pub const ALL: [Criterion; 7] = [
        Criterion::Vocabulary,
        Criterion::Grammar,
        Criterion::Fluency,
        Criterion::Coherence,
        Criterion::Interaction,
        Criterion::Pronunciation,
        Criterion::TaskAchievement,
    ];

    /// Field name of this criterion in the evaluation payload.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Criterion::Vocabulary => "vocab",
            Criterion::Grammar => "grammar",
            Criterion::Fluency => "fluency",
            Criterion::Coherence => "coherence",
            Criterion::Interaction => "interaction",
            Criterion::Pronunciation => "pronunciation",
            Criterion::TaskAchievement => "task",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Criterion::Vocabulary => "Vocabulary",
            Criterion::Grammar => "Grammar",
            Criterion::Fluency => "Fluency",
            Criterion::Coherence => "Coherence",
            Criterion::Interaction => "Interaction",
            Criterion::Pronunciation => "Pronunciation",
            Criterion::TaskAchievement => "Task achievement",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A named subscore within a judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Facet<'a> {
    pub name: &'static str,
    pub subscore: &'a Subscore,
}

/// Behaviour shared by every criterion judgment.
pub trait Judgment {
    fn criterion(&self) -> Criterion;

    /// Facets in rubric order.
    fn facets(&self) -> Vec<Facet<'_>>;

    fn overall_cefr_level(&self) -> CefrLevel;

    fn overall_comment(&self) -> &str;
}

macro_rules! judgment {
    (
        $(#[$meta:meta])*
        $name:ident => $criterion:ident {
            $( $(#[$facet_meta:meta])* $facet:ident, )+
        }
        level = $level_doc:literal,
        comment = $comment_doc:literal $(,)?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
        #[serde(deny_unknown_fields)]
        pub struct $name {
            $( $(#[$facet_meta])* pub $facet: Subscore, )+
            #[doc = $level_doc]
            pub overall_cefr_level: CefrLevel,
            #[doc = $comment_doc]
            #[schemars(length(min = 1))]
            pub overall_comment: String,
        }

        impl Judgment for $name {
            fn criterion(&self) -> Criterion {
                Criterion::$criterion
            }

            fn facets(&self) -> Vec<Facet<'_>> {
                vec![$( Facet { name: stringify!($facet), subscore: &self.$facet }, )+]
            }

            fn overall_cefr_level(&self) -> CefrLevel {
                self.overall_cefr_level
            }

            fn overall_comment(&self) -> &str {
                &self.overall_comment
            }
        }
    };
}

judgment! {
    /// Lexical resource: how wide and precise the vocabulary is, and how well it is controlled.
    VocabularyJudgment => Vocabulary {
        /// Breadth and specificity of vocabulary available for the task domain.
        vocab_range,
        /// Accuracy and appropriacy: word choice, collocations, word formation.
        vocab_control,
    }
    level = "Holistic CEFR level for lexical resource.",
    comment = "Synthesis of range and control evidence in CEFR terms.",
}

judgment! {
    /// Grammatical range and accuracy.
    GrammarJudgment => Grammar {
        /// Breadth and complexity of grammatical structures used.
        range,
        /// Grammatical correctness and stability at length.
        accuracy,
    }
    level = "Holistic CEFR level for grammar.",
    comment = "Summary linking range and accuracy to CEFR bands.",
}

judgment! {
    /// Flow, tempo and continuity of speech.
    FluencyJudgment => Fluency {
        /// Flow and tempo: pausing, hesitations, reformulations, self-correction.
        fluency,
    }
    level = "Holistic CEFR level for fluency.",
    comment = "Key indicators, e.g. 'keeps going at B2 with occasional reformulation'.",
}

judgment! {
    /// Discourse management: sequencing, thematic development and signposting.
    CoherenceJudgment => Coherence {
        /// Logical sequencing and topic development.
        organization,
        /// Use of connectors, referencing and signposting.
        cohesion_devices,
    }
    level = "Holistic CEFR level for coherence and cohesion.",
    comment = "Overall discourse control mapped to CEFR descriptors.",
}

judgment! {
    /// Spoken interaction. Judge from whatever interaction the sample shows.
    InteractionJudgment => Interaction {
        /// Initiating, maintaining and yielding turns appropriately.
        turntaking,
        /// Clarifying, confirming and requesting clarification.
        cooperation_strategies,
        /// Repair strategies to resolve misunderstandings.
        managing_breakdowns,
    }
    level = "Holistic CEFR level for spoken interaction.",
    comment = "Interactional competence summary in CEFR terms.",
}

judgment! {
    /// Phonological control, judged from the transcript and any delivery notes in it.
    PronunciationJudgment => Pronunciation {
        /// Global intelligibility across the sample.
        overall_phonological_control,
        /// Segmental clarity: consonants, vowels, reductions, elisions.
        sound_articulation,
        /// Stress, rhythm and intonation supporting meaning and discourse.
        prosody,
    }
    level = "Holistic CEFR level for phonological control.",
    comment = "Notes on intelligibility and prosody using CEFR phrasing.",
}

judgment! {
    /// Task adequacy for the speaking context (presentation, narrative, discussion).
    TaskAchievementJudgment => TaskAchievement {
        /// Addresses the prompt fully and appropriately for the level.
        relevance_and_coverage,
        /// Performs the communicative functions expected at the target level.
        functional_adequacy,
    }
    level = "Holistic CEFR level for task adequacy.",
    comment = "Target-level alignment for the specific task type.",
}

/// A borrowed judgment of any criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriterionJudgment<'a> {
    Vocabulary(&'a VocabularyJudgment),
    Grammar(&'a GrammarJudgment),
    Fluency(&'a FluencyJudgment),
    Coherence(&'a CoherenceJudgment),
    Interaction(&'a InteractionJudgment),
    Pronunciation(&'a PronunciationJudgment),
    TaskAchievement(&'a TaskAchievementJudgment),
}

impl<'a> CriterionJudgment<'a> {
    /// The judgment behind this variant.
    #[must_use]
    pub fn as_judgment(self) -> &'a dyn Judgment {
        match self {
            CriterionJudgment::Vocabulary(j) => j,
            CriterionJudgment::Grammar(j) => j,
            CriterionJudgment::Fluency(j) => j,
            CriterionJudgment::Coherence(j) => j,
            CriterionJudgment::Interaction(j) => j,
            CriterionJudgment::Pronunciation(j) => j,
            CriterionJudgment::TaskAchievement(j) => j,
        }
    }

    #[must_use]
    pub fn criterion(self) -> Criterion {
        self.as_judgment().criterion()
    }

    #[must_use]
    pub fn facets(self) -> Vec<Facet<'a>> {
        self.as_judgment().facets()
    }

    #[must_use]
    pub fn overall_cefr_level(self) -> CefrLevel {
        self.as_judgment().overall_cefr_level()
    }

    #[must_use]
    pub fn overall_comment(self) -> &'a str {
        self.as_judgment().overall_comment()
    }
}
