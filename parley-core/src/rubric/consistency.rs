//! Soft consistency checks over a valid evaluation.
//!
//! None of these reject an evaluation. They flag places where the model's
//! levels disagree with each other by more than one band, or where an
//! evidence excerpt cannot be found in the transcript.

use std::fmt;

use serde::Serialize;

use super::criteria::Criterion;
use super::evaluation::SpeakingEvaluation;
use super::level::CefrLevel;

/// Largest band gap tolerated before an advisory is raised.
pub const MAX_BAND_GAP: u8 = 1;

/// A soft inconsistency in an evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// A facet level is far from its criterion's holistic level.
    FacetDrift {
        criterion: Criterion,
        facet: &'static str,
        facet_level: CefrLevel,
        criterion_level: CefrLevel,
    },
    /// The overall level is far from every criterion level.
    IsolatedOverall {
        overall_level: CefrLevel,
        nearest: CefrLevel,
    },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::FacetDrift {
                criterion,
                facet,
                facet_level,
                criterion_level,
            } => write!(
                f,
                "{}.{facet} is {facet_level} but {criterion} overall is {criterion_level}",
                criterion.key()
            ),
            Advisory::IsolatedOverall {
                overall_level,
                nearest,
            } => write!(
                f,
                "overall level {overall_level} is more than {MAX_BAND_GAP} band from every criterion (nearest {nearest})"
            ),
        }
    }
}

/// An evidence excerpt that does not occur in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnquotedExcerpt {
    pub criterion: Criterion,
    pub facet: &'static str,
    pub excerpt: String,
}

impl SpeakingEvaluation {
    /// Level disagreements wider than [`MAX_BAND_GAP`].
    #[must_use]
    pub fn advisories(&self) -> Vec<Advisory> {
        let mut advisories = Vec::new();
        let mut nearest: Option<CefrLevel> = None;

        for judgment in self.criteria() {
            let criterion_level = judgment.overall_cefr_level();
            for facet in judgment.facets() {
                let facet_level = facet.subscore.cefr_level;
                if facet_level.distance(criterion_level) > MAX_BAND_GAP {
                    advisories.push(Advisory::FacetDrift {
                        criterion: judgment.criterion(),
                        facet: facet.name,
                        facet_level,
                        criterion_level,
                    });
                }
            }

            let closer = nearest.is_none_or(|best| {
                criterion_level.distance(self.overall_level) < best.distance(self.overall_level)
            });
            if closer {
                nearest = Some(criterion_level);
            }
        }

        if let Some(nearest) = nearest
            && nearest.distance(self.overall_level) > MAX_BAND_GAP
        {
            advisories.push(Advisory::IsolatedOverall {
                overall_level: self.overall_level,
                nearest,
            });
        }

        advisories
    }

    /// Evidence excerpts that do not appear verbatim in `transcript`.
    ///
    /// Matching ignores case and collapses runs of whitespace.
    #[must_use]
    pub fn unquoted_excerpts(&self, transcript: &str) -> Vec<UnquotedExcerpt> {
        let haystack = normalize(transcript);
        let mut missing = Vec::new();
        for judgment in self.criteria() {
            for facet in judgment.facets() {
                for evidence in &facet.subscore.evidence {
                    if !haystack.contains(&normalize(&evidence.excerpt)) {
                        missing.push(UnquotedExcerpt {
                            criterion: judgment.criterion(),
                            facet: facet.name,
                            excerpt: evidence.excerpt.clone(),
                        });
                    }
                }
            }
        }
        missing
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
