//! CEFR proficiency bands.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A CEFR proficiency band, A1 (lowest) to C2 (highest).
///
/// Ordering follows proficiency, so `CefrLevel::B1 < CefrLevel::C1`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl CefrLevel {
    /// All levels in ascending order.
    pub const ALL: [CefrLevel; 6] = [
        CefrLevel::A1,
        CefrLevel::A2,
        CefrLevel::B1,
        CefrLevel::B2,
        CefrLevel::C1,
        CefrLevel::C2,
    ];

    /// Zero-based rank (A1 = 0, C2 = 5).
    #[must_use]
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Number of bands between two levels.
    #[must_use]
    pub fn distance(self, other: CefrLevel) -> u8 {
        self.rank().abs_diff(other.rank())
    }

    /// The canonical label, e.g. `"B2"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CefrLevel::A1 => "A1",
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C1 => "C1",
            CefrLevel::C2 => "C2",
        }
    }

    /// The next band up, or `None` at C2.
    #[must_use]
    pub fn next(self) -> Option<CefrLevel> {
        Self::ALL.get(usize::from(self.rank()) + 1).copied()
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the six CEFR labels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown CEFR level: {0:?}")]
pub struct UnknownLevel(pub String);

impl FromStr for CefrLevel {
    type Err = UnknownLevel;

    /// Parses the exact upper-case label. `"b1"` and `"B1+"` are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| UnknownLevel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered_by_proficiency() {
        assert!(CefrLevel::A1 < CefrLevel::A2);
        assert!(CefrLevel::B2 < CefrLevel::C1);
        assert_eq!(CefrLevel::ALL.iter().max(), Some(&CefrLevel::C2));
    }

    #[test]
    fn distance_counts_bands() {
        assert_eq!(CefrLevel::A2.distance(CefrLevel::B2), 2);
        assert_eq!(CefrLevel::C1.distance(CefrLevel::A1), 4);
        assert_eq!(CefrLevel::B1.distance(CefrLevel::B1), 0);
    }

    #[test]
    fn parse_accepts_exact_labels_only() {
        assert_eq!("B2".parse::<CefrLevel>(), Ok(CefrLevel::B2));
        assert!("b2".parse::<CefrLevel>().is_err());
        assert!("B2.5".parse::<CefrLevel>().is_err());
        assert!(" B2".parse::<CefrLevel>().is_err());
    }

    #[test]
    fn next_stops_at_c2() {
        assert_eq!(CefrLevel::B1.next(), Some(CefrLevel::B2));
        assert_eq!(CefrLevel::C2.next(), None);
    }

    #[test]
    fn serializes_as_label() {
        assert_eq!(serde_json::to_string(&CefrLevel::C1).unwrap(), "\"C1\"");
    }
}
