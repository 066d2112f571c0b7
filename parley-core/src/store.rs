//! Session score storage.
//!
//! Each session keeps at most one evaluation: the most recently logged one.
//! Storage itself is a host-provided [`SessionMemory`]; [`SessionContext`]
//! bundles an id with an in-memory implementation for hosts that have none.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::rubric::SpeakingEvaluation;

/// Key under which the evaluation is stored.
pub const SCORES_KEY: &str = "scores";

/// Identifier for a scoring session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Create a session ID from a string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh random session ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Keyed per-session storage supplied by the host.
pub trait SessionMemory {
    fn get(&self, key: &str) -> Option<&SpeakingEvaluation>;

    /// Store `value` under `key`, replacing anything already there.
    fn set(&mut self, key: &str, value: SpeakingEvaluation);
}

/// Session memory held in a `HashMap`.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionMemory {
    entries: HashMap<String, SpeakingEvaluation>,
}

impl InMemorySessionMemory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionMemory for InMemorySessionMemory {
    fn get(&self, key: &str) -> Option<&SpeakingEvaluation> {
        self.entries.get(key)
    }

    fn set(&mut self, key: &str, value: SpeakingEvaluation) {
        self.entries.insert(key.to_string(), value);
    }
}

/// An explicit per-session handle: an id and the session's memory.
///
/// Created empty; dropping it discards everything stored in it.
#[derive(Debug, Clone)]
pub struct SessionContext {
    id: SessionId,
    memory: InMemorySessionMemory,
}

impl SessionContext {
    /// A fresh, empty session.
    #[must_use]
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            memory: InMemorySessionMemory::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn memory(&self) -> &dyn SessionMemory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut dyn SessionMemory {
        &mut self.memory
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(SessionId::generate())
    }
}

/// Single-slot score storage on top of a [`SessionMemory`].
///
/// Last write wins; there is no history.
pub struct ScoreStore;

impl ScoreStore {
    /// Store `evaluation` as the session's current scores.
    pub fn put(memory: &mut dyn SessionMemory, evaluation: SpeakingEvaluation) {
        debug!(overall_level = %evaluation.overall_level, "Storing session scores");
        memory.set(SCORES_KEY, evaluation);
    }

    /// The most recently stored evaluation, or `None` if nothing was stored.
    #[must_use]
    pub fn get(memory: &dyn SessionMemory) -> Option<&SpeakingEvaluation> {
        memory.get(SCORES_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_from_string() {
        let id = SessionId::new("abc-123");
        assert_eq!(id.as_str(), "abc-123");
        assert_eq!(id.to_string(), "abc-123");
        assert_eq!(SessionId::from("abc-123"), id);
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }

    #[test]
    fn fresh_context_is_empty() {
        let context = SessionContext::new(SessionId::new("s1"));
        assert_eq!(context.id().as_str(), "s1");
        assert!(ScoreStore::get(context.memory()).is_none());
    }
}
