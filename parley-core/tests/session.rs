//! Session storage and the EVALUATE / LOG / RETRIEVE operations.

mod common;

use common::{MARKET_TRANSCRIPT, ScriptedProvider, evaluator, market_value};
use parley_core::rubric::{CefrLevel, validate};
use parley_core::store::InMemorySessionMemory;
use parley_core::{
    LogConfirmation, ScoreStore, ScoringSession, SessionContext, SessionId, SessionMemory,
};

#[test]
fn fresh_store_is_empty() {
    let memory = InMemorySessionMemory::new();
    assert!(ScoreStore::get(&memory).is_none());
}

#[test]
fn put_then_get_returns_equal_record() {
    let evaluation = validate(&market_value()).unwrap();
    let mut memory = InMemorySessionMemory::new();

    ScoreStore::put(&mut memory, evaluation.clone());

    assert_eq!(ScoreStore::get(&memory), Some(&evaluation));
}

#[test]
fn last_write_wins() {
    let first = validate(&market_value()).unwrap();
    let mut raw = market_value();
    raw["overall_level"] = serde_json::json!("B1");
    let second = validate(&raw).unwrap();

    let mut memory = InMemorySessionMemory::new();
    ScoreStore::put(&mut memory, first);
    ScoreStore::put(&mut memory, second.clone());

    let stored = ScoreStore::get(&memory).unwrap();
    assert_eq!(stored, &second);
    assert_eq!(stored.overall_level, CefrLevel::B1);
}

#[test]
fn store_uses_scores_key() {
    let evaluation = validate(&market_value()).unwrap();
    let mut memory = InMemorySessionMemory::new();
    ScoreStore::put(&mut memory, evaluation);

    assert!(memory.get("scores").is_some());
    assert!(memory.get("other").is_none());
}

#[tokio::test]
async fn evaluate_does_not_log_implicitly() {
    let provider = ScriptedProvider::parsed(market_value());
    let session = ScoringSession::new(evaluator(&provider), SessionContext::default());

    session.evaluate(MARKET_TRANSCRIPT).await.unwrap();

    assert!(session.retrieve().is_none());
}

#[tokio::test]
async fn evaluate_log_retrieve() {
    let provider = ScriptedProvider::parsed(market_value());
    let mut session = ScoringSession::new(
        evaluator(&provider),
        SessionContext::new(SessionId::new("learner-7")),
    );

    let evaluation = session.evaluate(MARKET_TRANSCRIPT).await.unwrap();
    let confirmation = session.log(evaluation.clone());

    assert_eq!(confirmation, LogConfirmation::default());
    assert_eq!(confirmation.message, "Scores logged successfully.");
    assert_eq!(session.retrieve(), Some(&evaluation));
    assert_eq!(session.context().id().as_str(), "learner-7");
}

#[test]
fn sessions_do_not_share_scores() {
    let evaluation = validate(&market_value()).unwrap();
    let mut a = SessionContext::default();
    let b = SessionContext::default();

    ScoreStore::put(a.memory_mut(), evaluation);

    assert!(ScoreStore::get(a.memory()).is_some());
    assert!(ScoreStore::get(b.memory()).is_none());
    assert_ne!(a.id(), b.id());
}
