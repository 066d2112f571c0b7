//! Shared helpers for parley-core integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use parley_core::{Evaluator, EvaluatorConfig};
use parley_models::providers::{GenerateRequest, GenerateResponse, GenerationProvider};
use serde_json::Value;

pub const MARKET_EVALUATION: &str = include_str!("../fixtures/market_evaluation.json");
pub const MARKET_TRANSCRIPT: &str = include_str!("../fixtures/market_transcript.txt");

/// The market fixture as a JSON value.
pub fn market_value() -> Value {
    serde_json::from_str(MARKET_EVALUATION).expect("fixture is valid JSON")
}

/// What the scripted provider answers with.
pub enum Reply {
    Response(GenerateResponse),
    Fail(fn() -> parley_models::Error),
}

/// A provider that replays one reply and records every request it sees.
pub struct ScriptedProvider {
    reply: Reply,
    calls: AtomicUsize,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedProvider {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn parsed(value: Value) -> Arc<Self> {
        Self::new(Reply::Response(GenerateResponse::from_parsed("scripted", value)))
    }

    pub fn text(text: impl Into<String>) -> Arc<Self> {
        Self::new(Reply::Response(GenerateResponse::from_text("scripted", text)))
    }

    pub fn response(response: GenerateResponse) -> Arc<Self> {
        Self::new(Reply::Response(response))
    }

    pub fn failing(error: fn() -> parley_models::Error) -> Arc<Self> {
        Self::new(Reply::Fail(error))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl GenerationProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: GenerateRequest) -> parley_models::Result<GenerateResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        match &self.reply {
            Reply::Response(response) => Ok(response.clone()),
            Reply::Fail(error) => Err(error()),
        }
    }
}

/// An evaluator over `provider` with default settings.
pub fn evaluator(provider: &Arc<ScriptedProvider>) -> Evaluator {
    Evaluator::new(provider.clone(), EvaluatorConfig::default())
}
