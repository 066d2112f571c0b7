//! Generation providers for parley.
//!
//! This crate provides:
//! - The [`GenerationProvider`](providers::GenerationProvider) trait, the narrow
//!   contract the evaluator depends on
//! - Request/response types carrying an optional output schema
//! - HTTP providers for a local Ollama instance and the hosted Gemini API
//! - API key handling that keeps secrets out of logs
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │               GenerationProvider                     │
//! │       ┌─────────────┐        ┌─────────────┐         │
//! │       │   Ollama    │        │   Gemini    │         │
//! │       │  Provider   │        │  Provider   │         │
//! │       └─────────────┘        └─────────────┘         │
//! └─────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//!        GenerateResponse { parsed?, text?, usage }
//! ```

mod error;

pub mod auth;
pub mod providers;

pub use error::{Error, Result};
