//! # strategist-model
//!
//! Provider implementations for the Strategist planning pipeline: Gemini
//! completion and embedding clients over the REST API, plus scripted mock
//! providers for tests.
//!
//! The Gemini API is the system's text-generation and embedding backend;
//! both clients share [`GeminiConfig`] and map every failure into the typed
//! taxonomy in `strategist-core`; a failed call is never collapsed into an
//! empty completion or a zero-length vector.

pub mod gemini;
pub mod mock;

pub use gemini::{GeminiCompletionModel, GeminiConfig, GeminiEmbeddingModel};
pub use mock::{MockCompletion, MockEmbedding};
