//! # strategist-core
//!
//! Core traits and types for the Strategist planning pipeline.
//!
//! ## Overview
//!
//! This crate provides the foundational abstractions shared by every other
//! crate in the workspace:
//!
//! - [`CompletionProvider`] / [`EmbeddingProvider`] - text generation and
//!   embedding boundaries
//! - [`VectorStore`] - top-K similarity search over named collections
//! - [`ProviderError`] / [`PipelineError`] - the typed failure taxonomy
//! - [`PipelineArtifact`] and friends - the pipeline data model
//! - [`CancelToken`] - cooperative cancellation between pipeline stages
//! - [`RetryConfig`] / [`execute_with_retry`] - bounded retries with
//!   exponential backoff and jitter for transient failures
//!
//! Provider implementations live in `strategist-model` and `strategist-rag`;
//! this crate deliberately has no HTTP dependency so the pipeline can be
//! tested against in-process fakes.

pub mod cancel;
pub mod error;
pub mod provider;
pub mod retry;
pub mod types;
pub mod vectorstore;

pub use cancel::CancelToken;
pub use error::{PipelineError, PipelineStage, ProviderError, Result};
pub use provider::{CompletionProvider, EmbeddingProvider};
pub use retry::{RetryConfig, execute_with_retry};
pub use types::{
    CompletionRequest, CompletionResult, EmbeddingVector, FinishReason, PipelineArtifact,
    RetrievedDocument, StrategicContext,
};
pub use vectorstore::{MAX_SEARCH_LIMIT, VectorStore, validate_limit};
