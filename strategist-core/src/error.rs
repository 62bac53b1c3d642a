use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Failure kinds surfaced by every external provider boundary.
///
/// A provider call either succeeds or returns one of these, never an empty
/// result standing in for a failure. `RateLimited` and `Timeout` are the only
/// kinds worth retrying within a single pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("content filtered by provider: {0}")]
    ContentFiltered(String),

    #[error("input too large: {0}")]
    InputTooLarge(String),

    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("cancelled")]
    Cancelled,

    #[error("malformed request: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// Transient failures worth another attempt with backoff.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited(_) | Self::Timeout(_))
    }

    /// Short machine-friendly label for log fields and user-facing messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "unavailable",
            Self::AuthenticationFailed(_) => "authentication_failed",
            Self::RateLimited(_) => "rate_limited",
            Self::Timeout(_) => "timeout",
            Self::ContentFiltered(_) => "content_filtered",
            Self::InputTooLarge(_) => "input_too_large",
            Self::CollectionNotFound(_) => "collection_not_found",
            Self::DimensionMismatch { .. } => "dimension_mismatch",
            Self::Cancelled => "cancelled",
            Self::Malformed(_) => "malformed",
        }
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;

/// Stages of the tension pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineStage {
    Drafting,
    QueryDerivation,
    Embedding,
    Retrieving,
    Refining,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Drafting => "drafting",
            Self::QueryDerivation => "query derivation",
            Self::Embedding => "embedding",
            Self::Retrieving => "retrieving",
            Self::Refining => "refining",
        };
        f.write_str(name)
    }
}

/// Terminal pipeline failure.
///
/// Only the drafting and refining stages abort a run; retrieval-side failures
/// degrade instead. A refining failure still carries the initial draft so the
/// caller can fall back to it.
#[derive(Debug, thiserror::Error)]
#[error("pipeline failed during {stage}: {source}")]
pub struct PipelineError {
    pub stage: PipelineStage,
    #[source]
    pub source: ProviderError,
    /// Present when the drafting stage had already succeeded.
    pub initial_draft: Option<String>,
}

impl PipelineError {
    pub fn new(stage: PipelineStage, source: ProviderError) -> Self {
        Self { stage, source, initial_draft: None }
    }

    #[must_use]
    pub fn with_draft(mut self, draft: impl Into<String>) -> Self {
        self.initial_draft = Some(draft.into());
        self
    }
}
