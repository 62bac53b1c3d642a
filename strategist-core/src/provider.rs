use async_trait::async_trait;

use crate::error::Result;
use crate::types::{CompletionRequest, CompletionResult, EmbeddingVector};

/// A text-generation service.
///
/// No determinism is guaranteed across calls, even for identical input.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Model identifier, used in log fields.
    fn name(&self) -> &str;

    /// Generate text for `request`. Implementations validate the request
    /// before any network traffic and fail with a typed [`ProviderError`]
    /// rather than returning empty text on failure.
    ///
    /// [`ProviderError`]: crate::ProviderError
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResult>;
}

/// Converts free text into a fixed-dimension vector.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Model identifier, used in log fields.
    fn name(&self) -> &str;

    /// Length of every vector this provider produces.
    fn dimension(&self) -> usize;

    /// Embed `text`. Empty input is `Malformed`; oversized input is
    /// `InputTooLarge`. A failure is always an error, never a zero-length
    /// vector.
    async fn embed(&self, text: &str) -> Result<EmbeddingVector>;
}
