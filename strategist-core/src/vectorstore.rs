use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::RetrievedDocument;

/// Upper bound on `limit` accepted by [`VectorStore::search`], capping
/// response size and cost.
pub const MAX_SEARCH_LIMIT: usize = 50;

/// Top-K nearest-neighbor search over named collections of embedded
/// documents. Read-only from the pipeline's perspective.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Return up to `limit` documents from `collection`, ordered by
    /// descending similarity to `query`.
    ///
    /// An empty result means "nothing relevant found" and is not an error.
    /// Failures (transport, unknown collection, wrong vector length, bad
    /// credentials) surface as typed errors, never as an empty list.
    async fn search(
        &self,
        collection: &str,
        query: &[f32],
        limit: usize,
    ) -> Result<Vec<RetrievedDocument>>;
}

/// Shared `limit` validation for store implementations.
pub fn validate_limit(limit: usize) -> Result<()> {
    if limit == 0 {
        return Err(ProviderError::Malformed("search limit must be at least 1".to_string()));
    }
    if limit > MAX_SEARCH_LIMIT {
        return Err(ProviderError::Malformed(format!(
            "search limit {limit} exceeds the maximum of {MAX_SEARCH_LIMIT}"
        )));
    }
    Ok(())
}
