//! Astra DB vector store backend.
//!
//! Implements [`VectorStore`] over the DataStax Astra Data API: similarity
//! search is a `find` with a `$vector` sort against
//! `{endpoint}/api/json/v1/{namespace}/{collection}`, authenticated with a
//! `Token` header. The store is read-only here; ingestion is owned by
//! whatever populates the knowledge base.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use strategist_core::{ProviderError, Result, RetrievedDocument, VectorStore, validate_limit};
use tracing::debug;

const DEFAULT_NAMESPACE: &str = "default_keyspace";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Field the Data API uses to report similarity on each matched document.
const SIMILARITY_FIELD: &str = "$similarity";

/// Configuration for [`AstraVectorStore`].
///
/// # Example
///
/// ```rust
/// use strategist_rag::AstraConfig;
///
/// let config = AstraConfig::new("https://db-id-region.apps.astra.datastax.com", "AstraCS:xxx", 768)
///     .with_namespace("research");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AstraConfig {
    /// Database API endpoint, e.g. `https://<db-id>-<region>.apps.astra.datastax.com`.
    pub endpoint: String,
    /// Application token, sent as the `Token` header.
    pub token: String,
    /// Keyspace the collections live in.
    pub namespace: String,
    /// Embedding dimension every collection is configured with. Query
    /// vectors of a different length are rejected before any network call.
    pub dimension: usize,
    /// Per-request timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
}

impl AstraConfig {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>, dimension: usize) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: token.into(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            dimension,
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn request_timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }
}

/// A [`VectorStore`] backed by the Astra Data API.
#[derive(Debug)]
pub struct AstraVectorStore {
    client: Client,
    config: AstraConfig,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(rename = "errorCode", default)]
    error_code: String,
}

impl AstraVectorStore {
    pub fn new(config: AstraConfig) -> Result<Self> {
        if config.token.trim().is_empty() {
            return Err(ProviderError::AuthenticationFailed("Astra token is empty".to_string()));
        }
        if config.endpoint.trim().is_empty() {
            return Err(ProviderError::Malformed("Astra endpoint is empty".to_string()));
        }
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ProviderError::Unavailable(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    fn api_url(&self, collection: &str) -> String {
        format!(
            "{}/api/json/v1/{}/{}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.namespace,
            collection
        )
    }

    fn map_status(status: StatusCode, body: &str) -> ProviderError {
        match status.as_u16() {
            401 | 403 => ProviderError::AuthenticationFailed("Astra rejected the token".to_string()),
            429 => ProviderError::RateLimited("Astra rate limit exceeded".to_string()),
            code if code >= 500 => {
                ProviderError::Unavailable(format!("Astra returned HTTP {code}"))
            }
            code => ProviderError::Unavailable(format!("Astra returned HTTP {code}: {body}")),
        }
    }

    /// The Data API reports many failures inside a 200 body; map the first
    /// error entry into the core taxonomy.
    fn map_api_error(&self, collection: &str, query_len: usize, error: &ApiError) -> ProviderError {
        let code = error.error_code.as_str();
        let lower = error.message.to_ascii_lowercase();
        if code == "COLLECTION_NOT_EXIST" || lower.contains("collection does not exist") {
            return ProviderError::CollectionNotFound(collection.to_string());
        }
        if code.contains("VECTOR_SIZE") || lower.contains("dimension") {
            return ProviderError::DimensionMismatch {
                expected: self.config.dimension,
                actual: query_len,
            };
        }
        if code == "UNAUTHENTICATED" || lower.contains("authentication") {
            return ProviderError::AuthenticationFailed(error.message.clone());
        }
        ProviderError::Unavailable(format!("Astra error {code}: {}", error.message))
    }
}

#[async_trait]
impl VectorStore for AstraVectorStore {
    async fn search(
        &self,
        collection: &str,
        query: &[f32],
        limit: usize,
    ) -> Result<Vec<RetrievedDocument>> {
        validate_limit(limit)?;
        if query.len() != self.config.dimension {
            return Err(ProviderError::DimensionMismatch {
                expected: self.config.dimension,
                actual: query.len(),
            });
        }

        let body = json!({
            "find": {
                "sort": { "$vector": query },
                "options": { "limit": limit, "includeSimilarity": true }
            }
        });

        let timeout = self.config.request_timeout();
        let response = self
            .client
            .post(self.api_url(collection))
            .header("Token", &self.config.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(timeout)
                } else {
                    ProviderError::Unavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Self::map_status(status, &text));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("undecodable response: {e}")))?;

        if let Some(errors) = payload.get("errors").and_then(Value::as_array) {
            if let Some(first) = errors.first() {
                let error: ApiError =
                    serde_json::from_value(first.clone()).unwrap_or(ApiError {
                        message: first.to_string(),
                        error_code: String::new(),
                    });
                return Err(self.map_api_error(collection, query.len(), &error));
            }
        }

        let documents = payload
            .get("data")
            .and_then(|d| d.get("documents"))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let results: Vec<RetrievedDocument> = documents
            .into_iter()
            .filter_map(|doc| match doc {
                Value::Object(mut fields) => {
                    let similarity = fields
                        .remove(SIMILARITY_FIELD)
                        .and_then(|v| v.as_f64())
                        .map(|v| v as f32);
                    let mut retrieved = RetrievedDocument::new(fields);
                    retrieved.similarity = similarity;
                    Some(retrieved)
                }
                _ => None,
            })
            .collect();

        debug!(collection, namespace = %self.config.namespace, returned = results.len(), "astra search complete");
        Ok(results)
    }
}
