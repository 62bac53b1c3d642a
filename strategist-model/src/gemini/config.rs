//! Configuration for the Gemini REST providers.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_completion_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-004".to_string()
}

fn default_embedding_dimension() -> usize {
    768
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration shared by the Gemini completion and embedding clients.
///
/// The API key is sent in the `x-goog-api-key` request header, never in the
/// URL, so it cannot surface in error messages or access logs.
///
/// # Example
///
/// ```rust
/// use strategist_model::gemini::GeminiConfig;
///
/// let config = GeminiConfig::new("AIza-xxx")
///     .with_completion_model("gemini-1.5-pro")
///     .with_timeout(std::time::Duration::from_secs(15));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Gemini API key.
    pub api_key: String,
    /// Text-generation model (e.g. "gemini-1.5-flash").
    #[serde(default = "default_completion_model")]
    pub completion_model: String,
    /// Embedding model (e.g. "text-embedding-004").
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    /// Vector length produced by the embedding model.
    #[serde(default = "default_embedding_dimension")]
    pub embedding_dimension: usize,
    /// API base URL, overridable for testing.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            completion_model: default_completion_model(),
            embedding_model: default_embedding_model(),
            embedding_dimension: default_embedding_dimension(),
            base_url: default_base_url(),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), ..Default::default() }
    }

    #[must_use]
    pub fn with_completion_model(mut self, model: impl Into<String>) -> Self {
        self.completion_model = model.into();
        self
    }

    #[must_use]
    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    #[must_use]
    pub fn with_embedding_dimension(mut self, dimension: usize) -> Self {
        self.embedding_dimension = dimension;
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub(crate) fn request_timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }
}
