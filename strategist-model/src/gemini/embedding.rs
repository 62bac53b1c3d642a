//! Gemini `embedContent` client.

use async_trait::async_trait;
use reqwest::Client;
use strategist_core::{EmbeddingProvider, EmbeddingVector, ProviderError, Result};
use tracing::debug;

use super::config::GeminiConfig;
use super::convert::{
    Content, EmbedContentRequest, EmbedContentResponse, map_error_status, map_transport_error,
};

/// Client-side input cap. The embedding models accept ~2048 tokens; anything
/// past this byte count cannot fit and is rejected before the network call.
const MAX_INPUT_BYTES: usize = 16 * 1024;

/// Text embedding via the Gemini REST API.
pub struct GeminiEmbeddingModel {
    client: Client,
    config: GeminiConfig,
}

impl GeminiEmbeddingModel {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderError::AuthenticationFailed("API key is empty".to_string()));
        }
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ProviderError::Unavailable(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    fn api_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:embedContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.embedding_model
        )
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbeddingModel {
    fn name(&self) -> &str {
        &self.config.embedding_model
    }

    fn dimension(&self) -> usize {
        self.config.embedding_dimension
    }

    async fn embed(&self, text: &str) -> Result<EmbeddingVector> {
        if text.trim().is_empty() {
            return Err(ProviderError::Malformed("embedding input must not be empty".to_string()));
        }
        if text.len() > MAX_INPUT_BYTES {
            return Err(ProviderError::InputTooLarge(format!(
                "embedding input is {} bytes, maximum is {MAX_INPUT_BYTES}",
                text.len()
            )));
        }

        let body = EmbedContentRequest {
            model: format!("models/{}", self.config.embedding_model),
            content: Content::bare_text(text),
        };

        let timeout = self.config.request_timeout();
        let response = self
            .client
            .post(self.api_url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| map_transport_error(&e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(map_error_status(status, &text));
        }

        let parsed: EmbedContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("undecodable response: {e}")))?;

        let vector = parsed.embedding.values;
        if vector.is_empty() {
            // An empty vector is a provider failure, not a usable embedding.
            return Err(ProviderError::Unavailable(
                "provider returned an empty embedding".to_string(),
            ));
        }
        if vector.len() != self.config.embedding_dimension {
            return Err(ProviderError::DimensionMismatch {
                expected: self.config.embedding_dimension,
                actual: vector.len(),
            });
        }

        debug!(model = %self.config.embedding_model, dimension = vector.len(), "embedding received");
        Ok(vector)
    }
}
