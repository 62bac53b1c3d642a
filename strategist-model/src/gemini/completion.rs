//! Gemini `generateContent` client.

use async_trait::async_trait;
use reqwest::Client;
use strategist_core::{
    CompletionProvider, CompletionRequest, CompletionResult, ProviderError, Result,
};
use tracing::debug;

use super::config::GeminiConfig;
use super::convert::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, map_error_status,
    map_finish_reason, map_transport_error,
};

/// Text generation via the Gemini REST API.
///
/// # Example
///
/// ```rust,ignore
/// use strategist_model::gemini::{GeminiCompletionModel, GeminiConfig};
///
/// let model = GeminiCompletionModel::new(GeminiConfig::new(api_key))?;
/// let result = model.complete(CompletionRequest::new("Summarize...")).await?;
/// ```
pub struct GeminiCompletionModel {
    client: Client,
    config: GeminiConfig,
}

impl GeminiCompletionModel {
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
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.completion_model
        )
    }
}

#[async_trait]
impl CompletionProvider for GeminiCompletionModel {
    fn name(&self) -> &str {
        &self.config.completion_model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResult> {
        request.validate()?;

        let body = GenerateContentRequest {
            contents: vec![Content::user_text(&request.prompt)],
            system_instruction: request.system_instruction.as_deref().map(Content::bare_text),
            generation_config: request
                .temperature
                .map(|temperature| GenerationConfig { temperature: Some(temperature) }),
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

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("undecodable response: {e}")))?;

        if let Some(feedback) = &parsed.prompt_feedback {
            if let Some(reason) = &feedback.block_reason {
                return Err(ProviderError::ContentFiltered(format!(
                    "prompt blocked: {reason}"
                )));
            }
        }

        let candidate = parsed
            .candidates
            .first()
            .ok_or_else(|| ProviderError::Unavailable("response contained no candidates".to_string()))?;

        let finish_reason = candidate.finish_reason.as_deref().map(map_finish_reason);
        if finish_reason == Some(strategist_core::FinishReason::Safety) {
            return Err(ProviderError::ContentFiltered(
                "generation stopped by the provider's safety policy".to_string(),
            ));
        }

        let text: String = candidate
            .content
            .as_ref()
            .map(|c| c.parts.iter().map(|p| p.text.as_str()).collect::<Vec<_>>().join(""))
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ProviderError::Unavailable(
                "provider returned an empty completion".to_string(),
            ));
        }

        debug!(model = %self.config.completion_model, chars = text.len(), "completion received");
        Ok(CompletionResult { text, finish_reason })
    }
}
