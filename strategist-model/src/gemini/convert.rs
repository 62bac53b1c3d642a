//! Wire types for the Gemini REST API and mapping into the core taxonomy.

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use strategist_core::{FinishReason, ProviderError};

/// Cap on provider error text carried into our error values. Enough for
/// diagnosis without dumping whole transport bodies at the user.
const ERROR_SNIPPET_LEN: usize = 300;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self { role: Some("user".to_string()), parts: vec![Part { text: text.into() }] }
    }

    pub fn bare_text(text: impl Into<String>) -> Self {
        Self { role: None, parts: vec![Part { text: text.into() }] }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmbedContentRequest {
    pub model: String,
    pub content: Content,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbedContentResponse {
    pub embedding: EmbeddingValues,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbeddingValues {
    #[serde(default)]
    pub values: Vec<f32>,
}

/// Error envelope returned by the Gemini API on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

pub(crate) fn map_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "STOP" => FinishReason::Stop,
        "MAX_TOKENS" => FinishReason::MaxTokens,
        "SAFETY" | "PROHIBITED_CONTENT" | "BLOCKLIST" => FinishReason::Safety,
        _ => FinishReason::Other,
    }
}

fn snippet(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.len() <= ERROR_SNIPPET_LEN {
        trimmed.to_string()
    } else {
        let mut end = ERROR_SNIPPET_LEN;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &trimmed[..end])
    }
}

/// Map a non-2xx Gemini response to the core taxonomy.
pub(crate) fn map_error_status(status: StatusCode, body: &str) -> ProviderError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok().and_then(|e| e.error);
    let (message, api_status) = match parsed {
        Some(e) => (snippet(&e.message), e.status),
        None => (snippet(body), String::new()),
    };

    match status.as_u16() {
        401 | 403 => ProviderError::AuthenticationFailed(message),
        429 => ProviderError::RateLimited(message),
        400 => {
            let lower = message.to_ascii_lowercase();
            if lower.contains("token") && (lower.contains("exceed") || lower.contains("too large"))
                || api_status == "PAYLOAD_TOO_LARGE"
            {
                ProviderError::InputTooLarge(message)
            } else {
                ProviderError::Malformed(message)
            }
        }
        404 => ProviderError::Malformed(format!("unknown model or endpoint: {message}")),
        code if code >= 500 => ProviderError::Unavailable(format!("HTTP {code}: {message}")),
        code => ProviderError::Unavailable(format!("HTTP {code}: {message}")),
    }
}

/// Map a transport-level failure. Request timeouts become `Timeout` so the
/// caller's retry/degrade policy treats them like any other transient outage.
pub(crate) fn map_transport_error(error: &reqwest::Error, timeout: Duration) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout(timeout)
    } else {
        ProviderError::Unavailable(error.to_string())
    }
}
