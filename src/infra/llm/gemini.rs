use std::time::Instant;

use log::debug;
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::domain::{ConfigError, ProviderError, ProviderFailureKind, ProviderKind};

use super::env::ProviderConfig;
use super::response_parsing::{elapsed_millis, non_empty, truncate_message};
use super::{CompletionRequest, ExplainPrompt, TextCompletionProvider};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini `generateContent` client. Sends the whole prompt as one user turn
/// and leaves generation settings at the model defaults.
pub struct GeminiProvider {
    api_base_url: Url,
    client: Client,
}

impl GeminiProvider {
    pub fn with_config(config: ProviderConfig) -> Result<Self, ConfigError> {
        if config.base_url.trim().is_empty() {
            return Err(ConfigError::invalid("Gemini API base URL must not be empty"));
        }
        let api_base_url = Url::parse(config.base_url.trim()).map_err(|err| {
            ConfigError::invalid(format!("Gemini API base URL is invalid: {err}"))
        })?;
        if api_base_url.cannot_be_a_base() {
            return Err(ConfigError::invalid("Gemini API base URL must be an http(s) URL"));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| ConfigError::Client {
                provider: ProviderKind::Gemini,
                message: err.to_string(),
            })?;

        Ok(Self {
            api_base_url,
            client,
        })
    }

    /// The model id is one percent-encoded path segment, so `/`, `?` and `#`
    /// cannot reshape the request path.
    fn endpoint_url(&self, model_id: &str) -> Url {
        let model_id = model_id.trim().trim_start_matches("models/");
        let mut url = self.api_base_url.clone();
        // `with_config` only accepts base URLs that have path segments.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v1beta", "models"])
                .push(&format!("{model_id}:generateContent"));
        }
        url
    }
}

impl TextCompletionProvider for GeminiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, ProviderError> {
        let payload = build_request_payload(request.prompt);
        let started = Instant::now();

        let response = self
            .client
            .post(self.endpoint_url(request.model_id))
            .header(API_KEY_HEADER, request.api_key.expose())
            .header("content-type", "application/json")
            .json(&payload)
            .send()
            .map_err(map_transport_error)?;

        let status = response.status();
        let response_body = response.text().map_err(map_transport_error)?;
        debug!(
            "gemini responded status={status} latency_ms={}",
            elapsed_millis(started)
        );
        if !status.is_success() {
            return Err(map_http_error(status, &response_body));
        }

        map_success_response(&response_body)
    }
}

fn build_request_payload(prompt: &ExplainPrompt) -> GeminiGenerateRequest {
    GeminiGenerateRequest {
        contents: vec![GeminiContent {
            role: "user".to_string(),
            parts: vec![GeminiPart {
                text: prompt.combined(),
            }],
        }],
    }
}

fn map_success_response(response_body: &str) -> Result<String, ProviderError> {
    let response: GeminiGenerateResponse = serde_json::from_str(response_body).map_err(|err| {
        ProviderError::invalid_response(format!("Gemini response decode failed: {err}"))
    })?;

    let block_reason = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason);

    let Some(candidate) = response.candidates.into_iter().next() else {
        let message = match block_reason {
            Some(reason) => format!("Gemini returned no candidates (prompt blocked: {reason})"),
            None => "Gemini returned no candidates".to_string(),
        };
        return Err(ProviderError::invalid_response(message));
    };

    let texts = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .collect::<Vec<_>>();

    if texts.is_empty() {
        let message = match candidate.finish_reason.as_deref().and_then(non_empty) {
            Some(reason) => {
                format!("Gemini candidate did not include text (finish reason: {reason})")
            }
            None => "Gemini candidate did not include text".to_string(),
        };
        return Err(ProviderError::invalid_response(message));
    }

    Ok(texts.concat())
}

fn map_http_error(status: StatusCode, body: &str) -> ProviderError {
    let detail = serde_json::from_str::<GeminiErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error);
    let error_status = detail.as_ref().and_then(|detail| detail.status.as_deref());
    let key_rejected = detail.as_ref().is_some_and(|detail| {
        detail
            .details
            .iter()
            .any(|info| info.reason.as_deref() == Some("API_KEY_INVALID"))
            || detail.message.contains("API key not valid")
    });

    let message = detail
        .as_ref()
        .map(|detail| detail.message.clone())
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| truncate_message(body));

    let kind = if key_rejected
        || status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || matches!(error_status, Some("UNAUTHENTICATED" | "PERMISSION_DENIED"))
    {
        ProviderFailureKind::Auth
    } else if status == StatusCode::TOO_MANY_REQUESTS
        || matches!(error_status, Some("RESOURCE_EXHAUSTED"))
    {
        ProviderFailureKind::RateLimited
    } else if status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::GATEWAY_TIMEOUT
        || matches!(error_status, Some("DEADLINE_EXCEEDED"))
    {
        ProviderFailureKind::Timeout
    } else if status == StatusCode::NOT_FOUND || matches!(error_status, Some("NOT_FOUND")) {
        ProviderFailureKind::UnknownModel
    } else {
        return ProviderError::new(
            ProviderFailureKind::Http,
            format!("Gemini API returned HTTP {status}: {message}"),
        );
    };

    ProviderError::new(kind, message)
}

fn map_transport_error(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        return ProviderError::new(
            ProviderFailureKind::Timeout,
            format!("Gemini request timed out: {error}"),
        );
    }

    ProviderError::transport(format!("Gemini transport error: {error}"))
}

#[derive(Debug, Serialize)]
struct GeminiGenerateRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerateResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    #[serde(default)]
    error: Option<GeminiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    details: Vec<GeminiErrorInfo>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorInfo {
    #[serde(default)]
    reason: Option<String>,
}
