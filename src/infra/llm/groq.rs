use std::time::Instant;

use log::debug;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{ConfigError, ProviderError, ProviderFailureKind, ProviderKind};

use super::env::ProviderConfig;
use super::response_parsing::{elapsed_millis, truncate_message};
use super::{CompletionRequest, ExplainPrompt, TextCompletionProvider};

pub const GROQ_TEMPERATURE: f32 = 0.7;

/// Groq chat client over its OpenAI-compatible endpoint.
pub struct GroqProvider {
    api_base_url: String,
    client: Client,
}

impl GroqProvider {
    pub fn with_config(config: ProviderConfig) -> Result<Self, ConfigError> {
        if config.base_url.trim().is_empty() {
            return Err(ConfigError::invalid("Groq API base URL must not be empty"));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| ConfigError::Client {
                provider: ProviderKind::Groq,
                message: err.to_string(),
            })?;

        Ok(Self {
            api_base_url: config.base_url,
            client,
        })
    }

    fn endpoint_url(&self) -> String {
        build_v1_url(&self.api_base_url, "chat/completions")
    }
}

impl TextCompletionProvider for GroqProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Groq
    }

    fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, ProviderError> {
        let payload = build_request_payload(request.model_id, request.prompt);
        let started = Instant::now();

        let response = self
            .client
            .post(self.endpoint_url())
            .bearer_auth(request.api_key.expose())
            .header("content-type", "application/json")
            .json(&payload)
            .send()
            .map_err(map_transport_error)?;

        let status = response.status();
        let header_request_id = response
            .headers()
            .get("x-request-id")
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let response_body = response.text().map_err(map_transport_error)?;
        debug!(
            "groq responded status={status} latency_ms={} request_id={}",
            elapsed_millis(started),
            header_request_id.as_deref().unwrap_or("-")
        );
        if !status.is_success() {
            return Err(map_http_error(status, &response_body));
        }

        map_success_response(&response_body)
    }
}

fn build_request_payload(model_id: &str, prompt: &ExplainPrompt) -> GroqChatCompletionsRequest {
    GroqChatCompletionsRequest {
        model: model_id.to_string(),
        messages: vec![
            GroqChatMessageRequest {
                role: "system".to_string(),
                content: prompt.system.clone(),
            },
            GroqChatMessageRequest {
                role: "user".to_string(),
                content: prompt.user.clone(),
            },
        ],
        temperature: GROQ_TEMPERATURE,
    }
}

fn map_success_response(response_body: &str) -> Result<String, ProviderError> {
    let response: GroqChatCompletionsResponse =
        serde_json::from_str(response_body).map_err(|err| {
            ProviderError::invalid_response(format!("Groq response decode failed: {err}"))
        })?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::invalid_response("Groq response did not include choices"))?;

    choice
        .message
        .and_then(|message| message.content)
        .as_ref()
        .and_then(extract_message_content)
        .ok_or_else(|| {
            ProviderError::invalid_response("Groq response did not include message content")
        })
}

fn extract_message_content(content: &Value) -> Option<String> {
    match content {
        Value::String(text) => Some(text.clone()),
        Value::Array(parts) => {
            let texts = parts
                .iter()
                .filter_map(extract_content_part_text)
                .collect::<Vec<_>>();
            (!texts.is_empty()).then(|| texts.concat())
        }
        _ => None,
    }
}

fn extract_content_part_text(part: &Value) -> Option<String> {
    match part {
        Value::String(text) => Some(text.to_string()),
        Value::Object(map) => map
            .get("text")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned),
        _ => None,
    }
}

fn map_http_error(status: StatusCode, body: &str) -> ProviderError {
    let detail = serde_json::from_str::<GroqErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error);
    let error_type = detail
        .as_ref()
        .and_then(|detail| detail.error_type.as_deref());
    let error_code = detail.as_ref().and_then(|detail| detail.code.as_deref());

    let message = detail
        .as_ref()
        .map(|detail| detail.message.clone())
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| truncate_message(body));

    let kind = if status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || matches!(error_type, Some("authentication_error"))
        || matches!(
            error_code,
            Some("invalid_api_key" | "invalid_authentication")
        ) {
        ProviderFailureKind::Auth
    } else if status == StatusCode::TOO_MANY_REQUESTS
        || matches!(error_type, Some("rate_limit_error" | "insufficient_quota"))
        || matches!(
            error_code,
            Some("rate_limit_exceeded" | "insufficient_quota")
        )
    {
        ProviderFailureKind::RateLimited
    } else if status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::GATEWAY_TIMEOUT
        || matches!(error_code, Some("request_timeout"))
    {
        ProviderFailureKind::Timeout
    } else if status == StatusCode::NOT_FOUND
        || matches!(error_code, Some("model_not_found" | "model_decommissioned"))
    {
        ProviderFailureKind::UnknownModel
    } else {
        return ProviderError::new(
            ProviderFailureKind::Http,
            format!("Groq API returned HTTP {status}: {message}"),
        );
    };

    ProviderError::new(kind, message)
}

fn map_transport_error(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        return ProviderError::new(
            ProviderFailureKind::Timeout,
            format!("Groq request timed out: {error}"),
        );
    }

    ProviderError::transport(format!("Groq transport error: {error}"))
}

fn build_v1_url(api_base_url: &str, endpoint_path: &str) -> String {
    let base = api_base_url.trim_end_matches('/');
    let endpoint_path = endpoint_path.trim_start_matches('/');

    if base.ends_with("/v1") {
        format!("{base}/{endpoint_path}")
    } else {
        format!("{base}/v1/{endpoint_path}")
    }
}

#[derive(Debug, Serialize)]
struct GroqChatCompletionsRequest {
    model: String,
    messages: Vec<GroqChatMessageRequest>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct GroqChatMessageRequest {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct GroqChatCompletionsResponse {
    #[serde(default)]
    choices: Vec<GroqChoice>,
}

#[derive(Debug, Deserialize)]
struct GroqChoice {
    #[serde(default)]
    message: Option<GroqChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct GroqChoiceMessage {
    #[serde(default)]
    content: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct GroqErrorEnvelope {
    #[serde(default)]
    error: Option<GroqErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GroqErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(rename = "type", default)]
    error_type: Option<String>,
    #[serde(default)]
    code: Option<String>,
}
