use std::fmt;

use thiserror::Error;

use super::ProviderKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    UserActionRequired,
    TemporaryFailure,
    InternalFailure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    ApiKey,
    ProblemText,
    ModelId,
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ApiKey => "api_key",
            Self::ProblemText => "problem_text",
            Self::ModelId => "model_id",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderFailureKind {
    Auth,
    RateLimited,
    Timeout,
    UnknownModel,
    InvalidResponse,
    Http,
    Transport,
}

/// A downstream failure, carrying the provider's own message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderError {
    pub kind: ProviderFailureKind,
    pub message: String,
}

impl ProviderError {
    pub fn new(kind: ProviderFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ProviderFailureKind::InvalidResponse, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProviderFailureKind::Transport, message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExplainError {
    #[error("missing input: {field}")]
    MissingInput {
        provider: ProviderKind,
        field: InputField,
    },
    #[error("provider request failed: {0}")]
    Provider(#[from] ProviderError),
    #[error("{provider} integration is unavailable: {message}")]
    Integration {
        provider: ProviderKind,
        message: String,
    },
    #[error("an explanation is already in progress")]
    Busy,
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl ExplainError {
    pub fn missing(provider: ProviderKind, field: InputField) -> Self {
        Self::MissingInput { provider, field }
    }

    pub fn integration(provider: ProviderKind, message: impl Into<String>) -> Self {
        Self::Integration {
            provider,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingInput { .. } | Self::Integration { .. } | Self::Busy => {
                ErrorCategory::UserActionRequired
            }
            Self::Provider(error) => match error.kind {
                ProviderFailureKind::Auth | ProviderFailureKind::UnknownModel => {
                    ErrorCategory::UserActionRequired
                }
                ProviderFailureKind::RateLimited
                | ProviderFailureKind::Timeout
                | ProviderFailureKind::Http
                | ProviderFailureKind::Transport => ErrorCategory::TemporaryFailure,
                ProviderFailureKind::InvalidResponse => ErrorCategory::InternalFailure,
            },
            Self::Internal { .. } => ErrorCategory::InternalFailure,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::MissingInput {
                provider,
                field: InputField::ApiKey,
            } => format!("Please enter your {provider} API key."),
            Self::MissingInput {
                field: InputField::ProblemText,
                ..
            } => "Please enter a DSA problem to explain.".to_string(),
            Self::MissingInput {
                provider,
                field: InputField::ModelId,
            } => format!("Please select a {provider} model."),
            Self::Provider(error) => match error.kind {
                ProviderFailureKind::Auth => format!(
                    "Authentication failed. Check your API key. ({})",
                    error.message
                ),
                ProviderFailureKind::RateLimited => format!(
                    "The provider is rate limiting requests or the quota is exhausted. ({})",
                    error.message
                ),
                ProviderFailureKind::Timeout => format!(
                    "The provider did not respond in time. ({})",
                    error.message
                ),
                ProviderFailureKind::UnknownModel => format!(
                    "The selected model is not available. ({})",
                    error.message
                ),
                ProviderFailureKind::InvalidResponse
                | ProviderFailureKind::Http
                | ProviderFailureKind::Transport => format!("Error: {}", error.message),
            },
            Self::Integration { provider, message } => {
                format!("{provider} is not available in this build: {message}")
            }
            Self::Busy => {
                "An explanation is already being generated. Please wait for it to finish."
                    .to_string()
            }
            Self::Internal { message } => {
                format!("An internal error occurred while explaining: {message}")
            }
        }
    }
}

/// Startup configuration problems; these make a provider slot unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{name} could not be read: {message}")]
    Unreadable { name: String, message: String },
    #[error("{message}")]
    Invalid { message: String },
    #[error("failed to create {provider} HTTP client: {message}")]
    Client {
        provider: ProviderKind,
        message: String,
    },
}

impl ConfigError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ConfigError, ErrorCategory, ExplainError, InputField, ProviderError, ProviderFailureKind,
    };
    use crate::domain::ProviderKind;

    #[test]
    fn category_maps_user_action_errors() {
        assert_eq!(
            ExplainError::missing(ProviderKind::Gemini, InputField::ApiKey).category(),
            ErrorCategory::UserActionRequired
        );
        assert_eq!(
            ExplainError::from(ProviderError::new(ProviderFailureKind::Auth, "bad key"))
                .category(),
            ErrorCategory::UserActionRequired
        );
        assert_eq!(
            ExplainError::integration(ProviderKind::Groq, "feature disabled").category(),
            ErrorCategory::UserActionRequired
        );
    }

    #[test]
    fn category_maps_temporary_and_internal_errors() {
        assert_eq!(
            ExplainError::from(ProviderError::new(ProviderFailureKind::RateLimited, "slow"))
                .category(),
            ErrorCategory::TemporaryFailure
        );
        assert_eq!(
            ExplainError::from(ProviderError::transport("connection reset")).category(),
            ErrorCategory::TemporaryFailure
        );
        assert_eq!(
            ExplainError::from(ProviderError::invalid_response("no candidates")).category(),
            ErrorCategory::InternalFailure
        );
    }

    #[test]
    fn user_message_names_the_missing_input() {
        assert_eq!(
            ExplainError::missing(ProviderKind::Groq, InputField::ApiKey).user_message(),
            "Please enter your Groq API key."
        );
        assert_eq!(
            ExplainError::missing(ProviderKind::Gemini, InputField::ProblemText).user_message(),
            "Please enter a DSA problem to explain."
        );
    }

    #[test]
    fn user_message_carries_provider_message_verbatim() {
        let error = ExplainError::from(ProviderError::new(
            ProviderFailureKind::Http,
            "Gemini API returned HTTP 500 Internal Server Error: boom",
        ));

        assert!(
            error
                .user_message()
                .contains("Gemini API returned HTTP 500 Internal Server Error: boom")
        );
        assert!(
            ExplainError::from(ProviderError::new(ProviderFailureKind::Auth, "invalid key"))
                .user_message()
                .contains("Check your API key")
        );
    }

    #[test]
    fn provider_error_display_is_the_bare_message() {
        let error = ProviderError::transport("dns lookup failed");
        assert_eq!(error.to_string(), "dns lookup failed");
        assert_eq!(
            ExplainError::from(error).to_string(),
            "provider request failed: dns lookup failed"
        );
    }

    #[test]
    fn config_error_client_names_provider() {
        let error = ConfigError::Client {
            provider: ProviderKind::Groq,
            message: "tls backend missing".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "failed to create Groq HTTP client: tls backend missing"
        );
    }
}
