use std::time::Duration;

use crate::domain::{ConfigError, ProviderKind};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai";

const ENV_GEMINI_BASE_URL: &str = "DSA_EXPLAINER_GEMINI_BASE_URL";
const ENV_GROQ_BASE_URL: &str = "DSA_EXPLAINER_GROQ_BASE_URL";
const ENV_GEMINI_TIMEOUT_SECS: &str = "DSA_EXPLAINER_GEMINI_TIMEOUT_SECS";
const ENV_GROQ_TIMEOUT_SECS: &str = "DSA_EXPLAINER_GROQ_TIMEOUT_SECS";
const ENV_GLOBAL_TIMEOUT_SECS: &str = "DSA_EXPLAINER_LLM_TIMEOUT_SECS";

/// Transport settings for one provider. API keys are never part of this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ProviderConfig {
    pub fn defaults(kind: ProviderKind) -> Self {
        Self {
            base_url: default_base_url(kind).to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn from_env(kind: ProviderKind) -> Result<Self, ConfigError> {
        let (base_url_var, timeout_var) = match kind {
            ProviderKind::Gemini => (ENV_GEMINI_BASE_URL, ENV_GEMINI_TIMEOUT_SECS),
            ProviderKind::Groq => (ENV_GROQ_BASE_URL, ENV_GROQ_TIMEOUT_SECS),
        };

        let base_url =
            read_env_var(base_url_var)?.unwrap_or_else(|| default_base_url(kind).to_string());
        let timeout = resolve_timeout_with_global_fallback(
            read_timeout_from_env(timeout_var)?,
            || read_timeout_from_env(ENV_GLOBAL_TIMEOUT_SECS),
            DEFAULT_TIMEOUT,
        )?;

        Ok(Self { base_url, timeout })
    }
}

fn default_base_url(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::Gemini => DEFAULT_GEMINI_BASE_URL,
        ProviderKind::Groq => DEFAULT_GROQ_BASE_URL,
    }
}

pub(crate) fn read_env_var(name: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(error) => Err(ConfigError::Unreadable {
            name: name.to_string(),
            message: error.to_string(),
        }),
    }
}

pub(crate) fn parse_timeout_seconds(name: &str, value: &str) -> Result<Duration, ConfigError> {
    let parsed = value.trim().parse::<u64>().map_err(|_| {
        ConfigError::invalid(format!("{name} must be a positive integer in seconds"))
    })?;
    if parsed == 0 {
        return Err(ConfigError::invalid(format!(
            "{name} must be greater than 0 seconds"
        )));
    }
    Ok(Duration::from_secs(parsed))
}

pub(crate) fn read_timeout_from_env(name: &str) -> Result<Option<Duration>, ConfigError> {
    let Some(value) = read_env_var(name)? else {
        return Ok(None);
    };
    Ok(Some(parse_timeout_seconds(name, &value)?))
}

pub(crate) fn resolve_timeout_with_global_fallback<F>(
    provider_timeout: Option<Duration>,
    read_global_timeout: F,
    default_timeout: Duration,
) -> Result<Duration, ConfigError>
where
    F: FnOnce() -> Result<Option<Duration>, ConfigError>,
{
    if let Some(timeout) = provider_timeout {
        return Ok(timeout);
    }

    Ok(read_global_timeout()?.unwrap_or(default_timeout))
}
