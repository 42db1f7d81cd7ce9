use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use super::{ExplainError, InputField, ProviderKind};

/// User-supplied provider key. Never printed by `Debug`.
pub struct ApiKey(SecretString);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::from(value.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    pub fn is_blank(&self) -> bool {
        self.expose().trim().is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

impl From<&str> for ApiKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One form submission. Held only for the duration of a single request.
#[derive(Debug)]
pub struct ExplainRequest {
    pub provider: ProviderKind,
    pub model_id: String,
    pub api_key: ApiKey,
    pub problem_text: String,
}

impl ExplainRequest {
    pub fn new(
        provider: ProviderKind,
        model_id: impl Into<String>,
        api_key: ApiKey,
        problem_text: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            model_id: model_id.into(),
            api_key,
            problem_text: problem_text.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ExplainError> {
        validate_inputs(
            self.provider,
            &self.model_id,
            &self.api_key,
            &self.problem_text,
        )
    }

    pub fn problem_chars(&self) -> usize {
        self.problem_text.chars().count()
    }
}

/// Key first, then problem text, then model. Blank after trimming counts as missing.
pub fn validate_inputs(
    provider: ProviderKind,
    model_id: &str,
    api_key: &ApiKey,
    problem_text: &str,
) -> Result<(), ExplainError> {
    if api_key.is_blank() {
        return Err(ExplainError::missing(provider, InputField::ApiKey));
    }
    if problem_text.trim().is_empty() {
        return Err(ExplainError::missing(provider, InputField::ProblemText));
    }
    if model_id.trim().is_empty() {
        return Err(ExplainError::missing(provider, InputField::ModelId));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ApiKey, ExplainRequest};
    use crate::domain::{ExplainError, InputField, ProviderKind};

    fn request(api_key: &str, problem_text: &str) -> ExplainRequest {
        ExplainRequest::new(
            ProviderKind::Gemini,
            "gemini-1.5-flash-latest",
            ApiKey::from(api_key),
            problem_text,
        )
    }

    #[test]
    fn validate_accepts_complete_input() {
        assert!(request("key-1", "Two Sum").validate().is_ok());
    }

    #[test]
    fn validate_checks_api_key_before_problem_text() {
        let error = request("", "")
            .validate()
            .expect_err("empty inputs should fail");

        assert!(matches!(
            error,
            ExplainError::MissingInput {
                field: InputField::ApiKey,
                ..
            }
        ));
    }

    #[test]
    fn validate_rejects_whitespace_only_problem_text() {
        let error = request("key-1", " \n\t ")
            .validate()
            .expect_err("blank problem text should fail");

        assert!(matches!(
            error,
            ExplainError::MissingInput {
                field: InputField::ProblemText,
                ..
            }
        ));
    }

    #[test]
    fn validate_rejects_blank_model_id() {
        let mut request = request("key-1", "Two Sum");
        request.model_id = "  ".to_string();

        assert!(matches!(
            request.validate(),
            Err(ExplainError::MissingInput {
                field: InputField::ModelId,
                ..
            })
        ));
    }

    #[test]
    fn api_key_debug_is_redacted() {
        let key = ApiKey::new("sk-very-secret");
        let rendered = format!("{:?}", request("sk-very-secret", "Two Sum"));

        assert_eq!(format!("{key:?}"), "ApiKey([REDACTED])");
        assert!(!rendered.contains("sk-very-secret"));
        assert_eq!(key.expose(), "sk-very-secret");
    }
}
