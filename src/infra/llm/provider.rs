use crate::domain::{ApiKey, ProviderError, ProviderKind};

use super::ExplainPrompt;

pub struct CompletionRequest<'a> {
    pub model_id: &'a str,
    pub api_key: &'a ApiKey,
    pub prompt: &'a ExplainPrompt,
}

pub trait TextCompletionProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Issues exactly one request and returns the generated text untouched.
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, ProviderError>;
}
