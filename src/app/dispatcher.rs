use std::time::Instant;

use log::{info, warn};

use crate::domain::{ApiKey, ExplainError, ExplainRequest, ProviderKind, validate_inputs};
use crate::infra::llm::{CompletionRequest, PromptBuilder, ProviderSet};

/// Stateless mediator between form input and a single provider call.
#[derive(Clone)]
pub struct Dispatcher {
    providers: ProviderSet,
}

impl Dispatcher {
    pub fn new(providers: ProviderSet) -> Self {
        Self { providers }
    }

    pub fn from_env() -> Self {
        Self::new(ProviderSet::from_env())
    }

    pub fn providers(&self) -> &ProviderSet {
        &self.providers
    }

    /// Validates input, then issues exactly one provider call. No retries.
    pub fn explain(
        &self,
        provider: ProviderKind,
        model_id: &str,
        api_key: &ApiKey,
        problem_text: &str,
    ) -> Result<String, ExplainError> {
        validate_inputs(provider, model_id, api_key, problem_text)?;

        let client = self.providers.resolve(provider)?;
        let model_id = model_id.trim();
        let prompt = PromptBuilder::build(problem_text);

        info!(
            "explaining with provider={} model={model_id} problem_chars={}",
            provider.id(),
            problem_text.chars().count()
        );

        let started = Instant::now();
        let result = client.complete(&CompletionRequest {
            model_id,
            api_key,
            prompt: &prompt,
        });

        match result {
            Ok(text) => {
                info!(
                    "explanation received provider={} chars={} elapsed_ms={}",
                    provider.id(),
                    text.chars().count(),
                    started.elapsed().as_millis()
                );
                Ok(text)
            }
            Err(error) => {
                warn!(
                    "provider={} failed kind={:?}: {}",
                    provider.id(),
                    error.kind,
                    error.message
                );
                Err(error.into())
            }
        }
    }

    pub fn explain_request(&self, request: &ExplainRequest) -> Result<String, ExplainError> {
        self.explain(
            request.provider,
            &request.model_id,
            &request.api_key,
            &request.problem_text,
        )
    }
}
