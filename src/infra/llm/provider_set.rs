use std::collections::HashMap;
use std::sync::Arc;

use log::warn;

use crate::domain::{ConfigError, ExplainError, ProviderKind};

use super::{GeminiProvider, ProviderConfig, TextCompletionProvider};

const NOT_CONFIGURED_REASON: &str = "no client is configured for this provider";

/// One optional slot per provider. An empty slot means the capability is
/// absent for this process and selecting it yields an integration error.
#[derive(Default, Clone)]
pub struct ProviderSet {
    gemini: Option<Arc<dyn TextCompletionProvider>>,
    groq: Option<Arc<dyn TextCompletionProvider>>,
    unavailable: HashMap<ProviderKind, String>,
}

impl ProviderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds every compiled-in client from environment configuration.
    pub fn from_env() -> Self {
        Self::from_configs(
            ProviderConfig::from_env(ProviderKind::Gemini),
            ProviderConfig::from_env(ProviderKind::Groq),
        )
    }

    /// A configuration error leaves that slot empty and becomes its notice.
    pub fn from_configs(
        gemini: Result<ProviderConfig, ConfigError>,
        groq: Result<ProviderConfig, ConfigError>,
    ) -> Self {
        let mut set = Self::new();

        match gemini.and_then(GeminiProvider::with_config) {
            Ok(provider) => set.install(Arc::new(provider)),
            Err(error) => set.mark_unavailable(ProviderKind::Gemini, error.to_string()),
        }

        load_groq(&mut set, groq);
        set
    }

    pub fn register<P>(&mut self, provider: P) -> Result<(), ExplainError>
    where
        P: TextCompletionProvider + 'static,
    {
        self.register_shared(Arc::new(provider))
    }

    pub fn register_shared(
        &mut self,
        provider: Arc<dyn TextCompletionProvider>,
    ) -> Result<(), ExplainError> {
        let kind = provider.kind();
        if self.slot(kind).is_some() {
            return Err(ExplainError::internal(format!(
                "provider '{}' is already registered",
                kind.id()
            )));
        }

        self.install(provider);
        Ok(())
    }

    pub fn mark_unavailable(&mut self, kind: ProviderKind, reason: impl Into<String>) {
        let reason = reason.into();
        warn!("{kind} provider unavailable: {reason}");
        *self.slot_mut(kind) = None;
        self.unavailable.insert(kind, reason);
    }

    pub fn resolve(
        &self,
        kind: ProviderKind,
    ) -> Result<Arc<dyn TextCompletionProvider>, ExplainError> {
        self.slot(kind).map(Arc::clone).ok_or_else(|| {
            let reason = self
                .unavailable
                .get(&kind)
                .map(String::as_str)
                .unwrap_or(NOT_CONFIGURED_REASON);
            ExplainError::integration(kind, reason)
        })
    }

    pub fn is_available(&self, kind: ProviderKind) -> bool {
        self.slot(kind).is_some()
    }

    /// Human-readable reasons for every empty slot, in provider order.
    pub fn notices(&self) -> Vec<String> {
        ProviderKind::ALL
            .into_iter()
            .filter(|kind| !self.is_available(*kind))
            .map(|kind| {
                let reason = self
                    .unavailable
                    .get(&kind)
                    .map(String::as_str)
                    .unwrap_or(NOT_CONFIGURED_REASON);
                format!("{kind} is unavailable: {reason}")
            })
            .collect()
    }

    fn install(&mut self, provider: Arc<dyn TextCompletionProvider>) {
        let kind = provider.kind();
        self.unavailable.remove(&kind);
        *self.slot_mut(kind) = Some(provider);
    }

    fn slot(&self, kind: ProviderKind) -> Option<&Arc<dyn TextCompletionProvider>> {
        match kind {
            ProviderKind::Gemini => self.gemini.as_ref(),
            ProviderKind::Groq => self.groq.as_ref(),
        }
    }

    fn slot_mut(&mut self, kind: ProviderKind) -> &mut Option<Arc<dyn TextCompletionProvider>> {
        match kind {
            ProviderKind::Gemini => &mut self.gemini,
            ProviderKind::Groq => &mut self.groq,
        }
    }
}

#[cfg(feature = "groq")]
fn load_groq(set: &mut ProviderSet, config: Result<ProviderConfig, ConfigError>) {
    match config.and_then(super::GroqProvider::with_config) {
        Ok(provider) => set.install(Arc::new(provider)),
        Err(error) => set.mark_unavailable(ProviderKind::Groq, error.to_string()),
    }
}

#[cfg(not(feature = "groq"))]
fn load_groq(set: &mut ProviderSet, _config: Result<ProviderConfig, ConfigError>) {
    set.mark_unavailable(
        ProviderKind::Groq,
        "this build was compiled without the `groq` feature",
    );
}
