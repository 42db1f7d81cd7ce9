use dsa_explainer::domain::ProviderKind;

pub(super) fn normalize_api_key_input(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub(super) fn api_key_label(provider: ProviderKind) -> String {
    format!("{provider} API Key")
}

pub(super) fn api_key_help_text(provider: ProviderKind) -> String {
    format!(
        "Get a {provider} API key at {}. The key is only kept for this session.",
        provider.api_key_url()
    )
}

pub(super) fn model_button_label(provider: ProviderKind, model_id: &str) -> String {
    if provider.default_model() == model_id {
        format!("{model_id} (default)")
    } else {
        model_id.to_string()
    }
}

pub(super) fn provider_button_id(provider: ProviderKind) -> &'static str {
    match provider {
        ProviderKind::Gemini => "provider-gemini",
        ProviderKind::Groq => "provider-groq",
    }
}
