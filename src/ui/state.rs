use dsa_explainer::domain::{ExplainError, InputField, ProviderKind};
use gpui::rgb;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum ExplainStatus {
    Idle,
    Running {
        job_id: u64,
        provider: ProviderKind,
    },
    Succeeded {
        job_id: u64,
        provider: ProviderKind,
    },
    Failed {
        message: String,
    },
}

impl ExplainStatus {
    pub(super) fn label(&self) -> String {
        match self {
            Self::Idle => "Idle".to_string(),
            Self::Running { job_id, provider } => {
                format!("Explaining with {provider} (job {job_id})...")
            }
            Self::Succeeded { job_id, provider } => {
                format!("Explanation ready from {provider} (job {job_id})")
            }
            Self::Failed { message } => format!("Failed: {message}"),
        }
    }

    pub(super) fn color(&self) -> gpui::Hsla {
        match self {
            Self::Idle => rgb(0x93c5fd).into(),
            Self::Running { .. } => rgb(0xfbbf24).into(),
            Self::Succeeded { .. } => rgb(0x86efac).into(),
            Self::Failed { .. } => rgb(0xfca5a5).into(),
        }
    }

    pub(super) fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }
}

/// What the error banner shows. Tips are only attached to downstream failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct ErrorBanner {
    pub(super) message: String,
    pub(super) field: Option<InputField>,
    pub(super) tips: &'static [&'static str],
}

impl ErrorBanner {
    pub(super) fn from_error(provider: ProviderKind, error: &ExplainError) -> Self {
        let (field, tips) = match error {
            ExplainError::MissingInput { field, .. } => (Some(*field), &[][..]),
            ExplainError::Provider(_) | ExplainError::Integration { .. } => {
                (None, provider.troubleshooting_tips())
            }
            ExplainError::Busy | ExplainError::Internal { .. } => (None, &[][..]),
        };

        Self {
            message: error.user_message(),
            field,
            tips,
        }
    }

    pub(super) fn is_for_field(&self, field: InputField) -> bool {
        self.field == Some(field)
    }
}
