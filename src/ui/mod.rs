use gpui::{App, AppContext, Application, Bounds, WindowBounds, WindowOptions, px, size};
use gpui_component::Root;

mod state;
mod utils;
mod window;

const EXPLAINER_WINDOW_WIDTH: f32 = 760.0;
const EXPLAINER_WINDOW_HEIGHT: f32 = 820.0;
const PROBLEM_EDITOR_HEIGHT_PX: f32 = 200.0;
const PROBLEM_EDITOR_ROWS: usize = 8;
const JOB_UPDATE_POLL_INTERVAL_MS: u64 = 50;

const PROBLEM_PLACEHOLDER: &str =
    "Paste a DSA problem, for example: Given an array of integers nums and an integer target...";
const WINDOW_SUBTITLE: &str =
    "Paste a data structures and algorithms problem and get a structured explanation.";
const API_KEY_PLACEHOLDER: &str = "API key";
const WORKER_UNAVAILABLE_NOTICE: &str = "The explain worker could not be started.";
const UNKNOWN_FAILURE_MESSAGE: &str = "The explanation failed for an unknown reason.";

pub(crate) fn run_explainer_window() {
    Application::new().run(|cx: &mut App| {
        gpui_component::init(cx);

        let bounds = Bounds::centered(
            None,
            size(px(EXPLAINER_WINDOW_WIDTH), px(EXPLAINER_WINDOW_HEIGHT)),
            cx,
        );
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(bounds)),
            ..Default::default()
        };

        if cx
            .open_window(options, |window, cx| {
                let view = cx.new(|cx| window::ExplainerWindow::new(window, cx));
                cx.new(|cx| Root::new(view, window, cx))
            })
            .is_err()
        {
            log::error!("failed to open the explainer window");
            cx.quit();
            return;
        }

        cx.on_window_closed(|cx| {
            if cx.windows().is_empty() {
                cx.quit();
            }
        })
        .detach();

        cx.activate(true);
    });
}

#[cfg(test)]
mod tests {
    use super::state::{ErrorBanner, ExplainStatus};
    use super::utils::{
        api_key_help_text, api_key_label, model_button_label, normalize_api_key_input,
        provider_button_id,
    };
    use dsa_explainer::domain::{
        ExplainError, InputField, ProviderError, ProviderFailureKind, ProviderKind,
    };

    #[test]
    fn normalize_api_key_input_trims_and_rejects_empty() {
        assert_eq!(
            normalize_api_key_input("  gsk-test-key  "),
            Some("gsk-test-key".to_string())
        );
        assert_eq!(normalize_api_key_input(" \n\t "), None);
    }

    #[test]
    fn api_key_texts_follow_selected_provider() {
        assert_eq!(api_key_label(ProviderKind::Groq), "Groq API Key");
        assert!(api_key_help_text(ProviderKind::Gemini).contains("aistudio.google.com"));
        assert!(api_key_help_text(ProviderKind::Groq).contains("console.groq.com"));
    }

    #[test]
    fn model_button_label_marks_only_the_default() {
        assert_eq!(
            model_button_label(ProviderKind::Gemini, "gemini-1.5-flash-latest"),
            "gemini-1.5-flash-latest (default)"
        );
        assert_eq!(
            model_button_label(ProviderKind::Gemini, "gemini-pro"),
            "gemini-pro"
        );
    }

    #[test]
    fn provider_button_ids_are_distinct() {
        assert_ne!(
            provider_button_id(ProviderKind::Gemini),
            provider_button_id(ProviderKind::Groq)
        );
    }

    #[test]
    fn status_labels_cover_each_state() {
        assert_eq!(ExplainStatus::Idle.label(), "Idle");
        assert_eq!(
            ExplainStatus::Running {
                job_id: 3,
                provider: ProviderKind::Groq
            }
            .label(),
            "Explaining with Groq (job 3)..."
        );
        assert_eq!(
            ExplainStatus::Succeeded {
                job_id: 3,
                provider: ProviderKind::Gemini
            }
            .label(),
            "Explanation ready from Google Gemini (job 3)"
        );
        assert_eq!(
            ExplainStatus::Failed {
                message: "boom".to_string()
            }
            .label(),
            "Failed: boom"
        );
        assert!(
            ExplainStatus::Running {
                job_id: 1,
                provider: ProviderKind::Gemini
            }
            .is_running()
        );
        assert!(!ExplainStatus::Idle.is_running());
    }

    #[test]
    fn missing_input_banner_targets_field_without_tips() {
        let banner = ErrorBanner::from_error(
            ProviderKind::Gemini,
            &ExplainError::missing(ProviderKind::Gemini, InputField::ApiKey),
        );

        assert_eq!(banner.message, "Please enter your Google Gemini API key.");
        assert!(banner.is_for_field(InputField::ApiKey));
        assert!(banner.tips.is_empty());
    }

    #[test]
    fn provider_failure_banner_carries_troubleshooting_tips() {
        let banner = ErrorBanner::from_error(
            ProviderKind::Groq,
            &ExplainError::Provider(ProviderError::new(
                ProviderFailureKind::Auth,
                "Invalid API Key",
            )),
        );

        assert!(banner.message.contains("Invalid API Key"));
        assert_eq!(banner.field, None);
        assert_eq!(banner.tips, ProviderKind::Groq.troubleshooting_tips());
    }
}
