use std::sync::Arc;
use std::time::Duration;

use dsa_explainer::{
    app::{Dispatcher, ExplainJobRunner, ExplainJobState, ExplainJobUpdate},
    domain::{
        ApiKey, EXAMPLE_PROBLEMS, ExampleProblem, ExplainError, ExplainRequest, InputField,
        ProviderKind,
    },
};
use gpui::{
    App, Context, Entity, IntoElement, Render, Subscription, Task, Timer, Window, div,
    prelude::*, px, rgb,
};
use gpui_component::{
    Disableable,
    button::{Button, ButtonVariants as _},
    input::{Input, InputEvent, InputState},
    label::Label,
    scroll::ScrollableElement,
    text::TextView,
};
use log::{error, info};

use super::state::{ErrorBanner, ExplainStatus};
use super::utils::{
    api_key_help_text, api_key_label, model_button_label, normalize_api_key_input,
    provider_button_id,
};
use super::{
    API_KEY_PLACEHOLDER, JOB_UPDATE_POLL_INTERVAL_MS, PROBLEM_EDITOR_HEIGHT_PX,
    PROBLEM_EDITOR_ROWS, PROBLEM_PLACEHOLDER, UNKNOWN_FAILURE_MESSAGE, WINDOW_SUBTITLE,
    WORKER_UNAVAILABLE_NOTICE,
};

pub(super) struct ExplainerWindow {
    problem_input: Entity<InputState>,
    _problem_input_subscription: Subscription,
    api_key_input: Entity<InputState>,
    _api_key_input_subscription: Subscription,
    runner: Option<Arc<ExplainJobRunner>>,
    provider: ProviderKind,
    model_id: &'static str,
    status: ExplainStatus,
    explanation: Option<String>,
    error_banner: Option<ErrorBanner>,
    startup_notices: Vec<String>,
    _update_poll_task: Task<()>,
}

impl ExplainerWindow {
    pub(super) fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let problem_input = cx.new(|cx| {
            InputState::new(window, cx)
                .multi_line(true)
                .rows(PROBLEM_EDITOR_ROWS)
                .placeholder(PROBLEM_PLACEHOLDER)
        });
        let problem_input_subscription =
            cx.subscribe_in(&problem_input, window, Self::on_problem_input_event);
        let api_key_input = cx.new(|cx| {
            InputState::new(window, cx)
                .placeholder(API_KEY_PLACEHOLDER)
                .masked(true)
        });
        let api_key_input_subscription =
            cx.subscribe_in(&api_key_input, window, Self::on_api_key_input_event);

        let dispatcher = Dispatcher::from_env();
        let mut startup_notices = dispatcher.providers().notices();
        let runner = match ExplainJobRunner::new(dispatcher) {
            Ok(runner) => Some(Arc::new(runner)),
            Err(err) => {
                error!("explain worker failed to start: {err}");
                startup_notices.push(format!(
                    "{WORKER_UNAVAILABLE_NOTICE} ({})",
                    err.user_message()
                ));
                None
            }
        };

        let provider = ProviderKind::default();
        Self {
            problem_input,
            _problem_input_subscription: problem_input_subscription,
            api_key_input,
            _api_key_input_subscription: api_key_input_subscription,
            runner,
            provider,
            model_id: provider.default_model(),
            status: ExplainStatus::Idle,
            explanation: None,
            error_banner: None,
            startup_notices,
            _update_poll_task: Task::ready(()),
        }
    }

    fn on_problem_input_event(
        &mut self,
        _state: &Entity<InputState>,
        event: &InputEvent,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if matches!(event, InputEvent::Change) {
            self.clear_field_error(InputField::ProblemText, cx);
        }
    }

    fn on_api_key_input_event(
        &mut self,
        _state: &Entity<InputState>,
        event: &InputEvent,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if matches!(event, InputEvent::Change) {
            self.clear_field_error(InputField::ApiKey, cx);
        }
    }

    fn clear_field_error(&mut self, field: InputField, cx: &mut Context<Self>) {
        if self
            .error_banner
            .as_ref()
            .is_some_and(|banner| banner.is_for_field(field))
        {
            self.error_banner = None;
            cx.notify();
        }
    }

    fn on_provider_selected(
        &mut self,
        provider: ProviderKind,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if self.provider == provider {
            return;
        }

        self.provider = provider;
        self.model_id = provider.default_model();
        self.error_banner = None;
        // Keys never carry across providers.
        self.api_key_input
            .update(cx, |input, cx| input.set_value("", window, cx));
        cx.notify();
    }

    fn on_model_selected(&mut self, model_id: &'static str, cx: &mut Context<Self>) {
        self.model_id = model_id;
        cx.notify();
    }

    fn on_example_selected(
        &mut self,
        example: &'static ExampleProblem,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.problem_input
            .update(cx, |input, cx| input.set_value(example.statement, window, cx));
        cx.notify();
    }

    fn on_explain_clicked(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.error_banner = None;

        let Some(runner) = self.runner.clone() else {
            self.status = ExplainStatus::Failed {
                message: WORKER_UNAVAILABLE_NOTICE.to_string(),
            };
            cx.notify();
            return;
        };

        let api_key = ApiKey::new(self.api_key_value(cx).unwrap_or_default());
        let problem_text = self.problem_input.read(cx).value().to_string();
        let request = ExplainRequest::new(self.provider, self.model_id, api_key, problem_text);
        let problem_chars = request.problem_chars();

        match runner.submit(request) {
            Ok(job_id) => {
                info!("queued explain job {job_id} problem_chars={problem_chars}");
                self.explanation = None;
                self.status = ExplainStatus::Running {
                    job_id,
                    provider: self.provider,
                };
                self.start_update_polling(window, cx);
            }
            Err(err) => self.show_error(&err, window, cx),
        }

        cx.notify();
    }

    fn show_error(&mut self, err: &ExplainError, window: &mut Window, cx: &mut Context<Self>) {
        let banner = ErrorBanner::from_error(self.provider, err);
        match banner.field {
            Some(InputField::ApiKey) => self
                .api_key_input
                .update(cx, |input, cx| input.focus(window, cx)),
            Some(InputField::ProblemText) => self
                .problem_input
                .update(cx, |input, cx| input.focus(window, cx)),
            _ => {}
        }

        self.status = if banner.field.is_some() {
            ExplainStatus::Idle
        } else {
            ExplainStatus::Failed {
                message: banner.message.clone(),
            }
        };
        self.error_banner = Some(banner);
    }

    fn api_key_value(&self, cx: &App) -> Option<String> {
        let value = self.api_key_input.read(cx).value();
        normalize_api_key_input(value.as_ref())
    }

    fn start_update_polling(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self._update_poll_task = cx.spawn_in(window, async move |view, window| {
            loop {
                Timer::after(Duration::from_millis(JOB_UPDATE_POLL_INTERVAL_MS)).await;
                let keep_polling = match view
                    .update_in(window, |view, _window, cx| view.poll_job_updates(cx))
                {
                    Ok(keep_polling) => keep_polling,
                    Err(_) => break,
                };

                if !keep_polling {
                    break;
                }
            }
        });
    }

    fn poll_job_updates(&mut self, cx: &mut Context<Self>) -> bool {
        let Some(runner) = self.runner.as_ref() else {
            return false;
        };

        let updates = runner.drain_updates();
        if !updates.is_empty() {
            for update in updates {
                self.apply_job_update(update);
            }

            cx.notify();
        }

        self.status.is_running()
    }

    fn apply_job_update(&mut self, update: ExplainJobUpdate) {
        match update.state {
            ExplainJobState::Idle => self.status = ExplainStatus::Idle,
            ExplainJobState::Running => {
                self.status = ExplainStatus::Running {
                    job_id: update.job_id,
                    provider: update.provider,
                };
            }
            ExplainJobState::Succeeded => {
                self.explanation = update.explanation;
                self.error_banner = None;
                self.status = ExplainStatus::Succeeded {
                    job_id: update.job_id,
                    provider: update.provider,
                };
            }
            ExplainJobState::Failed => {
                let banner = update
                    .error
                    .as_ref()
                    .map(|err| ErrorBanner::from_error(update.provider, err));
                self.status = ExplainStatus::Failed {
                    message: banner
                        .as_ref()
                        .map(|banner| banner.message.clone())
                        .unwrap_or_else(|| UNKNOWN_FAILURE_MESSAGE.to_string()),
                };
                self.error_banner = banner;
            }
        }
    }
}

impl Render for ExplainerWindow {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let explanation_view = self.explanation.clone().map(|explanation| {
            TextView::markdown("explanation-markdown", explanation, window, cx).selectable(true)
        });
        let running = self.status.is_running();
        let status_label = self.status.label();
        let status_color = self.status.color();
        let provider = self.provider;
        let selected_model = self.model_id;

        let provider_buttons: Vec<Button> = ProviderKind::ALL
            .into_iter()
            .map(|kind| {
                let button = Button::new(provider_button_id(kind))
                    .label(kind.display_name())
                    .disabled(running)
                    .on_click(cx.listener(move |this, _, window, cx| {
                        this.on_provider_selected(kind, window, cx)
                    }));
                if kind == provider {
                    button.primary()
                } else {
                    button
                }
            })
            .collect();

        let model_buttons: Vec<Button> = provider
            .models()
            .iter()
            .enumerate()
            .map(|(index, model_id)| {
                let model_id: &'static str = model_id;
                let button = Button::new(("model-option", index))
                    .label(model_button_label(provider, model_id))
                    .disabled(running)
                    .on_click(cx.listener(move |this, _, _window, cx| {
                        this.on_model_selected(model_id, cx)
                    }));
                if model_id == selected_model {
                    button.primary()
                } else {
                    button
                }
            })
            .collect();

        let example_buttons: Vec<Button> = EXAMPLE_PROBLEMS
            .iter()
            .enumerate()
            .map(|(index, example)| {
                Button::new(("example-problem", index))
                    .label(example.title)
                    .disabled(running)
                    .on_click(cx.listener(move |this, _, window, cx| {
                        this.on_example_selected(example, window, cx)
                    }))
            })
            .collect();

        div()
            .size_full()
            .overflow_y_scrollbar()
            .overflow_x_hidden()
            .flex()
            .flex_col()
            .gap_3()
            .p_4()
            .bg(rgb(0x111827))
            .text_color(rgb(0xf9fafb))
            .child(Label::new("DSA Problem Explainer"))
            .child(div().text_color(rgb(0x94a3b8)).child(WINDOW_SUBTITLE))
            .children(self.startup_notices.iter().map(|notice| {
                div()
                    .text_color(rgb(0x93c5fd))
                    .child(format!("Notice: {notice}"))
            }))
            .child(Label::new("Provider"))
            .child(
                div()
                    .id("provider-selector")
                    .flex()
                    .items_center()
                    .gap_2()
                    .children(provider_buttons),
            )
            .child(Label::new("Model"))
            .child(
                div()
                    .id("model-selector")
                    .flex()
                    .flex_wrap()
                    .items_center()
                    .gap_2()
                    .children(model_buttons),
            )
            .child(Label::new(api_key_label(provider)))
            .child(Input::new(&self.api_key_input).mask_toggle())
            .child(
                div()
                    .text_color(rgb(0x94a3b8))
                    .child(api_key_help_text(provider)),
            )
            .child(Label::new("Examples"))
            .child(
                div()
                    .id("example-problems")
                    .flex()
                    .flex_wrap()
                    .items_center()
                    .gap_2()
                    .children(example_buttons),
            )
            .child(Label::new("DSA Problem"))
            .child(Input::new(&self.problem_input).h(px(PROBLEM_EDITOR_HEIGHT_PX)))
            .child(
                div()
                    .flex()
                    .items_center()
                    .justify_between()
                    .gap_3()
                    .child(
                        Button::new("explain-button")
                            .primary()
                            .label(if running {
                                "Explaining..."
                            } else {
                                "Explain Problem"
                            })
                            .loading(running)
                            .disabled(running)
                            .on_click(cx.listener(|this, _, window, cx| {
                                this.on_explain_clicked(window, cx)
                            })),
                    )
                    .child(div().text_color(status_color).child(status_label)),
            )
            .children(self.error_banner.iter().map(|banner| {
                div()
                    .flex()
                    .flex_col()
                    .gap_1()
                    .p_3()
                    .border_1()
                    .border_color(rgb(0x7f1d1d))
                    .bg(rgb(0x2a1215))
                    .child(
                        div()
                            .text_color(rgb(0xfca5a5))
                            .child(banner.message.clone()),
                    )
                    .children(banner.tips.iter().map(|tip| {
                        div().text_color(rgb(0xfcd34d)).child(format!("- {tip}"))
                    }))
            }))
            .children(explanation_view.map(|explanation| {
                div()
                    .flex()
                    .flex_col()
                    .gap_2()
                    .p_3()
                    .border_1()
                    .border_color(rgb(0x334155))
                    .bg(rgb(0x0f172a))
                    .child(Label::new("Explanation"))
                    .child(explanation)
            }))
    }
}
