use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, mpsc};
use std::thread;

use log::debug;

use crate::domain::{ExplainError, ExplainRequest, ProviderKind};

use super::Dispatcher;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExplainJobState {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExplainJobUpdate {
    pub job_id: u64,
    pub provider: ProviderKind,
    pub state: ExplainJobState,
    pub explanation: Option<String>,
    pub error: Option<ExplainError>,
}

impl ExplainJobUpdate {
    fn running(job_id: u64, provider: ProviderKind) -> Self {
        Self {
            job_id,
            provider,
            state: ExplainJobState::Running,
            explanation: None,
            error: None,
        }
    }

    fn succeeded(job_id: u64, provider: ProviderKind, explanation: String) -> Self {
        Self {
            job_id,
            provider,
            state: ExplainJobState::Succeeded,
            explanation: Some(explanation),
            error: None,
        }
    }

    fn failed(job_id: u64, provider: ProviderKind, error: ExplainError) -> Self {
        Self {
            job_id,
            provider,
            state: ExplainJobState::Failed,
            explanation: None,
            error: Some(error),
        }
    }
}

/// Runs dispatcher calls on one worker thread so the UI thread never blocks.
/// At most one job is in flight; a second submission is refused.
pub struct ExplainJobRunner {
    next_job_id: AtomicU64,
    command_tx: mpsc::Sender<WorkerMessage>,
    shared: Arc<Mutex<SharedState>>,
    worker_handle: Mutex<Option<thread::JoinHandle<()>>>,
}

impl ExplainJobRunner {
    pub fn new(dispatcher: Dispatcher) -> Result<Self, ExplainError> {
        let shared = Arc::new(Mutex::new(SharedState::default()));
        let (command_tx, command_rx) = mpsc::channel();
        let worker_shared = Arc::clone(&shared);

        let handle = thread::Builder::new()
            .name("dsa-explainer-worker".to_string())
            .spawn(move || worker_loop(dispatcher, command_rx, worker_shared))
            .map_err(|error| {
                ExplainError::internal(format!("failed to start explain worker thread: {error}"))
            })?;

        Ok(Self {
            next_job_id: AtomicU64::new(1),
            command_tx,
            shared,
            worker_handle: Mutex::new(Some(handle)),
        })
    }

    /// Missing input is reported here, before the request reaches the worker.
    pub fn submit(&self, request: ExplainRequest) -> Result<u64, ExplainError> {
        request.validate()?;

        let job_id = {
            let mut shared = lock(&self.shared);
            if shared.state == ExplainJobState::Running {
                return Err(ExplainError::Busy);
            }

            let job_id = self.next_job_id.fetch_add(1, Ordering::SeqCst);
            shared.record(ExplainJobUpdate::running(job_id, request.provider));
            job_id
        };

        let provider = request.provider;
        if let Err(error) = self.command_tx.send(WorkerMessage::Start { job_id, request }) {
            let error = ExplainError::internal(format!(
                "failed to submit explain job to worker queue: {error}"
            ));
            lock(&self.shared).record(ExplainJobUpdate::failed(job_id, provider, error.clone()));
            return Err(error);
        }

        Ok(job_id)
    }

    pub fn state(&self) -> ExplainJobState {
        lock(&self.shared).state
    }

    pub fn latest_update(&self) -> Option<ExplainJobUpdate> {
        lock(&self.shared).latest.clone()
    }

    pub fn drain_updates(&self) -> Vec<ExplainJobUpdate> {
        lock(&self.shared).updates.drain(..).collect()
    }
}

impl Drop for ExplainJobRunner {
    fn drop(&mut self) {
        let _ = self.command_tx.send(WorkerMessage::Shutdown);

        let handle = self
            .worker_handle
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(handle) = handle else {
            return;
        };

        // A request in flight may hold the worker until the transport timeout.
        if self.state() == ExplainJobState::Running {
            debug!("explain worker still busy at shutdown; detaching");
            return;
        }
        let _ = handle.join();
    }
}

#[derive(Default)]
struct SharedState {
    state: ExplainJobState,
    latest: Option<ExplainJobUpdate>,
    updates: VecDeque<ExplainJobUpdate>,
}

impl SharedState {
    fn record(&mut self, update: ExplainJobUpdate) {
        self.state = update.state;
        self.latest = Some(update.clone());
        self.updates.push_back(update);
    }
}

enum WorkerMessage {
    Start { job_id: u64, request: ExplainRequest },
    Shutdown,
}

fn worker_loop(
    dispatcher: Dispatcher,
    command_rx: mpsc::Receiver<WorkerMessage>,
    shared: Arc<Mutex<SharedState>>,
) {
    while let Ok(message) = command_rx.recv() {
        match message {
            WorkerMessage::Start { job_id, request } => {
                let update = match dispatcher.explain_request(&request) {
                    Ok(explanation) => {
                        ExplainJobUpdate::succeeded(job_id, request.provider, explanation)
                    }
                    Err(error) => ExplainJobUpdate::failed(job_id, request.provider, error),
                };
                lock(&shared).record(update);
            }
            WorkerMessage::Shutdown => break,
        }
    }
}

fn lock(shared: &Mutex<SharedState>) -> MutexGuard<'_, SharedState> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex, mpsc};
    use std::thread;
    use std::time::{Duration, Instant};

    use super::{ExplainJobRunner, ExplainJobState, ExplainJobUpdate};
    use crate::app::Dispatcher;
    use crate::domain::{
        ApiKey, ExplainError, ExplainRequest, InputField, ProviderError, ProviderFailureKind,
        ProviderKind,
    };
    use crate::infra::llm::{CompletionRequest, ProviderSet, TextCompletionProvider};

    struct ScriptedProvider {
        calls: Arc<AtomicUsize>,
        gate: Option<Mutex<mpsc::Receiver<()>>>,
        reply: Result<String, ProviderError>,
    }

    impl TextCompletionProvider for ScriptedProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Gemini
        }

        fn complete(&self, _request: &CompletionRequest<'_>) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                let _ = gate
                    .lock()
                    .expect("gate mutex poisoned")
                    .recv_timeout(Duration::from_secs(5));
            }
            self.reply.clone()
        }
    }

    fn runner(
        reply: Result<String, ProviderError>,
        gate: Option<mpsc::Receiver<()>>,
    ) -> (ExplainJobRunner, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut providers = ProviderSet::new();
        providers
            .register(ScriptedProvider {
                calls: Arc::clone(&calls),
                gate: gate.map(Mutex::new),
                reply,
            })
            .expect("provider registration should succeed");

        let runner = ExplainJobRunner::new(Dispatcher::new(providers))
            .expect("worker should start");
        (runner, calls)
    }

    fn request(api_key: &str, problem: &str) -> ExplainRequest {
        ExplainRequest::new(
            ProviderKind::Gemini,
            "gemini-1.5-flash-latest",
            ApiKey::from(api_key),
            problem,
        )
    }

    fn wait_for_terminal(runner: &ExplainJobRunner) -> Vec<ExplainJobUpdate> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut seen = Vec::new();
        while Instant::now() < deadline {
            seen.extend(runner.drain_updates());
            if seen.iter().any(|update| {
                matches!(
                    update.state,
                    ExplainJobState::Succeeded | ExplainJobState::Failed
                )
            }) {
                return seen;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("job did not finish in time: {seen:?}");
    }

    #[test]
    fn submit_runs_job_and_reports_running_then_succeeded() {
        let (runner, calls) = runner(Ok("1. Summary...".to_string()), None);

        let job_id = runner
            .submit(request("key-1", "Two Sum"))
            .expect("submission should succeed");
        let updates = wait_for_terminal(&runner);

        assert_eq!(updates[0].state, ExplainJobState::Running);
        assert_eq!(updates[0].job_id, job_id);
        let last = updates.last().expect("terminal update should exist");
        assert_eq!(last.state, ExplainJobState::Succeeded);
        assert_eq!(last.explanation.as_deref(), Some("1. Summary..."));
        assert_eq!(runner.state(), ExplainJobState::Succeeded);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn submit_reports_missing_input_synchronously() {
        let (runner, calls) = runner(Ok("unused".to_string()), None);

        let error = runner
            .submit(request("", "Two Sum"))
            .expect_err("empty key should fail");

        assert!(matches!(
            error,
            ExplainError::MissingInput {
                field: InputField::ApiKey,
                ..
            }
        ));
        assert_eq!(runner.state(), ExplainJobState::Idle);
        assert!(runner.drain_updates().is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn submit_refuses_second_job_while_one_is_running() {
        let (release_tx, release_rx) = mpsc::channel();
        let (runner, calls) = runner(Ok("done".to_string()), Some(release_rx));

        runner
            .submit(request("key-1", "Two Sum"))
            .expect("first submission should succeed");
        let error = runner
            .submit(request("key-1", "Binary Search"))
            .expect_err("second submission should be refused");
        assert!(matches!(error, ExplainError::Busy));

        release_tx.send(()).expect("provider should be waiting");
        wait_for_terminal(&runner);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        runner
            .submit(request("key-1", "Binary Search"))
            .expect("submission after completion should succeed");
        wait_for_terminal(&runner);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failed_job_carries_provider_error() {
        let (runner, _calls) = runner(
            Err(ProviderError::new(
                ProviderFailureKind::RateLimited,
                "quota exceeded",
            )),
            None,
        );

        runner
            .submit(request("key-1", "Two Sum"))
            .expect("submission should succeed");
        let updates = wait_for_terminal(&runner);
        let last = updates.last().expect("terminal update should exist");

        assert_eq!(last.state, ExplainJobState::Failed);
        assert!(matches!(
            last.error.as_ref(),
            Some(ExplainError::Provider(ProviderError { message, .. }))
                if message == "quota exceeded"
        ));
        assert_eq!(runner.latest_update().as_ref(), Some(last));
    }
}
