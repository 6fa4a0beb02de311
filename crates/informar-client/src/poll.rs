//! Polling loops for long-running server-side work.
//!
//! Three pollers with the same step-driven design: `poll_once` performs one
//! check and reports an outcome, and a thin loop drives it on a fixed
//! schedule. Keeping the step separate from the loop means tests exercise
//! the state machine without sleeping.
//!
//! - [`RunPoller`]: a module analysis run, checked every 3 seconds until the
//!   state leaves `running`.
//! - [`TaskPoller`]: a bulk-refresh background job, checked every 5 seconds
//!   with a hard 2-hour ceiling after which polling self-terminates.
//! - [`HealthMonitor`]: the period-comparison health check; issuing a new
//!   check cancels any prior one still in flight, and cancelled results are
//!   swallowed rather than surfaced as failures.

use crate::api::{Api, ApiError};
use informar_core::cache::Clock;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Poll scheduling knobs, defaulting to the intervals the dashboard ships
/// with.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Interval between module-run status checks.
    pub run_interval: Duration,
    /// Interval between task-progress checks.
    pub task_interval: Duration,
    /// Hard ceiling on task polling; past it the poller gives up with a
    /// timeout warning instead of running forever.
    pub task_timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            run_interval: Duration::from_secs(3),
            task_interval: Duration::from_secs(5),
            task_timeout: Duration::from_secs(2 * 60 * 60),
        }
    }
}

/// State of a module analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    /// No run in progress.
    Idle,
    /// The backend is still computing.
    Running,
    /// Finished successfully; results are ready to reload.
    Completed,
    /// Finished with an error message.
    Error(String),
}

impl RunState {
    /// Parse the backend's status string.
    #[must_use]
    pub fn parse(status: &str) -> Self {
        match status {
            "idle" => Self::Idle,
            "running" | "pending" | "queued" => Self::Running,
            "completed" | "done" | "finished" => Self::Completed,
            other => Self::Error(format!("unexpected status: {other}")),
        }
    }

    /// Whether polling should stop.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error(_))
    }
}

/// Outcome of one run-status check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Still running; poll again after the interval.
    StillRunning,
    /// Run finished; trigger a full result reload.
    Completed,
    /// Run failed; surface the message and stop polling.
    Failed(String),
    /// Polling was cancelled (navigation, explicit stop).
    Cancelled,
}

/// Polls a module's status endpoint while a run executes.
pub struct RunPoller {
    module_id: String,
    cancelled: Arc<AtomicBool>,
    consecutive_failures: u32,
}

impl RunPoller {
    /// Create a poller for the given module id.
    #[must_use]
    pub fn new(module_id: impl Into<String>) -> Self {
        Self {
            module_id: module_id.into(),
            cancelled: Arc::new(AtomicBool::new(false)),
            consecutive_failures: 0,
        }
    }

    /// Handle that cancels the poller from elsewhere (tab navigation).
    #[must_use]
    pub fn cancel_token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Stop polling.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether the poller has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Perform one status check.
    ///
    /// Network failures do not terminate the loop; the poller retries on
    /// its schedule and the failure count only throttles log verbosity.
    pub fn poll_once(&mut self, api: &dyn Api) -> RunOutcome {
        if self.is_cancelled() {
            return RunOutcome::Cancelled;
        }
        let path = format!("/api/modules/{}/status", self.module_id);
        match api.get_json(&path) {
            Ok(body) => {
                self.consecutive_failures = 0;
                let status = body
                    .get("status")
                    .and_then(Value::as_str)
                    .unwrap_or("running");
                match RunState::parse(status) {
                    RunState::Completed => RunOutcome::Completed,
                    RunState::Error(msg) => RunOutcome::Failed(msg),
                    RunState::Idle | RunState::Running => RunOutcome::StillRunning,
                }
            }
            Err(e) => {
                self.consecutive_failures += 1;
                if self.consecutive_failures == 1 {
                    warn!(module = %self.module_id, error = %e, "status check failed, retrying");
                } else {
                    debug!(
                        module = %self.module_id,
                        failures = self.consecutive_failures,
                        "status check still failing"
                    );
                }
                RunOutcome::StillRunning
            }
        }
    }
}

/// Progress report from a background task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskProgress {
    /// Completion fraction, 0-100.
    pub progress: f64,
    /// Human-readable progress message.
    pub message: String,
}

/// Outcome of one task-progress check.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    /// Task still in progress.
    InProgress(TaskProgress),
    /// Task finished.
    Completed,
    /// Task failed with a message.
    Failed(String),
    /// The polling ceiling elapsed; the poller gave up.
    TimedOut,
    /// Polling was cancelled.
    Cancelled,
}

/// Polls a long-lived background job (bulk refresh) with a hard timeout.
pub struct TaskPoller {
    task_path: String,
    started_ms: u64,
    clock: Arc<dyn Clock>,
    config: PollConfig,
    cancelled: Arc<AtomicBool>,
    consecutive_failures: u32,
}

impl TaskPoller {
    /// Create a poller for the given task-status path.
    #[must_use]
    pub fn new(task_path: impl Into<String>, clock: Arc<dyn Clock>, config: PollConfig) -> Self {
        let started_ms = clock.now_ms();
        Self {
            task_path: task_path.into(),
            started_ms,
            clock,
            config,
            cancelled: Arc::new(AtomicBool::new(false)),
            consecutive_failures: 0,
        }
    }

    /// Handle that cancels the poller from elsewhere.
    #[must_use]
    pub fn cancel_token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Stop polling.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// The interval the driving loop should sleep between checks.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.config.task_interval
    }

    /// Perform one progress check.
    pub fn poll_once(&mut self, api: &dyn Api) -> TaskOutcome {
        if self.cancelled.load(Ordering::SeqCst) {
            return TaskOutcome::Cancelled;
        }
        let elapsed = self.clock.now_ms().saturating_sub(self.started_ms);
        if elapsed >= self.config.task_timeout.as_millis() as u64 {
            warn!(task = %self.task_path, "task polling exceeded its ceiling, giving up");
            return TaskOutcome::TimedOut;
        }

        match api.get_json(&self.task_path) {
            Ok(body) => {
                self.consecutive_failures = 0;
                let status = body
                    .get("status")
                    .and_then(Value::as_str)
                    .unwrap_or("running");
                match RunState::parse(status) {
                    RunState::Completed => {
                        info!(task = %self.task_path, "task finished");
                        TaskOutcome::Completed
                    }
                    RunState::Error(msg) => TaskOutcome::Failed(msg),
                    RunState::Idle | RunState::Running => {
                        TaskOutcome::InProgress(TaskProgress {
                            progress: body
                                .get("progress")
                                .and_then(Value::as_f64)
                                .unwrap_or(0.0),
                            message: body
                                .get("progress_message")
                                .and_then(Value::as_str)
                                .unwrap_or("")
                                .to_string(),
                        })
                    }
                }
            }
            Err(e) => {
                self.consecutive_failures += 1;
                if self.consecutive_failures == 1 {
                    warn!(task = %self.task_path, error = %e, "progress check failed, retrying");
                } else {
                    debug!(
                        task = %self.task_path,
                        failures = self.consecutive_failures,
                        "progress check still failing"
                    );
                }
                TaskOutcome::InProgress(TaskProgress {
                    progress: 0.0,
                    message: String::new(),
                })
            }
        }
    }
}

/// Drive a run poller to completion with a caller-supplied sleeper.
///
/// The sleeper receives the configured interval; production passes
/// `std::thread::sleep`, tests pass a no-op.
pub fn drive_run(
    poller: &mut RunPoller,
    api: &dyn Api,
    config: &PollConfig,
    mut sleep: impl FnMut(Duration),
) -> RunOutcome {
    loop {
        let outcome = poller.poll_once(api);
        if !matches!(outcome, RunOutcome::StillRunning) {
            return outcome;
        }
        sleep(config.run_interval);
    }
}

/// Serializes the health check so a newer check cancels any older one
/// still in flight.
///
/// `begin` hands out a generation token; `accept` is true only for the
/// latest generation, so a stale response is discarded silently instead of
/// being reported as a failure.
#[derive(Debug, Default)]
pub struct HealthMonitor {
    generation: AtomicU64,
    consecutive_failures: AtomicU64,
}

impl HealthMonitor {
    /// Create a monitor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new check, cancelling any prior in-flight one.
    pub fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether a response for the given generation is still the latest.
    #[must_use]
    pub fn accept(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Run one health check, returning `None` when the check was superseded
    /// mid-flight.
    pub fn check(&self, api: &dyn Api) -> Option<Result<Value, ApiError>> {
        let generation = self.begin();
        let result = api.get_json("/api/health");
        if !self.accept(generation) {
            debug!("health check superseded, discarding response");
            return None;
        }
        match &result {
            Ok(_) => {
                self.consecutive_failures.store(0, Ordering::SeqCst);
            }
            Err(e) => {
                let failures = self.consecutive_failures.fetch_add(1, Ordering::SeqCst) + 1;
                if failures == 1 {
                    warn!(error = %e, "health check failed");
                } else {
                    debug!(failures, "health check still failing");
                }
            }
        }
        Some(result)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use informar_core::cache::ManualClock;
    use serde_json::json;
    use std::sync::Mutex;

    /// Mock API returning a scripted sequence of responses.
    struct ScriptedApi {
        responses: Mutex<Vec<Result<Value, ApiError>>>,
    }

    impl ScriptedApi {
        fn new(responses: Vec<Result<Value, ApiError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
            }
        }
    }

    impl Api for ScriptedApi {
        fn get_json(&self, _path: &str) -> Result<Value, ApiError> {
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                Ok(json!({"status": "running"}))
            } else {
                responses.remove(0)
            }
        }
        fn post_json(&self, _path: &str, _body: &Value) -> Result<Value, ApiError> {
            Ok(Value::Null)
        }
        fn put_json(&self, _path: &str, _body: &Value) -> Result<Value, ApiError> {
            Ok(Value::Null)
        }
        fn delete_json(&self, _path: &str) -> Result<Value, ApiError> {
            Ok(Value::Null)
        }
    }

    #[test]
    fn test_run_state_parse() {
        assert_eq!(RunState::parse("running"), RunState::Running);
        assert_eq!(RunState::parse("completed"), RunState::Completed);
        assert_eq!(RunState::parse("idle"), RunState::Idle);
        assert!(matches!(RunState::parse("exploded"), RunState::Error(_)));
        assert!(RunState::Completed.is_terminal());
        assert!(!RunState::Running.is_terminal());
    }

    #[test]
    fn test_run_poller_runs_to_completion() {
        let api = ScriptedApi::new(vec![
            Ok(json!({"status": "running"})),
            Ok(json!({"status": "running"})),
            Ok(json!({"status": "completed"})),
        ]);
        let mut poller = RunPoller::new("zombie_campaign_detector");
        let mut sleeps = 0;
        let outcome = drive_run(&mut poller, &api, &PollConfig::default(), |_| sleeps += 1);
        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(sleeps, 2);
    }

    #[test]
    fn test_run_poller_surfaces_error_and_stops() {
        let api = ScriptedApi::new(vec![Ok(json!({"status": "failed"}))]);
        let mut poller = RunPoller::new("m");
        let outcome = poller.poll_once(&api);
        assert!(matches!(outcome, RunOutcome::Failed(_)));
    }

    #[test]
    fn test_run_poller_retries_on_network_failure() {
        let api = ScriptedApi::new(vec![
            Err(ApiError::Transport("connection refused".into())),
            Ok(json!({"status": "completed"})),
        ]);
        let mut poller = RunPoller::new("m");
        assert_eq!(poller.poll_once(&api), RunOutcome::StillRunning);
        assert_eq!(poller.poll_once(&api), RunOutcome::Completed);
    }

    #[test]
    fn test_run_poller_cancellation() {
        let api = ScriptedApi::new(vec![]);
        let mut poller = RunPoller::new("m");
        poller.cancel_token().store(true, Ordering::SeqCst);
        assert_eq!(poller.poll_once(&api), RunOutcome::Cancelled);
    }

    #[test]
    fn test_task_poller_reports_progress() {
        let api = ScriptedApi::new(vec![Ok(json!({
            "status": "running", "progress": 40.0, "progress_message": "4/10 campaigns"
        }))]);
        let clock = Arc::new(ManualClock::new());
        let mut poller = TaskPoller::new("/api/tasks/refresh", clock, PollConfig::default());
        let outcome = poller.poll_once(&api);
        assert_eq!(
            outcome,
            TaskOutcome::InProgress(TaskProgress {
                progress: 40.0,
                message: "4/10 campaigns".to_string(),
            })
        );
    }

    #[test]
    fn test_task_poller_times_out_at_ceiling() {
        let api = ScriptedApi::new(vec![]);
        let clock = Arc::new(ManualClock::new());
        let config = PollConfig::default();
        let ceiling_ms = config.task_timeout.as_millis() as u64;
        let mut poller = TaskPoller::new(
            "/api/tasks/refresh",
            Arc::clone(&clock) as Arc<dyn Clock>,
            config,
        );

        clock.set(ceiling_ms - 1);
        assert!(matches!(poller.poll_once(&api), TaskOutcome::InProgress(_)));
        clock.set(ceiling_ms);
        assert_eq!(poller.poll_once(&api), TaskOutcome::TimedOut);
    }

    #[test]
    fn test_task_poller_cancel() {
        let api = ScriptedApi::new(vec![]);
        let clock = Arc::new(ManualClock::new());
        let mut poller = TaskPoller::new("/api/tasks/refresh", clock, PollConfig::default());
        poller.cancel();
        assert_eq!(poller.poll_once(&api), TaskOutcome::Cancelled);
    }

    #[test]
    fn test_health_monitor_discards_superseded() {
        let monitor = HealthMonitor::new();
        let older = monitor.begin();
        let newer = monitor.begin();
        assert!(!monitor.accept(older));
        assert!(monitor.accept(newer));
    }

    #[test]
    fn test_health_check_returns_latest() {
        let api = ScriptedApi::new(vec![Ok(json!({"healthy": true}))]);
        let monitor = HealthMonitor::new();
        let result = monitor.check(&api).expect("latest check kept");
        assert_eq!(result.unwrap(), json!({"healthy": true}));
    }

    #[test]
    fn test_poll_config_defaults() {
        let config = PollConfig::default();
        assert_eq!(config.run_interval, Duration::from_secs(3));
        assert_eq!(config.task_interval, Duration::from_secs(5));
        assert_eq!(config.task_timeout, Duration::from_secs(7200));
    }
}
