//! Homework status poll loop.
//!
//! A tracking session fetches review state every `retry_period`, turns the
//! first homework into a verdict sentence and notifies only when that sentence
//! changes. Sessions are stopped cooperatively through a `CancellationToken`.

use std::{sync::Arc, time::Duration};

use serde_json::Value;
use tokio::{sync::Mutex, task::JoinHandle, time::sleep};
use tokio_util::sync::CancellationToken;

use crate::{
    homework::{check_response, parse_status, VerdictTable},
    notifier::Notifier,
    ports::HomeworkSource,
    Result,
};

pub const TRACKING_STARTED: &str = "вы начали отслеживание";
pub const TRACKING_STOPPED: &str = "вы закончили отслеживание";
pub const REVIEW_NOT_STARTED: &str = "Ревью еще не началось";

/// What a successfully fetched and validated response means for the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Verdict sentence for the most recent homework.
    Status(String),
    /// The homework list was empty: nothing has been submitted for review yet.
    NoReviewYet,
}

/// Validate a response and derive the outcome from its first homework.
pub fn evaluate(response: &Value, verdicts: &VerdictTable) -> Result<CycleOutcome> {
    let homeworks = check_response(response)?;
    let Some(first) = homeworks.first() else {
        return Ok(CycleOutcome::NoReviewYet);
    };
    Ok(CycleOutcome::Status(parse_status(first, verdicts)?))
}

pub fn failure_message(err: &crate::Error) -> String {
    format!("Сбой в работе программы: {err}")
}

/// Per-session state. Created fresh for every session.
#[derive(Debug, Default)]
pub struct LoopState {
    last_status: Option<String>,
    empty_notified: bool,
}

impl LoopState {
    pub fn last_status(&self) -> Option<&str> {
        self.last_status.as_deref()
    }
}

pub struct Tracker {
    source: Arc<dyn HomeworkSource>,
    notifier: Notifier,
    verdicts: Arc<VerdictTable>,
    retry_period: Duration,
}

impl Tracker {
    pub fn new(
        source: Arc<dyn HomeworkSource>,
        notifier: Notifier,
        verdicts: Arc<VerdictTable>,
        retry_period: Duration,
    ) -> Self {
        Self {
            source,
            notifier,
            verdicts,
            retry_period,
        }
    }

    /// Run one tracking session until `cancel` fires.
    pub async fn run_session(&self, from_date: i64, cancel: CancellationToken) {
        let mut state = LoopState::default();
        tracing::info!(from_date, "tracking started");
        self.notifier.notify(TRACKING_STARTED).await;

        while !cancel.is_cancelled() {
            self.run_cycle(from_date, &mut state).await;

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = sleep(self.retry_period) => {}
            }
        }

        tracing::info!("tracking stopped");
    }

    /// One fetch/validate/diff/notify step.
    pub async fn run_cycle(&self, from_date: i64, state: &mut LoopState) {
        let outcome = match self.source.fetch(from_date).await {
            Ok(response) => evaluate(&response, &self.verdicts),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(CycleOutcome::Status(message)) => {
                if state.last_status.as_deref() == Some(message.as_str()) {
                    tracing::debug!("status unchanged");
                    return;
                }
                state.last_status = Some(message.clone());
                self.notifier.notify(&message).await;
            }
            Ok(CycleOutcome::NoReviewYet) => {
                if !state.empty_notified {
                    state.empty_notified = true;
                    self.notifier.notify(REVIEW_NOT_STARTED).await;
                }
            }
            Err(e) => {
                let message = failure_message(&e);
                tracing::error!("{message}");
                self.notifier.notify(&message).await;
            }
        }
    }
}

struct Session {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Start/stop control over a [`Tracker`]. At most one session runs at a time.
#[derive(Clone)]
pub struct TrackerHandle {
    tracker: Arc<Tracker>,
    session: Arc<Mutex<Option<Session>>>,
}

impl TrackerHandle {
    pub fn new(tracker: Tracker) -> Self {
        Self {
            tracker: Arc::new(tracker),
            session: Arc::new(Mutex::new(None)),
        }
    }

    /// Start a new session from `from_date`, replacing any running one.
    pub async fn start(&self, from_date: i64) {
        let mut session = self.session.lock().await;
        if let Some(old) = session.take() {
            old.cancel.cancel();
            old.handle.abort();
        }

        let cancel = CancellationToken::new();
        let tracker = self.tracker.clone();
        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            tracker.run_session(from_date, token).await;
        });

        *session = Some(Session { cancel, handle });
    }

    /// Request the running session to stop. Returns `false` when idle.
    pub async fn stop(&self) -> bool {
        let session = self.session.lock().await;
        match session.as_ref() {
            Some(s) if !s.cancel.is_cancelled() && !s.handle.is_finished() => {
                s.cancel.cancel();
                true
            }
            _ => false,
        }
    }

    pub async fn is_tracking(&self) -> bool {
        let session = self.session.lock().await;
        session
            .as_ref()
            .map(|s| !s.cancel.is_cancelled() && !s.handle.is_finished())
            .unwrap_or(false)
    }

    /// Wait for the current session (if any) to exit.
    pub async fn join(&self) {
        let session = self.session.lock().await.take();
        if let Some(s) = session {
            if let Err(e) = s.handle.await {
                if !e.is_cancelled() {
                    tracing::error!(error = %e, "tracking task failed");
                }
            }
        }
    }
}
