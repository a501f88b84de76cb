//! Job status poller
//!
//! Polls the status endpoint of one job until it reaches a terminal state.
//! Each poll is issued only after the previous response has been fully
//! handled, so requests for a job never overlap. The loop observes a
//! cancellation token at every suspension point.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use conformity_client::ComparisonClient;
use conformity_core::domain::job::{JobStatus, SessionId};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::{Config, TransportErrorPolicy};
use crate::controller::view::{Actions, StatusView};
use crate::store::{SessionStore, StoreError};

/// Message shown when the status request itself fails
pub const STATUS_CHECK_FAILED: &str = "status check failed";

/// Source of job status snapshots
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self, session: &SessionId) -> conformity_client::Result<JobStatus>;
}

#[async_trait]
impl StatusSource for ComparisonClient {
    async fn fetch_status(&self, session: &SessionId) -> conformity_client::Result<JobStatus> {
        self.get_status(session).await
    }
}

/// Lifecycle state of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Polling,
    Completed,
    Failed,
}

/// Errors raised by the controller itself
#[derive(Debug, Error)]
pub enum ControllerError {
    /// No job to track; the user has to submit documents first
    #[error("no active comparison job")]
    NoActiveJob,

    #[error("the controller was already started")]
    AlreadyStarted,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// How polling ended
#[derive(Debug, Clone, PartialEq)]
pub struct PollOutcome {
    pub state: PollState,
    /// Last snapshot received; `None` after a transport failure or cancellation
    pub status: Option<JobStatus>,
}

impl PollOutcome {
    pub fn cancelled() -> Self {
        Self {
            state: PollState::Idle,
            status: None,
        }
    }
}

/// Handle to a running polling task
pub struct PollHandle {
    session: SessionId,
    task: JoinHandle<PollOutcome>,
}

impl PollHandle {
    pub fn session(&self) -> &SessionId {
        &self.session
    }

    /// Waits until polling stops
    pub async fn wait(self) -> PollOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Polling task aborted: {}", e);
                PollOutcome {
                    state: PollState::Failed,
                    status: None,
                }
            }
        }
    }
}

/// Controller for the processing of one job
pub struct ProcessingController {
    interval: Duration,
    on_transport_error: TransportErrorPolicy,
    source: Arc<dyn StatusSource>,
    view: Arc<dyn StatusView>,
    store: Arc<dyn SessionStore>,
    state: Arc<Mutex<PollState>>,
    cancel: CancellationToken,
}

impl ProcessingController {
    /// Creates an idle controller
    pub fn new(
        config: &Config,
        source: Arc<dyn StatusSource>,
        view: Arc<dyn StatusView>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            interval: config.poll_interval,
            on_transport_error: config.on_transport_error,
            source,
            view,
            store,
            state: Arc::new(Mutex::new(PollState::Idle)),
            cancel: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> PollState {
        *lock(&self.state)
    }

    /// Starts polling the job recorded in the session store
    ///
    /// Fails with [`ControllerError::NoActiveJob`] when no job is recorded.
    pub fn start(&self) -> Result<PollHandle, ControllerError> {
        let session = self.store.session_id()?.ok_or(ControllerError::NoActiveJob)?;

        {
            let mut state = lock(&self.state);
            if *state != PollState::Idle || self.cancel.is_cancelled() {
                return Err(ControllerError::AlreadyStarted);
            }
            *state = PollState::Polling;
        }

        info!("Polling status of session {}", session);

        let task = PollTask {
            session: session.clone(),
            interval: self.interval,
            on_transport_error: self.on_transport_error,
            source: Arc::clone(&self.source),
            view: Arc::clone(&self.view),
            state: Arc::clone(&self.state),
            cancel: self.cancel.clone(),
        };

        Ok(PollHandle {
            session,
            task: tokio::spawn(task.run()),
        })
    }

    /// Stops polling and forgets the tracked job
    ///
    /// Safe to call more than once and before [`start`](Self::start).
    pub fn teardown(&self) -> Result<(), ControllerError> {
        self.cancel.cancel();
        {
            let mut state = lock(&self.state);
            if *state == PollState::Polling {
                *state = PollState::Idle;
            }
        }
        self.store.clear_session_id()?;
        debug!("Controller torn down");
        Ok(())
    }
}

/// State owned by the spawned polling loop
struct PollTask {
    session: SessionId,
    interval: Duration,
    on_transport_error: TransportErrorPolicy,
    source: Arc<dyn StatusSource>,
    view: Arc<dyn StatusView>,
    state: Arc<Mutex<PollState>>,
    cancel: CancellationToken,
}

impl PollTask {
    async fn run(self) -> PollOutcome {
        loop {
            let result = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return self.finish(PollState::Idle, None),
                result = self.source.fetch_status(&self.session) => result,
            };

            match result {
                Ok(status) => {
                    if let Some(outcome) = self.apply(status) {
                        return outcome;
                    }
                }
                Err(e) => {
                    warn!("Status check for session {} failed: {}", self.session, e);
                    self.view.show_failure(STATUS_CHECK_FAILED);
                    self.view.set_actions(&self.session, Actions::HIDDEN);
                    if self.on_transport_error == TransportErrorPolicy::Stop {
                        return self.finish(PollState::Failed, None);
                    }
                }
            }

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return self.finish(PollState::Idle, None),
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }

    /// Renders one snapshot; returns the outcome when it is terminal
    fn apply(&self, status: JobStatus) -> Option<PollOutcome> {
        debug!("Session {} is {}", self.session, status.label());

        match &status {
            JobStatus::Processing { progress } => {
                self.view.show_progress(*progress);
                self.view.set_actions(&self.session, Actions::HIDDEN);
                None
            }
            JobStatus::Completed { summary, .. } => {
                info!("Session {} completed", self.session);
                self.view.show_completed(summary.as_ref());
                self.view.set_actions(&self.session, Actions::ENABLED);
                Some(self.finish(PollState::Completed, Some(status)))
            }
            JobStatus::Failed { message } => {
                warn!("Session {} failed: {}", self.session, message);
                self.view.show_failure(message);
                self.view.set_actions(&self.session, Actions::HIDDEN);
                Some(self.finish(PollState::Failed, Some(status)))
            }
        }
    }

    fn finish(&self, state: PollState, status: Option<JobStatus>) -> PollOutcome {
        {
            let mut current = lock(&self.state);
            // teardown may already have moved the controller back to Idle
            if *current == PollState::Polling {
                *current = state;
            }
        }
        PollOutcome { state, status }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
