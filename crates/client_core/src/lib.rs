use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use shared::{domain::SurveyState, error::SubmissionError, protocol::ReportResponse};
use thiserror::Error;
use tokio::{
    runtime::Handle,
    sync::{broadcast, Mutex},
};
use tracing::{debug, info, warn};

pub mod config;
pub mod presenter;
pub mod reducer;
pub mod transport;

pub use config::{load_settings, ClientSettings, SettingsError};
pub use reducer::{ResultState, SubmissionPhase, SubmitOutcome};
pub use transport::HttpPredictionApi;

use reducer::{reduce, Effect, SubmissionEvent};

const ABANDONED_MESSAGE: &str = "submission was dropped before a response arrived";

/// Remote inference service that turns a survey snapshot into a report.
#[async_trait]
pub trait PredictionApi: Send + Sync {
    async fn predict(&self, snapshot: &SurveyState) -> Result<ReportResponse, SubmissionError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    SubmissionStarted,
    SubmissionFinished(SubmitOutcome),
    /// Emitted a short delay after a success so the results region can mount
    /// before it is brought into view.
    RevealResults,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("a submission is already in flight")]
    AlreadySubmitting,
}

/// Drives one request/response cycle at a time against a [`PredictionApi`].
pub struct SubmissionController {
    api: Arc<dyn PredictionApi>,
    state: Arc<Mutex<ResultState>>,
    events: broadcast::Sender<ControllerEvent>,
    reveal_delay: Duration,
}

impl SubmissionController {
    pub fn new(api: Arc<dyn PredictionApi>, reveal_delay: Duration) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            api,
            state: Arc::new(Mutex::new(ResultState::default())),
            events,
            reveal_delay,
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, SettingsError> {
        let api = HttpPredictionApi::new(&settings.api_base_url)?;
        info!(url = %api.predict_url(), "prediction endpoint configured");
        Ok(Self::new(Arc::new(api), settings.reveal_delay()))
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub async fn result_state(&self) -> ResultState {
        self.state.lock().await.clone()
    }

    pub async fn is_busy(&self) -> bool {
        self.state.lock().await.is_busy()
    }

    /// Submits `snapshot` and waits for the outcome.
    ///
    /// Returns `SubmitRejected::AlreadySubmitting` without touching the network
    /// or the state when another submission is still in flight.
    ///
    /// There is no cancellation. Dropping the returned future after the request
    /// went out (a `select!` or `timeout`, say) settles the attempt as an
    /// [`SubmissionError::Unknown`] failure so the controller is not left busy.
    pub async fn submit(&self, snapshot: SurveyState) -> Result<SubmitOutcome, SubmitRejected> {
        {
            let mut state = self.state.lock().await;
            let transition = reduce(&state, SubmissionEvent::SubmitRequested);
            if !transition.has_effect(Effect::IssueRequest) {
                warn!("submit ignored: a submission is already in flight");
                return Err(SubmitRejected::AlreadySubmitting);
            }
            *state = transition.state;
        }
        let mut attempt = Attempt {
            state: self.state.clone(),
            events: self.events.clone(),
            settled: false,
        };
        let _ = self.events.send(ControllerEvent::SubmissionStarted);
        info!(consent = %snapshot.consent, "submitting survey snapshot");

        let outcome = SubmitOutcome::from(self.api.predict(&snapshot).await);

        let effects = attempt.complete(outcome.clone()).await;

        match &outcome {
            SubmitOutcome::Success(report) => {
                info!(risk_label = %report.prediction.risk_label, "submission succeeded")
            }
            SubmitOutcome::Failure(err) => warn!(kind = ?err.kind(), "submission failed: {err}"),
        }
        let _ = self
            .events
            .send(ControllerEvent::SubmissionFinished(outcome.clone()));

        if effects.contains(&Effect::RevealResults) {
            self.schedule_reveal();
        }
        Ok(outcome)
    }

    fn schedule_reveal(&self) {
        let events = self.events.clone();
        let delay = self.reveal_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!("revealing results");
            let _ = events.send(ControllerEvent::RevealResults);
        });
    }
}

/// The in-flight half of a submit. Settles the state as failed if it is dropped
/// before the response is recorded.
struct Attempt {
    state: Arc<Mutex<ResultState>>,
    events: broadcast::Sender<ControllerEvent>,
    settled: bool,
}

impl Attempt {
    async fn complete(&mut self, outcome: SubmitOutcome) -> Vec<Effect> {
        let mut state = self.state.lock().await;
        let transition = reduce(&state, SubmissionEvent::Completed(outcome));
        *state = transition.state;
        self.settled = true;
        transition.effects
    }
}

fn settle(state: &mut ResultState, outcome: SubmitOutcome) {
    *state = reduce(state, SubmissionEvent::Completed(outcome)).state;
}

impl Drop for Attempt {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!("submission dropped while in flight; settling it as failed");
        let outcome = SubmitOutcome::Failure(SubmissionError::unknown(ABANDONED_MESSAGE));

        if let Ok(mut state) = self.state.try_lock() {
            settle(&mut state, outcome.clone());
        } else if let Ok(handle) = Handle::try_current() {
            // Still busy with this attempt until the task runs, so nothing
            // else can be settled by mistake.
            let state = self.state.clone();
            let late = outcome.clone();
            handle.spawn(async move { settle(&mut *state.lock().await, late) });
        } else {
            warn!("no runtime available; controller stays busy");
        }
        let _ = self
            .events
            .send(ControllerEvent::SubmissionFinished(outcome));
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
