//! Submission state machine as a pure reducer over an externally owned
//! [`ResultState`].
//!
//! The reducer, not the UI, enforces that only one submission is in flight: a
//! `SubmitRequested` event while busy produces no transition and no effects.

use shared::{error::SubmissionError, protocol::ReportResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Submitting,
}

/// Latest response, latest error and the busy flag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultState {
    response: Option<ReportResponse>,
    error: Option<SubmissionError>,
    busy: bool,
}

impl ResultState {
    pub fn response(&self) -> Option<&ReportResponse> {
        self.response.as_ref()
    }

    pub fn error(&self) -> Option<&SubmissionError> {
        self.error.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn phase(&self) -> SubmissionPhase {
        if self.busy {
            SubmissionPhase::Submitting
        } else {
            SubmissionPhase::Idle
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Success(ReportResponse),
    Failure(SubmissionError),
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Success(_))
    }
}

impl From<Result<ReportResponse, SubmissionError>> for SubmitOutcome {
    fn from(value: Result<ReportResponse, SubmissionError>) -> Self {
        match value {
            Ok(report) => SubmitOutcome::Success(report),
            Err(err) => SubmitOutcome::Failure(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionEvent {
    SubmitRequested,
    Completed(SubmitOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Send the snapshot to the prediction endpoint.
    IssueRequest,
    /// Bring the results region into view once it has mounted.
    RevealResults,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: ResultState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn unchanged(state: &ResultState) -> Self {
        Self {
            state: state.clone(),
            effects: Vec::new(),
        }
    }

    pub fn has_effect(&self, effect: Effect) -> bool {
        self.effects.contains(&effect)
    }
}

pub fn reduce(state: &ResultState, event: SubmissionEvent) -> Transition {
    match (state.phase(), event) {
        (SubmissionPhase::Idle, SubmissionEvent::SubmitRequested) => Transition {
            state: ResultState {
                response: None,
                error: None,
                busy: true,
            },
            effects: vec![Effect::IssueRequest],
        },
        (SubmissionPhase::Submitting, SubmissionEvent::SubmitRequested) => {
            Transition::unchanged(state)
        }
        (SubmissionPhase::Submitting, SubmissionEvent::Completed(outcome)) => match outcome {
            SubmitOutcome::Success(report) => Transition {
                state: ResultState {
                    response: Some(report),
                    error: None,
                    busy: false,
                },
                effects: vec![Effect::RevealResults],
            },
            SubmitOutcome::Failure(err) => Transition {
                state: ResultState {
                    response: None,
                    error: Some(err),
                    busy: false,
                },
                effects: Vec::new(),
            },
        },
        // A completion with nothing in flight has no attempt to settle.
        (SubmissionPhase::Idle, SubmissionEvent::Completed(_)) => Transition::unchanged(state),
    }
}
