//! Submission State

use thiserror::Error;

use crate::orders::OrderId;

/// Where a checkout submission attempt stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    /// Waiting for the shopper to submit.
    #[default]
    Idle,

    /// Checking the shipping form.
    Validating,

    /// The order is being sent to the backend.
    Submitting,

    /// The backend accepted the order; nothing more can be submitted.
    Confirmed(OrderId),
}

/// Something that happened during a submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionEvent {
    /// The shopper pressed the submit control.
    Begin,

    /// Validation failed.
    Reject,

    /// Validation passed and the order is being sent.
    Submit,

    /// The backend accepted the order.
    Confirm(OrderId),

    /// The backend request failed.
    Fail,
}

/// Errors raised for transitions the state machine does not allow.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionError {
    /// A submission is already being validated or sent.
    #[error("Your order is already being placed")]
    InProgress,

    /// The order has already been placed.
    #[error("Order {0} has already been placed")]
    AlreadyConfirmed(OrderId),

    /// Any other transition that makes no sense.
    #[error("cannot apply {event:?} while {state:?}")]
    InvalidTransition {
        /// State the event arrived in
        state: SubmissionState,
        /// Event that was rejected
        event: SubmissionEvent,
    },
}

impl SubmissionState {
    /// Apply `event`, returning the next state.
    ///
    /// # Errors
    ///
    /// - [`SubmissionError::InProgress`]: `Begin` while validating or submitting.
    /// - [`SubmissionError::AlreadyConfirmed`]: any event after confirmation.
    /// - [`SubmissionError::InvalidTransition`]: an event out of sequence.
    pub fn on(self, event: SubmissionEvent) -> Result<Self, SubmissionError> {
        match (self, event) {
            (SubmissionState::Confirmed(order_id), _) => {
                Err(SubmissionError::AlreadyConfirmed(order_id))
            }
            (SubmissionState::Idle, SubmissionEvent::Begin) => Ok(SubmissionState::Validating),
            (SubmissionState::Validating | SubmissionState::Submitting, SubmissionEvent::Begin) => {
                Err(SubmissionError::InProgress)
            }
            (SubmissionState::Validating, SubmissionEvent::Reject)
            | (SubmissionState::Submitting, SubmissionEvent::Fail) => Ok(SubmissionState::Idle),
            (SubmissionState::Validating, SubmissionEvent::Submit) => {
                Ok(SubmissionState::Submitting)
            }
            (SubmissionState::Submitting, SubmissionEvent::Confirm(order_id)) => {
                Ok(SubmissionState::Confirmed(order_id))
            }
            (state, event) => Err(SubmissionError::InvalidTransition { state, event }),
        }
    }

    /// Whether the submit control should be disabled.
    pub fn is_busy(self) -> bool {
        matches!(
            self,
            SubmissionState::Validating | SubmissionState::Submitting
        )
    }
}
