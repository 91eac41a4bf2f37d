//! Checkout errors

use thiserror::Error;

use checkout::{
    checkout::{SubmissionError, ValidationError},
    delivery::SelectionError,
    orders::OrderError,
    pricing::PricingError,
};

use crate::{api::ApiError, domain::carts::CartServiceError};

/// Shown for every failure the shopper cannot fix themselves.
pub const GENERIC_FAILURE: &str = "Something went wrong while placing your order. Please try again.";

/// Errors raised during a checkout session or a submission attempt.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The shipping form is incomplete or invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The order record could not be assembled.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// The attempt is not allowed in the current submission state.
    #[error(transparent)]
    State(#[from] SubmissionError),

    /// The backend rejected or never received the order.
    #[error("order submission failed")]
    Submission(#[source] ApiError),

    /// Totals could not be computed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Cart contents could not be loaded or changed.
    #[error(transparent)]
    Cart(#[from] CartServiceError),

    /// A location was chosen out of order.
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// No delivery price could be resolved for the chosen location.
    #[error("delivery is unavailable for the selected location")]
    DeliveryUnavailable,

    /// Cart items changed on a buy-now checkout, or the other way round.
    #[error("the change does not apply to this kind of checkout")]
    ModeMismatch,
}

impl CheckoutError {
    /// Message to show the shopper.
    pub fn user_message(&self) -> String {
        match self {
            CheckoutError::Validation(error) => error.to_string(),
            CheckoutError::State(error) => error.to_string(),
            CheckoutError::Order(OrderError::Pricing(_))
            | CheckoutError::Pricing(_)
            | CheckoutError::Submission(_)
            | CheckoutError::ModeMismatch
            | CheckoutError::Cart(CartServiceError::Api(_)) => GENERIC_FAILURE.to_string(),
            CheckoutError::Order(error) => error.to_string(),
            CheckoutError::Cart(CartServiceError::Stock(error)) => error.to_string(),
            CheckoutError::Selection(error) => error.to_string(),
            CheckoutError::DeliveryUnavailable => {
                "Delivery charge is unavailable for this location. Please choose another area."
                    .to_string()
            }
        }
    }
}
