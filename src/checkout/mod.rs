//! Checkout
//!
//! Shipping-form validation and the per-attempt submission state machine.

pub mod state;
pub mod validation;

pub use state::{SubmissionError, SubmissionEvent, SubmissionState};
pub use validation::{ShippingDetails, ShippingForm, ValidatedCheckout, ValidationError};
