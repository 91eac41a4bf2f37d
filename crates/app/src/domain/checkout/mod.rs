//! Checkout
//!
//! Checkout sessions, order submission and the notifications they raise.

pub mod errors;
pub mod notifier;
pub mod service;
pub mod session;

pub use errors::CheckoutError;
pub use notifier::{CheckoutNotifier, TracingNotifier};
pub use service::{CheckoutRequest, CheckoutService, OrderConfirmation};
pub use session::CheckoutSession;
