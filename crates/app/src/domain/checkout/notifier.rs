//! Checkout notifications.

use mockall::automock;
use tracing::{error, info, warn};

use checkout::orders::OrderId;

/// Receives the toasts and navigation a checkout attempt produces.
#[automock]
pub trait CheckoutNotifier: Send + Sync {
    /// The order was placed.
    fn success(&self, message: &str);

    /// The attempt failed.
    fn failure(&self, message: &str);

    /// The order was placed but a follow-up step failed.
    fn warning(&self, message: &str);

    /// Move to the confirmation view for `order_id`.
    fn show_confirmation(&self, order_id: OrderId);
}

/// Notifier that only writes log events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl CheckoutNotifier for TracingNotifier {
    fn success(&self, message: &str) {
        info!(message, "checkout succeeded");
    }

    fn failure(&self, message: &str) {
        error!(message, "checkout failed");
    }

    fn warning(&self, message: &str) {
        warn!(message, "checkout warning");
    }

    fn show_confirmation(&self, order_id: OrderId) {
        info!(%order_id, "showing order confirmation");
    }
}
