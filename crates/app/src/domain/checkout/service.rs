//! Checkout service.

use std::sync::{Arc, Mutex, PoisonError};

use jiff::{Zoned, civil::Date};
use rand::{SeedableRng, rngs::StdRng};
use rusty_money::iso::Currency;
use tracing::{error, info, warn};

use checkout::{
    checkout::{ShippingForm, SubmissionEvent, SubmissionState},
    delivery::DeliveryQuote,
    orders::{OrderId, OrderRecord, OrderSource},
};

use crate::{
    api::{OrderAck, StorefrontApi},
    domain::checkout::{errors::CheckoutError, notifier::CheckoutNotifier},
};

const ORDER_PLACED: &str = "Order placed successfully";
const CART_NOT_CLEARED: &str = "Your order was placed, but your cart could not be cleared";

/// Everything a submission attempt needs.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    /// Shipping form as entered
    pub form: ShippingForm,

    /// Cart or single product being ordered
    pub source: OrderSource,

    /// Delivery quote resolved for the chosen location
    pub quote: Option<DeliveryQuote>,
}

/// Result of a confirmed order.
#[derive(Debug, Clone)]
pub struct OrderConfirmation {
    /// Generated order number
    pub order_id: OrderId,

    /// The record that was submitted
    pub record: OrderRecord,

    /// Backend acknowledgment
    pub ack: OrderAck,

    /// Whether the cart was cleared; always `false` for buy-now orders
    pub cart_cleared: bool,
}

/// Validates, assembles and submits orders, one confirmed order per service.
pub struct CheckoutService {
    api: Arc<dyn StorefrontApi>,
    notifier: Arc<dyn CheckoutNotifier>,
    currency: &'static Currency,
    state: Mutex<SubmissionState>,
    rng: Mutex<StdRng>,
}

impl std::fmt::Debug for CheckoutService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutService")
            .field("currency", &self.currency.iso_alpha_code)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl CheckoutService {
    /// Create a service drawing order ids from system entropy.
    #[must_use]
    pub fn new(
        api: Arc<dyn StorefrontApi>,
        notifier: Arc<dyn CheckoutNotifier>,
        currency: &'static Currency,
    ) -> Self {
        Self::with_rng(api, notifier, currency, StdRng::from_entropy())
    }

    /// Create a service drawing order ids from `rng`.
    #[must_use]
    pub fn with_rng(
        api: Arc<dyn StorefrontApi>,
        notifier: Arc<dyn CheckoutNotifier>,
        currency: &'static Currency,
        rng: StdRng,
    ) -> Self {
        Self {
            api,
            notifier,
            currency,
            state: Mutex::new(SubmissionState::Idle),
            rng: Mutex::new(rng),
        }
    }

    /// Current submission state.
    pub fn state(&self) -> SubmissionState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Place an order dated today in the system time zone.
    ///
    /// # Errors
    ///
    /// See [`CheckoutService::place_order_on`].
    pub async fn place_order(
        &self,
        request: CheckoutRequest,
    ) -> Result<OrderConfirmation, CheckoutError> {
        self.place_order_on(request, Zoned::now().date()).await
    }

    /// Validate, assemble and submit an order dated `today`.
    ///
    /// Every failure is reported to the notifier and returns the service to
    /// idle, except once an order is confirmed.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::State`]: a submission is in flight or already confirmed.
    /// - [`CheckoutError::Validation`]: the form or delivery quote is invalid.
    /// - [`CheckoutError::Order`]: the record could not be assembled.
    /// - [`CheckoutError::Submission`]: the backend request failed.
    #[tracing::instrument(skip_all, err)]
    pub async fn place_order_on(
        &self,
        request: CheckoutRequest,
        today: Date,
    ) -> Result<OrderConfirmation, CheckoutError> {
        let result = self.attempt(request, today).await;

        if let Err(error) = &result {
            self.notifier.failure(&error.user_message());
        }

        result
    }

    async fn attempt(
        &self,
        request: CheckoutRequest,
        today: Date,
    ) -> Result<OrderConfirmation, CheckoutError> {
        self.transition(SubmissionEvent::Begin)?;

        let record = match self.assemble(request.form, &request.source, request.quote, today) {
            Ok(record) => record,
            Err(error) => {
                self.transition(SubmissionEvent::Reject)?;

                return Err(error);
            }
        };

        self.transition(SubmissionEvent::Submit)?;

        let ack = match self.api.create_order(&record).await {
            Ok(ack) => ack,
            Err(api_error) => {
                error!(error = %api_error, order_id = %record.order_id, "order submission failed");

                self.transition(SubmissionEvent::Fail)?;

                return Err(CheckoutError::Submission(api_error));
            }
        };

        let order_id = record.order_id;

        self.transition(SubmissionEvent::Confirm(order_id))?;

        info!(%order_id, total = %record.total, "order placed");

        self.notifier.success(ORDER_PLACED);
        self.notifier.show_confirmation(order_id);

        let cart_cleared = match request.source.session_token() {
            Some(session) => match self.api.clear_cart(session).await {
                Ok(()) => true,
                Err(error) => {
                    warn!(%error, %order_id, "failed to clear cart after order");

                    self.notifier.warning(CART_NOT_CLEARED);

                    false
                }
            },
            None => false,
        };

        Ok(OrderConfirmation {
            order_id,
            record,
            ack,
            cart_cleared,
        })
    }

    fn assemble(
        &self,
        form: ShippingForm,
        source: &OrderSource,
        quote: Option<DeliveryQuote>,
        today: Date,
    ) -> Result<OrderRecord, CheckoutError> {
        let checkout = form.validate(quote.as_ref())?;
        let order_id = self.next_order_id();

        Ok(OrderRecord::assemble(
            order_id,
            checkout,
            source,
            self.currency,
            today,
        )?)
    }

    fn next_order_id(&self) -> OrderId {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        OrderId::generate(&mut *rng)
    }

    fn transition(&self, event: SubmissionEvent) -> Result<SubmissionState, CheckoutError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let next = state.on(event)?;

        *state = next;

        Ok(next)
    }
}
