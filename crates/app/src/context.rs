//! App Context

use std::sync::Arc;

use rusty_money::iso::{self, Currency};
use thiserror::Error;

use crate::{
    api::{ApiError, HttpStorefront, ShippingApi, StorefrontApi},
    config::ApiConfig,
    domain::{
        carts::CartsService,
        checkout::{CheckoutNotifier, CheckoutService, TracingNotifier},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to build HTTP client")]
    Http(#[source] ApiError),

    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Backend clients and services shared by every command.
#[derive(Clone)]
pub struct AppContext {
    pub storefront: Arc<dyn StorefrontApi>,
    pub shipping: Arc<dyn ShippingApi>,
    pub carts: CartsService,
    pub currency: &'static Currency,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("currency", &self.currency.iso_alpha_code)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build application context from backend settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built or the currency
    /// code is unknown.
    pub fn from_config(config: &ApiConfig) -> Result<Self, AppInitError> {
        let currency = iso::find(&config.currency)
            .ok_or_else(|| AppInitError::UnknownCurrency(config.currency.clone()))?;

        let client = Arc::new(HttpStorefront::new(config).map_err(AppInitError::Http)?);

        Ok(Self {
            storefront: client.clone(),
            shipping: client.clone(),
            carts: CartsService::new(client),
            currency,
        })
    }

    /// A checkout service for one order, reporting through the log.
    #[must_use]
    pub fn checkout_service(&self) -> CheckoutService {
        let notifier: Arc<dyn CheckoutNotifier> = Arc::new(TracingNotifier);

        CheckoutService::new(self.storefront.clone(), notifier, self.currency)
    }
}
