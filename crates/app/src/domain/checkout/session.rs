//! Checkout session.

use std::sync::Arc;

use rusty_money::iso::Currency;
use tokio::sync::watch;
use tracing::debug;

use checkout::{
    cart::{CartItem, SessionToken},
    checkout::ShippingForm,
    delivery::{AreaId, CityId, DeliveryQuote, ItemWeight, Resolution, ZoneId},
    orders::{OrderSource, ProductSelection},
    pricing::{PriceSummary, PricingAggregator},
    products::Product,
};

use crate::{
    api::ShippingApi,
    domain::{
        checkout::{errors::CheckoutError, service::CheckoutRequest},
        delivery::DeliveryRateResolver,
    },
};

/// One checkout page: what is being bought, the delivery chain and the
/// running totals.
#[derive(Debug)]
pub struct CheckoutSession {
    source: OrderSource,
    resolver: DeliveryRateResolver,
    pricing: PricingAggregator,
    quotes: watch::Receiver<Option<DeliveryQuote>>,
}

impl CheckoutSession {
    /// Start a session for a cart.
    ///
    /// # Errors
    ///
    /// Returns an error when the cart's totals cannot be computed.
    pub async fn for_cart(
        shipping: Arc<dyn ShippingApi>,
        currency: &'static Currency,
        session_token: SessionToken,
        items: Vec<CartItem>,
    ) -> Result<Self, CheckoutError> {
        let mut pricing = PricingAggregator::new(currency);

        pricing.set_cart_items(&items)?;

        let source = OrderSource::Cart {
            session_token,
            items,
        };

        Ok(Self::start(shipping, source, pricing).await)
    }

    /// Start a session for a single product bought directly.
    ///
    /// # Errors
    ///
    /// Returns an error when the product's totals cannot be computed.
    pub async fn for_product(
        shipping: Arc<dyn ShippingApi>,
        currency: &'static Currency,
        product: Product,
        selection: ProductSelection,
    ) -> Result<Self, CheckoutError> {
        let mut pricing = PricingAggregator::new(currency);

        pricing.set_single(&product, selection.quantity)?;

        let source = OrderSource::Single { product, selection };

        Ok(Self::start(shipping, source, pricing).await)
    }

    async fn start(
        shipping: Arc<dyn ShippingApi>,
        source: OrderSource,
        pricing: PricingAggregator,
    ) -> Self {
        let (sender, quotes) = watch::channel(None);

        let resolver = DeliveryRateResolver::new(shipping).with_listener(Box::new(
            move |quote: Option<&DeliveryQuote>| {
                sender.send_replace(quote.cloned());
            },
        ));

        let mut session = Self {
            source,
            resolver,
            pricing,
            quotes,
        };

        session.update_weight().await;

        session
    }

    /// What is being ordered.
    pub fn source(&self) -> &OrderSource {
        &self.source
    }

    /// The delivery-rate resolver of this session.
    pub fn resolver(&self) -> &DeliveryRateResolver {
        &self.resolver
    }

    /// Current totals.
    pub fn summary(&self) -> &PriceSummary {
        self.pricing.summary()
    }

    /// Delivery quote included in the totals.
    pub fn quote(&self) -> Option<&DeliveryQuote> {
        self.pricing.quote()
    }

    /// Fetch the city list.
    pub async fn load_cities(&mut self) {
        self.resolver.load_cities().await;
    }

    /// Select a city, dropping any delivery charge of the previous one.
    ///
    /// # Errors
    ///
    /// Returns an error when the totals cannot be recomputed.
    pub async fn select_city(&mut self, city: CityId) -> Result<(), CheckoutError> {
        self.resolver.select_city(city).await;

        self.sync_quote()
    }

    /// Select a zone of the current city.
    ///
    /// # Errors
    ///
    /// Returns an error when no city is selected.
    pub async fn select_zone(&mut self, zone: ZoneId) -> Result<(), CheckoutError> {
        self.resolver.select_zone(zone).await?;

        self.sync_quote()
    }

    /// Select an area of the current zone.
    ///
    /// # Errors
    ///
    /// Returns an error when no zone is selected.
    pub async fn select_area(&mut self, area: AreaId) -> Result<(), CheckoutError> {
        self.resolver.select_area(area).await?;

        self.sync_quote()
    }

    /// Select a full location and wait for its delivery quote.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::Selection`]: a location was chosen out of order.
    /// - [`CheckoutError::DeliveryUnavailable`]: no price could be resolved.
    pub async fn choose_location(
        &mut self,
        city: CityId,
        zone: ZoneId,
        area: AreaId,
    ) -> Result<&DeliveryQuote, CheckoutError> {
        self.select_city(city).await?;
        self.select_zone(zone).await?;
        self.select_area(area).await?;

        match self.resolver.chain().quote_resolution() {
            Resolution::Ready(_) => self.quote().ok_or(CheckoutError::DeliveryUnavailable),
            Resolution::Unrequested | Resolution::Pending | Resolution::Failed => {
                Err(CheckoutError::DeliveryUnavailable)
            }
        }
    }

    /// Replace the cart items after the cart changed, re-pricing the parcel.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::ModeMismatch`]: this is a buy-now checkout.
    /// - [`CheckoutError::Pricing`]: the new totals are invalid; nothing changes.
    pub async fn set_items(&mut self, items: Vec<CartItem>) -> Result<(), CheckoutError> {
        let OrderSource::Cart { items: current, .. } = &mut self.source else {
            return Err(CheckoutError::ModeMismatch);
        };

        self.pricing.set_cart_items(&items)?;
        *current = items;

        self.update_weight().await;
        self.sync_quote()
    }

    /// Change the buy-now quantity, re-pricing the parcel.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::ModeMismatch`]: this is a cart checkout.
    /// - [`CheckoutError::Pricing`]: the new totals are invalid; nothing changes.
    pub async fn set_quantity(&mut self, quantity: u32) -> Result<(), CheckoutError> {
        let OrderSource::Single { product, selection } = &mut self.source else {
            return Err(CheckoutError::ModeMismatch);
        };

        self.pricing.set_single(product, quantity)?;
        selection.quantity = quantity;

        self.update_weight().await;
        self.sync_quote()
    }

    /// Build a submission request from the shipping form.
    pub fn request(&self, form: ShippingForm) -> CheckoutRequest {
        CheckoutRequest {
            form,
            source: self.source.clone(),
            quote: self.pricing.quote().cloned(),
        }
    }

    async fn update_weight(&mut self) {
        let weight = ItemWeight::for_quantity(self.source.total_quantity());

        self.resolver.set_weight(weight).await;
    }

    fn sync_quote(&mut self) -> Result<(), CheckoutError> {
        if !self.quotes.has_changed().unwrap_or(false) {
            return Ok(());
        }

        let quote = self.quotes.borrow_and_update().clone();

        debug!(
            delivery = ?quote.as_ref().map(|quote| quote.final_price),
            "delivery quote changed"
        );

        self.pricing.set_quote(quote)?;

        Ok(())
    }
}
