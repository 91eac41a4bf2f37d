//! Delivery-rate resolver.

use std::{fmt, sync::Arc};

use tracing::{debug, warn};

use checkout::delivery::{
    AreaId, CityId, DeliveryChain, DeliveryQuote, FetchRequest, ItemWeight, Outcome,
    SelectionError, ZoneId,
};

use crate::api::{PriceRequest, ShippingApi};

/// Callback receiving each distinct quote, or `None` once a reported quote
/// is invalidated.
pub type QuoteListener = Box<dyn FnMut(Option<&DeliveryQuote>) + Send>;

/// Drives a [`DeliveryChain`] against the shipping API.
pub struct DeliveryRateResolver {
    api: Arc<dyn ShippingApi>,
    chain: DeliveryChain,
    listener: Option<QuoteListener>,
}

impl fmt::Debug for DeliveryRateResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliveryRateResolver")
            .field("chain", &self.chain)
            .field("listener", &self.listener.is_some())
            .finish_non_exhaustive()
    }
}

impl DeliveryRateResolver {
    /// Create a resolver with an empty chain and no listener.
    #[must_use]
    pub fn new(api: Arc<dyn ShippingApi>) -> Self {
        Self {
            api,
            chain: DeliveryChain::new(),
            listener: None,
        }
    }

    /// Register the quote listener, replacing any previous one.
    #[must_use]
    pub fn with_listener(mut self, listener: QuoteListener) -> Self {
        self.listener = Some(listener);
        self
    }

    /// The underlying selection chain.
    pub fn chain(&self) -> &DeliveryChain {
        &self.chain
    }

    /// The resolved quote for the current selection.
    pub fn quote(&self) -> Option<&DeliveryQuote> {
        self.chain.quote()
    }

    /// Fetch the city list.
    pub async fn load_cities(&mut self) {
        let request = self.chain.load_cities();

        self.fetch(request).await;
    }

    /// Select a city and fetch its zones.
    pub async fn select_city(&mut self, city: CityId) {
        let request = self.chain.select_city(city);

        self.run(request).await;
    }

    /// Select a zone and fetch its areas.
    ///
    /// # Errors
    ///
    /// Returns an error when no city is selected.
    pub async fn select_zone(&mut self, zone: ZoneId) -> Result<(), SelectionError> {
        let request = self.chain.select_zone(zone)?;

        self.run(request).await;

        Ok(())
    }

    /// Select an area, fetching a price once the weight is known.
    ///
    /// # Errors
    ///
    /// Returns an error when no zone is selected.
    pub async fn select_area(&mut self, area: AreaId) -> Result<(), SelectionError> {
        let request = self.chain.select_area(area)?;

        self.run(request).await;

        Ok(())
    }

    /// Supply the parcel weight, fetching a price once the location is complete.
    pub async fn set_weight(&mut self, weight: ItemWeight) {
        let request = self.chain.set_weight(weight);

        self.run(request).await;
    }

    async fn run(&mut self, request: Option<FetchRequest>) {
        if let Some(request) = request {
            self.fetch(request).await;
        }

        self.notify();
    }

    #[tracing::instrument(skip(self))]
    async fn fetch(&mut self, request: FetchRequest) {
        let outcome = match request {
            FetchRequest::Cities => {
                let cities = self
                    .api
                    .cities()
                    .await
                    .inspect_err(|error| warn!(%error, "failed to load cities"))
                    .ok();

                self.chain.resolve_cities(cities)
            }
            FetchRequest::Zones(city) => {
                let zones = self
                    .api
                    .zones(city)
                    .await
                    .inspect_err(|error| warn!(%error, %city, "failed to load zones"))
                    .ok();

                self.chain.resolve_zones(city, zones)
            }
            FetchRequest::Areas(zone) => {
                let areas = self
                    .api
                    .areas(zone)
                    .await
                    .inspect_err(|error| warn!(%error, %zone, "failed to load areas"))
                    .ok();

                self.chain.resolve_areas(zone, areas)
            }
            FetchRequest::Price(key) => {
                let price = self
                    .api
                    .price(PriceRequest::from(&key))
                    .await
                    .inspect_err(|error| warn!(%error, "failed to calculate delivery price"))
                    .ok();

                self.chain.resolve_price(&key, price)
            }
        };

        if outcome == Outcome::Discarded {
            debug!("discarded superseded result");
        }
    }

    fn notify(&mut self) {
        let Some(change) = self.chain.take_quote_change() else {
            return;
        };

        if let Some(listener) = self.listener.as_mut() {
            listener(change.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use mockall::predicate::eq;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use checkout::delivery::{CityOption, QuotedPrice, Resolution};

    use crate::api::{ApiError, MockShippingApi};

    use super::*;

    const C1: CityId = CityId::new(1);
    const C2: CityId = CityId::new(2);
    const Z1: ZoneId = ZoneId::new(11);
    const Z2: ZoneId = ZoneId::new(12);
    const A1: AreaId = AreaId::new(101);

    fn reported(seen: &Seen) -> Vec<Option<Decimal>> {
        seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }

    fn sixty() -> QuotedPrice {
        QuotedPrice {
            final_price: Decimal::from(60),
            discount: None,
        }
    }

    fn locations(api: &mut MockShippingApi) {
        api.expect_zones().returning(|_| Ok(Vec::new()));
        api.expect_areas().returning(|_| Ok(Vec::new()));
    }

    type Seen = Arc<Mutex<Vec<Option<Decimal>>>>;

    fn recording(resolver: DeliveryRateResolver) -> (DeliveryRateResolver, Seen) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let resolver = resolver.with_listener(Box::new(move |quote: Option<&DeliveryQuote>| {
            if let Ok(mut seen) = sink.lock() {
                seen.push(quote.map(|quote| quote.final_price));
            }
        }));

        (resolver, seen)
    }

    #[tokio::test]
    async fn no_price_request_until_area_and_weight_are_known() -> TestResult {
        let mut api = MockShippingApi::new();

        locations(&mut api);
        api.expect_price().never();

        let mut resolver = DeliveryRateResolver::new(Arc::new(api));

        resolver.select_city(C1).await;
        resolver.select_zone(Z1).await?;
        resolver.select_area(A1).await?;

        assert_eq!(resolver.chain().quote_resolution(), &Resolution::Unrequested);

        Ok(())
    }

    #[tokio::test]
    async fn full_selection_requests_price_once() -> TestResult {
        let mut api = MockShippingApi::new();

        locations(&mut api);
        api.expect_price()
            .with(eq(PriceRequest {
                item_weight: Decimal::new(5, 1),
                recipient_city: C1,
                recipient_zone: Z1,
            }))
            .times(1)
            .returning(|_| Ok(sixty()));

        let (mut resolver, seen) = recording(DeliveryRateResolver::new(Arc::new(api)));

        resolver.set_weight(ItemWeight::for_quantity(1)).await;
        resolver.select_city(C1).await;
        resolver.select_zone(Z1).await?;
        resolver.select_area(A1).await?;
        resolver.select_area(A1).await?;

        assert_eq!(resolver.quote().map(|quote| quote.area), Some(A1));
        assert_eq!(reported(&seen), vec![Some(Decimal::from(60))]);

        Ok(())
    }

    #[tokio::test]
    async fn zone_change_clears_quote_and_reports_it_once() -> TestResult {
        let mut api = MockShippingApi::new();

        locations(&mut api);
        api.expect_price().times(1).returning(|_| Ok(sixty()));

        let (mut resolver, seen) = recording(DeliveryRateResolver::new(Arc::new(api)));

        resolver.set_weight(ItemWeight::for_quantity(1)).await;
        resolver.select_city(C1).await;
        resolver.select_zone(Z1).await?;
        resolver.select_area(A1).await?;
        resolver.select_zone(Z2).await?;

        assert_eq!(resolver.chain().selection().area(), None);
        assert!(resolver.quote().is_none());
        assert_eq!(reported(&seen), vec![Some(Decimal::from(60)), None]);

        Ok(())
    }

    #[tokio::test]
    async fn city_change_clears_zone_area_and_quote() -> TestResult {
        let mut api = MockShippingApi::new();

        locations(&mut api);
        api.expect_price().returning(|_| Ok(sixty()));

        let mut resolver = DeliveryRateResolver::new(Arc::new(api));

        resolver.set_weight(ItemWeight::for_quantity(2)).await;
        resolver.select_city(C1).await;
        resolver.select_zone(Z1).await?;
        resolver.select_area(A1).await?;
        resolver.select_city(C2).await;

        let selection = resolver.chain().selection();

        assert_eq!(selection.city(), Some(C2));
        assert_eq!(selection.zone(), None);
        assert_eq!(selection.area(), None);
        assert!(resolver.quote().is_none());

        Ok(())
    }

    #[tokio::test]
    async fn failed_price_leaves_chain_unresolved() -> TestResult {
        let mut api = MockShippingApi::new();

        locations(&mut api);
        api.expect_price()
            .returning(|_| Err(ApiError::UnexpectedResponse("timeout".to_string())));

        let (mut resolver, seen) = recording(DeliveryRateResolver::new(Arc::new(api)));

        resolver.set_weight(ItemWeight::for_quantity(1)).await;
        resolver.select_city(C1).await;
        resolver.select_zone(Z1).await?;
        resolver.select_area(A1).await?;

        assert_eq!(resolver.chain().quote_resolution(), &Resolution::Failed);
        assert!(reported(&seen).is_empty(), "no quote should be reported");

        Ok(())
    }

    #[tokio::test]
    async fn reselecting_the_area_retries_a_failed_price() -> TestResult {
        let mut api = MockShippingApi::new();
        let mut calls = 0;

        locations(&mut api);
        api.expect_price().times(2).returning(move |_| {
            calls += 1;

            if calls == 1 {
                Err(ApiError::UnexpectedResponse("timeout".to_string()))
            } else {
                Ok(sixty())
            }
        });

        let (mut resolver, seen) = recording(DeliveryRateResolver::new(Arc::new(api)));

        resolver.set_weight(ItemWeight::for_quantity(1)).await;
        resolver.select_city(C1).await;
        resolver.select_zone(Z1).await?;
        resolver.select_area(A1).await?;

        assert_eq!(resolver.chain().quote_resolution(), &Resolution::Failed);

        resolver.select_area(A1).await?;

        assert_eq!(
            resolver.quote().map(|quote| quote.final_price),
            Some(Decimal::from(60))
        );
        assert_eq!(reported(&seen), vec![Some(Decimal::from(60))]);

        Ok(())
    }

    #[tokio::test]
    async fn zone_before_city_is_rejected_without_fetching() {
        let mut api = MockShippingApi::new();

        api.expect_areas().never();

        let mut resolver = DeliveryRateResolver::new(Arc::new(api));

        assert_eq!(
            resolver.select_zone(Z1).await,
            Err(SelectionError::CityNotSelected)
        );
    }

    #[tokio::test]
    async fn loads_the_city_list() {
        let mut api = MockShippingApi::new();

        api.expect_cities().times(1).returning(|| {
            Ok(vec![CityOption {
                id: C1,
                name: "Dhaka".to_string(),
            }])
        });

        let mut resolver = DeliveryRateResolver::new(Arc::new(api));

        resolver.load_cities().await;

        assert_eq!(
            resolver.chain().cities().ready().map(Vec::len),
            Some(1),
            "city list should be ready"
        );
    }
}
