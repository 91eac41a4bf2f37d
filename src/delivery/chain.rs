//! Delivery Chain
//!
//! State machine behind the delivery-rate resolver. Every selection change
//! returns the fetch it makes necessary, if any; every fetch result comes
//! back tagged with the key it was issued for and is dropped when that key
//! no longer matches the current selection.

use rust_decimal::Decimal;
use thiserror::Error;

use super::{
    AreaId, AreaOption, CityId, CityOption, DeliveryQuote, ItemWeight, QuotedPrice, ZoneId,
    ZoneOption,
};

/// Errors raised when a selection is made out of order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// A zone was chosen before a city.
    #[error("Please select a city first")]
    CityNotSelected,

    /// An area was chosen before a zone.
    #[error("Please select a zone first")]
    ZoneNotSelected,
}

/// Progress of one dependent fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Resolution<T> {
    /// Nothing requested, usually because the parent is not selected.
    #[default]
    Unrequested,

    /// Requested, waiting for the response.
    Pending,

    /// Resolved for the current parent.
    Ready(T),

    /// The request failed; the step stays unresolved.
    Failed,
}

impl<T> Resolution<T> {
    /// The resolved value, if any.
    pub fn ready(&self) -> Option<&T> {
        match self {
            Resolution::Ready(value) => Some(value),
            Resolution::Unrequested | Resolution::Pending | Resolution::Failed => None,
        }
    }

    /// Whether a request is in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self, Resolution::Pending)
    }

    /// Whether the last request for this step failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Resolution::Failed)
    }
}

/// Everything a price request depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PriceKey {
    /// Selected city
    pub city: CityId,

    /// Selected zone
    pub zone: ZoneId,

    /// Selected area
    pub area: AreaId,

    /// Parcel weight
    pub weight: ItemWeight,
}

/// A fetch the caller has to issue against the shipping-rate provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchRequest {
    /// List all cities.
    Cities,

    /// List the zones of a city.
    Zones(CityId),

    /// List the areas of a zone.
    Areas(ZoneId),

    /// Compute a delivery price.
    Price(PriceKey),
}

/// Whether a fetch result was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The result matched the current selection and was stored.
    Applied,

    /// The selection moved on while the request was in flight.
    Discarded,
}

/// The city, zone, area and weight chosen so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeliverySelection {
    city: Option<CityId>,
    zone: Option<ZoneId>,
    area: Option<AreaId>,
    weight: Option<ItemWeight>,
}

impl DeliverySelection {
    /// Selected city
    pub fn city(&self) -> Option<CityId> {
        self.city
    }

    /// Selected zone
    pub fn zone(&self) -> Option<ZoneId> {
        self.zone
    }

    /// Selected area
    pub fn area(&self) -> Option<AreaId> {
        self.area
    }

    /// Parcel weight supplied by the caller
    pub fn weight(&self) -> Option<ItemWeight> {
        self.weight
    }

    /// The price key, once city, zone, area and weight are all present.
    pub fn price_key(&self) -> Option<PriceKey> {
        Some(PriceKey {
            city: self.city?,
            zone: self.zone?,
            area: self.area?,
            weight: self.weight?,
        })
    }
}

/// Dependent city → zone → area → price selection chain.
#[derive(Debug, Clone, Default)]
pub struct DeliveryChain {
    selection: DeliverySelection,
    cities: Resolution<Vec<CityOption>>,
    zones: Resolution<Vec<ZoneOption>>,
    areas: Resolution<Vec<AreaOption>>,
    quote: Resolution<DeliveryQuote>,
    reported: Option<DeliveryQuote>,
}

impl DeliveryChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current selection.
    pub fn selection(&self) -> &DeliverySelection {
        &self.selection
    }

    /// City options.
    pub fn cities(&self) -> &Resolution<Vec<CityOption>> {
        &self.cities
    }

    /// Zone options for the selected city.
    pub fn zones(&self) -> &Resolution<Vec<ZoneOption>> {
        &self.zones
    }

    /// Area options for the selected zone.
    pub fn areas(&self) -> &Resolution<Vec<AreaOption>> {
        &self.areas
    }

    /// Quote state for the current selection.
    pub fn quote_resolution(&self) -> &Resolution<DeliveryQuote> {
        &self.quote
    }

    /// The quote for the current selection, once resolved.
    pub fn quote(&self) -> Option<&DeliveryQuote> {
        self.quote.ready()
    }

    /// Start loading the city list.
    pub fn load_cities(&mut self) -> FetchRequest {
        self.cities = Resolution::Pending;

        FetchRequest::Cities
    }

    /// Select a city, clearing zone, area and quote.
    ///
    /// Re-selecting the current city changes nothing, unless its zones
    /// failed to load, in which case they are requested again.
    pub fn select_city(&mut self, city: CityId) -> Option<FetchRequest> {
        if self.selection.city == Some(city) {
            if !self.zones.is_failed() {
                return None;
            }

            self.zones = Resolution::Pending;

            return Some(FetchRequest::Zones(city));
        }

        self.selection.city = Some(city);
        self.selection.zone = None;
        self.selection.area = None;
        self.zones = Resolution::Pending;
        self.areas = Resolution::Unrequested;
        self.quote = Resolution::Unrequested;

        Some(FetchRequest::Zones(city))
    }

    /// Select a zone of the current city, clearing area and quote.
    ///
    /// Re-selecting the current zone retries its areas if they failed.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::CityNotSelected`] when no city is selected.
    pub fn select_zone(&mut self, zone: ZoneId) -> Result<Option<FetchRequest>, SelectionError> {
        if self.selection.city.is_none() {
            return Err(SelectionError::CityNotSelected);
        }

        if self.selection.zone == Some(zone) {
            if !self.areas.is_failed() {
                return Ok(None);
            }

            self.areas = Resolution::Pending;

            return Ok(Some(FetchRequest::Areas(zone)));
        }

        self.selection.zone = Some(zone);
        self.selection.area = None;
        self.areas = Resolution::Pending;
        self.quote = Resolution::Unrequested;

        Ok(Some(FetchRequest::Areas(zone)))
    }

    /// Select an area of the current zone.
    ///
    /// Returns a price request when a weight is already known. Re-selecting
    /// the current area retries a failed price.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::ZoneNotSelected`] when no zone is selected.
    pub fn select_area(&mut self, area: AreaId) -> Result<Option<FetchRequest>, SelectionError> {
        if self.selection.zone.is_none() {
            return Err(SelectionError::ZoneNotSelected);
        }

        if self.selection.area == Some(area) && !self.quote.is_failed() {
            return Ok(None);
        }

        self.selection.area = Some(area);

        Ok(self.request_price())
    }

    /// Supply the parcel weight.
    ///
    /// Returns a price request when city, zone and area are already selected.
    pub fn set_weight(&mut self, weight: ItemWeight) -> Option<FetchRequest> {
        if self.selection.weight == Some(weight) {
            return None;
        }

        self.selection.weight = Some(weight);

        self.request_price()
    }

    /// Store the city list, or mark it failed when `cities` is `None`.
    pub fn resolve_cities(&mut self, cities: Option<Vec<CityOption>>) -> Outcome {
        if !self.cities.is_pending() {
            return Outcome::Discarded;
        }

        self.cities = cities.map_or(Resolution::Failed, Resolution::Ready);

        Outcome::Applied
    }

    /// Store the zones fetched for `city`, or mark them failed when `zones` is `None`.
    pub fn resolve_zones(&mut self, city: CityId, zones: Option<Vec<ZoneOption>>) -> Outcome {
        if self.selection.city != Some(city) || !self.zones.is_pending() {
            return Outcome::Discarded;
        }

        self.zones = zones.map_or(Resolution::Failed, Resolution::Ready);

        Outcome::Applied
    }

    /// Store the areas fetched for `zone`, or mark them failed when `areas` is `None`.
    pub fn resolve_areas(&mut self, zone: ZoneId, areas: Option<Vec<AreaOption>>) -> Outcome {
        if self.selection.zone != Some(zone) || !self.areas.is_pending() {
            return Outcome::Discarded;
        }

        self.areas = areas.map_or(Resolution::Failed, Resolution::Ready);

        Outcome::Applied
    }

    /// Store the price computed for `key`, or mark it failed when `price` is `None`.
    ///
    /// A negative price is treated as a failed request.
    pub fn resolve_price(&mut self, key: &PriceKey, price: Option<QuotedPrice>) -> Outcome {
        if self.selection.price_key().as_ref() != Some(key) || !self.quote.is_pending() {
            return Outcome::Discarded;
        }

        self.quote = match price {
            Some(price) if price.final_price >= Decimal::ZERO => Resolution::Ready(DeliveryQuote {
                final_price: price.final_price,
                discount: price.discount,
                city: key.city,
                zone: key.zone,
                area: key.area,
            }),
            Some(_) | None => Resolution::Failed,
        };

        Outcome::Applied
    }

    /// The quote change to report since the last call, if any.
    ///
    /// Yields `Some(Some(quote))` for a newly resolved distinct quote and
    /// `Some(None)` once when a reported quote has been invalidated.
    pub fn take_quote_change(&mut self) -> Option<Option<DeliveryQuote>> {
        let current = self.quote.ready().cloned();

        if current == self.reported {
            return None;
        }

        self.reported.clone_from(&current);

        Some(current)
    }

    fn request_price(&mut self) -> Option<FetchRequest> {
        match self.selection.price_key() {
            Some(key) => {
                self.quote = Resolution::Pending;

                Some(FetchRequest::Price(key))
            }
            None => {
                self.quote = Resolution::Unrequested;

                None
            }
        }
    }
}
