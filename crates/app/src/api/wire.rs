//! Wire formats of the shipping-rate proxy and order acknowledgments.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use checkout::delivery::{
    AreaId, AreaOption, CityId, CityOption, LocationOption, PriceKey, QuotedPrice, ZoneId,
    ZoneOption,
};

/// Body of `POST /pathao/calculate-price`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceRequest {
    /// Parcel weight in kilograms
    #[serde(with = "rust_decimal::serde::float")]
    pub item_weight: Decimal,

    /// Recipient city
    pub recipient_city: CityId,

    /// Recipient zone
    pub recipient_zone: ZoneId,
}

impl From<&PriceKey> for PriceRequest {
    fn from(key: &PriceKey) -> Self {
        Self {
            item_weight: key.weight.kg(),
            recipient_city: key.city,
            recipient_zone: key.zone,
        }
    }
}

/// Response of `POST /orders`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OrderAck {
    /// Whether the backend acknowledged the write
    #[serde(default)]
    pub acknowledged: Option<bool>,

    /// Identifier of the stored order document
    #[serde(default, alias = "insertedId")]
    pub inserted_id: Option<String>,
}

/// Option list, bare or wrapped in one or two `data` envelopes.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OptionList<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
    Nested { data: Inner<T> },
}

#[derive(Debug, Deserialize)]
pub(crate) struct Inner<T> {
    data: Vec<T>,
}

impl<T> OptionList<T> {
    pub(crate) fn into_options<K>(self) -> Vec<LocationOption<K>>
    where
        T: Into<LocationOption<K>>,
    {
        let raw = match self {
            OptionList::Bare(raw) | OptionList::Wrapped { data: raw } => raw,
            OptionList::Nested { data } => data.data,
        };

        raw.into_iter().map(Into::into).collect()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCity {
    city_id: u32,
    city_name: String,
}

impl From<RawCity> for CityOption {
    fn from(raw: RawCity) -> Self {
        Self {
            id: CityId::new(raw.city_id),
            name: raw.city_name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawZone {
    zone_id: u32,
    zone_name: String,
}

impl From<RawZone> for ZoneOption {
    fn from(raw: RawZone) -> Self {
        Self {
            id: ZoneId::new(raw.zone_id),
            name: raw.zone_name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawArea {
    area_id: u32,
    area_name: String,
}

impl From<RawArea> for AreaOption {
    fn from(raw: RawArea) -> Self {
        Self {
            id: AreaId::new(raw.area_id),
            name: raw.area_name,
        }
    }
}

/// Price response, bare or wrapped in a `data` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum PriceResponse {
    Wrapped { data: RawPrice },
    Bare(RawPrice),
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPrice {
    final_price: Decimal,
    #[serde(default)]
    discount: Option<Decimal>,
}

impl From<PriceResponse> for QuotedPrice {
    fn from(response: PriceResponse) -> Self {
        let (PriceResponse::Wrapped { data: raw } | PriceResponse::Bare(raw)) = response;

        Self {
            final_price: raw.final_price,
            discount: raw.discount,
        }
    }
}
