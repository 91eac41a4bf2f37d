//! Delivery
//!
//! Location identifiers, item weight and delivery quotes, plus the dependent
//! city → zone → area selection chain in [`chain`].

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub mod chain;

pub use chain::{DeliveryChain, FetchRequest, Outcome, PriceKey, Resolution, SelectionError};

macro_rules! location_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Wrap a raw shipping-provider identifier.
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            /// The raw identifier.
            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
                Display::fmt(&self.0, f)
            }
        }
    };
}

location_id!(
    /// Shipping-provider city identifier.
    CityId
);

location_id!(
    /// Shipping-provider zone identifier, scoped to a city.
    ZoneId
);

location_id!(
    /// Shipping-provider area identifier, scoped to a zone.
    AreaId
);

/// A selectable location option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationOption<K> {
    /// Option identifier
    pub id: K,

    /// Display name
    pub name: String,
}

/// City option
pub type CityOption = LocationOption<CityId>;

/// Zone option
pub type ZoneOption = LocationOption<ZoneId>;

/// Area option
pub type AreaOption = LocationOption<AreaId>;

/// Weight charged per unit, in kilograms.
pub const UNIT_WEIGHT_KG: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Parcel weight in kilograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemWeight(Decimal);

impl ItemWeight {
    /// Weight of a parcel holding `quantity` units; never less than one unit.
    pub fn for_quantity(quantity: u32) -> Self {
        Self(UNIT_WEIGHT_KG * Decimal::from(quantity.max(1)))
    }

    /// Weight in kilograms.
    pub fn kg(self) -> Decimal {
        self.0
    }
}

impl Display for ItemWeight {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}kg", self.0.normalize())
    }
}

/// Price returned by the shipping-rate provider for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotedPrice {
    /// Final delivery price
    pub final_price: Decimal,

    /// Discount the provider already applied, if any
    pub discount: Option<Decimal>,
}

/// Delivery charge for a fully resolved location chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryQuote {
    /// Final delivery price; never negative
    pub final_price: Decimal,

    /// Discount the provider already applied, if any
    pub discount: Option<Decimal>,

    /// City the quote was computed for
    pub city: CityId,

    /// Zone the quote was computed for
    pub zone: ZoneId,

    /// Area the quote was computed for
    pub area: AreaId,
}

impl DeliveryQuote {
    /// Whether the quote carries a chargeable, non-zero price.
    pub fn is_chargeable(&self) -> bool {
        self.final_price > Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_is_half_a_kilo_per_unit() {
        assert_eq!(ItemWeight::for_quantity(1).kg(), Decimal::new(5, 1));
        assert_eq!(ItemWeight::for_quantity(3).kg(), Decimal::new(15, 1));
    }

    #[test]
    fn weight_never_drops_below_one_unit() {
        assert_eq!(ItemWeight::for_quantity(0), ItemWeight::for_quantity(1));
    }

    #[test]
    fn weight_displays_in_kilograms() {
        assert_eq!(ItemWeight::for_quantity(2).to_string(), "1kg");
    }

    #[test]
    fn zero_priced_quote_is_not_chargeable() {
        let quote = DeliveryQuote {
            final_price: Decimal::ZERO,
            discount: None,
            city: CityId::new(1),
            zone: ZoneId::new(2),
            area: AreaId::new(3),
        };

        assert!(!quote.is_chargeable());
    }
}
