//! Orders
//!
//! The order record submitted to the backend, assembled from a validated
//! shipping form, the delivery quote and either the cart or a single
//! "buy now" product.

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::civil::Date;
use rand::Rng;
use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::{CartError, CartItem, SessionToken, total_quantity},
    checkout::ValidatedCheckout,
    delivery::{AreaId, CityId, ZoneId},
    pricing::{PricingError, PricingInput, summarise},
    products::{Product, ProductId},
};

/// Numeric order identifier shown to the shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(u64);

impl OrderId {
    /// Smallest generated identifier.
    pub const MIN: u64 = 1_000_000_000;

    /// Largest generated identifier.
    pub const MAX: u64 = 9_999_999_999;

    /// Wrap a raw identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Generate a random 10-digit identifier.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(Self::MIN..=Self::MAX))
    }

    /// The raw identifier.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

/// Supported payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Pay the courier on delivery.
    #[default]
    CashOnDelivery,
}

/// Order lifecycle status. Later transitions belong to fulfilment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Freshly placed.
    #[default]
    Listed,
}

/// Errors raised while assembling an order record.
#[derive(Debug, Error, PartialEq)]
pub enum OrderError {
    /// Cart mode with no items.
    #[error("Your cart is empty")]
    EmptyCart,

    /// Buy-now mode with a zero quantity.
    #[error("Please choose a quantity")]
    ZeroQuantity,

    /// Buy-now mode for more units than are in stock.
    #[error(transparent)]
    Stock(#[from] CartError),

    /// Totals could not be computed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Color, size and quantity chosen on a product page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSelection {
    /// Units
    pub quantity: u32,

    /// Chosen color
    pub color: Option<String>,

    /// Chosen size
    pub size: Option<String>,
}

/// What an order is placed for.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderSource {
    /// Everything currently in a session's cart.
    Cart {
        /// Session that owns the cart
        session_token: SessionToken,
        /// Current cart items
        items: Vec<CartItem>,
    },

    /// A single product bought directly.
    Single {
        /// Product being bought
        product: Product,
        /// Chosen color, size and quantity
        selection: ProductSelection,
    },
}

impl OrderSource {
    /// Order lines for this source: one per cart item, or a single synthesized line.
    pub fn lines(&self) -> Vec<OrderLine> {
        match self {
            OrderSource::Cart { items, .. } => items.iter().map(OrderLine::from).collect(),
            OrderSource::Single { product, selection } => {
                vec![OrderLine::synthesize(product, selection)]
            }
        }
    }

    /// Pricing input for this source.
    pub fn pricing_input(&self) -> PricingInput {
        match self {
            OrderSource::Cart { items, .. } => PricingInput::cart(items),
            OrderSource::Single { product, selection } => {
                PricingInput::single(product, selection.quantity)
            }
        }
    }

    /// Units across all lines, used to weigh the parcel.
    pub fn total_quantity(&self) -> u32 {
        match self {
            OrderSource::Cart { items, .. } => total_quantity(items),
            OrderSource::Single { selection, .. } => selection.quantity,
        }
    }

    /// The cart's session token in cart mode.
    pub fn session_token(&self) -> Option<&SessionToken> {
        match self {
            OrderSource::Cart { session_token, .. } => Some(session_token),
            OrderSource::Single { .. } => None,
        }
    }

    fn check(&self) -> Result<(), OrderError> {
        match self {
            OrderSource::Cart { items, .. } if items.is_empty() => Err(OrderError::EmptyCart),
            OrderSource::Cart { .. } => Ok(()),
            OrderSource::Single { selection, .. } if selection.quantity == 0 => {
                Err(OrderError::ZeroQuantity)
            }
            OrderSource::Single { product, selection } => {
                if !product.is_in_stock() {
                    return Err(CartError::OutOfStock(product.name.clone()).into());
                }

                if !product.can_supply(selection.quantity) {
                    return Err(CartError::InsufficientStock {
                        name: product.name.clone(),
                        available: product.available_quantity,
                    }
                    .into());
                }

                Ok(())
            }
        }
    }
}

/// A line of an order record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Product ordered
    pub product_id: ProductId,

    /// Product name
    pub name: String,

    /// Unit price
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Units
    pub quantity: u32,

    /// Line total
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,

    /// Chosen color
    pub color: Option<String>,

    /// Chosen size
    pub size: Option<String>,

    /// Image reference
    pub image: Option<String>,
}

impl OrderLine {
    /// Build the single line of a buy-now order.
    pub fn synthesize(product: &Product, selection: &ProductSelection) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.discounted_price,
            quantity: selection.quantity,
            total: product.discounted_price * Decimal::from(selection.quantity),
            color: selection.color.clone(),
            size: selection.size.clone(),
            image: product.primary_image().map(str::to_string),
        }
    }
}

impl From<&CartItem> for OrderLine {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id.clone(),
            name: item.name.clone(),
            price: item.price,
            quantity: item.quantity,
            total: item.total,
            color: item.color.clone(),
            size: item.size.clone(),
            image: item.image.clone(),
        }
    }
}

/// Order payload accepted by `POST /orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Generated order identifier
    pub order_id: OrderId,

    /// Buyer name
    pub name: String,

    /// Contact number
    pub phone: String,

    /// Delivery address
    pub address: String,

    /// Note for the courier
    pub note: Option<String>,

    /// Payment method
    pub payment_method: PaymentMethod,

    /// Sum of line totals, delivery excluded
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,

    /// Delivery charge from the resolved quote
    #[serde(with = "rust_decimal::serde::float")]
    pub delivery_charge: Decimal,

    /// Subtotal plus delivery charge
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,

    /// Ordered lines
    pub items: Vec<OrderLine>,

    /// Delivery city
    pub city_id: CityId,

    /// Delivery zone
    pub zone_id: ZoneId,

    /// Delivery area
    pub area_id: AreaId,

    /// Cart session, present in cart mode
    pub session_token: Option<SessionToken>,

    /// Order date, `YYYY-MM-DD`
    pub date: String,

    /// Full month name of the order date
    pub month: String,

    /// Year of the order date
    pub year: i16,

    /// Lifecycle status
    pub status: OrderStatus,
}

impl OrderRecord {
    /// Assemble an order record.
    ///
    /// The delivery charge and location come from the validated quote; totals
    /// are recomputed from the order lines so that `total == subtotal + delivery`.
    ///
    /// # Errors
    ///
    /// - [`OrderError::EmptyCart`]: cart mode without items.
    /// - [`OrderError::ZeroQuantity`]: buy-now mode with zero units.
    /// - [`OrderError::Stock`]: buy-now mode beyond available stock.
    /// - [`OrderError::Pricing`]: totals could not be computed.
    pub fn assemble(
        order_id: OrderId,
        checkout: ValidatedCheckout,
        source: &OrderSource,
        currency: &'static Currency,
        today: Date,
    ) -> Result<Self, OrderError> {
        source.check()?;

        let summary = summarise(currency, &source.pricing_input(), Some(&checkout.quote))?;
        let ValidatedCheckout { details, quote } = checkout;

        Ok(Self {
            order_id,
            name: details.name,
            phone: details.contact_number,
            address: details.address,
            note: details.note,
            payment_method: PaymentMethod::CashOnDelivery,
            subtotal: *summary.subtotal().amount(),
            delivery_charge: *summary.delivery().amount(),
            total: *summary.total().amount(),
            items: source.lines(),
            city_id: quote.city,
            zone_id: quote.zone,
            area_id: quote.area,
            session_token: source.session_token().cloned(),
            date: today.to_string(),
            month: today.strftime("%B").to_string(),
            year: today.year(),
            status: OrderStatus::Listed,
        })
    }
}
