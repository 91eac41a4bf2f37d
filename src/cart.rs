//! Cart

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::products::{Product, ProductId};

/// Backend cart item identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartItemId(String);

impl CartItemId {
    /// Wrap a raw backend identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CartItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Shopper session token that owns a cart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a raw session token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Borrow the raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SessionToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Errors raised before a cart quantity change is applied.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// The product is not currently orderable.
    #[error("{0} is out of stock")]
    OutOfStock(String),

    /// The requested quantity exceeds the product's available stock.
    #[error("Only {available} of {name} left in stock")]
    InsufficientStock {
        /// Product name
        name: String,
        /// Units available
        available: u32,
    },

    /// Quantity cannot drop below a single unit; remove the item instead.
    #[error("Quantity cannot be less than 1")]
    BelowMinimum,

    /// The cart item does not belong to the product it was checked against.
    #[error("cart item {item} does not reference product {product}")]
    ProductMismatch {
        /// Cart item identifier
        item: CartItemId,
        /// Product identifier that was supplied
        product: ProductId,
    },

    /// The quantity counter overflowed.
    #[error("quantity overflow")]
    Overflow,
}

/// A single line in a shopper's cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Cart item identifier
    #[serde(alias = "_id")]
    pub id: CartItemId,

    /// Product this line refers to
    #[serde(alias = "productId")]
    pub product_id: ProductId,

    /// Product name at the time it was added
    pub name: String,

    /// Unit price
    pub price: Decimal,

    /// Units in the cart
    pub quantity: u32,

    /// Line total as declared by the backend
    #[serde(alias = "totalPrice", alias = "total_price")]
    pub total: Decimal,

    /// Chosen color
    #[serde(default)]
    pub color: Option<String>,

    /// Chosen size
    #[serde(default)]
    pub size: Option<String>,

    /// Session that owns the cart
    #[serde(alias = "sessionToken")]
    pub session_token: SessionToken,

    /// Image reference
    #[serde(default)]
    pub image: Option<String>,
}

/// A checked quantity change, ready to be persisted and applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuantityChange {
    /// New quantity
    pub quantity: u32,

    /// New line total
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl CartItem {
    /// Check an increment of one unit against the product's stock.
    ///
    /// Nothing is mutated; apply the returned change with [`CartItem::apply`]
    /// once it has been persisted.
    ///
    /// # Errors
    ///
    /// - [`CartError::ProductMismatch`]: `product` is not the product on this line.
    /// - [`CartError::OutOfStock`]: the product is not orderable.
    /// - [`CartError::InsufficientStock`]: the new quantity exceeds available stock.
    pub fn increment(&self, product: &Product) -> Result<QuantityChange, CartError> {
        if product.id != self.product_id {
            return Err(CartError::ProductMismatch {
                item: self.id.clone(),
                product: product.id.clone(),
            });
        }

        if !product.is_in_stock() {
            return Err(CartError::OutOfStock(product.name.clone()));
        }

        let quantity = self.quantity.checked_add(1).ok_or(CartError::Overflow)?;

        if !product.can_supply(quantity) {
            return Err(CartError::InsufficientStock {
                name: product.name.clone(),
                available: product.available_quantity,
            });
        }

        Ok(self.change_to(quantity))
    }

    /// Check a decrement of one unit.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::BelowMinimum`] when the line holds a single unit.
    pub fn decrement(&self) -> Result<QuantityChange, CartError> {
        match self.quantity {
            0 | 1 => Err(CartError::BelowMinimum),
            quantity => Ok(self.change_to(quantity - 1)),
        }
    }

    /// Apply a previously checked quantity change.
    pub fn apply(&mut self, change: QuantityChange) {
        self.quantity = change.quantity;
        self.total = change.total;
    }

    fn change_to(&self, quantity: u32) -> QuantityChange {
        QuantityChange {
            quantity,
            total: self.price * Decimal::from(quantity),
        }
    }
}

/// Total number of units across the given cart items.
pub fn total_quantity(items: &[CartItem]) -> u32 {
    items
        .iter()
        .fold(0_u32, |acc, item| acc.saturating_add(item.quantity))
}
