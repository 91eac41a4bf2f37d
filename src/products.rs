//! Products

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Backend product identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Wrap a raw backend identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Stock status as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// The product can be ordered.
    #[serde(alias = "In Stock", alias = "in stock", alias = "instock")]
    InStock,

    /// The product cannot be ordered.
    #[serde(alias = "Out of Stock", alias = "out of stock", alias = "outofstock")]
    OutOfStock,
}

/// Product, read-only from the checkout's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier
    #[serde(alias = "_id")]
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Price after any catalogue discount, in major units
    #[serde(alias = "discount_price", alias = "discountPrice")]
    pub discounted_price: Decimal,

    /// Units available to order
    #[serde(alias = "quantity")]
    pub available_quantity: u32,

    /// Stock status
    #[serde(alias = "stock", alias = "stockStatus")]
    pub stock_status: StockStatus,

    /// Image references, first one is the primary image
    #[serde(default)]
    pub images: Vec<String>,

    /// Catalogue category
    #[serde(default)]
    pub category: Option<String>,
}

impl Product {
    /// Whether the backend reports the product as orderable.
    pub fn is_in_stock(&self) -> bool {
        self.stock_status == StockStatus::InStock && self.available_quantity > 0
    }

    /// Whether `quantity` units can be supplied.
    pub fn can_supply(&self, quantity: u32) -> bool {
        self.is_in_stock() && quantity <= self.available_quantity
    }

    /// The primary image reference, if any.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn product(available_quantity: u32, stock_status: StockStatus) -> Product {
        Product {
            id: ProductId::new("p-1"),
            name: "Cotton Shirt".to_string(),
            discounted_price: Decimal::from(500),
            available_quantity,
            stock_status,
            images: vec!["shirt-front.jpg".to_string(), "shirt-back.jpg".to_string()],
            category: Some("shirts".to_string()),
        }
    }

    #[test]
    fn can_supply_respects_available_quantity() {
        let product = product(3, StockStatus::InStock);

        assert!(product.can_supply(3));
        assert!(!product.can_supply(4));
    }

    #[test]
    fn out_of_stock_supplies_nothing() {
        let product = product(10, StockStatus::OutOfStock);

        assert!(!product.is_in_stock());
        assert!(!product.can_supply(1));
    }

    #[test]
    fn zero_available_is_not_in_stock() {
        assert!(!product(0, StockStatus::InStock).is_in_stock());
    }

    #[test]
    fn primary_image_is_first() {
        assert_eq!(
            product(1, StockStatus::InStock).primary_image(),
            Some("shirt-front.jpg")
        );
    }

    #[test]
    fn deserializes_backend_document() -> TestResult {
        let product: Product = serde_json::from_str(
            r#"{
                "_id": "665f1c",
                "name": "Linen Panjabi",
                "discount_price": 1250,
                "quantity": 4,
                "stock": "In Stock",
                "images": ["panjabi.jpg"],
                "category": "panjabi"
            }"#,
        )?;

        assert_eq!(product.id, ProductId::new("665f1c"));
        assert_eq!(product.discounted_price, Decimal::from(1250));
        assert_eq!(product.available_quantity, 4);
        assert_eq!(product.stock_status, StockStatus::InStock);

        Ok(())
    }
}
