//! Backend API
//!
//! The order-management backend and the shipping-rate proxy it exposes.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use checkout::{
    cart::{CartItem, CartItemId, QuantityChange, SessionToken},
    delivery::{AreaOption, CityId, CityOption, QuotedPrice, ZoneId, ZoneOption},
    orders::OrderRecord,
    products::{Product, ProductId},
};

mod http;
pub mod wire;

pub use http::HttpStorefront;
pub use wire::{OrderAck, PriceRequest};

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The requested resource does not exist.
    #[error("resource not found")]
    NotFound,

    /// The backend returned a non-2xx response or an unexpected body.
    #[error("unexpected response from backend: {0}")]
    UnexpectedResponse(String),
}

/// Products, carts and orders.
#[automock]
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// `GET /product_details/{id}`
    async fn product(&self, id: &ProductId) -> Result<Product, ApiError>;

    /// `GET /cart/{sessionToken}`
    async fn cart(&self, session: &SessionToken) -> Result<Vec<CartItem>, ApiError>;

    /// `PATCH /cart/{itemId}`
    async fn update_cart_item(
        &self,
        item: &CartItemId,
        change: QuantityChange,
    ) -> Result<(), ApiError>;

    /// `DELETE /cart/{itemId}`
    async fn remove_cart_item(&self, item: &CartItemId) -> Result<(), ApiError>;

    /// `DELETE /cart/delete/{sessionToken}`
    async fn clear_cart(&self, session: &SessionToken) -> Result<(), ApiError>;

    /// `POST /orders`
    async fn create_order(&self, order: &OrderRecord) -> Result<OrderAck, ApiError>;
}

/// Location lists and delivery prices.
#[automock]
#[async_trait]
pub trait ShippingApi: Send + Sync {
    /// `GET /pathao/cities`
    async fn cities(&self) -> Result<Vec<CityOption>, ApiError>;

    /// `GET /pathao/cities/{id}/zones`
    async fn zones(&self, city: CityId) -> Result<Vec<ZoneOption>, ApiError>;

    /// `GET /pathao/zones/{id}/areas`
    async fn areas(&self, zone: ZoneId) -> Result<Vec<AreaOption>, ApiError>;

    /// `POST /pathao/calculate-price`
    async fn price(&self, request: PriceRequest) -> Result<QuotedPrice, ApiError>;
}
