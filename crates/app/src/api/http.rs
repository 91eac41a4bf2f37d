//! HTTP client for the storefront backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use checkout::{
    cart::{CartItem, CartItemId, QuantityChange, SessionToken},
    delivery::{AreaOption, CityId, CityOption, QuotedPrice, ZoneId, ZoneOption},
    orders::OrderRecord,
    products::{Product, ProductId},
};

use crate::config::ApiConfig;

use super::{
    ApiError, ShippingApi, StorefrontApi,
    wire::{OptionList, OrderAck, PriceRequest, PriceResponse, RawArea, RawCity, RawZone},
};

/// `reqwest` client for the order-management backend and its shipping proxy.
#[derive(Debug, Clone)]
pub struct HttpStorefront {
    base_url: String,
    http: Client,
}

impl HttpStorefront {
    /// Create a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self::with_client(&config.base_url, http))
    }

    /// Create a client around an existing `reqwest` client.
    #[must_use]
    pub fn with_client(base_url: &str, http: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = send(self.http.get(self.url(path)), path).await?;

        Ok(response.json().await?)
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        send(self.http.delete(self.url(path)), path).await?;

        Ok(())
    }
}

async fn send(request: RequestBuilder, path: &str) -> Result<Response, ApiError> {
    let response = request.send().await?;
    let status = response.status();

    debug!(path, %status, "backend responded");

    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound);
    }

    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();

        return Err(ApiError::UnexpectedResponse(format!(
            "{path} failed with status {status}: {text}"
        )));
    }

    Ok(response)
}

#[async_trait]
impl StorefrontApi for HttpStorefront {
    async fn product(&self, id: &ProductId) -> Result<Product, ApiError> {
        self.get_json(&format!("/product_details/{id}")).await
    }

    async fn cart(&self, session: &SessionToken) -> Result<Vec<CartItem>, ApiError> {
        self.get_json(&format!("/cart/{session}")).await
    }

    async fn update_cart_item(
        &self,
        item: &CartItemId,
        change: QuantityChange,
    ) -> Result<(), ApiError> {
        let path = format!("/cart/{item}");

        send(self.http.patch(self.url(&path)).json(&change), &path).await?;

        Ok(())
    }

    async fn remove_cart_item(&self, item: &CartItemId) -> Result<(), ApiError> {
        self.delete(&format!("/cart/{item}")).await
    }

    async fn clear_cart(&self, session: &SessionToken) -> Result<(), ApiError> {
        self.delete(&format!("/cart/delete/{session}")).await
    }

    async fn create_order(&self, order: &OrderRecord) -> Result<OrderAck, ApiError> {
        let response = send(self.http.post(self.url("/orders")).json(order), "/orders").await?;
        let text = response.text().await?;

        if text.trim().is_empty() {
            return Ok(OrderAck::default());
        }

        let ack: OrderAck = serde_json::from_str(&text).map_err(|error| {
            ApiError::UnexpectedResponse(format!("unreadable order acknowledgment: {error}"))
        })?;

        if ack.acknowledged == Some(false) {
            return Err(ApiError::UnexpectedResponse(
                "order was not acknowledged".to_string(),
            ));
        }

        Ok(ack)
    }
}

#[async_trait]
impl ShippingApi for HttpStorefront {
    async fn cities(&self) -> Result<Vec<CityOption>, ApiError> {
        let list: OptionList<RawCity> = self.get_json("/pathao/cities").await?;

        Ok(list.into_options())
    }

    async fn zones(&self, city: CityId) -> Result<Vec<ZoneOption>, ApiError> {
        let list: OptionList<RawZone> = self
            .get_json(&format!("/pathao/cities/{city}/zones"))
            .await?;

        Ok(list.into_options())
    }

    async fn areas(&self, zone: ZoneId) -> Result<Vec<AreaOption>, ApiError> {
        let list: OptionList<RawArea> = self
            .get_json(&format!("/pathao/zones/{zone}/areas"))
            .await?;

        Ok(list.into_options())
    }

    async fn price(&self, request: PriceRequest) -> Result<QuotedPrice, ApiError> {
        let path = "/pathao/calculate-price";
        let response = send(self.http.post(self.url(path)).json(&request), path).await?;
        let price: PriceResponse = response.json().await?;

        Ok(price.into())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;
    use testresult::TestResult;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, method, path},
    };

    use crate::test::fixtures;

    use super::*;

    fn client(server: &MockServer) -> HttpStorefront {
        HttpStorefront::with_client(&server.uri(), Client::new())
    }

    #[tokio::test]
    async fn fetches_cart_items_for_a_session() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/cart/session-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "_id": "c-1",
                    "productId": "p-1",
                    "name": "Cotton Shirt",
                    "price": 500,
                    "quantity": 1,
                    "totalPrice": 500,
                    "sessionToken": "session-1"
                }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let items = client(&server)
            .cart(&SessionToken::new("session-1"))
            .await?;

        assert_eq!(items.len(), 1);
        assert_eq!(items.first().map(|item| item.total), Some(Decimal::from(500)));

        Ok(())
    }

    #[tokio::test]
    async fn missing_product_maps_to_not_found() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/product_details/nope"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = client(&server).product(&ProductId::new("nope")).await;

        assert!(
            matches!(result, Err(ApiError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn server_errors_are_unexpected_responses() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/pathao/cities"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let result = client(&server).cities().await;

        assert!(
            matches!(result, Err(ApiError::UnexpectedResponse(ref message)) if message.contains("502")),
            "expected UnexpectedResponse, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn fetches_zones_of_a_city() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/pathao/cities/1/zones"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    { "zone_id": 11, "zone_name": "Gulshan" },
                    { "zone_id": 12, "zone_name": "Banani" }
                ]
            })))
            .mount(&server)
            .await;

        let zones = client(&server).zones(CityId::new(1)).await?;

        assert_eq!(zones.len(), 2);
        assert_eq!(zones.last().map(|zone| zone.name.as_str()), Some("Banani"));

        Ok(())
    }

    #[tokio::test]
    async fn posts_weight_city_and_zone_for_a_price() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/pathao/calculate-price"))
            .and(body_json(json!({
                "item_weight": 0.5,
                "recipient_city": 1,
                "recipient_zone": 11
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": { "final_price": 60, "discount": 0 } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let price = client(&server)
            .price(PriceRequest {
                item_weight: Decimal::new(5, 1),
                recipient_city: CityId::new(1),
                recipient_zone: ZoneId::new(11),
            })
            .await?;

        assert_eq!(price.final_price, Decimal::from(60));

        Ok(())
    }

    #[tokio::test]
    async fn creates_orders_and_reads_the_acknowledgment() -> TestResult {
        let server = MockServer::start().await;
        let record = fixtures::order_record();

        Mock::given(method("POST"))
            .and(path("/orders"))
            .and(body_json(serde_json::to_value(&record)?))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({ "acknowledged": true, "insertedId": "665f" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let ack = client(&server).create_order(&record).await?;

        assert_eq!(ack.inserted_id.as_deref(), Some("665f"));

        Ok(())
    }

    #[tokio::test]
    async fn unacknowledged_orders_are_errors() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/orders"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "acknowledged": false })))
            .mount(&server)
            .await;

        let result = client(&server).create_order(&fixtures::order_record()).await;

        assert!(
            matches!(result, Err(ApiError::UnexpectedResponse(_))),
            "expected UnexpectedResponse, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn clears_a_sessions_cart() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/cart/delete/session-1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .clear_cart(&SessionToken::new("session-1"))
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn patches_cart_item_quantity() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/cart/c-1"))
            .and(body_json(json!({ "quantity": 2, "total": 1000.0 })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .update_cart_item(
                &CartItemId::new("c-1"),
                QuantityChange {
                    quantity: 2,
                    total: Decimal::from(1000),
                },
            )
            .await?;

        Ok(())
    }
}
