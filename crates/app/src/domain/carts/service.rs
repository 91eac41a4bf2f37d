//! Carts service.

use std::sync::Arc;

use tracing::info;

use checkout::cart::{CartItem, SessionToken};

use crate::{api::StorefrontApi, domain::carts::errors::CartServiceError};

/// Reads and mutates a session's cart through the backend.
#[derive(Clone)]
pub struct CartsService {
    api: Arc<dyn StorefrontApi>,
}

impl std::fmt::Debug for CartsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartsService").finish_non_exhaustive()
    }
}

impl CartsService {
    /// Create a service backed by `api`.
    #[must_use]
    pub fn new(api: Arc<dyn StorefrontApi>) -> Self {
        Self { api }
    }

    /// Current items of a session's cart.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend request fails.
    #[tracing::instrument(skip(self), err)]
    pub async fn items(&self, session: &SessionToken) -> Result<Vec<CartItem>, CartServiceError> {
        Ok(self.api.cart(session).await?)
    }

    /// Add one unit to `item`.
    ///
    /// Stock is checked against the product's current details before
    /// anything is written.
    ///
    /// # Errors
    ///
    /// - [`CartServiceError::Stock`]: out of stock or no units left.
    /// - [`CartServiceError::Api`]: the backend request failed.
    #[tracing::instrument(skip(self, item), fields(item = %item.id), err)]
    pub async fn increment(&self, item: &mut CartItem) -> Result<(), CartServiceError> {
        let product = self.api.product(&item.product_id).await?;
        let change = item.increment(&product)?;

        self.api.update_cart_item(&item.id, change).await?;
        item.apply(change);

        info!(quantity = item.quantity, "cart item incremented");

        Ok(())
    }

    /// Remove one unit from `item`, never going below one.
    ///
    /// # Errors
    ///
    /// - [`CartServiceError::Stock`]: the item already has a single unit.
    /// - [`CartServiceError::Api`]: the backend request failed.
    #[tracing::instrument(skip(self, item), fields(item = %item.id), err)]
    pub async fn decrement(&self, item: &mut CartItem) -> Result<(), CartServiceError> {
        let change = item.decrement()?;

        self.api.update_cart_item(&item.id, change).await?;
        item.apply(change);

        info!(quantity = item.quantity, "cart item decremented");

        Ok(())
    }

    /// Delete `item` from its cart.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend request fails.
    #[tracing::instrument(skip(self, item), fields(item = %item.id), err)]
    pub async fn remove(&self, item: CartItem) -> Result<(), CartServiceError> {
        self.api.remove_cart_item(&item.id).await?;

        info!("cart item removed");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use checkout::{cart::CartError, cart::QuantityChange};

    use crate::{
        api::{ApiError, MockStorefrontApi},
        test::fixtures,
    };

    use super::*;

    fn service(api: MockStorefrontApi) -> CartsService {
        CartsService::new(Arc::new(api))
    }

    #[tokio::test]
    async fn increment_persists_new_quantity_and_total() -> TestResult {
        let mut api = MockStorefrontApi::new();
        let mut item = fixtures::cart_item("c-1", 500, 1);

        api.expect_product()
            .returning(|_| Ok(fixtures::product("p-c-1", 500, 5)));

        api.expect_update_cart_item()
            .with(
                eq(item.id.clone()),
                eq(QuantityChange {
                    quantity: 2,
                    total: Decimal::from(1000),
                }),
            )
            .times(1)
            .returning(|_, _| Ok(()));

        service(api).increment(&mut item).await?;

        assert_eq!(item.quantity, 2);
        assert_eq!(item.total, Decimal::from(1000));

        Ok(())
    }

    #[tokio::test]
    async fn increment_beyond_stock_sends_nothing() {
        let mut api = MockStorefrontApi::new();
        let mut item = fixtures::cart_item("c-1", 500, 2);

        api.expect_product()
            .returning(|_| Ok(fixtures::product("p-c-1", 500, 2)));
        api.expect_update_cart_item().never();

        let result = service(api).increment(&mut item).await;

        assert!(
            matches!(
                result,
                Err(CartServiceError::Stock(CartError::InsufficientStock { .. }))
            ),
            "expected InsufficientStock, got {result:?}"
        );
        assert_eq!(item.quantity, 2);
    }

    #[tokio::test]
    async fn decrement_below_one_is_rejected() {
        let mut api = MockStorefrontApi::new();
        let mut item = fixtures::cart_item("c-1", 500, 1);

        api.expect_update_cart_item().never();

        let result = service(api).decrement(&mut item).await;

        assert!(
            matches!(result, Err(CartServiceError::Stock(CartError::BelowMinimum))),
            "expected BelowMinimum, got {result:?}"
        );
    }

    #[tokio::test]
    async fn failed_update_leaves_item_unchanged() {
        let mut api = MockStorefrontApi::new();
        let mut item = fixtures::cart_item("c-1", 500, 3);

        api.expect_update_cart_item()
            .returning(|_, _| Err(ApiError::UnexpectedResponse("boom".to_string())));

        let result = service(api).decrement(&mut item).await;

        assert!(
            matches!(result, Err(CartServiceError::Api(_))),
            "expected Api error, got {result:?}"
        );
        assert_eq!(item.quantity, 3);
    }

    #[tokio::test]
    async fn remove_deletes_the_item() -> TestResult {
        let mut api = MockStorefrontApi::new();
        let item = fixtures::cart_item("c-9", 300, 1);

        api.expect_remove_cart_item()
            .with(eq(item.id.clone()))
            .times(1)
            .returning(|_| Ok(()));

        service(api).remove(item).await?;

        Ok(())
    }
}
