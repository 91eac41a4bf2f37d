//! Cart service errors

use thiserror::Error;

use checkout::cart::CartError;

use crate::api::ApiError;

/// Errors raised while maintaining a cart.
#[derive(Debug, Error)]
pub enum CartServiceError {
    /// The change violates stock or quantity rules; nothing was sent.
    #[error(transparent)]
    Stock(#[from] CartError),

    /// The backend request failed.
    #[error("cart request failed: {0}")]
    Api(#[from] ApiError),
}
