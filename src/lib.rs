//! Checkout
//!
//! Checkout is the pricing and order-assembly core of a storefront: cart and
//! product pricing, the dependent delivery-location chain that yields a
//! delivery quote, shipping-form validation and order record construction.

pub mod cart;
pub mod checkout;
pub mod delivery;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
