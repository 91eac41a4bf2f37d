//! Delivery

pub mod resolver;

pub use resolver::{DeliveryRateResolver, QuoteListener};
