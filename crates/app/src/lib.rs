//! Checkout services: backend client, delivery-rate resolution, cart
//! maintenance and order placement.

pub mod api;
pub mod config;
pub mod context;
pub mod domain;
pub mod observability;

#[cfg(test)]
mod test;
