//! Checkout prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{CartError, CartItem, CartItemId, QuantityChange, SessionToken, total_quantity},
    checkout::{
        ShippingDetails, ShippingForm, SubmissionError, SubmissionEvent, SubmissionState,
        ValidatedCheckout, ValidationError,
    },
    delivery::{
        AreaId, AreaOption, CityId, CityOption, DeliveryChain, DeliveryQuote, FetchRequest,
        ItemWeight, LocationOption, Outcome, PriceKey, QuotedPrice, Resolution, SelectionError,
        ZoneId, ZoneOption,
    },
    orders::{
        OrderError, OrderId, OrderLine, OrderRecord, OrderSource, OrderStatus, PaymentMethod,
        ProductSelection,
    },
    pricing::{PriceSummary, PricingAggregator, PricingError, PricingInput, summarise},
    products::{Product, ProductId, StockStatus},
    receipt::{Receipt, ReceiptError},
};
