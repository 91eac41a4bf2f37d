//! Pricing
//!
//! Subtotal, delivery charge and grand total for a cart or a single
//! "buy now" product. [`PricingAggregator`] holds the inputs and recomputes
//! its [`PriceSummary`] whenever one of them is replaced.

use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{cart::CartItem, delivery::DeliveryQuote, products::Product};

/// Errors that can occur while pricing a checkout.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A line total was negative (line index, amount).
    #[error("line {0} has a negative total of {1}")]
    NegativeLineTotal(usize, Decimal),

    /// The delivery quote carried a negative price.
    #[error("delivery charge cannot be negative: {0}")]
    NegativeDelivery(Decimal),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// What is being priced.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PricingInput {
    /// Declared line totals of the cart items.
    Lines(Vec<Decimal>),

    /// A single product bought directly at `quantity` units.
    Single {
        /// Unit price
        unit_price: Decimal,
        /// Units
        quantity: u32,
    },

    /// Nothing loaded yet.
    #[default]
    Empty,
}

impl PricingInput {
    /// Price the declared line totals of `items`.
    pub fn cart(items: &[CartItem]) -> Self {
        Self::Lines(items.iter().map(|item| item.total).collect())
    }

    /// Price `quantity` units of `product` at its discounted price.
    pub fn single(product: &Product, quantity: u32) -> Self {
        Self::Single {
            unit_price: product.discounted_price,
            quantity,
        }
    }
}

/// Derived checkout totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceSummary {
    subtotal: Money<'static, Currency>,
    delivery: Money<'static, Currency>,
    total: Money<'static, Currency>,
}

impl PriceSummary {
    /// All-zero summary in `currency`.
    pub fn zero(currency: &'static Currency) -> Self {
        let zero = Money::from_minor(0, currency);

        Self {
            subtotal: zero,
            delivery: zero,
            total: zero,
        }
    }

    /// Item subtotal, delivery excluded.
    pub fn subtotal(&self) -> &Money<'static, Currency> {
        &self.subtotal
    }

    /// Delivery charge, zero until a quote resolves.
    pub fn delivery(&self) -> &Money<'static, Currency> {
        &self.delivery
    }

    /// Subtotal plus delivery charge.
    pub fn total(&self) -> &Money<'static, Currency> {
        &self.total
    }
}

/// Calculates the checkout totals for `input` and an optional delivery quote.
///
/// # Errors
///
/// - [`PricingError::NegativeLineTotal`]: a cart line declared a negative total.
/// - [`PricingError::NegativeDelivery`]: the quote carried a negative price.
/// - [`PricingError::Money`]: wrapped money arithmetic error.
pub fn summarise(
    currency: &'static Currency,
    input: &PricingInput,
    quote: Option<&DeliveryQuote>,
) -> Result<PriceSummary, PricingError> {
    let subtotal = match input {
        PricingInput::Lines(totals) => totals.iter().enumerate().try_fold(
            Money::from_minor(0, currency),
            |acc, (i, total)| -> Result<_, PricingError> {
                if *total < Decimal::ZERO {
                    return Err(PricingError::NegativeLineTotal(i, *total));
                }

                Ok(acc.add(Money::from_decimal(*total, currency))?)
            },
        )?,
        PricingInput::Single {
            unit_price,
            quantity,
        } => Money::from_decimal(*unit_price * Decimal::from(*quantity), currency),
        PricingInput::Empty => Money::from_minor(0, currency),
    };

    let delivery = match quote {
        Some(quote) if quote.final_price < Decimal::ZERO => {
            return Err(PricingError::NegativeDelivery(quote.final_price));
        }
        Some(quote) => Money::from_decimal(quote.final_price, currency),
        None => Money::from_minor(0, currency),
    };

    let total = subtotal.add(delivery)?;

    Ok(PriceSummary {
        subtotal,
        delivery,
        total,
    })
}

/// Holds the pricing inputs of one checkout session and keeps the totals current.
#[derive(Debug, Clone)]
pub struct PricingAggregator {
    currency: &'static Currency,
    input: PricingInput,
    quote: Option<DeliveryQuote>,
    summary: PriceSummary,
}

impl PricingAggregator {
    /// Create an aggregator with no items and no quote.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            currency,
            input: PricingInput::Empty,
            quote: None,
            summary: PriceSummary::zero(currency),
        }
    }

    /// Replace the cart items.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] and keeps the previous inputs when the new totals are invalid.
    pub fn set_cart_items(&mut self, items: &[CartItem]) -> Result<&PriceSummary, PricingError> {
        self.replace(PricingInput::cart(items), self.quote.clone())
    }

    /// Replace the inputs with a single product bought at `quantity` units.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] and keeps the previous inputs when the new totals are invalid.
    pub fn set_single(
        &mut self,
        product: &Product,
        quantity: u32,
    ) -> Result<&PriceSummary, PricingError> {
        self.replace(PricingInput::single(product, quantity), self.quote.clone())
    }

    /// Replace the delivery quote; `None` drops the delivery charge.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] and keeps the previous quote when its price is negative.
    pub fn set_quote(
        &mut self,
        quote: Option<DeliveryQuote>,
    ) -> Result<&PriceSummary, PricingError> {
        self.replace(self.input.clone(), quote)
    }

    /// Current totals.
    pub fn summary(&self) -> &PriceSummary {
        &self.summary
    }

    /// Current delivery quote.
    pub fn quote(&self) -> Option<&DeliveryQuote> {
        self.quote.as_ref()
    }

    fn replace(
        &mut self,
        input: PricingInput,
        quote: Option<DeliveryQuote>,
    ) -> Result<&PriceSummary, PricingError> {
        let summary = summarise(self.currency, &input, quote.as_ref())?;

        self.input = input;
        self.quote = quote;
        self.summary = summary;

        Ok(&self.summary)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use crate::{
        cart::{CartItemId, SessionToken},
        delivery::{AreaId, CityId, ZoneId},
        products::{ProductId, StockStatus},
    };

    use super::*;

    fn line(id: &str, price: i64, quantity: u32) -> CartItem {
        CartItem {
            id: CartItemId::new(id),
            product_id: ProductId::new(format!("p-{id}")),
            name: format!("Item {id}"),
            price: Decimal::from(price),
            quantity,
            total: Decimal::from(price) * Decimal::from(quantity),
            color: None,
            size: None,
            session_token: SessionToken::new("session"),
            image: None,
        }
    }

    fn quote(amount: i64) -> DeliveryQuote {
        DeliveryQuote {
            final_price: Decimal::from(amount),
            discount: None,
            city: CityId::new(1),
            zone: ZoneId::new(2),
            area: AreaId::new(3),
        }
    }

    fn bdt(amount: i64) -> Money<'static, Currency> {
        Money::from_major(amount, iso::BDT)
    }

    #[test]
    fn cart_subtotal_plus_delivery() -> TestResult {
        let items = [line("a", 500, 1), line("b", 300, 1)];

        let summary = summarise(iso::BDT, &PricingInput::cart(&items), Some(&quote(60)))?;

        assert_eq!(summary.subtotal(), &bdt(800));
        assert_eq!(summary.delivery(), &bdt(60));
        assert_eq!(summary.total(), &bdt(860));

        Ok(())
    }

    #[test]
    fn empty_cart_reports_zero() -> TestResult {
        let summary = summarise(iso::BDT, &PricingInput::Lines(Vec::new()), None)?;

        assert_eq!(summary, PriceSummary::zero(iso::BDT));

        Ok(())
    }

    #[test]
    fn subtotal_uses_declared_line_totals() -> TestResult {
        let mut item = line("a", 500, 2);
        item.total = Decimal::from(900);

        let summary = summarise(iso::BDT, &PricingInput::cart(&[item]), None)?;

        assert_eq!(summary.subtotal(), &bdt(900));

        Ok(())
    }

    #[test]
    fn single_product_is_price_times_quantity() -> TestResult {
        let product = Product {
            id: ProductId::new("p-1"),
            name: "Kurta".to_string(),
            discounted_price: Decimal::new(44950, 2),
            available_quantity: 10,
            stock_status: StockStatus::InStock,
            images: Vec::new(),
            category: None,
        };

        let summary = summarise(iso::BDT, &PricingInput::single(&product, 2), None)?;

        assert_eq!(summary.subtotal(), &Money::from_minor(89900, iso::BDT));
        assert_eq!(summary.total(), summary.subtotal());

        Ok(())
    }

    #[test]
    fn negative_line_total_is_rejected() {
        let mut item = line("a", 500, 1);
        item.total = Decimal::from(-1);

        let result = summarise(iso::BDT, &PricingInput::cart(&[item]), None);

        assert_eq!(
            result,
            Err(PricingError::NegativeLineTotal(0, Decimal::from(-1)))
        );
    }

    #[test]
    fn aggregator_recomputes_on_every_input_change() -> TestResult {
        let mut aggregator = PricingAggregator::new(iso::BDT);

        assert_eq!(aggregator.summary().total(), &bdt(0));

        aggregator.set_cart_items(&[line("a", 500, 1), line("b", 300, 1)])?;
        assert_eq!(aggregator.summary().total(), &bdt(800));

        aggregator.set_quote(Some(quote(60)))?;
        assert_eq!(aggregator.summary().total(), &bdt(860));

        aggregator.set_cart_items(&[line("a", 500, 1)])?;
        assert_eq!(aggregator.summary().total(), &bdt(560));

        aggregator.set_quote(None)?;
        assert_eq!(aggregator.summary().delivery(), &bdt(0));
        assert_eq!(aggregator.summary().total(), &bdt(500));

        Ok(())
    }

    #[test]
    fn aggregator_keeps_previous_state_on_error() -> TestResult {
        let mut aggregator = PricingAggregator::new(iso::BDT);
        aggregator.set_quote(Some(quote(60)))?;

        let result = aggregator.set_quote(Some(quote(-10)));

        assert!(matches!(result, Err(PricingError::NegativeDelivery(_))));
        assert_eq!(aggregator.summary().delivery(), &bdt(60));
        assert_eq!(aggregator.quote(), Some(&quote(60)));

        Ok(())
    }
}
