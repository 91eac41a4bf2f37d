//! Shared test fixtures.

pub(crate) mod fixtures {
    use jiff::civil::date;
    use rust_decimal::Decimal;
    use rusty_money::iso;

    use checkout::{
        cart::{CartItem, CartItemId, SessionToken},
        checkout::{ShippingDetails, ShippingForm, ValidatedCheckout},
        delivery::{AreaId, CityId, DeliveryQuote, ZoneId},
        orders::{OrderId, OrderRecord, OrderSource},
        products::{Product, ProductId, StockStatus},
    };

    pub(crate) fn session_token() -> SessionToken {
        SessionToken::new("session-1")
    }

    pub(crate) fn product(id: &str, price: i64, available: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: "Linen Kurta".to_string(),
            discounted_price: Decimal::from(price),
            available_quantity: available,
            stock_status: StockStatus::InStock,
            images: vec!["https://cdn.example.com/kurta.jpg".to_string()],
            category: Some("Men".to_string()),
        }
    }

    pub(crate) fn cart_item(id: &str, price: i64, quantity: u32) -> CartItem {
        CartItem {
            id: CartItemId::new(id),
            product_id: ProductId::new(format!("p-{id}")),
            name: format!("Item {id}"),
            price: Decimal::from(price),
            quantity,
            total: Decimal::from(price) * Decimal::from(quantity),
            color: None,
            size: None,
            session_token: session_token(),
            image: None,
        }
    }

    /// Two single-unit lines worth 500 and 300.
    pub(crate) fn cart_items() -> Vec<CartItem> {
        vec![cart_item("c-1", 500, 1), cart_item("c-2", 300, 1)]
    }

    pub(crate) fn cart_source() -> OrderSource {
        OrderSource::Cart {
            session_token: session_token(),
            items: cart_items(),
        }
    }

    pub(crate) fn quote(price: i64) -> DeliveryQuote {
        DeliveryQuote {
            final_price: Decimal::from(price),
            discount: None,
            city: CityId::new(1),
            zone: ZoneId::new(11),
            area: AreaId::new(101),
        }
    }

    pub(crate) fn shipping_form() -> ShippingForm {
        ShippingForm {
            name: "Nusrat Jahan".to_string(),
            contact_number: "01711122233".to_string(),
            address: "House 12, Road 5, Dhanmondi".to_string(),
            note: None,
        }
    }

    pub(crate) fn order_record() -> OrderRecord {
        let checkout = ValidatedCheckout {
            details: ShippingDetails {
                name: "Nusrat Jahan".to_string(),
                contact_number: "01711122233".to_string(),
                address: "House 12, Road 5, Dhanmondi".to_string(),
                note: None,
            },
            quote: quote(60),
        };

        match OrderRecord::assemble(
            OrderId::new(4_815_162_342),
            checkout,
            &cart_source(),
            iso::BDT,
            date(2025, 10, 19),
        ) {
            Ok(record) => record,
            Err(error) => panic!("fixture order should assemble: {error}"),
        }
    }
}
