use clap::Args;
use checkout::{
    cart::SessionToken,
    delivery::{AreaId, CityId, ZoneId},
    orders::ProductSelection,
    products::ProductId,
};
use checkout_app::{context::AppContext, domain::checkout::CheckoutSession};

/// Cart or single product to price.
#[derive(Debug, Args)]
pub(crate) struct SourceArgs {
    /// Cart session token
    #[arg(long, required_unless_present = "product")]
    session: Option<String>,

    /// Product bought directly instead of a cart
    #[arg(long, conflicts_with = "session")]
    product: Option<String>,

    /// Units of the product
    #[arg(long, default_value_t = 1u32, requires = "product")]
    quantity: u32,

    /// Chosen color
    #[arg(long, requires = "product")]
    color: Option<String>,

    /// Chosen size
    #[arg(long, requires = "product")]
    size: Option<String>,
}

/// Delivery location.
#[derive(Debug, Args)]
pub(crate) struct LocationArgs {
    /// City identifier
    #[arg(long)]
    city: u32,

    /// Zone identifier
    #[arg(long)]
    zone: u32,

    /// Area identifier
    #[arg(long)]
    area: u32,
}

#[derive(Debug, Args)]
pub(crate) struct QuoteArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    location: LocationArgs,
}

pub(crate) async fn run(context: &AppContext, args: QuoteArgs) -> Result<(), String> {
    let mut session = open_session(context, args.source).await?;

    let (city, zone, area) = args.location.ids();

    let quote = session
        .choose_location(city, zone, area)
        .await
        .map_err(|error| error.user_message())?;

    if let Some(discount) = quote.discount {
        println!("discount: {discount}");
    }

    let summary = session.summary();

    println!("subtotal: {}", summary.subtotal());
    println!("delivery: {}", summary.delivery());
    println!("total: {}", summary.total());

    Ok(())
}

/// Start a checkout session for a cart or a single product.
pub(crate) async fn open_session(
    context: &AppContext,
    source: SourceArgs,
) -> Result<CheckoutSession, String> {
    let shipping = context.shipping.clone();

    let session = match (source.session, source.product) {
        (_, Some(product)) => {
            let product = context
                .storefront
                .product(&ProductId::new(product))
                .await
                .map_err(|error| format!("failed to load product: {error}"))?;

            let selection = ProductSelection {
                quantity: source.quantity,
                color: source.color,
                size: source.size,
            };

            CheckoutSession::for_product(shipping, context.currency, product, selection).await
        }
        (Some(session), None) => {
            let session = SessionToken::new(session);
            let items = context
                .carts
                .items(&session)
                .await
                .map_err(|error| error.to_string())?;

            CheckoutSession::for_cart(shipping, context.currency, session, items).await
        }
        (None, None) => return Err("either --session or --product is required".to_string()),
    };

    session.map_err(|error| error.user_message())
}

impl LocationArgs {
    pub(crate) fn ids(&self) -> (CityId, ZoneId, AreaId) {
        (
            CityId::new(self.city),
            ZoneId::new(self.zone),
            AreaId::new(self.area),
        )
    }
}
