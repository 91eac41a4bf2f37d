use std::io;

use clap::Args;
use checkout::{checkout::ShippingForm, receipt::Receipt};
use checkout_app::context::AppContext;
use tracing::warn;

use super::quote::{LocationArgs, SourceArgs, open_session};

#[derive(Debug, Args)]
pub(crate) struct OrderArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    location: LocationArgs,

    /// Recipient name
    #[arg(long)]
    name: String,

    /// Recipient phone number
    #[arg(long)]
    phone: String,

    /// Delivery address
    #[arg(long)]
    address: String,

    /// Note for the courier
    #[arg(long)]
    note: Option<String>,
}

pub(crate) async fn run(context: &AppContext, args: OrderArgs) -> Result<(), String> {
    let mut session = open_session(context, args.source).await?;
    let (city, zone, area) = args.location.ids();

    if let Err(error) = session.choose_location(city, zone, area).await {
        warn!(%error, "no delivery quote for the chosen location");
    }

    let form = ShippingForm {
        name: args.name,
        contact_number: args.phone,
        address: args.address,
        note: args.note,
    };

    let confirmation = context
        .checkout_service()
        .place_order(session.request(form))
        .await
        .map_err(|error| error.user_message())?;

    println!("order_id: {}", confirmation.order_id);

    Receipt::new(&confirmation.record.items, session.summary())
        .write_to(io::stdout().lock())
        .map_err(|error| error.to_string())?;

    if !confirmation.cart_cleared && session.source().session_token().is_some() {
        println!("your cart could not be cleared");
    }

    Ok(())
}
