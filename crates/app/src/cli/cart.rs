use std::io;

use clap::{Args, Subcommand};
use checkout::{
    cart::{CartItem, CartItemId, SessionToken},
    orders::OrderLine,
    pricing::PricingAggregator,
    receipt::Receipt,
};
use checkout_app::context::AppContext;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart with its totals
    Show(SessionArgs),
    /// Add one unit of an item
    Increment(ItemArgs),
    /// Remove one unit of an item
    Decrement(ItemArgs),
    /// Delete an item from the cart
    Remove(ItemArgs),
}

#[derive(Debug, Args)]
struct SessionArgs {
    /// Cart session token
    #[arg(long)]
    session: String,
}

#[derive(Debug, Args)]
struct ItemArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Cart item identifier
    #[arg(long)]
    item: String,
}

pub(crate) async fn run(context: &AppContext, command: CartCommand) -> Result<(), String> {
    match command.command {
        CartSubcommand::Show(args) => show(context, &SessionToken::new(args.session)).await,
        CartSubcommand::Increment(args) => {
            let mut item = find_item(context, &args).await?;

            context
                .carts
                .increment(&mut item)
                .await
                .map_err(|error| error.to_string())?;

            println!("{}: {} x {}", item.name, item.quantity, item.price);

            Ok(())
        }
        CartSubcommand::Decrement(args) => {
            let mut item = find_item(context, &args).await?;

            context
                .carts
                .decrement(&mut item)
                .await
                .map_err(|error| error.to_string())?;

            println!("{}: {} x {}", item.name, item.quantity, item.price);

            Ok(())
        }
        CartSubcommand::Remove(args) => {
            let item = find_item(context, &args).await?;
            let name = item.name.clone();

            context
                .carts
                .remove(item)
                .await
                .map_err(|error| error.to_string())?;

            println!("removed {name}");

            Ok(())
        }
    }
}

async fn show(context: &AppContext, session: &SessionToken) -> Result<(), String> {
    let items = context
        .carts
        .items(session)
        .await
        .map_err(|error| error.to_string())?;

    if items.is_empty() {
        println!("cart {session} is empty");
        return Ok(());
    }

    let mut pricing = PricingAggregator::new(context.currency);
    let summary = pricing
        .set_cart_items(&items)
        .map_err(|error| error.to_string())?;
    let lines: Vec<OrderLine> = items.iter().map(OrderLine::from).collect();

    Receipt::new(&lines, summary)
        .write_to(io::stdout().lock())
        .map_err(|error| error.to_string())
}

async fn find_item(context: &AppContext, args: &ItemArgs) -> Result<CartItem, String> {
    let session = SessionToken::new(args.session.session.clone());
    let id = CartItemId::new(args.item.clone());

    context
        .carts
        .items(&session)
        .await
        .map_err(|error| error.to_string())?
        .into_iter()
        .find(|item| item.id == id)
        .ok_or_else(|| format!("item {id} is not in cart {session}"))
}
