use clap::{Parser, Subcommand};
use checkout_app::{config::AppConfig, context::AppContext, observability};

mod cart;
mod locations;
mod order;
mod product;
mod quote;

#[derive(Debug, Parser)]
#[command(name = "checkout-app", about = "Storefront checkout CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show or change a session's cart
    Cart(cart::CartCommand),
    /// Show one product
    Product(product::ProductArgs),
    /// List delivery locations
    Locations(locations::LocationsCommand),
    /// Resolve a delivery quote and show the totals
    Quote(quote::QuoteArgs),
    /// Validate and place an order
    Order(order::OrderArgs),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        observability::init(&self.config.logging)
            .map_err(|error| format!("failed to initialise logging: {error}"))?;

        let context = AppContext::from_config(&self.config.api)
            .map_err(|error| format!("failed to initialise: {error}"))?;

        match self.command {
            Commands::Cart(command) => cart::run(&context, command).await,
            Commands::Product(args) => product::run(&context, args).await,
            Commands::Locations(command) => locations::run(&context, command).await,
            Commands::Quote(args) => quote::run(&context, args).await,
            Commands::Order(args) => order::run(&context, args).await,
        }
    }
}
