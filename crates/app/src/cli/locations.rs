use clap::{Args, Subcommand};
use checkout::delivery::{CityId, LocationOption, ZoneId};
use checkout_app::context::AppContext;

#[derive(Debug, Args)]
pub(crate) struct LocationsCommand {
    #[command(subcommand)]
    command: LocationsSubcommand,
}

#[derive(Debug, Subcommand)]
enum LocationsSubcommand {
    /// List cities
    Cities,
    /// List the zones of a city
    Zones {
        /// City identifier
        #[arg(long)]
        city: u32,
    },
    /// List the areas of a zone
    Areas {
        /// Zone identifier
        #[arg(long)]
        zone: u32,
    },
}

pub(crate) async fn run(context: &AppContext, command: LocationsCommand) -> Result<(), String> {
    let shipping = &context.shipping;

    match command.command {
        LocationsSubcommand::Cities => print(shipping.cities().await),
        LocationsSubcommand::Zones { city } => print(shipping.zones(CityId::new(city)).await),
        LocationsSubcommand::Areas { zone } => print(shipping.areas(ZoneId::new(zone)).await),
    }
}

fn print<K, E>(options: Result<Vec<LocationOption<K>>, E>) -> Result<(), String>
where
    K: std::fmt::Display,
    E: std::fmt::Display,
{
    let options = options.map_err(|error| format!("failed to load locations: {error}"))?;

    for option in options {
        println!("{}\t{}", option.id, option.name);
    }

    Ok(())
}
