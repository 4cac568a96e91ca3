use std::io;

use clap::{Args, Subcommand};
use shoptech_app::context::AppContext;

use crate::render;

#[derive(Debug, Args)]
pub(crate) struct CarsCommand {
    #[command(subcommand)]
    command: CarsSubcommand,
}

#[derive(Debug, Subcommand)]
enum CarsSubcommand {
    /// List every car in the catalog
    List,
}

pub(crate) async fn run(command: CarsCommand, context: &AppContext) -> Result<(), String> {
    match command.command {
        CarsSubcommand::List => list(context).await,
    }
}

async fn list(context: &AppContext) -> Result<(), String> {
    let cars = context
        .catalog
        .list_cars()
        .await
        .map_err(|error| format!("failed to load cars: {error}"))?;

    if cars.is_empty() {
        println!("no cars available");
        return Ok(());
    }

    render::write_catalog(io::stdout().lock(), &cars, context.api.base_url())
        .map_err(|error| format!("failed to write output: {error}"))
}
