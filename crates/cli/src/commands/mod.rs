use clap::Subcommand;
use shoptech_app::context::AppContext;

use crate::config::CliConfig;

mod account;
mod admin;
mod cars;
mod cart;

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Browse the catalog
    Cars(cars::CarsCommand),

    /// Work with the active cart
    Cart(cart::CartCommand),

    /// Register, log in or log out
    Account(account::AccountCommand),

    /// Catalog and user administration
    Admin(admin::AdminCommand),
}

pub(crate) async fn run(config: CliConfig) -> Result<(), String> {
    let context = AppContext::from_config(config.app_config())
        .map_err(|error| format!("failed to open local storage: {error}"))?;

    match config.command {
        Command::Cars(command) => cars::run(command, &context).await,
        Command::Cart(command) => cart::run(command, &context).await,
        Command::Account(command) => account::run(command, &context).await,
        Command::Admin(command) => admin::run(command, &context).await,
    }
}
