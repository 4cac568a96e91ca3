//! ShopTech command line client

use std::process;

use crate::config::CliConfig;

mod commands;
mod config;
mod observability;
mod render;

#[tokio::main]
pub async fn main() {
    let config = CliConfig::load().unwrap_or_else(|error| error.exit());

    if let Err(error) = observability::init(&config.logging) {
        eprintln!("failed to initialise logging: {error}");
        process::exit(1);
    }

    if let Err(message) = commands::run(config).await {
        eprintln!("{message}");
        process::exit(1);
    }
}
