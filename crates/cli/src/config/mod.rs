//! Client configuration

use clap::Parser;
use shoptech_app::context::AppConfig;

use crate::{
    commands::Command,
    config::{api::ApiConfig, logging::LoggingConfig, storage::StorageConfig},
};

pub(crate) mod api;
pub(crate) mod logging;
pub(crate) mod storage;

/// ShopTech car shop client
#[derive(Debug, Parser)]
#[command(name = "shoptech", about = "ShopTech car shop client", long_about = None)]
pub(crate) struct CliConfig {
    /// Shop API settings.
    #[command(flatten)]
    pub api: ApiConfig,

    /// Local storage settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(subcommand)]
    pub(crate) command: Command,
}

impl CliConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Settings the application context is built from.
    #[must_use]
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            api_base_url: self.api.api_base_url.clone(),
            data_dir: self.storage.data_dir.clone(),
        }
    }
}
