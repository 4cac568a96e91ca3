//! API Config

use clap::Args;
use reqwest::Url;

/// Shop API settings.
#[derive(Debug, Args)]
pub struct ApiConfig {
    /// Base URL of the shop REST API
    #[arg(
        long,
        env = "SHOPTECH_API_BASE_URL",
        default_value = "http://localhost:8000"
    )]
    pub api_base_url: Url,
}
