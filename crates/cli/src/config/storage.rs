//! Storage Config

use std::path::PathBuf;

use clap::Args;

/// Local storage settings.
#[derive(Debug, Args)]
pub struct StorageConfig {
    /// Directory holding the guest cart and session
    #[arg(long, env = "SHOPTECH_DATA_DIR", default_value = ".shoptech")]
    pub data_dir: PathBuf,
}
