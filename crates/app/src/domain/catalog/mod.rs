//! Catalog

pub mod models;
mod service;

pub use models::{CarId, CatalogItem};
pub use service::*;
