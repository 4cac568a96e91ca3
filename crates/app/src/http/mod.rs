//! REST boundary shared by the catalog, cart and account services.

mod client;
mod detail;
mod errors;

pub use client::ApiClient;
pub(crate) use client::{send_empty, send_json};
pub use detail::error_detail;
pub use errors::{ApiError, INVALID_CREDENTIALS_DETAIL, describe_failure};
