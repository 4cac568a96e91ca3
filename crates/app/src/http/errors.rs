//! API errors.

use std::error::Error as StdError;

use reqwest::StatusCode;
use thiserror::Error;

/// `detail` message the backend sends when a bearer credential is rejected.
pub const INVALID_CREDENTIALS_DETAIL: &str = "Could not validate credentials";

/// Classified outcome of a failed REST call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server could not be reached at all.
    #[error("cannot reach server")]
    Unreachable(#[source] Box<dyn StdError + Send + Sync>),

    /// The bearer credential was rejected.
    #[error("credentials were rejected")]
    Unauthorized,

    /// The server answered with a non-success status.
    #[error("server rejected the request{}", describe_failure(*.status, .detail.as_deref()))]
    Rejected {
        /// HTTP status of the response.
        status: StatusCode,
        /// Message extracted from the response body, if any.
        detail: Option<String>,
    },

    /// The server answered with a body of the wrong shape.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The request could not be built, so nothing was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        Self::Unreachable(Box::new(error))
    }
}

/// Suffix appended to a failure message: `": detail"` or `" (HTTP 500)"`.
pub fn describe_failure(status: StatusCode, detail: Option<&str>) -> String {
    match detail {
        Some(detail) => format!(": {detail}"),
        None => format!(" (HTTP {})", status.as_u16()),
    }
}
