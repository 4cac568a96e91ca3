//! Cart errors.

use std::error::Error as StdError;

use reqwest::StatusCode;
use thiserror::Error;

use crate::{
    http::{ApiError, describe_failure},
    storage::StoreError,
};

/// Every way a cart action can fail.
///
/// The first four come from the network; only [`CartError::AuthExpired`]
/// changes local state (the credential is evicted before it is returned).
#[derive(Debug, Error)]
pub enum CartError {
    /// The server could not be reached.
    #[error("cannot reach server")]
    NetworkUnavailable(#[source] Box<dyn StdError + Send + Sync>),

    /// The server answered with a failure status.
    #[error("server rejected the request{}", describe_failure(*.status, .detail.as_deref()))]
    ServerRejected {
        /// HTTP status of the response.
        status: StatusCode,
        /// Message extracted from the response body, if any.
        detail: Option<String>,
    },

    /// The credential was rejected and has been evicted.
    #[error("session expired, please log in again")]
    AuthExpired,

    /// A success response could not be decoded.
    #[error("unexpected response format: {0}")]
    MalformedResponse(String),

    /// The request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Checkout with nothing rendered.
    #[error("cart is empty")]
    EmptyCart,

    /// Merge without a session.
    #[error("log in to use the account cart")]
    SignInRequired,

    /// The guest cart or session could not be written.
    #[error("failed to update local storage")]
    Storage(#[from] StoreError),
}

impl From<ApiError> for CartError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Unreachable(source) => Self::NetworkUnavailable(source),
            ApiError::Unauthorized => Self::AuthExpired,
            ApiError::Rejected { status, detail } => Self::ServerRejected { status, detail },
            ApiError::Malformed(reason) => Self::MalformedResponse(reason),
            ApiError::InvalidRequest(reason) => Self::InvalidRequest(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_map_one_to_one() {
        assert!(matches!(
            CartError::from(ApiError::Unreachable("refused".into())),
            CartError::NetworkUnavailable(_)
        ));
        assert!(matches!(
            CartError::from(ApiError::Unauthorized),
            CartError::AuthExpired
        ));
        assert!(matches!(
            CartError::from(ApiError::Malformed("x".into())),
            CartError::MalformedResponse(_)
        ));
        assert!(matches!(
            CartError::from(ApiError::InvalidRequest("x".into())),
            CartError::InvalidRequest(_)
        ));
        assert!(matches!(
            CartError::from(ApiError::Rejected {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                detail: None,
            }),
            CartError::ServerRejected {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                detail: None
            }
        ));
    }

    #[test]
    fn rejected_message_includes_detail() {
        let error = CartError::ServerRejected {
            status: StatusCode::BAD_REQUEST,
            detail: Some("car is sold out".to_string()),
        };

        assert_eq!(error.to_string(), "server rejected the request: car is sold out");
    }
}
