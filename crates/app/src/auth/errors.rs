//! Account errors.

use thiserror::Error;

use crate::{http::ApiError, storage::StoreError};

/// Credentials rejected before reaching the server.
#[derive(Debug, Error)]
pub enum CredentialsError {
    /// Name was blank.
    #[error("name is required")]
    MissingName,

    /// Password was empty.
    #[error("password is required")]
    MissingPassword,

    /// Name shorter than the minimum for registration.
    #[error("name must be at least {0} characters")]
    NameTooShort(usize),

    /// Password shorter than the minimum for registration.
    #[error("password must be at least {0} characters")]
    PasswordTooShort(usize),
}

/// Failure of a registration or login.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Credentials failed local validation.
    #[error(transparent)]
    Invalid(#[from] CredentialsError),

    /// The server did not accept the name and password.
    #[error("login failed: name or password was not accepted")]
    LoginRejected,

    /// Any other API failure.
    #[error(transparent)]
    Api(ApiError),

    /// The issued credential could not be stored.
    #[error("failed to store session")]
    Storage(#[from] StoreError),
}

impl From<ApiError> for AccountError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Unauthorized => Self::LoginRejected,
            other => Self::Api(other),
        }
    }
}
