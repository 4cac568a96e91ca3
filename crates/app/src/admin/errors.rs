//! Admin errors.

use std::io;

use thiserror::Error;

use crate::{auth::CredentialsError, http::ApiError, storage::StoreError};

/// A new catalog entry rejected before upload.
#[derive(Debug, Error)]
pub enum NewCarError {
    /// Brand was blank.
    #[error("brand is required")]
    MissingBrand,

    /// Model was blank.
    #[error("model is required")]
    MissingModel,

    /// A numeric field was zero or negative.
    #[error("{0} must be positive")]
    NotPositive(&'static str),

    /// Drive was not one of `front`, `rear` or `all`.
    #[error("unknown drive {0:?}: expected front, rear or all")]
    UnknownDrive(String),

    /// The picture file was empty.
    #[error("image is empty")]
    EmptyImage,

    /// The picture was neither PNG nor JPEG.
    #[error("only PNG and JPEG images are accepted")]
    UnsupportedImage,

    /// The picture file could not be read.
    #[error("failed to read image")]
    ImageUnreadable(#[source] io::Error),
}

/// Failure of an admin operation.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Login name or password failed local validation.
    #[error(transparent)]
    Invalid(#[from] CredentialsError),

    /// The catalog entry failed local validation.
    #[error(transparent)]
    InvalidCar(#[from] NewCarError),

    /// The server did not accept the admin name and password.
    #[error("admin login failed: name or password was not accepted")]
    LoginRejected,

    /// No admin credential is stored.
    #[error("admin sign-in required")]
    SignInRequired,

    /// The stored admin credential was rejected and has been cleared.
    #[error("admin session expired, log in again")]
    AuthExpired,

    /// Any other API failure.
    #[error(transparent)]
    Api(ApiError),

    /// The admin credential could not be stored or cleared.
    #[error("failed to update admin session")]
    Storage(#[from] StoreError),
}

impl From<ApiError> for AdminError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Unauthorized => Self::AuthExpired,
            other => Self::Api(other),
        }
    }
}
