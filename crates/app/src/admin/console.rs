//! Admin console: the admin session plus the operations it unlocks.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::{
    admin::{AdminError, AdminService, AdminUser, CreatedCar, NewCar},
    auth::{AccountAction, BearerToken, Credentials, SessionStore},
    domain::catalog::CarId,
    http::ApiError,
};

/// Runs admin operations with the stored admin credential.
///
/// A credential the server rejects is cleared and the operation fails with
/// [`AdminError::AuthExpired`].
#[derive(Clone)]
pub struct AdminConsole {
    admin: Arc<dyn AdminService>,
    session: SessionStore,
}

impl AdminConsole {
    /// Console over `admin`, keeping its credential in `session`.
    #[must_use]
    pub fn new(admin: Arc<dyn AdminService>, session: SessionStore) -> Self {
        Self { admin, session }
    }

    /// Whether an admin credential is stored.
    #[must_use]
    pub fn signed_in(&self) -> bool {
        self.session.token().is_some()
    }

    /// Log in as admin and keep the issued credential.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::LoginRejected`] for unknown credentials, or an
    /// error when validation, the request, or storage fails.
    #[instrument(skip(self))]
    pub async fn log_in(&self, credentials: &Credentials) -> Result<(), AdminError> {
        credentials.validate(AccountAction::Login)?;

        let token = self
            .admin
            .login(credentials)
            .await
            .map_err(|error| match error {
                ApiError::Unauthorized => AdminError::LoginRejected,
                other => AdminError::Api(other),
            })?;

        self.session.sign_in(&token)?;

        info!(name = %credentials.name, "admin signed in");

        Ok(())
    }

    /// Forget the admin credential.
    ///
    /// # Errors
    ///
    /// Returns an error when local storage cannot be written.
    pub fn log_out(&self) -> Result<(), AdminError> {
        self.session.sign_out()?;

        Ok(())
    }

    /// Validate and upload a new catalog entry.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::InvalidCar`] before anything is sent, or the
    /// failure of the upload.
    #[instrument(skip(self, car), fields(brand = %car.brand, model = %car.model))]
    pub async fn create_car(&self, car: &NewCar) -> Result<CreatedCar, AdminError> {
        car.validate()?;

        let token = self.token()?;
        let created = self.admin.create_car(&token, car).await;

        self.settle(created)
    }

    /// Remove a car from the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::SignInRequired`] without a credential, or the
    /// failure of the request.
    #[instrument(skip(self))]
    pub async fn delete_car(&self, car: CarId) -> Result<(), AdminError> {
        let token = self.token()?;
        let deleted = self.admin.delete_car(&token, car).await;

        self.settle(deleted)
    }

    /// All registered users.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::SignInRequired`] without a credential, or the
    /// failure of the request.
    #[instrument(skip(self))]
    pub async fn users(&self) -> Result<Vec<AdminUser>, AdminError> {
        let token = self.token()?;
        let users = self.admin.list_users(&token).await;

        self.settle(users)
    }

    /// Remove a user account.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::SignInRequired`] without a credential, or the
    /// failure of the request.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, user_id: u64) -> Result<(), AdminError> {
        let token = self.token()?;
        let deleted = self.admin.delete_user(&token, user_id).await;

        self.settle(deleted)
    }

    fn token(&self) -> Result<BearerToken, AdminError> {
        self.session.token().ok_or(AdminError::SignInRequired)
    }

    fn settle<T>(&self, result: Result<T, ApiError>) -> Result<T, AdminError> {
        match result {
            Err(ApiError::Unauthorized) => {
                warn!("admin credential rejected, clearing it");
                self.session.sign_out()?;

                Err(AdminError::AuthExpired)
            }
            other => other.map_err(AdminError::from),
        }
    }
}

impl std::fmt::Debug for AdminConsole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConsole")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
