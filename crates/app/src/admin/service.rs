//! Admin service.

use async_trait::async_trait;
use mockall::automock;
use reqwest::{
    Method,
    multipart::{Form, Part},
};
use serde::Deserialize;

use crate::{
    admin::{AdminUser, CreatedCar, NewCar},
    auth::{BearerToken, Credentials},
    domain::catalog::CarId,
    http::{ApiClient, ApiError, send_empty, send_json},
};

const TOKEN_PATH: &str = "api/admin/token";
const CREATE_CAR_PATH: &str = "api/admin/create_car";
const DELETE_CAR_PATH: &str = "api/admin/delete_car";
const ALL_USERS_PATH: &str = "api/admin/all_users";
const DELETE_USER_PATH: &str = "api/admin/delete_user";

/// [`AdminService`] backed by the `/api/admin` endpoints.
#[derive(Debug, Clone)]
pub struct HttpAdminService {
    api: ApiClient,
}

impl HttpAdminService {
    /// Service over `api`.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

fn car_form(car: &NewCar) -> Result<Form, ApiError> {
    let image = Part::bytes(car.image.bytes().to_vec())
        .file_name(car.image.file_name().to_string())
        .mime_str(car.image.format().mime())
        .map_err(|error| ApiError::InvalidRequest(format!("image part: {error}")))?;

    Ok(Form::new()
        .text("brand", car.brand.trim().to_string())
        .text("model", car.model.trim().to_string())
        .text("power", car.power.to_string())
        .text("displacement", car.displacement.normalize().to_string())
        .text("drive", car.drive.as_str())
        .text("price", car.price.normalize().to_string())
        .part("image", image))
}

#[async_trait]
impl AdminService for HttpAdminService {
    async fn login(&self, credentials: &Credentials) -> Result<BearerToken, ApiError> {
        let request = self.api.request(Method::POST, TOKEN_PATH, None)?.form(&[
            ("username", credentials.name.as_str()),
            ("password", credentials.password.as_str()),
        ]);

        let response: TokenResponse = send_json(request).await?;

        response
            .access_token
            .and_then(BearerToken::new)
            .ok_or_else(|| ApiError::Malformed("admin login response has no access_token".into()))
    }

    async fn create_car(&self, token: &BearerToken, car: &NewCar) -> Result<CreatedCar, ApiError> {
        let request = self
            .api
            .request(Method::POST, CREATE_CAR_PATH, Some(token))?
            .multipart(car_form(car)?);

        send_json(request).await
    }

    async fn delete_car(&self, token: &BearerToken, car: CarId) -> Result<(), ApiError> {
        let request = self
            .api
            .request(Method::DELETE, DELETE_CAR_PATH, Some(token))?
            .query(&[("id", car.get())]);

        send_empty(request).await
    }

    async fn list_users(&self, token: &BearerToken) -> Result<Vec<AdminUser>, ApiError> {
        let request = self.api.request(Method::GET, ALL_USERS_PATH, Some(token))?;

        send_json(request).await
    }

    async fn delete_user(&self, token: &BearerToken, user_id: u64) -> Result<(), ApiError> {
        let request = self
            .api
            .request(Method::DELETE, DELETE_USER_PATH, Some(token))?
            .query(&[("id", user_id)]);

        send_empty(request).await
    }
}

/// Catalog and user administration.
#[automock]
#[async_trait]
pub trait AdminService: Send + Sync {
    /// Exchange admin credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] for unknown credentials.
    async fn login(&self, credentials: &Credentials) -> Result<BearerToken, ApiError>;

    /// Upload a new catalog entry with its picture.
    ///
    /// # Errors
    ///
    /// Returns the classified failure of the request.
    async fn create_car(&self, token: &BearerToken, car: &NewCar) -> Result<CreatedCar, ApiError>;

    /// Remove a car from the catalog.
    ///
    /// # Errors
    ///
    /// Returns the classified failure of the request.
    async fn delete_car(&self, token: &BearerToken, car: CarId) -> Result<(), ApiError>;

    /// All registered users.
    ///
    /// # Errors
    ///
    /// Returns the classified failure of the request.
    async fn list_users(&self, token: &BearerToken) -> Result<Vec<AdminUser>, ApiError>;

    /// Remove a user account.
    ///
    /// # Errors
    ///
    /// Returns the classified failure of the request.
    async fn delete_user(&self, token: &BearerToken, user_id: u64) -> Result<(), ApiError>;
}
