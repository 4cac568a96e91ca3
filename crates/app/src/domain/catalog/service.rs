//! Catalog service.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;

use crate::{
    domain::catalog::models::CatalogItem,
    http::{ApiClient, ApiError, send_json},
};

const LIST_CARS_PATH: &str = "api/cars/all";

/// [`CatalogService`] backed by `GET /api/cars/all`.
#[derive(Debug, Clone)]
pub struct HttpCatalogService {
    api: ApiClient,
}

impl HttpCatalogService {
    /// Service over `api`.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CatalogService for HttpCatalogService {
    async fn list_cars(&self) -> Result<Vec<CatalogItem>, ApiError> {
        let request = self.api.request(Method::GET, LIST_CARS_PATH, None)?;

        send_json(request).await
    }
}

/// Source of the car catalog.
#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Retrieves every car in the catalog.
    ///
    /// # Errors
    ///
    /// Returns the classified failure of the request.
    async fn list_cars(&self) -> Result<Vec<CatalogItem>, ApiError>;
}
