//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;

use crate::{
    auth::BearerToken,
    domain::{
        carts::models::{CartEntry, Purchase},
        catalog::CarId,
    },
    http::{ApiClient, ApiError, send_empty, send_json},
};

const CART_PATH: &str = "api/cars/cart";
const ADD_CAR_PATH: &str = "api/cars/add_car";
const BUY_CAR_PATH: &str = "api/cars/buy";
const BUY_ALL_PATH: &str = "api/cars/buy_all";

/// [`CartService`] backed by the `/api/cars` cart endpoints.
#[derive(Debug, Clone)]
pub struct HttpCartService {
    api: ApiClient,
}

impl HttpCartService {
    /// Service over `api`.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CartService for HttpCartService {
    async fn list_items(&self, token: &BearerToken) -> Result<Vec<CartEntry>, ApiError> {
        let request = self.api.request(Method::GET, CART_PATH, Some(token))?;

        send_json(request).await
    }

    async fn add_item(&self, token: &BearerToken, car: CarId) -> Result<(), ApiError> {
        let request = self
            .api
            .request(Method::POST, ADD_CAR_PATH, Some(token))?
            .query(&[("car_id", car.get())]);

        send_empty(request).await
    }

    async fn buy_item(&self, token: &BearerToken, car: CarId) -> Result<(), ApiError> {
        let request = self
            .api
            .request(Method::DELETE, BUY_CAR_PATH, Some(token))?
            .query(&[("car_id", car.get())]);

        send_empty(request).await
    }

    async fn buy_all(&self, token: &BearerToken) -> Result<Purchase, ApiError> {
        let request = self.api.request(Method::DELETE, BUY_ALL_PATH, Some(token))?;

        send_json(request).await
    }
}

/// The signed-in user's server cart.
#[automock]
#[async_trait]
pub trait CartService: Send + Sync {
    /// Retrieves the signed-in user's cart.
    ///
    /// # Errors
    ///
    /// Returns the classified failure of the request.
    async fn list_items(&self, token: &BearerToken) -> Result<Vec<CartEntry>, ApiError>;

    /// Adds a car to the signed-in user's cart.
    ///
    /// # Errors
    ///
    /// Returns the classified failure of the request.
    async fn add_item(&self, token: &BearerToken, car: CarId) -> Result<(), ApiError>;

    /// Buys a single car from the signed-in user's cart.
    ///
    /// # Errors
    ///
    /// Returns the classified failure of the request.
    async fn buy_item(&self, token: &BearerToken, car: CarId) -> Result<(), ApiError>;

    /// Buys everything in the signed-in user's cart.
    ///
    /// # Errors
    ///
    /// Returns the classified failure of the request.
    async fn buy_all(&self, token: &BearerToken) -> Result<Purchase, ApiError>;
}

#[cfg(test)]
mod tests {
    use reqwest::Url;
    use rust_decimal::Decimal;
    use testresult::TestResult;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path, query_param},
    };

    use super::*;

    fn service(server: &MockServer) -> TestResult<HttpCartService> {
        Ok(HttpCartService::new(ApiClient::new(Url::parse(
            &server.uri(),
        )?)))
    }

    fn token() -> TestResult<BearerToken> {
        Ok(BearerToken::new("jwt").ok_or("token should be valid")?)
    }

    fn car(id: u64) -> TestResult<CarId> {
        Ok(CarId::new(id).ok_or("car id should be positive")?)
    }

    #[tokio::test]
    async fn list_items_sends_bearer_token() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/cars/cart"))
            .and(header("authorization", "Bearer jwt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 10, "car_id": 1, "price": 1000, "brand": "Lada", "model": "Niva"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let entries = service(&server)?.list_items(&token()?).await?;

        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries.first().and_then(|entry| entry.price),
            Some(Decimal::from(1000))
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_item_passes_car_id_as_query() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/cars/add_car"))
            .and(query_param("car_id", "7"))
            .and(header("authorization", "Bearer jwt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(null)))
            .expect(1)
            .mount(&server)
            .await;

        service(&server)?.add_item(&token()?, car(7)?).await?;

        Ok(())
    }

    #[tokio::test]
    async fn buy_item_uses_delete() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/cars/buy"))
            .and(query_param("car_id", "3"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        service(&server)?.buy_item(&token()?, car(3)?).await?;

        Ok(())
    }

    #[tokio::test]
    async fn buy_all_returns_server_totals() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/cars/buy_all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items_count": 2,
                "total_price": 3400
            })))
            .mount(&server)
            .await;

        let purchase = service(&server)?.buy_all(&token()?).await?;

        assert_eq!(
            purchase,
            Purchase {
                items_count: 2,
                total_price: Decimal::from(3400)
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn status_401_is_unauthorized() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/cars/cart"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let result = service(&server)?.list_items(&token()?).await;

        assert!(
            matches!(result, Err(ApiError::Unauthorized)),
            "expected Unauthorized, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn invalid_credentials_body_is_unauthorized() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/cars/add_car"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(serde_json::json!({"detail": "Could not validate credentials"})),
            )
            .mount(&server)
            .await;

        let result = service(&server)?.add_item(&token()?, car(1)?).await;

        assert!(
            matches!(result, Err(ApiError::Unauthorized)),
            "expected Unauthorized, got {result:?}"
        );

        Ok(())
    }
}
