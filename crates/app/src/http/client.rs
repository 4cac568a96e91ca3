//! HTTP client for the shop REST API.

use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::{
    auth::BearerToken,
    http::{ApiError, INVALID_CREDENTIALS_DETAIL, error_detail},
};

/// Thin wrapper over [`reqwest::Client`] bound to the API origin.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: Url,
    http: Client,
}

impl ApiClient {
    /// Create a client for the API served at `base`.
    #[must_use]
    pub fn new(base: Url) -> Self {
        Self::with_client(base, Client::new())
    }

    /// Create a client reusing an existing connection pool.
    #[must_use]
    pub fn with_client(mut base: Url, http: Client) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Self { base, http }
    }

    /// API origin, always ending in `/`.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolve a path relative to the API origin.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] when the path cannot form a URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|error| ApiError::InvalidRequest(format!("bad endpoint {path:?}: {error}")))
    }

    pub(crate) fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&BearerToken>,
    ) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(path)?;

        debug!(%method, %url, authenticated = token.is_some(), "api request");

        let request = self.http.request(method, url);

        Ok(match token {
            Some(token) => request.bearer_auth(token.expose()),
            None => request,
        })
    }
}

/// Send `request` and decode a successful JSON body into `T`.
pub(crate) async fn send_json<T>(request: RequestBuilder) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let body = execute(request).await?;

    serde_json::from_str(&body).map_err(|error| ApiError::Malformed(error.to_string()))
}

/// Send `request`, ignoring any successful body.
pub(crate) async fn send_empty(request: RequestBuilder) -> Result<(), ApiError> {
    execute(request).await.map(drop)
}

async fn execute(request: RequestBuilder) -> Result<String, ApiError> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    debug!(status = status.as_u16(), bytes = body.len(), "api response");

    if status == StatusCode::UNAUTHORIZED || rejects_credentials(&body) {
        return Err(ApiError::Unauthorized);
    }

    if !status.is_success() {
        return Err(ApiError::Rejected {
            status,
            detail: error_detail(&body),
        });
    }

    Ok(body)
}

fn rejects_credentials(body: &str) -> bool {
    serde_json::from_str::<Value>(body).is_ok_and(|value| {
        value.get("detail").and_then(Value::as_str) == Some(INVALID_CREDENTIALS_DETAIL)
    })
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() -> TestResult {
        let client = ApiClient::new(Url::parse("http://shop.test/prefix")?);

        assert_eq!(client.base_url().as_str(), "http://shop.test/prefix/");
        assert_eq!(
            client.endpoint("/api/cars/all")?.as_str(),
            "http://shop.test/prefix/api/cars/all"
        );

        Ok(())
    }

    #[test]
    fn unusable_path_is_an_invalid_request() -> TestResult {
        let client = ApiClient::new(Url::parse("http://shop.test/")?);

        let result = client.endpoint("http://[broken");

        assert!(
            matches!(result, Err(ApiError::InvalidRequest(_))),
            "expected InvalidRequest, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn credential_rejection_is_detected_in_any_body() {
        assert!(rejects_credentials(
            r#"{"detail": "Could not validate credentials"}"#
        ));
        assert!(!rejects_credentials(r#"{"detail": "Not found"}"#));
        assert!(!rejects_credentials("[]"));
        assert!(!rejects_credentials("not json"));
    }
}
