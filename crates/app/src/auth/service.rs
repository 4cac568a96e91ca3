//! Account service.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;
use serde::Deserialize;
use tracing::info;

use crate::{
    auth::{AccountAction, AccountError, BearerToken, Credentials, SessionStore},
    http::{ApiClient, ApiError, send_empty, send_json},
};

const REGISTER_PATH: &str = "api/reg/reg_user";
const TOKEN_PATH: &str = "api/reg/token";

/// [`AccountService`] backed by the registration endpoints.
#[derive(Debug, Clone)]
pub struct HttpAccountService {
    api: ApiClient,
}

impl HttpAccountService {
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

#[async_trait]
impl AccountService for HttpAccountService {
    async fn register(&self, credentials: &Credentials) -> Result<(), AccountError> {
        let request = self
            .api
            .request(Method::POST, REGISTER_PATH, None)?
            .json(credentials);

        send_empty(request).await?;

        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> Result<BearerToken, AccountError> {
        let request = self.api.request(Method::POST, TOKEN_PATH, None)?.form(&[
            ("username", credentials.name.as_str()),
            ("password", credentials.password.as_str()),
        ]);

        let response: TokenResponse = send_json(request).await?;

        response
            .access_token
            .and_then(BearerToken::new)
            .ok_or_else(|| ApiError::Malformed("login response has no access_token".into()).into())
    }
}

/// Account registration and login.
#[automock]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Create a new user account.
    ///
    /// # Errors
    ///
    /// Returns an error when the server refuses the account.
    async fn register(&self, credentials: &Credentials) -> Result<(), AccountError>;

    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::LoginRejected`] for unknown credentials.
    async fn login(&self, credentials: &Credentials) -> Result<BearerToken, AccountError>;
}

/// Validate and register a new account.
///
/// # Errors
///
/// Returns an error when validation fails or the server refuses the account.
pub async fn register_account(
    accounts: &dyn AccountService,
    credentials: &Credentials,
) -> Result<(), AccountError> {
    credentials.validate(AccountAction::Register)?;

    accounts.register(credentials).await?;

    info!(name = %credentials.name, "registered account");

    Ok(())
}

/// Validate, log in, and keep the issued credential as the session.
///
/// # Errors
///
/// Returns an error when validation fails, the server rejects the login or
/// the credential cannot be stored.
pub async fn log_in(
    accounts: &dyn AccountService,
    session: &SessionStore,
    credentials: &Credentials,
) -> Result<(), AccountError> {
    credentials.validate(AccountAction::Login)?;

    let token = accounts.login(credentials).await?;

    session.sign_in(&token)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::Url;
    use testresult::TestResult;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, body_string_contains, method, path},
    };

    use crate::{
        auth::CredentialsError,
        storage::{LocalStore, MemoryStore, USER_TOKEN_KEY},
    };

    use super::*;

    fn http_accounts(server: &MockServer) -> TestResult<HttpAccountService> {
        Ok(HttpAccountService::new(ApiClient::new(Url::parse(
            &server.uri(),
        )?)))
    }

    #[tokio::test]
    async fn register_posts_json_credentials() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/reg/reg_user"))
            .and(body_json(serde_json::json!({"name": "alice", "password": "secret1"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let accounts = http_accounts(&server)?;

        register_account(&accounts, &Credentials::new(" alice ", "secret1")).await?;

        Ok(())
    }

    #[tokio::test]
    async fn register_surfaces_server_detail() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/reg/reg_user"))
            .respond_with(
                ResponseTemplate::new(422).set_body_json(serde_json::json!({"detail": "taken"})),
            )
            .mount(&server)
            .await;

        let accounts = http_accounts(&server)?;
        let result = register_account(&accounts, &Credentials::new("alice", "secret1")).await;

        assert!(
            matches!(
                &result,
                Err(AccountError::Api(ApiError::Rejected { detail: Some(detail), .. })) if detail == "taken"
            ),
            "expected rejected registration, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn login_stores_access_token() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/reg/token"))
            .and(body_string_contains("username=alice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "jwt-token",
                "token_type": "bearer",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let session = SessionStore::new(store.clone());
        let accounts = http_accounts(&server)?;

        log_in(&accounts, &session, &Credentials::new("alice", "pw")).await?;

        assert_eq!(store.get(USER_TOKEN_KEY)?.as_deref(), Some("jwt-token"));

        Ok(())
    }

    #[tokio::test]
    async fn login_without_token_is_malformed() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/reg/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let session = SessionStore::new(Arc::new(MemoryStore::new()));
        let accounts = http_accounts(&server)?;
        let result = log_in(&accounts, &session, &Credentials::new("alice", "pw")).await;

        assert!(
            matches!(result, Err(AccountError::Api(ApiError::Malformed(_)))),
            "expected malformed response, got {result:?}"
        );
        assert!(session.token().is_none());

        Ok(())
    }

    #[tokio::test]
    async fn wrong_password_is_login_rejected() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/reg/token"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"detail": "Invalid credentials"})),
            )
            .mount(&server)
            .await;

        let session = SessionStore::new(Arc::new(MemoryStore::new()));
        let accounts = http_accounts(&server)?;
        let result = log_in(&accounts, &session, &Credentials::new("alice", "nope")).await;

        assert!(
            matches!(result, Err(AccountError::LoginRejected)),
            "expected LoginRejected, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn invalid_credentials_never_reach_the_server() -> TestResult {
        let mut accounts = MockAccountService::new();

        accounts.expect_register().never();
        accounts.expect_login().never();

        let session = SessionStore::new(Arc::new(MemoryStore::new()));

        let register = register_account(&accounts, &Credentials::new("a", "secret1")).await;
        let login = log_in(&accounts, &session, &Credentials::new("alice", "")).await;

        assert!(matches!(
            register,
            Err(AccountError::Invalid(CredentialsError::NameTooShort(_)))
        ));
        assert!(matches!(
            login,
            Err(AccountError::Invalid(CredentialsError::MissingPassword))
        ));

        Ok(())
    }
}
