//! App Context

use std::{path::PathBuf, sync::Arc};

use reqwest::Url;
use thiserror::Error;

use crate::{
    admin::{AdminConsole, AdminService, HttpAdminService},
    auth::{AccountService, HttpAccountService, SessionStore},
    domain::{
        carts::{CartController, CartService, HttpCartService},
        catalog::{CatalogService, HttpCatalogService},
    },
    http::ApiClient,
    storage::{FileStore, LocalStore, StoreError},
};

/// Failure to build the application context.
#[derive(Debug, Error)]
pub enum AppInitError {
    /// The data directory could not be prepared.
    #[error("failed to open local storage")]
    Storage(#[source] StoreError),
}

/// Where the API lives and where local state is kept.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Origin of the shop REST API.
    pub api_base_url: Url,
    /// Directory holding local storage.
    pub data_dir: PathBuf,
}

/// Shared services for one process.
#[derive(Clone)]
pub struct AppContext {
    /// REST client every service shares.
    pub api: ApiClient,
    /// Local storage for the guest cart and sessions.
    pub store: Arc<dyn LocalStore>,
    /// Catalog source.
    pub catalog: Arc<dyn CatalogService>,
    /// Server cart service.
    pub carts: Arc<dyn CartService>,
    /// Registration and login.
    pub accounts: Arc<dyn AccountService>,
    /// Catalog and user administration.
    pub admin: Arc<dyn AdminService>,
}

impl AppContext {
    /// Build application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the data directory cannot be prepared.
    pub fn from_config(config: AppConfig) -> Result<Self, AppInitError> {
        let store = FileStore::open(&config.data_dir).map_err(AppInitError::Storage)?;

        Ok(Self::with_store(ApiClient::new(config.api_base_url), Arc::new(store)))
    }

    /// Build application context over an existing store.
    #[must_use]
    pub fn with_store(api: ApiClient, store: Arc<dyn LocalStore>) -> Self {
        Self {
            catalog: Arc::new(HttpCatalogService::new(api.clone())),
            carts: Arc::new(HttpCartService::new(api.clone())),
            accounts: Arc::new(HttpAccountService::new(api.clone())),
            admin: Arc::new(HttpAdminService::new(api.clone())),
            api,
            store,
        }
    }

    /// A fresh controller for one page session.
    #[must_use]
    pub fn cart_controller(&self) -> CartController {
        CartController::new(
            self.catalog.clone(),
            self.carts.clone(),
            self.store.clone(),
        )
    }

    /// The user session over the shared store.
    #[must_use]
    pub fn session(&self) -> SessionStore {
        SessionStore::new(self.store.clone())
    }

    /// Admin operations under the admin session.
    #[must_use]
    pub fn admin_console(&self) -> AdminConsole {
        AdminConsole::new(self.admin.clone(), SessionStore::admin(self.store.clone()))
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}
