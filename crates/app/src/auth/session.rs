//! Session credential persistence.

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    auth::BearerToken,
    storage::{ADMIN_TOKEN_KEY, LocalStore, StoreError, USER_TOKEN_KEY},
};

/// A process-wide session: at most one bearer token under one store key.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn LocalStore>,
    key: &'static str,
}

impl SessionStore {
    /// Session kept under the user credential key.
    #[must_use]
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self {
            store,
            key: USER_TOKEN_KEY,
        }
    }

    /// Session kept under the admin credential key.
    #[must_use]
    pub fn admin(store: Arc<dyn LocalStore>) -> Self {
        Self {
            store,
            key: ADMIN_TOKEN_KEY,
        }
    }

    /// Current credential, if one that looks usable is stored.
    ///
    /// Unreadable storage counts as signed out.
    pub fn token(&self) -> Option<BearerToken> {
        match self.store.get(self.key) {
            Ok(raw) => raw.and_then(BearerToken::new),
            Err(error) => {
                warn!(key = self.key, "failed to read session credential: {error}");

                None
            }
        }
    }

    /// Persist a freshly issued credential.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be written.
    pub fn sign_in(&self, token: &BearerToken) -> Result<(), StoreError> {
        self.store.set(self.key, token.expose())?;

        info!(key = self.key, "stored session credential");

        Ok(())
    }

    /// Forget the stored credential. Used for logout and for eviction after
    /// the server rejects it.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be written.
    pub fn sign_out(&self) -> Result<(), StoreError> {
        self.store.remove(self.key)?;

        info!(key = self.key, "cleared session credential");

        Ok(())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::storage::MemoryStore;

    use super::*;

    #[test]
    fn empty_store_is_signed_out() {
        let session = SessionStore::new(Arc::new(MemoryStore::new()));

        assert!(session.token().is_none());
    }

    #[test]
    fn blank_stored_value_is_signed_out() {
        let session = SessionStore::new(Arc::new(MemoryStore::with_entries([(
            USER_TOKEN_KEY,
            "   ",
        )])));

        assert!(session.token().is_none());
    }

    #[test]
    fn sign_in_then_sign_out() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        let session = SessionStore::new(store.clone());
        let token = BearerToken::new("jwt").ok_or("token should be valid")?;

        session.sign_in(&token)?;

        assert_eq!(session.token(), Some(token));
        assert_eq!(store.get(USER_TOKEN_KEY)?.as_deref(), Some("jwt"));

        session.sign_out()?;

        assert!(session.token().is_none());

        Ok(())
    }

    #[test]
    fn admin_session_uses_its_own_key() -> TestResult {
        let store = Arc::new(MemoryStore::with_entries([(USER_TOKEN_KEY, "user-jwt")]));
        let admin = SessionStore::admin(store.clone());

        assert!(admin.token().is_none());

        admin.sign_in(&BearerToken::new("admin-jwt").ok_or("token should be valid")?)?;
        admin.sign_out()?;

        assert_eq!(store.get(USER_TOKEN_KEY)?.as_deref(), Some("user-jwt"));
        assert!(store.get(ADMIN_TOKEN_KEY)?.is_none());

        Ok(())
    }
}
