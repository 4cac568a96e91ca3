//! Bearer credential.

use std::fmt;

use zeroize::Zeroize;

/// Opaque bearer token forwarded on authenticated requests.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken {
    value: String,
}

impl BearerToken {
    /// Wrap a raw token. Blank input is not a credential.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return None;
        }

        Some(Self { value })
    }

    /// Raw token text, for the `Authorization` header and storage only.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.value
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(**redacted**)")?;
        Ok(())
    }
}

impl Drop for BearerToken {
    fn drop(&mut self) {
        self.value.zeroize();
    }
}
