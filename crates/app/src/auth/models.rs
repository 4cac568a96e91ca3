//! Account models.

use serde::Serialize;

use crate::auth::CredentialsError;

const MIN_NAME_CHARS: usize = 2;
const MIN_PASSWORD_CHARS: usize = 6;

/// What the submitted credentials are for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountAction {
    /// Creating an account; length rules apply.
    Register,
    /// Signing in; only presence is checked.
    Login,
}

/// Name and password as submitted by the user.
#[derive(Clone, Serialize)]
pub struct Credentials {
    /// Account name, trimmed.
    pub name: String,
    /// Password, sent as-is.
    pub password: String,
}

impl Credentials {
    /// Build credentials, trimming the name.
    #[must_use]
    pub fn new(name: &str, password: impl Into<String>) -> Self {
        Self {
            name: name.trim().to_string(),
            password: password.into(),
        }
    }

    /// Check the credentials before anything is sent to the server.
    ///
    /// # Errors
    ///
    /// Returns the first rule the credentials break.
    pub fn validate(&self, action: AccountAction) -> Result<(), CredentialsError> {
        if self.name.is_empty() {
            return Err(CredentialsError::MissingName);
        }

        if self.password.is_empty() {
            return Err(CredentialsError::MissingPassword);
        }

        if action == AccountAction::Register {
            if self.name.chars().count() < MIN_NAME_CHARS {
                return Err(CredentialsError::NameTooShort(MIN_NAME_CHARS));
            }

            if self.password.chars().count() < MIN_PASSWORD_CHARS {
                return Err(CredentialsError::PasswordTooShort(MIN_PASSWORD_CHARS));
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("name", &self.name)
            .field("password", &"**redacted**")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_only_requires_presence() {
        assert!(Credentials::new("a", "b").validate(AccountAction::Login).is_ok());
    }

    #[test]
    fn name_is_trimmed_before_validation() {
        let result = Credentials::new("   ", "secret").validate(AccountAction::Login);

        assert!(matches!(result, Err(CredentialsError::MissingName)));
    }

    #[test]
    fn registration_enforces_lengths() {
        let short_name = Credentials::new("a", "secret1").validate(AccountAction::Register);
        let short_password = Credentials::new("alice", "12345").validate(AccountAction::Register);

        assert!(matches!(short_name, Err(CredentialsError::NameTooShort(2))));
        assert!(matches!(
            short_password,
            Err(CredentialsError::PasswordTooShort(6))
        ));
        assert!(
            Credentials::new("al", "123456")
                .validate(AccountAction::Register)
                .is_ok()
        );
    }

    #[test]
    fn debug_hides_password() {
        let debug = format!("{:?}", Credentials::new("alice", "hunter22"));

        assert!(!debug.contains("hunter22"), "password leaked: {debug}");
    }
}
