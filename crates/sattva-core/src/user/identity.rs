//! Identity provider trait and credential validation.

use async_trait::async_trait;

use super::model::Identity;
use crate::error::{Result, SattvaError};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Validates credentials before any external call is made.
///
/// # Errors
///
/// Returns [`SattvaError::Validation`] for a malformed email or a password
/// shorter than [`MIN_PASSWORD_LEN`]. No state is mutated and no network
/// call happens on rejection.
pub fn validate_credentials(email: &str, password: &str) -> Result<()> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(SattvaError::validation("Please enter a valid email address"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(SattvaError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// External identity collaborator.
///
/// Implementations return an [`Identity`] on success or an
/// [`SattvaError::Auth`] carrying a human-readable message on rejection.
/// The core only needs "authenticated identity present/absent" plus a
/// success callback hook on the controller side.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Registers a new identity.
    async fn sign_up(&self, email: &str, password: &str, full_name: &str) -> Result<Identity>;

    /// Authenticates an existing identity.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_credentials_pass() {
        assert!(validate_credentials("ana@example.com", "secret1").is_ok());
    }

    #[test]
    fn test_short_password_rejected() {
        let err = validate_credentials("ana@example.com", "four").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_malformed_email_rejected() {
        assert!(validate_credentials("not-an-email", "secret1").unwrap_err().is_validation());
        assert!(validate_credentials("   ", "secret1").unwrap_err().is_validation());
    }
}
