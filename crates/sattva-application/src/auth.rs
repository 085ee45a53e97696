//! Authentication flow.
//!
//! Thin use case over the identity provider: credentials are validated
//! locally before any external call, and the returned identity is handed to
//! the caller, which forwards it to
//! [`crate::chat::ChatController::on_authenticated`]. The action that
//! triggered the prompt is not resumed automatically.

use std::sync::Arc;

use sattva_core::error::{Result, SattvaError};
use sattva_core::user::{Identity, IdentityProvider, validate_credentials};

/// Sign-in / sign-up flow around an injected identity provider.
pub struct AuthFlow {
    provider: Arc<dyn IdentityProvider>,
}

impl AuthFlow {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// Authenticates an existing identity.
    ///
    /// # Errors
    ///
    /// Returns [`SattvaError::Validation`] before any external call for
    /// malformed credentials, or the provider's [`SattvaError::Auth`] with
    /// a human-readable message.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        validate_credentials(email, password)?;
        let identity = self.provider.sign_in(email, password).await?;
        tracing::info!("[AuthFlow] Signed in {}", identity.user_id);
        Ok(identity)
    }

    /// Registers a new identity.
    pub async fn sign_up(&self, email: &str, password: &str, full_name: &str) -> Result<Identity> {
        validate_credentials(email, password)?;
        if full_name.trim().is_empty() {
            return Err(SattvaError::validation("Please enter your full name"));
        }
        let identity = self.provider.sign_up(email, password, full_name).await?;
        tracing::info!("[AuthFlow] Signed up {}", identity.user_id);
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Provider that counts how often it is reached
    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl IdentityProvider for CountingProvider {
        async fn sign_up(&self, email: &str, _password: &str, full_name: &str) -> Result<Identity> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Identity {
                user_id: "u-1".to_string(),
                email: email.to_string(),
                display_name: Some(full_name.to_string()),
            })
        }

        async fn sign_in(&self, email: &str, _password: &str) -> Result<Identity> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Identity {
                user_id: "u-1".to_string(),
                email: email.to_string(),
                display_name: None,
            })
        }
    }

    #[tokio::test]
    async fn test_validation_rejects_before_provider_call() {
        let provider = Arc::new(CountingProvider::default());
        let flow = AuthFlow::new(provider.clone());

        let err = flow.sign_in("ana@example.com", "four").await.unwrap_err();
        assert!(err.is_validation());
        let err = flow.sign_up("ana@example.com", "secret1", "  ").await.unwrap_err();
        assert!(err.is_validation());

        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_valid_credentials_reach_provider() {
        let provider = Arc::new(CountingProvider::default());
        let flow = AuthFlow::new(provider.clone());

        let identity = flow.sign_in("ana@example.com", "secret1").await.unwrap();

        assert_eq!(identity.user_id, "u-1");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }
}
