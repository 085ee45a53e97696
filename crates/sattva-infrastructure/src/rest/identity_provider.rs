//! REST-backed IdentityProvider implementation.
//!
//! Talks to the hosted backend's auth endpoints: `/auth/v1/signup` for
//! registration and `/auth/v1/token?grant_type=password` for sign-in.
//! Credentials are validated locally before any network call.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use sattva_core::error::{Result, SattvaError};
use sattva_core::user::{Identity, IdentityProvider, validate_credentials};

use super::client::RestClient;

/// Identity provider backed by the hosted backend's auth service.
pub struct RestIdentityProvider {
    client: Arc<RestClient>,
}

impl RestIdentityProvider {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityProvider for RestIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str, full_name: &str) -> Result<Identity> {
        validate_credentials(email, password)?;
        if full_name.trim().is_empty() {
            return Err(SattvaError::validation("Please enter your full name"));
        }

        let body = SignUpRequest {
            email,
            password,
            data: SignUpMetadata { full_name },
        };
        let response: AuthResponse = self.client.auth_post("signup", &[], &body).await?;
        response.into_identity()
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        validate_credentials(email, password)?;

        let body = PasswordGrantRequest { email, password };
        let response: AuthResponse = self
            .client
            .auth_post("token", &[("grant_type", "password")], &body)
            .await?;
        response.into_identity()
    }
}

#[derive(Debug, Serialize)]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    data: SignUpMetadata<'a>,
}

#[derive(Debug, Serialize)]
struct SignUpMetadata<'a> {
    full_name: &'a str,
}

#[derive(Debug, Serialize)]
struct PasswordGrantRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    #[serde(default)]
    full_name: Option<String>,
}

/// Auth endpoint payload. Token responses nest the user object; signup
/// responses may return it at the top level depending on confirmation
/// settings, so both shapes are accepted here.
#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    user: Option<AuthUser>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: Option<UserMetadata>,
}

impl AuthResponse {
    fn into_identity(self) -> Result<Identity> {
        if let Some(user) = self.user {
            return Ok(Identity {
                user_id: user.id,
                email: user.email.unwrap_or_default(),
                display_name: user.user_metadata.full_name,
            });
        }
        let id = self
            .id
            .ok_or_else(|| SattvaError::auth("Auth response carried no user"))?;
        Ok(Identity {
            user_id: id,
            email: self.email.unwrap_or_default(),
            display_name: self.user_metadata.and_then(|metadata| metadata.full_name),
        })
    }
}
