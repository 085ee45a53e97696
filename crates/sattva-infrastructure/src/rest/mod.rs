//! Hosted-backend gateway implementation.
//!
//! # Module Structure
//!
//! - `client`: Shared HTTP client and error mapping
//! - `dto`: Wire rows and their domain conversions
//! - one repository module per gateway trait, plus the identity provider

mod client;
mod dto;
mod identity_provider;
mod message_repository;
mod profile_repository;
mod retreat_repository;
mod session_repository;

use std::sync::Arc;

use sattva_core::Gateway;

use crate::config::BackendConfig;

pub use client::RestClient;
pub use identity_provider::RestIdentityProvider;
pub use message_repository::RestMessageRepository;
pub use profile_repository::RestProfileRepository;
pub use retreat_repository::RestRetreatRepository;
pub use session_repository::RestSessionRepository;

/// Builds a [`Gateway`] whose repositories all share one client against
/// the configured backend.
pub fn rest_gateway(config: &BackendConfig) -> Gateway {
    let client = Arc::new(RestClient::from_config(config));
    Gateway {
        sessions: Arc::new(RestSessionRepository::new(client.clone())),
        messages: Arc::new(RestMessageRepository::new(client.clone())),
        retreats: Arc::new(RestRetreatRepository::new(client.clone())),
        profiles: Arc::new(RestProfileRepository::new(client)),
    }
}

/// Builds the identity provider sharing the same backend configuration.
pub fn rest_identity_provider(config: &BackendConfig) -> Arc<RestIdentityProvider> {
    Arc::new(RestIdentityProvider::new(Arc::new(RestClient::from_config(
        config,
    ))))
}
