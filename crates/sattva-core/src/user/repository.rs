//! Profile repository trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::model::UserProfile;
use crate::error::Result;

/// Partial profile update applied by [`ProfileRepository::update_profile`].
///
/// Unset fields are left untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_premium: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,
}

impl ProfilePatch {
    /// The patch written after a completed payment: durable premium flag
    /// plus the recorded payment status.
    pub fn premium_unlocked() -> Self {
        Self {
            full_name: None,
            is_premium: Some(true),
            payment_status: Some("completed".to_string()),
        }
    }
}

/// An abstract repository for user profiles and payment records.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Finds a profile by its owner's user ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(profile))`: Profile found
    /// - `Ok(None)`: No profile for this user
    /// - `Err(_)`: Error occurred during retrieval
    async fn find(&self, user_id: &str) -> Result<Option<UserProfile>>;

    /// Applies a partial update to a profile.
    async fn update_profile(&self, user_id: &str, patch: ProfilePatch) -> Result<()>;

    /// Inserts a payment record. Simulated payments insert a record and
    /// nothing else; no processor is involved.
    async fn insert_payment(&self, user_id: &str, amount_cents: u32) -> Result<()>;
}
