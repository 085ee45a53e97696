//! REST-backed ProfileRepository implementation.

use std::sync::Arc;

use async_trait::async_trait;

use sattva_core::error::Result;
use sattva_core::user::{ProfilePatch, ProfileRepository, UserProfile};

use super::client::{RestClient, eq};
use super::dto::{NewPaymentRow, ProfileRow};

/// Profile and payment persistence over the hosted backend's row endpoints.
pub struct RestProfileRepository {
    client: Arc<RestClient>,
}

impl RestProfileRepository {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProfileRepository for RestProfileRepository {
    async fn find(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let rows: Vec<ProfileRow> = self
            .client
            .select("profiles", &[("id", eq(user_id))])
            .await?;
        Ok(rows.into_iter().next().map(UserProfile::from))
    }

    async fn update_profile(&self, user_id: &str, patch: ProfilePatch) -> Result<()> {
        let _updated: Vec<ProfileRow> = self
            .client
            .update("profiles", &[("id", eq(user_id))], &patch)
            .await?;
        Ok(())
    }

    async fn insert_payment(&self, user_id: &str, amount_cents: u32) -> Result<()> {
        let body = NewPaymentRow {
            user_id,
            amount: f64::from(amount_cents) / 100.0,
            status: "completed",
            payment_method: "demo_payment",
        };
        let _created: Vec<serde_json::Value> = self.client.insert("payments", &body).await?;
        Ok(())
    }
}
