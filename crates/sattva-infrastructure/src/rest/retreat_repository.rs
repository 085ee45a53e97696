//! REST-backed RetreatRepository implementation.

use std::sync::Arc;

use async_trait::async_trait;

use sattva_core::error::Result;
use sattva_core::retreat::{RetreatCandidate, RetreatRepository};

use super::client::{RestClient, eq};
use super::dto::{NewRetreatRow, RetreatRow};

/// Retreat-result persistence over the hosted backend's row endpoints.
pub struct RestRetreatRepository {
    client: Arc<RestClient>,
}

impl RestRetreatRepository {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RetreatRepository for RestRetreatRepository {
    async fn save_all(
        &self,
        owner_id: &str,
        session_id: &str,
        retreats: &[RetreatCandidate],
    ) -> Result<()> {
        if retreats.is_empty() {
            return Ok(());
        }
        let rows: Vec<NewRetreatRow<'_>> = retreats
            .iter()
            .map(|candidate| NewRetreatRow::from_candidate(owner_id, session_id, candidate))
            .collect();
        let _created: Vec<RetreatRow> = self.client.insert("user_retreats", &rows).await?;
        Ok(())
    }

    async fn list(&self, session_id: &str) -> Result<Vec<RetreatCandidate>> {
        let rows: Vec<RetreatRow> = self
            .client
            .select(
                "user_retreats",
                &[
                    ("session_id", eq(session_id)),
                    ("order", "created_at.asc".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().map(RetreatCandidate::from).collect())
    }
}
