//! Retreat repository trait.

use async_trait::async_trait;

use super::model::RetreatCandidate;
use crate::error::Result;

/// An abstract repository for persisted retreat results.
#[async_trait]
pub trait RetreatRepository: Send + Sync {
    /// Persists a query's candidates for a session in one bulk write.
    async fn save_all(
        &self,
        owner_id: &str,
        session_id: &str,
        retreats: &[RetreatCandidate],
    ) -> Result<()>;

    /// Lists a session's persisted retreats in insertion order.
    async fn list(&self, session_id: &str) -> Result<Vec<RetreatCandidate>>;
}
