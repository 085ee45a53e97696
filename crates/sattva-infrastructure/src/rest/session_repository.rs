//! REST-backed SessionRepository implementation.

use std::sync::Arc;

use async_trait::async_trait;

use sattva_core::error::{DeleteStage, Result, SattvaError};
use sattva_core::session::{ChatSession, DEFAULT_SESSION_NAME, SessionRepository};

use super::client::{RestClient, eq};
use super::dto::{NewSessionRow, SessionPatch, SessionRow};

/// Session persistence over the hosted backend's row endpoints.
pub struct RestSessionRepository {
    client: Arc<RestClient>,
}

impl RestSessionRepository {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }

    async fn patch(&self, session_id: &str, name: Option<&str>) -> Result<Vec<SessionRow>> {
        let body = SessionPatch {
            session_name: name,
            updated_at: chrono::Utc::now().to_rfc3339(),
        };
        self.client
            .update("chat_sessions", &[("id", eq(session_id))], &body)
            .await
    }
}

#[async_trait]
impl SessionRepository for RestSessionRepository {
    async fn create(&self, owner_id: &str, name: Option<&str>) -> Result<ChatSession> {
        let body = NewSessionRow {
            user_id: owner_id,
            session_name: name.unwrap_or(DEFAULT_SESSION_NAME),
        };
        let rows: Vec<SessionRow> = self.client.insert("chat_sessions", &body).await?;
        rows.into_iter()
            .next()
            .map(ChatSession::from)
            .ok_or_else(|| SattvaError::data_access("Backend returned no row for created session"))
    }

    async fn list(&self, owner_id: &str) -> Result<Vec<ChatSession>> {
        let rows: Vec<SessionRow> = self
            .client
            .select(
                "chat_sessions",
                &[
                    ("user_id", eq(owner_id)),
                    ("order", "updated_at.desc".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().map(ChatSession::from).collect())
    }

    async fn find_by_id(&self, session_id: &str) -> Result<Option<ChatSession>> {
        let rows: Vec<SessionRow> = self
            .client
            .select("chat_sessions", &[("id", eq(session_id))])
            .await?;
        Ok(rows.into_iter().next().map(ChatSession::from))
    }

    async fn rename(&self, session_id: &str, name: &str) -> Result<ChatSession> {
        let rows = self.patch(session_id, Some(name)).await?;
        rows.into_iter()
            .next()
            .map(ChatSession::from)
            .ok_or_else(|| SattvaError::not_found("session", session_id))
    }

    async fn touch(&self, session_id: &str) -> Result<()> {
        self.patch(session_id, None).await?;
        Ok(())
    }

    /// Deletes messages, then retreats, then the session row.
    ///
    /// The cascade is sequential because of foreign key constraints and is
    /// not atomic: a stage failing after an earlier stage succeeded is
    /// reported as [`SattvaError::PartialDelete`].
    async fn delete(&self, session_id: &str) -> Result<()> {
        self.client
            .delete("chat_messages", &[("session_id", eq(session_id))])
            .await?;

        self.client
            .delete("user_retreats", &[("session_id", eq(session_id))])
            .await
            .map_err(|err| {
                SattvaError::partial_delete(session_id, DeleteStage::Retreats, err.to_string())
            })?;

        self.client
            .delete("chat_sessions", &[("id", eq(session_id))])
            .await
            .map_err(|err| {
                SattvaError::partial_delete(session_id, DeleteStage::Session, err.to_string())
            })?;

        Ok(())
    }
}
