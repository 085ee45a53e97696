//! REST-backed MessageRepository implementation.

use std::sync::Arc;

use async_trait::async_trait;

use sattva_core::error::{Result, SattvaError};
use sattva_core::session::{ChatMessage, MessageRepository, MessageRole};

use super::client::{RestClient, eq};
use super::dto::{MessageRow, NewMessageRow};

/// Transcript persistence over the hosted backend's row endpoints.
pub struct RestMessageRepository {
    client: Arc<RestClient>,
}

impl RestMessageRepository {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MessageRepository for RestMessageRepository {
    async fn append(
        &self,
        session_id: &str,
        owner_id: &str,
        role: MessageRole,
        text: &str,
    ) -> Result<ChatMessage> {
        let body = NewMessageRow {
            session_id,
            user_id: owner_id,
            message_type: role.to_string(),
            content: text,
        };
        let rows: Vec<MessageRow> = self.client.insert("chat_messages", &body).await?;
        rows.into_iter()
            .next()
            .map(ChatMessage::from)
            .ok_or_else(|| SattvaError::data_access("Backend returned no row for appended message"))
    }

    async fn list(&self, session_id: &str) -> Result<Vec<ChatMessage>> {
        let rows: Vec<MessageRow> = self
            .client
            .select(
                "chat_messages",
                &[
                    ("session_id", eq(session_id)),
                    ("order", "created_at.asc".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().map(ChatMessage::from).collect())
    }
}
