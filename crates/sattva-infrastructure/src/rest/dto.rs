//! Wire DTO rows for the hosted backend.
//!
//! Rows mirror the backend tables (`chat_sessions`, `chat_messages`,
//! `user_retreats`, `profiles`, `payments`) and are converted to domain
//! models exactly once, here.

use serde::{Deserialize, Serialize};

use sattva_core::retreat::RetreatCandidate;
use sattva_core::session::{ChatMessage, ChatSession, MessageRole};
use sattva_core::user::UserProfile;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SessionRow {
    pub id: String,
    pub user_id: String,
    pub session_name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<SessionRow> for ChatSession {
    fn from(row: SessionRow) -> Self {
        ChatSession {
            id: row.id,
            owner_id: row.user_id,
            name: row.session_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct NewSessionRow<'a> {
    pub user_id: &'a str,
    pub session_name: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SessionPatch<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_name: Option<&'a str>,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MessageRow {
    pub message_type: String,
    pub content: String,
    pub created_at: String,
}

impl From<MessageRow> for ChatMessage {
    fn from(row: MessageRow) -> Self {
        let role = if row.message_type == "user" {
            MessageRole::User
        } else {
            MessageRole::Bot
        };
        ChatMessage {
            role,
            text: row.content,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct NewMessageRow<'a> {
    pub session_id: &'a str,
    pub user_id: &'a str,
    pub message_type: String,
    pub content: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RetreatRow {
    pub title: String,
    pub location: String,
    pub date: String,
    pub link: String,
    pub image_url: String,
}

impl From<RetreatRow> for RetreatCandidate {
    fn from(row: RetreatRow) -> Self {
        RetreatCandidate {
            title: row.title,
            location: row.location,
            date: row.date,
            link: row.link,
            image: row.image_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct NewRetreatRow<'a> {
    pub user_id: &'a str,
    pub session_id: &'a str,
    pub title: &'a str,
    pub location: &'a str,
    pub date: &'a str,
    pub link: &'a str,
    pub image_url: &'a str,
}

impl<'a> NewRetreatRow<'a> {
    pub fn from_candidate(
        owner_id: &'a str,
        session_id: &'a str,
        candidate: &'a RetreatCandidate,
    ) -> Self {
        Self {
            user_id: owner_id,
            session_id,
            title: &candidate.title,
            location: &candidate.location,
            date: &candidate.date,
            link: &candidate.link,
            image_url: &candidate.image,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ProfileRow {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub is_premium: Option<bool>,
    #[serde(default)]
    pub payment_status: Option<String>,
}

impl From<ProfileRow> for UserProfile {
    fn from(row: ProfileRow) -> Self {
        UserProfile {
            user_id: row.id,
            full_name: row.full_name.unwrap_or_default(),
            is_premium: row.is_premium.unwrap_or(false),
            payment_status: row.payment_status,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct NewPaymentRow<'a> {
    pub user_id: &'a str,
    /// Amount in the backend's currency unit (dollars).
    pub amount: f64,
    pub status: &'a str,
    pub payment_method: &'a str,
}
