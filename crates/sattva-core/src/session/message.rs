//! Chat message types.
//!
//! This module contains types for representing messages in a session
//! transcript, including roles and message content.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Represents the author of a message in a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MessageRole {
    /// Message typed by the user.
    User,
    /// Message produced by the assistant.
    Bot,
}

/// A single message in a session transcript.
///
/// Messages are immutable once created and append-only within a session;
/// individual messages are never reordered or deleted, only the owning
/// session as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The author of the message.
    pub role: MessageRole,
    /// The message text.
    pub text: String,
    /// Timestamp when the message was created (ISO 8601 format).
    pub created_at: String,
}

impl ChatMessage {
    /// Creates a message stamped with the current time.
    pub fn new(role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
