//! Session domain model.
//!
//! This module contains the core ChatSession entity that represents
//! a named chat session in the application's domain layer.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name given to sessions created without an explicit name.
pub const DEFAULT_SESSION_NAME: &str = "New Chat";

/// A named, ordered container of messages and retreat results owned by
/// one identity.
///
/// A session owns an append-only transcript and the retreat candidates
/// persisted for it. Lifecycle: created lazily on the first send (or
/// explicitly by the user) and deleted explicitly, cascading to its
/// messages and retreats.
///
/// This is the "pure" domain model that business logic operates on,
/// independent of any specific storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// Identity that owns this session
    pub owner_id: String,
    /// Human-readable session name
    pub name: String,
    /// Timestamp when the session was created (ISO 8601 format)
    pub created_at: String,
    /// Timestamp when the session was last updated (ISO 8601 format)
    pub updated_at: String,
}

impl ChatSession {
    /// Creates a fresh session for `owner_id`, defaulting the name when
    /// none is given.
    pub fn new(owner_id: impl Into<String>, name: Option<&str>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            name: name.unwrap_or(DEFAULT_SESSION_NAME).to_string(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}
