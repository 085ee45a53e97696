//! Session and message repository traits.
//!
//! Defines the persistence gateway operations the session state machine
//! needs for sessions and transcripts.

use async_trait::async_trait;

use super::message::{ChatMessage, MessageRole};
use super::model::ChatSession;
use crate::error::Result;

/// An abstract repository for managing session persistence.
///
/// This trait defines the contract for persisting and retrieving sessions,
/// decoupling the application's core logic from the specific storage
/// mechanism (hosted REST backend, in-memory store, etc.).
///
/// # Implementation Notes
///
/// `delete` must cascade to the session's messages and retreats. The
/// cascade is sequential (messages, retreats, session) and explicitly
/// non-atomic: a failure after an earlier stage succeeded must be reported
/// as [`crate::error::SattvaError::PartialDelete`] so callers can surface
/// "session partially deleted" distinctly.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Creates a new session owned by `owner_id`.
    ///
    /// # Returns
    ///
    /// The created session, with backend-assigned timestamps where the
    /// backend owns them.
    async fn create(&self, owner_id: &str, name: Option<&str>) -> Result<ChatSession>;

    /// Lists all sessions owned by `owner_id`, most recently updated first.
    async fn list(&self, owner_id: &str) -> Result<Vec<ChatSession>>;

    /// Finds a session by its ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(session))`: Session found
    /// - `Ok(None)`: Session not found
    /// - `Err(_)`: Error occurred during retrieval
    async fn find_by_id(&self, session_id: &str) -> Result<Option<ChatSession>>;

    /// Renames a session and bumps its `updated_at` timestamp.
    async fn rename(&self, session_id: &str, name: &str) -> Result<ChatSession>;

    /// Bumps a session's `updated_at` timestamp without other changes.
    async fn touch(&self, session_id: &str) -> Result<()>;

    /// Deletes a session, cascading to its messages and retreats.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::SattvaError::PartialDelete`] when a later
    /// cascade stage fails after an earlier one succeeded.
    async fn delete(&self, session_id: &str) -> Result<()>;
}

/// An abstract repository for the append-only message transcript.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Appends a message to a session's transcript.
    async fn append(
        &self,
        session_id: &str,
        owner_id: &str,
        role: MessageRole,
        text: &str,
    ) -> Result<ChatMessage>;

    /// Lists a session's messages in creation order (oldest first).
    async fn list(&self, session_id: &str) -> Result<Vec<ChatMessage>>;
}
