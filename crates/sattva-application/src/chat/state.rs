//! Controller outcome and snapshot types.

use serde::{Deserialize, Serialize};

use sattva_core::paywall::GatedResults;
use sattva_core::session::ChatMessage;

/// Outcome of a send attempt.
///
/// Authentication-required is a control signal, not an error: the caller
/// runs an identity-acquisition flow and re-invokes the send explicitly;
/// nothing is retried automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The full send protocol ran to completion.
    Completed,
    /// No authenticated identity was present; the send was suspended.
    AuthRequired,
    /// Empty input, or a fetch was already in flight. Nothing happened.
    Ignored,
}

/// Point-in-time view of the controller state, for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSnapshot {
    /// Currently active session, if any.
    pub active_session_id: Option<String>,
    /// Transcript of the active session, oldest first.
    pub transcript: Vec<ChatMessage>,
    /// Retreat results gated through the paywall.
    pub results: GatedResults,
    /// Whether a retreat fetch is outstanding.
    pub loading: bool,
    /// Resolved paywall state (durable flag OR session-local unlock).
    pub unlocked: bool,
}
