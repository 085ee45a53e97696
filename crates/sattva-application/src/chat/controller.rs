//! Chat controller: the session state machine.
//!
//! Coordinates the current session identity, transcript, retreat list,
//! paywall flag, and loading flag, and reconciles in-memory state with
//! persisted state on create/switch/delete. All collaborators are injected
//! explicitly; nothing reaches for an ambient client.
//!
//! Operations run as sequential asynchronous tasks per controller: the
//! loading flag rejects overlapping sends, and a fetch generation token
//! keeps a stale search response from overwriting a newer session's state.

use std::sync::Arc;

use tokio::sync::RwLock;

use sattva_core::Gateway;
use sattva_core::error::{Result, SattvaError};
use sattva_core::paywall::{GatedResults, UNLOCK_PRICE_CENTS, resolve_unlock};
use sattva_core::retreat::{RetreatCandidate, build_query, extract};
use sattva_core::search::SearchProvider;
use sattva_core::session::{ChatMessage, ChatSession, MessageRole};
use sattva_core::user::{Identity, ProfilePatch, UserProfile};

use super::state::{ChatSnapshot, SendOutcome};

/// Greeting seeded into every fresh transcript.
pub const GREETING_MESSAGE: &str =
    "Hi! Search for upcoming retreats by typing something like \"Yoga in Bali\".";
/// Placeholder appended before the search call runs.
pub const SEARCHING_MESSAGE: &str = "Searching for retreats...";
/// Closing message appended after every search, found or not.
pub const FOUND_MESSAGE: &str = "I found some retreats. Please pay to unlock booking info.";
/// Annotation appended when the search call itself fails.
pub const SEARCH_FAILED_MESSAGE: &str = "Could not find retreats. Try again.";
/// Appended once the paywall unlocks.
pub const ACCESS_GRANTED_MESSAGE: &str = "Access granted! Enjoy your retreats.";
/// Local annotation appended when a persistence call failed mid-send.
pub const PERSIST_FAILED_MESSAGE: &str = "Some of this conversation could not be saved.";

struct ChatState {
    active_session: Option<String>,
    transcript: Vec<ChatMessage>,
    retreats: Vec<RetreatCandidate>,
    loading: bool,
    local_unlock: bool,
    fetch_generation: u64,
}

impl ChatState {
    fn new() -> Self {
        Self {
            active_session: None,
            transcript: vec![ChatMessage::new(MessageRole::Bot, GREETING_MESSAGE)],
            retreats: Vec::new(),
            loading: false,
            local_unlock: false,
            fetch_generation: 0,
        }
    }

    /// Replaces the in-memory state for a newly active (or no) session.
    ///
    /// Bumping the generation invalidates any in-flight fetch, so this
    /// method also takes over the loading flag.
    fn reset_for(&mut self, active_session: Option<String>) {
        self.fetch_generation += 1;
        self.loading = false;
        self.active_session = active_session;
        self.transcript = vec![ChatMessage::new(MessageRole::Bot, GREETING_MESSAGE)];
        self.retreats.clear();
        self.local_unlock = false;
    }
}

/// Coordinates transcript, retreat results, session identity, and paywall
/// status for one user.
///
/// `ChatController` is responsible for:
/// - Running the send-message protocol against the search provider
/// - Creating, switching, renaming, and deleting sessions
/// - Reconciling in-memory state with persisted state
/// - Resolving the paywall gate for rendering
pub struct ChatController {
    /// Injected persistence handles
    gateway: Gateway,
    /// External web search collaborator
    search: Arc<dyn SearchProvider>,
    /// Authenticated identity, when present
    identity: RwLock<Option<Identity>>,
    /// Cached profile backing the durable entitlement flag
    profile: RwLock<Option<UserProfile>>,
    /// Mutable per-session state
    state: RwLock<ChatState>,
}

impl ChatController {
    /// Creates a controller with no session and no identity.
    pub fn new(gateway: Gateway, search: Arc<dyn SearchProvider>) -> Self {
        Self {
            gateway,
            search,
            identity: RwLock::new(None),
            profile: RwLock::new(None),
            state: RwLock::new(ChatState::new()),
        }
    }

    /// Success callback fired after an identity-acquisition flow.
    ///
    /// Stores the identity and refreshes the cached profile. The action
    /// that triggered the auth prompt is not retried automatically.
    pub async fn on_authenticated(&self, identity: Identity) {
        tracing::info!("[ChatController] Authenticated as {}", identity.user_id);
        *self.identity.write().await = Some(identity.clone());
        self.refresh_profile(&identity).await;
    }

    /// Returns the authenticated identity, if any.
    pub async fn identity(&self) -> Option<Identity> {
        self.identity.read().await.clone()
    }

    /// Runs the send-message protocol for one user submission.
    ///
    /// Steps execute strictly sequentially. Persistence failures after
    /// session creation are logged and surfaced as a single non-fatal
    /// inline annotation; session creation failure is fatal to the send.
    ///
    /// # Returns
    ///
    /// - [`SendOutcome::Ignored`] for empty input or while a fetch is in
    ///   flight
    /// - [`SendOutcome::AuthRequired`] when no identity is present
    /// - [`SendOutcome::Completed`] otherwise
    pub async fn send(&self, input: &str) -> Result<SendOutcome> {
        let text = input.trim();
        if text.is_empty() {
            return Ok(SendOutcome::Ignored);
        }
        if self.state.read().await.loading {
            tracing::debug!("[ChatController] Send ignored: a fetch is already in flight");
            return Ok(SendOutcome::Ignored);
        }
        let Some(identity) = self.identity.read().await.clone() else {
            tracing::info!("[ChatController] Send suspended: authentication required");
            return Ok(SendOutcome::AuthRequired);
        };

        // Session creation is the only persistence failure fatal to the
        // send.
        let session_id = self.ensure_session(&identity).await?;

        let mut persisted_ok = true;
        persisted_ok &= self
            .append_message(&session_id, &identity.user_id, MessageRole::User, text)
            .await;
        persisted_ok &= self
            .append_message(
                &session_id,
                &identity.user_id,
                MessageRole::Bot,
                SEARCHING_MESSAGE,
            )
            .await;

        persisted_ok &= self.fetch_retreats(&session_id, &identity, text).await;

        // Appended regardless of whether any candidates were found.
        persisted_ok &= self
            .append_message(
                &session_id,
                &identity.user_id,
                MessageRole::Bot,
                FOUND_MESSAGE,
            )
            .await;

        if let Err(err) = self.gateway.sessions.touch(&session_id).await {
            tracing::warn!("[ChatController] Failed to bump session timestamp: {err}");
            persisted_ok = false;
        }

        if !persisted_ok {
            let mut state = self.state.write().await;
            if state.active_session.as_deref() == Some(session_id.as_str()) {
                state
                    .transcript
                    .push(ChatMessage::new(MessageRole::Bot, PERSIST_FAILED_MESSAGE));
            }
        }

        Ok(SendOutcome::Completed)
    }

    /// Explicitly creates a new session and makes it active.
    pub async fn new_session(&self, name: Option<&str>) -> Result<ChatSession> {
        let identity = self.require_identity().await?;
        let session = self.gateway.sessions.create(&identity.user_id, name).await?;
        tracing::info!("[ChatController] Created session {}", session.id);
        self.state.write().await.reset_for(Some(session.id.clone()));
        Ok(session)
    }

    /// Switches to another session, fully replacing the in-memory
    /// transcript, retreat list, and session-local unlock flag with the
    /// target session's persisted data.
    ///
    /// The paywall still also depends on the durable profile flag, which is
    /// global to the user, not the session.
    pub async fn switch_session(&self, session_id: &str) -> Result<ChatSession> {
        self.require_identity().await?;
        let session = self
            .gateway
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| SattvaError::not_found("session", session_id))?;
        let transcript = self.gateway.messages.list(session_id).await?;
        let retreats = self.gateway.retreats.list(session_id).await?;

        tracing::info!("[ChatController] Switched to session {session_id}");
        let mut state = self.state.write().await;
        state.reset_for(Some(session.id.clone()));
        if !transcript.is_empty() {
            state.transcript = transcript;
        }
        state.retreats = retreats;
        Ok(session)
    }

    /// Deletes a session, cascading to its messages and retreats.
    ///
    /// A partial cascade failure is surfaced distinctly as
    /// [`SattvaError::PartialDelete`]; in-memory state is left untouched so
    /// the user can retry. Deleting the active session transitions to the
    /// no-session state; deleting any other session leaves current state
    /// untouched.
    pub async fn delete_session(&self, session_id: &str) -> Result<()> {
        self.require_identity().await?;
        if let Err(err) = self.gateway.sessions.delete(session_id).await {
            if err.is_partial_delete() {
                tracing::warn!("[ChatController] {err}");
            }
            return Err(err);
        }
        tracing::info!("[ChatController] Deleted session {session_id}");

        let mut state = self.state.write().await;
        if state.active_session.as_deref() == Some(session_id) {
            state.reset_for(None);
        }
        Ok(())
    }

    /// Renames a session.
    pub async fn rename_session(&self, session_id: &str, name: &str) -> Result<ChatSession> {
        self.require_identity().await?;
        self.gateway.sessions.rename(session_id, name).await
    }

    /// Lists the authenticated user's sessions, most recently updated
    /// first.
    pub async fn list_sessions(&self) -> Result<Vec<ChatSession>> {
        let identity = self.require_identity().await?;
        self.gateway.sessions.list(&identity.user_id).await
    }

    /// Confirms the simulated payment.
    ///
    /// Inserts the payment record (failure here is the payment failing:
    /// nothing unlocks), requests the durable premium flag as an
    /// eventually-consistent side effect, and fires the session-local
    /// unlock event.
    pub async fn confirm_payment(&self) -> Result<()> {
        let identity = self
            .identity
            .read()
            .await
            .clone()
            .ok_or_else(|| SattvaError::auth("You must be logged in to make a payment"))?;

        self.gateway
            .profiles
            .insert_payment(&identity.user_id, UNLOCK_PRICE_CENTS)
            .await?;

        // The local unlock is a read-through cache of this write; it does
        // not wait on it or depend on its success.
        match self
            .gateway
            .profiles
            .update_profile(&identity.user_id, ProfilePatch::premium_unlocked())
            .await
        {
            Ok(()) => self.refresh_profile(&identity).await,
            Err(err) => {
                tracing::warn!("[ChatController] Failed to persist premium flag: {err}");
            }
        }

        let session_id = {
            let mut state = self.state.write().await;
            state.local_unlock = true;
            state
                .transcript
                .push(ChatMessage::new(MessageRole::Bot, ACCESS_GRANTED_MESSAGE));
            state.active_session.clone()
        };
        if let Some(session_id) = session_id {
            if let Err(err) = self
                .gateway
                .messages
                .append(
                    &session_id,
                    &identity.user_id,
                    MessageRole::Bot,
                    ACCESS_GRANTED_MESSAGE,
                )
                .await
            {
                tracing::debug!("[ChatController] Failed to persist unlock message: {err}");
            }
        }
        tracing::info!("[ChatController] Paywall unlocked for {}", identity.user_id);
        Ok(())
    }

    /// Returns a snapshot of the current state for rendering.
    pub async fn snapshot(&self) -> ChatSnapshot {
        let profile = self.profile.read().await.clone();
        let state = self.state.read().await;
        let unlocked = resolve_unlock(profile.as_ref(), state.local_unlock);
        ChatSnapshot {
            active_session_id: state.active_session.clone(),
            transcript: state.transcript.clone(),
            results: GatedResults::gate(&state.retreats, unlocked),
            loading: state.loading,
            unlocked,
        }
    }

    async fn require_identity(&self) -> Result<Identity> {
        self.identity
            .read()
            .await
            .clone()
            .ok_or_else(|| SattvaError::auth("No authenticated identity"))
    }

    async fn refresh_profile(&self, identity: &Identity) {
        match self.gateway.profiles.find(&identity.user_id).await {
            Ok(profile) => *self.profile.write().await = profile,
            Err(err) => tracing::warn!("[ChatController] Failed to load profile: {err}"),
        }
    }

    async fn ensure_session(&self, identity: &Identity) -> Result<String> {
        if let Some(session_id) = self.state.read().await.active_session.clone() {
            return Ok(session_id);
        }
        let session = self.gateway.sessions.create(&identity.user_id, None).await?;
        tracing::info!("[ChatController] Created session {}", session.id);
        self.state.write().await.active_session = Some(session.id.clone());
        Ok(session.id)
    }

    /// Appends a message locally (when the session is still active) and
    /// persists it. Returns whether the persistence call succeeded.
    async fn append_message(
        &self,
        session_id: &str,
        owner_id: &str,
        role: MessageRole,
        text: &str,
    ) -> bool {
        {
            let mut state = self.state.write().await;
            if state.active_session.as_deref() == Some(session_id) {
                state.transcript.push(ChatMessage::new(role, text));
            }
        }
        match self
            .gateway
            .messages
            .append(session_id, owner_id, role, text)
            .await
        {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!("[ChatController] Failed to persist {role} message: {err}");
                false
            }
        }
    }

    /// Runs the retreat fetch pipeline.
    ///
    /// The loading flag is asserted before the first suspend point and
    /// released on every path where this fetch still owns it; anything that
    /// bumps the generation (switch, delete, new session) takes the flag
    /// over. Returns whether retreat persistence succeeded (search failure
    /// is recovered locally and does not count).
    async fn fetch_retreats(&self, session_id: &str, identity: &Identity, raw_query: &str) -> bool {
        let generation = {
            let mut state = self.state.write().await;
            state.loading = true;
            state.fetch_generation += 1;
            state.fetch_generation
        };

        let query = build_query(raw_query);
        tracing::debug!("[ChatController] Fetching retreats for query: {query}");
        let outcome = self
            .search
            .search(&query)
            .await
            .map(|response| extract(&response.items));

        let candidates = {
            let mut state = self.state.write().await;
            if state.fetch_generation != generation {
                tracing::debug!("[ChatController] Dropping stale search response");
                return true;
            }
            state.loading = false;
            match outcome {
                Ok(candidates) => {
                    state.retreats = candidates.clone();
                    Some(candidates)
                }
                Err(err) => {
                    tracing::warn!("[ChatController] Retreat fetch failed: {err}");
                    state
                        .transcript
                        .push(ChatMessage::new(MessageRole::Bot, SEARCH_FAILED_MESSAGE));
                    None
                }
            }
        };

        match candidates {
            Some(candidates) if !candidates.is_empty() => {
                match self
                    .gateway
                    .retreats
                    .save_all(&identity.user_id, session_id, &candidates)
                    .await
                {
                    Ok(()) => true,
                    Err(err) => {
                        tracing::warn!("[ChatController] Failed to persist retreats: {err}");
                        false
                    }
                }
            }
            Some(_) => true,
            None => {
                // The failure annotation is persisted best-effort so it
                // survives a reload like any other transcript entry.
                if let Err(err) = self
                    .gateway
                    .messages
                    .append(
                        session_id,
                        &identity.user_id,
                        MessageRole::Bot,
                        SEARCH_FAILED_MESSAGE,
                    )
                    .await
                {
                    tracing::debug!("[ChatController] Failed to persist search annotation: {err}");
                }
                true
            }
        }
    }
}
