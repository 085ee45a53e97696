//! In-memory gateway implementation.
//!
//! Insertion-ordered stores standing in for the hosted backend. Used by
//! tests and the offline CLI mode; behavior mirrors the REST gateway's
//! contracts (list ordering, cascade order, profile creation on signup).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use sattva_core::Gateway;
use sattva_core::error::{Result, SattvaError};
use sattva_core::retreat::{RetreatCandidate, RetreatRepository};
use sattva_core::session::{
    ChatMessage, ChatSession, MessageRepository, MessageRole, SessionRepository,
};
use sattva_core::user::{
    Identity, IdentityProvider, PaymentRecord, ProfilePatch, ProfileRepository, UserProfile,
    validate_credentials,
};

#[derive(Clone)]
struct Account {
    password: String,
    identity: Identity,
}

#[derive(Default)]
struct Store {
    sessions: Vec<ChatSession>,
    messages: HashMap<String, Vec<ChatMessage>>,
    retreats: HashMap<String, Vec<RetreatCandidate>>,
    profiles: HashMap<String, UserProfile>,
    payments: Vec<PaymentRecord>,
    accounts: HashMap<String, Account>,
}

/// In-memory stand-in for the hosted backend.
///
/// One instance implements every gateway trait; [`MemoryGateway::gateway`]
/// bundles it behind the trait objects the use cases expect.
#[derive(Default)]
pub struct MemoryGateway {
    store: Mutex<Store>,
}

impl MemoryGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Bundles this instance as a [`Gateway`].
    pub fn gateway(self: &Arc<Self>) -> Gateway {
        Gateway {
            sessions: self.clone(),
            messages: self.clone(),
            retreats: self.clone(),
            profiles: self.clone(),
        }
    }

    /// Inserted payment records, oldest first.
    pub async fn payments(&self) -> Vec<PaymentRecord> {
        self.store.lock().await.payments.clone()
    }
}

#[async_trait]
impl SessionRepository for MemoryGateway {
    async fn create(&self, owner_id: &str, name: Option<&str>) -> Result<ChatSession> {
        let session = ChatSession::new(owner_id, name);
        let mut store = self.store.lock().await;
        store.sessions.push(session.clone());
        Ok(session)
    }

    async fn list(&self, owner_id: &str) -> Result<Vec<ChatSession>> {
        let store = self.store.lock().await;
        let mut sessions: Vec<ChatSession> = store
            .sessions
            .iter()
            .filter(|session| session.owner_id == owner_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(sessions)
    }

    async fn find_by_id(&self, session_id: &str) -> Result<Option<ChatSession>> {
        let store = self.store.lock().await;
        Ok(store
            .sessions
            .iter()
            .find(|session| session.id == session_id)
            .cloned())
    }

    async fn rename(&self, session_id: &str, name: &str) -> Result<ChatSession> {
        let mut store = self.store.lock().await;
        let session = store
            .sessions
            .iter_mut()
            .find(|session| session.id == session_id)
            .ok_or_else(|| SattvaError::not_found("session", session_id))?;
        session.name = name.to_string();
        session.updated_at = chrono::Utc::now().to_rfc3339();
        Ok(session.clone())
    }

    async fn touch(&self, session_id: &str) -> Result<()> {
        let mut store = self.store.lock().await;
        if let Some(session) = store
            .sessions
            .iter_mut()
            .find(|session| session.id == session_id)
        {
            session.updated_at = chrono::Utc::now().to_rfc3339();
        }
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        // Same order as the hosted backend: messages, retreats, session.
        let mut store = self.store.lock().await;
        store.messages.remove(session_id);
        store.retreats.remove(session_id);
        store.sessions.retain(|session| session.id != session_id);
        Ok(())
    }
}

#[async_trait]
impl MessageRepository for MemoryGateway {
    async fn append(
        &self,
        session_id: &str,
        _owner_id: &str,
        role: MessageRole,
        text: &str,
    ) -> Result<ChatMessage> {
        let message = ChatMessage::new(role, text);
        let mut store = self.store.lock().await;
        store
            .messages
            .entry(session_id.to_string())
            .or_default()
            .push(message.clone());
        Ok(message)
    }

    async fn list(&self, session_id: &str) -> Result<Vec<ChatMessage>> {
        let store = self.store.lock().await;
        Ok(store.messages.get(session_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl RetreatRepository for MemoryGateway {
    async fn save_all(
        &self,
        _owner_id: &str,
        session_id: &str,
        retreats: &[RetreatCandidate],
    ) -> Result<()> {
        let mut store = self.store.lock().await;
        store
            .retreats
            .entry(session_id.to_string())
            .or_default()
            .extend_from_slice(retreats);
        Ok(())
    }

    async fn list(&self, session_id: &str) -> Result<Vec<RetreatCandidate>> {
        let store = self.store.lock().await;
        Ok(store.retreats.get(session_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl ProfileRepository for MemoryGateway {
    async fn find(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let store = self.store.lock().await;
        Ok(store.profiles.get(user_id).cloned())
    }

    async fn update_profile(&self, user_id: &str, patch: ProfilePatch) -> Result<()> {
        let mut store = self.store.lock().await;
        let profile = store
            .profiles
            .get_mut(user_id)
            .ok_or_else(|| SattvaError::not_found("profile", user_id))?;
        if let Some(full_name) = patch.full_name {
            profile.full_name = full_name;
        }
        if let Some(is_premium) = patch.is_premium {
            profile.is_premium = is_premium;
        }
        if let Some(payment_status) = patch.payment_status {
            profile.payment_status = Some(payment_status);
        }
        Ok(())
    }

    async fn insert_payment(&self, user_id: &str, amount_cents: u32) -> Result<()> {
        let mut store = self.store.lock().await;
        store.payments.push(PaymentRecord::demo(user_id, amount_cents));
        Ok(())
    }
}

/// Identity provider for the in-memory gateway.
///
/// Registers accounts against the shared store and creates the profile row
/// on signup, the way the hosted backend does with a database trigger.
pub struct MemoryIdentityProvider {
    gateway: Arc<MemoryGateway>,
}

impl MemoryIdentityProvider {
    pub fn new(gateway: Arc<MemoryGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str, full_name: &str) -> Result<Identity> {
        validate_credentials(email, password)?;
        if full_name.trim().is_empty() {
            return Err(SattvaError::validation("Please enter your full name"));
        }

        let mut store = self.gateway.store.lock().await;
        if store.accounts.contains_key(email) {
            return Err(SattvaError::auth("An account with this email already exists"));
        }

        let identity = Identity {
            user_id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            display_name: Some(full_name.to_string()),
        };
        store.accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                identity: identity.clone(),
            },
        );
        store.profiles.insert(
            identity.user_id.clone(),
            UserProfile::new(&identity.user_id, full_name),
        );
        Ok(identity)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        validate_credentials(email, password)?;

        let store = self.gateway.store.lock().await;
        match store.accounts.get(email) {
            Some(account) if account.password == password => Ok(account.identity.clone()),
            _ => Err(SattvaError::auth("Invalid login credentials")),
        }
    }
}
