use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;

use sattva_core::Gateway;
use sattva_core::error::{DeleteStage, Result, SattvaError};
use sattva_core::retreat::{RetreatCandidate, RetreatRepository};
use sattva_core::search::{SearchItem, SearchProvider, SearchResponse};
use sattva_core::session::{
    ChatMessage, ChatSession, MessageRepository, MessageRole, SessionRepository,
};
use sattva_core::user::{
    Identity, IdentityProvider, ProfilePatch, ProfileRepository, UserProfile,
};

use sattva_infrastructure::memory::{MemoryGateway, MemoryIdentityProvider};

use super::controller::{
    ChatController, FOUND_MESSAGE, GREETING_MESSAGE, PERSIST_FAILED_MESSAGE, SEARCH_FAILED_MESSAGE,
    SEARCHING_MESSAGE,
};
use super::state::SendOutcome;

// Search provider returning a fixed item list
struct StaticSearch {
    items: Vec<SearchItem>,
}

#[async_trait]
impl SearchProvider for StaticSearch {
    async fn search(&self, query: &str) -> Result<SearchResponse> {
        Ok(SearchResponse {
            query: query.to_string(),
            items: self.items.clone(),
        })
    }
}

// Search provider that always fails
struct FailingSearch;

#[async_trait]
impl SearchProvider for FailingSearch {
    async fn search(&self, _query: &str) -> Result<SearchResponse> {
        Err(SattvaError::search("connection reset"))
    }
}

// Search provider that blocks until released, for in-flight assertions
#[derive(Default)]
struct PendingSearch {
    started: Notify,
    release: Notify,
}

#[async_trait]
impl SearchProvider for PendingSearch {
    async fn search(&self, query: &str) -> Result<SearchResponse> {
        self.started.notify_one();
        self.release.notified().await;
        Ok(SearchResponse::empty(query))
    }
}

// Gateway that panics on any call, to prove no persistence happens
struct NoPersistence;

#[async_trait]
impl SessionRepository for NoPersistence {
    async fn create(&self, _owner_id: &str, _name: Option<&str>) -> Result<ChatSession> {
        panic!("unexpected persistence call");
    }
    async fn list(&self, _owner_id: &str) -> Result<Vec<ChatSession>> {
        panic!("unexpected persistence call");
    }
    async fn find_by_id(&self, _session_id: &str) -> Result<Option<ChatSession>> {
        panic!("unexpected persistence call");
    }
    async fn rename(&self, _session_id: &str, _name: &str) -> Result<ChatSession> {
        panic!("unexpected persistence call");
    }
    async fn touch(&self, _session_id: &str) -> Result<()> {
        panic!("unexpected persistence call");
    }
    async fn delete(&self, _session_id: &str) -> Result<()> {
        panic!("unexpected persistence call");
    }
}

#[async_trait]
impl MessageRepository for NoPersistence {
    async fn append(
        &self,
        _session_id: &str,
        _owner_id: &str,
        _role: MessageRole,
        _text: &str,
    ) -> Result<ChatMessage> {
        panic!("unexpected persistence call");
    }
    async fn list(&self, _session_id: &str) -> Result<Vec<ChatMessage>> {
        panic!("unexpected persistence call");
    }
}

#[async_trait]
impl RetreatRepository for NoPersistence {
    async fn save_all(
        &self,
        _owner_id: &str,
        _session_id: &str,
        _retreats: &[RetreatCandidate],
    ) -> Result<()> {
        panic!("unexpected persistence call");
    }
    async fn list(&self, _session_id: &str) -> Result<Vec<RetreatCandidate>> {
        panic!("unexpected persistence call");
    }
}

#[async_trait]
impl ProfileRepository for NoPersistence {
    async fn find(&self, _user_id: &str) -> Result<Option<UserProfile>> {
        panic!("unexpected persistence call");
    }
    async fn update_profile(&self, _user_id: &str, _patch: ProfilePatch) -> Result<()> {
        panic!("unexpected persistence call");
    }
    async fn insert_payment(&self, _user_id: &str, _amount_cents: u32) -> Result<()> {
        panic!("unexpected persistence call");
    }
}

// Session repository whose delete fails partway through the cascade
struct PartialDeleteSessions {
    inner: Arc<MemoryGateway>,
}

#[async_trait]
impl SessionRepository for PartialDeleteSessions {
    async fn create(&self, owner_id: &str, name: Option<&str>) -> Result<ChatSession> {
        SessionRepository::create(self.inner.as_ref(), owner_id, name).await
    }
    async fn list(&self, owner_id: &str) -> Result<Vec<ChatSession>> {
        SessionRepository::list(self.inner.as_ref(), owner_id).await
    }
    async fn find_by_id(&self, session_id: &str) -> Result<Option<ChatSession>> {
        SessionRepository::find_by_id(self.inner.as_ref(), session_id).await
    }
    async fn rename(&self, session_id: &str, name: &str) -> Result<ChatSession> {
        SessionRepository::rename(self.inner.as_ref(), session_id, name).await
    }
    async fn touch(&self, session_id: &str) -> Result<()> {
        SessionRepository::touch(self.inner.as_ref(), session_id).await
    }
    async fn delete(&self, session_id: &str) -> Result<()> {
        Err(SattvaError::partial_delete(
            session_id,
            DeleteStage::Retreats,
            "backend unavailable",
        ))
    }
}

// Message repository whose appends fail
struct FailingMessages;

#[async_trait]
impl MessageRepository for FailingMessages {
    async fn append(
        &self,
        _session_id: &str,
        _owner_id: &str,
        _role: MessageRole,
        _text: &str,
    ) -> Result<ChatMessage> {
        Err(SattvaError::data_access("insert rejected"))
    }
    async fn list(&self, _session_id: &str) -> Result<Vec<ChatMessage>> {
        Ok(Vec::new())
    }
}

// Profile repository whose durable writes fail
struct FailingProfiles;

#[async_trait]
impl ProfileRepository for FailingProfiles {
    async fn find(&self, _user_id: &str) -> Result<Option<UserProfile>> {
        Ok(None)
    }
    async fn update_profile(&self, _user_id: &str, _patch: ProfilePatch) -> Result<()> {
        Err(SattvaError::data_access("update rejected"))
    }
    async fn insert_payment(&self, _user_id: &str, _amount_cents: u32) -> Result<()> {
        Ok(())
    }
}

fn sample_items() -> Vec<SearchItem> {
    vec![
        SearchItem {
            title: "10-Day Yoga Retreat in Ubud".to_string(),
            snippet: "Join us March 15, 2025 in Bali".to_string(),
            display_link: "retreat.guru".to_string(),
            link: "https://retreat.guru/r/ubud".to_string(),
            thumbnail: None,
        },
        SearchItem {
            title: "Beach house rental".to_string(),
            snippet: "Sea view, sleeps six".to_string(),
            display_link: "example.com".to_string(),
            link: "https://example.com/h/1".to_string(),
            thumbnail: None,
        },
    ]
}

async fn sign_up(backend: &Arc<MemoryGateway>) -> Identity {
    MemoryIdentityProvider::new(backend.clone())
        .sign_up("ana@example.com", "secret1", "Ana")
        .await
        .unwrap()
}

async fn authed_controller(search: Arc<dyn SearchProvider>) -> (ChatController, Arc<MemoryGateway>) {
    let backend = MemoryGateway::new();
    let identity = sign_up(&backend).await;
    let controller = ChatController::new(backend.gateway(), search);
    controller.on_authenticated(identity).await;
    (controller, backend)
}

fn texts(messages: &[ChatMessage]) -> Vec<&str> {
    messages.iter().map(|message| message.text.as_str()).collect()
}

#[tokio::test]
async fn test_empty_input_is_ignored() {
    let (controller, _backend) =
        authed_controller(Arc::new(StaticSearch { items: sample_items() })).await;

    let outcome = controller.send("   ").await.unwrap();

    assert_eq!(outcome, SendOutcome::Ignored);
    assert_eq!(controller.snapshot().await.transcript.len(), 1);
}

#[tokio::test]
async fn test_unauthenticated_send_requests_auth_without_persistence() {
    let gateway = Gateway {
        sessions: Arc::new(NoPersistence),
        messages: Arc::new(NoPersistence),
        retreats: Arc::new(NoPersistence),
        profiles: Arc::new(NoPersistence),
    };
    let controller = ChatController::new(gateway, Arc::new(StaticSearch { items: sample_items() }));

    let outcome = controller.send("yoga in bali").await.unwrap();

    assert_eq!(outcome, SendOutcome::AuthRequired);
    let snapshot = controller.snapshot().await;
    assert!(snapshot.active_session_id.is_none());
    assert_eq!(texts(&snapshot.transcript), vec![GREETING_MESSAGE]);
}

#[tokio::test]
async fn test_send_runs_full_protocol() {
    let (controller, backend) =
        authed_controller(Arc::new(StaticSearch { items: sample_items() })).await;

    let outcome = controller.send("Yoga in Bali").await.unwrap();
    assert_eq!(outcome, SendOutcome::Completed);

    let snapshot = controller.snapshot().await;
    let session_id = snapshot.active_session_id.clone().unwrap();
    assert_eq!(
        texts(&snapshot.transcript),
        vec![GREETING_MESSAGE, "Yoga in Bali", SEARCHING_MESSAGE, FOUND_MESSAGE]
    );
    assert!(!snapshot.loading);

    // Off-topic item filtered out, on-topic item extracted.
    assert_eq!(snapshot.results.cards.len(), 1);
    assert_eq!(snapshot.results.cards[0].title, "10-Day Yoga Retreat in Ubud");
    assert_eq!(snapshot.results.cards[0].date, "March 15, 2025");
    // Paywall still locked: booking link withheld, block obscured.
    assert!(snapshot.results.obscured);
    assert!(snapshot.results.cards[0].booking_link.is_none());

    // Transcript and retreats were persisted (greeting stays local).
    let persisted = MessageRepository::list(backend.as_ref(), &session_id)
        .await
        .unwrap();
    assert_eq!(
        texts(&persisted),
        vec!["Yoga in Bali", SEARCHING_MESSAGE, FOUND_MESSAGE]
    );
    let retreats = RetreatRepository::list(backend.as_ref(), &session_id)
        .await
        .unwrap();
    assert_eq!(retreats.len(), 1);
}

#[tokio::test]
async fn test_search_failure_annotates_once_and_still_closes() {
    let (controller, _backend) = authed_controller(Arc::new(FailingSearch)).await;

    let outcome = controller.send("yoga").await.unwrap();
    assert_eq!(outcome, SendOutcome::Completed);

    let snapshot = controller.snapshot().await;
    // One failure annotation, and the fixed closing message is appended
    // regardless (no branch for zero results).
    assert_eq!(
        texts(&snapshot.transcript),
        vec![GREETING_MESSAGE, "yoga", SEARCHING_MESSAGE, SEARCH_FAILED_MESSAGE, FOUND_MESSAGE]
    );
    assert!(snapshot.results.cards.is_empty());
    assert!(!snapshot.loading);
}

#[tokio::test]
async fn test_persistence_failure_is_annotated_not_fatal() {
    let backend = MemoryGateway::new();
    let identity = sign_up(&backend).await;
    let mut gateway = backend.gateway();
    gateway.messages = Arc::new(FailingMessages);
    let controller =
        ChatController::new(gateway, Arc::new(StaticSearch { items: sample_items() }));
    controller.on_authenticated(identity).await;

    let outcome = controller.send("yoga").await.unwrap();

    assert_eq!(outcome, SendOutcome::Completed);
    let snapshot = controller.snapshot().await;
    assert_eq!(
        snapshot.transcript.last().map(|message| message.text.as_str()),
        Some(PERSIST_FAILED_MESSAGE)
    );
    // The extractor pipeline still ran.
    assert_eq!(snapshot.results.cards.len(), 1);
}

#[tokio::test]
async fn test_session_creation_failure_is_fatal_to_send() {
    let backend = MemoryGateway::new();
    let identity = sign_up(&backend).await;
    let mut gateway = backend.gateway();
    struct FailingCreate;
    #[async_trait]
    impl SessionRepository for FailingCreate {
        async fn create(&self, _owner_id: &str, _name: Option<&str>) -> Result<ChatSession> {
            Err(SattvaError::data_access("insert rejected"))
        }
        async fn list(&self, _owner_id: &str) -> Result<Vec<ChatSession>> {
            Ok(Vec::new())
        }
        async fn find_by_id(&self, _session_id: &str) -> Result<Option<ChatSession>> {
            Ok(None)
        }
        async fn rename(&self, session_id: &str, _name: &str) -> Result<ChatSession> {
            Err(SattvaError::not_found("session", session_id))
        }
        async fn touch(&self, _session_id: &str) -> Result<()> {
            Ok(())
        }
        async fn delete(&self, _session_id: &str) -> Result<()> {
            Ok(())
        }
    }
    gateway.sessions = Arc::new(FailingCreate);
    let controller =
        ChatController::new(gateway, Arc::new(StaticSearch { items: sample_items() }));
    controller.on_authenticated(identity).await;

    let result = controller.send("yoga").await;

    assert!(result.is_err());
    let snapshot = controller.snapshot().await;
    assert!(snapshot.active_session_id.is_none());
    // Nothing past the greeting made it into the transcript.
    assert_eq!(texts(&snapshot.transcript), vec![GREETING_MESSAGE]);
}

#[tokio::test]
async fn test_switch_replaces_transcript_retreats_and_unlock() {
    let backend = MemoryGateway::new();
    let identity = sign_up(&backend).await;
    let mut gateway = backend.gateway();
    // Durable profile writes fail, so any unlock stays session-local.
    gateway.profiles = Arc::new(FailingProfiles);
    let controller =
        ChatController::new(gateway, Arc::new(StaticSearch { items: sample_items() }));
    controller.on_authenticated(identity).await;

    controller.send("Yoga in Bali").await.unwrap();
    let first_id = controller.snapshot().await.active_session_id.unwrap();
    controller.confirm_payment().await.unwrap();
    assert!(controller.snapshot().await.unlocked);

    // A fresh session starts locked with a clean transcript.
    let second = controller.new_session(Some("Second")).await.unwrap();
    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.active_session_id.as_deref(), Some(second.id.as_str()));
    assert_eq!(texts(&snapshot.transcript), vec![GREETING_MESSAGE]);
    assert!(snapshot.results.cards.is_empty());
    assert!(!snapshot.unlocked);

    // Switching back restores the persisted transcript and retreats, but
    // the session-local unlock did not survive.
    controller.switch_session(&first_id).await.unwrap();
    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.active_session_id.as_deref(), Some(first_id.as_str()));
    assert!(texts(&snapshot.transcript).contains(&FOUND_MESSAGE));
    assert_eq!(snapshot.results.cards.len(), 1);
    assert!(!snapshot.unlocked);
}

#[tokio::test]
async fn test_delete_active_session_clears_state() {
    let (controller, backend) =
        authed_controller(Arc::new(StaticSearch { items: sample_items() })).await;
    controller.send("yoga").await.unwrap();
    let session_id = controller.snapshot().await.active_session_id.unwrap();

    controller.delete_session(&session_id).await.unwrap();

    let snapshot = controller.snapshot().await;
    assert!(snapshot.active_session_id.is_none());
    assert_eq!(texts(&snapshot.transcript), vec![GREETING_MESSAGE]);
    assert!(snapshot.results.cards.is_empty());
    assert!(
        SessionRepository::find_by_id(backend.as_ref(), &session_id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_delete_other_session_leaves_current_state() {
    let (controller, _backend) =
        authed_controller(Arc::new(StaticSearch { items: sample_items() })).await;
    let other = controller.new_session(Some("other")).await.unwrap();
    controller.new_session(Some("current")).await.unwrap();
    controller.send("yoga").await.unwrap();
    let before = controller.snapshot().await;

    controller.delete_session(&other.id).await.unwrap();

    let after = controller.snapshot().await;
    assert_eq!(after.active_session_id, before.active_session_id);
    assert_eq!(after.transcript.len(), before.transcript.len());
    let sessions = controller.list_sessions().await.unwrap();
    assert!(sessions.iter().all(|session| session.id != other.id));
}

#[tokio::test]
async fn test_partial_cascade_failure_is_surfaced_distinctly() {
    let backend = MemoryGateway::new();
    let identity = sign_up(&backend).await;
    let mut gateway = backend.gateway();
    gateway.sessions = Arc::new(PartialDeleteSessions {
        inner: backend.clone(),
    });
    let controller =
        ChatController::new(gateway, Arc::new(StaticSearch { items: sample_items() }));
    controller.on_authenticated(identity).await;
    controller.send("yoga").await.unwrap();
    let session_id = controller.snapshot().await.active_session_id.unwrap();

    let err = controller.delete_session(&session_id).await.unwrap_err();

    assert!(err.is_partial_delete());
    // State untouched so the user can retry.
    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.active_session_id.as_deref(), Some(session_id.as_str()));
}

#[tokio::test]
async fn test_send_while_loading_is_ignored() {
    let backend = MemoryGateway::new();
    let identity = sign_up(&backend).await;
    let search = Arc::new(PendingSearch::default());
    let controller = Arc::new(ChatController::new(backend.gateway(), search.clone()));
    controller.on_authenticated(identity).await;

    let send_task = tokio::spawn({
        let controller = controller.clone();
        async move { controller.send("yoga in bali").await }
    });
    search.started.notified().await;

    assert!(controller.snapshot().await.loading);
    assert_eq!(controller.send("another query").await.unwrap(), SendOutcome::Ignored);

    search.release.notify_one();
    assert_eq!(send_task.await.unwrap().unwrap(), SendOutcome::Completed);
    assert!(!controller.snapshot().await.loading);
}

#[tokio::test]
async fn test_stale_search_response_cannot_overwrite_newer_session() {
    let backend = MemoryGateway::new();
    let identity = sign_up(&backend).await;
    let search = Arc::new(PendingSearch::default());
    let controller = Arc::new(ChatController::new(backend.gateway(), search.clone()));
    controller.on_authenticated(identity).await;

    let first = controller.new_session(Some("first")).await.unwrap();
    let second = controller.new_session(Some("second")).await.unwrap();
    controller.switch_session(&first.id).await.unwrap();

    let send_task = tokio::spawn({
        let controller = controller.clone();
        async move { controller.send("yoga").await }
    });
    search.started.notified().await;

    // The user moves on while the fetch is still outstanding.
    controller.switch_session(&second.id).await.unwrap();
    search.release.notify_one();
    assert_eq!(send_task.await.unwrap().unwrap(), SendOutcome::Completed);

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.active_session_id.as_deref(), Some(second.id.as_str()));
    assert!(snapshot.results.cards.is_empty());
    assert!(!snapshot.loading);
    // The late continuation kept writing to the original session only.
    assert!(!texts(&snapshot.transcript).contains(&FOUND_MESSAGE));
    let persisted = MessageRepository::list(backend.as_ref(), &first.id)
        .await
        .unwrap();
    assert!(texts(&persisted).contains(&FOUND_MESSAGE));
}

#[tokio::test]
async fn test_confirm_payment_unlocks_and_records() {
    let (controller, backend) =
        authed_controller(Arc::new(StaticSearch { items: sample_items() })).await;
    controller.send("yoga").await.unwrap();
    assert!(!controller.snapshot().await.unlocked);

    controller.confirm_payment().await.unwrap();

    let snapshot = controller.snapshot().await;
    assert!(snapshot.unlocked);
    assert!(!snapshot.results.obscured);
    assert!(snapshot.results.cards[0].booking_link.is_some());
    assert_eq!(
        snapshot.transcript.last().map(|message| message.text.as_str()),
        Some(super::controller::ACCESS_GRANTED_MESSAGE)
    );

    let payments = backend.payments().await;
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].amount_cents, 999);
    assert_eq!(payments[0].status, "completed");
}

#[tokio::test]
async fn test_confirm_payment_requires_identity() {
    let backend = MemoryGateway::new();
    let controller = ChatController::new(
        backend.gateway(),
        Arc::new(StaticSearch { items: sample_items() }),
    );

    let err = controller.confirm_payment().await.unwrap_err();

    assert!(err.is_auth());
    assert!(backend.payments().await.is_empty());
}

#[tokio::test]
async fn test_rename_session_updates_listing() {
    let (controller, _backend) =
        authed_controller(Arc::new(StaticSearch { items: sample_items() })).await;
    let session = controller.new_session(None).await.unwrap();

    let renamed = controller
        .rename_session(&session.id, "Bali planning")
        .await
        .unwrap();

    assert_eq!(renamed.name, "Bali planning");
    let sessions = controller.list_sessions().await.unwrap();
    assert!(sessions.iter().any(|s| s.name == "Bali planning"));
}
