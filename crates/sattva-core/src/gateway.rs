//! Persistence gateway bundle.

use std::sync::Arc;

use crate::retreat::RetreatRepository;
use crate::session::{MessageRepository, SessionRepository};
use crate::user::ProfileRepository;

/// Bundle of persistence handles injected into use cases.
///
/// Every component that needs the backend receives this explicitly
/// constructed bundle; nothing reaches for an ambient or global client.
#[derive(Clone)]
pub struct Gateway {
    pub sessions: Arc<dyn SessionRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub retreats: Arc<dyn RetreatRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
}
