//! Session domain module.
//!
//! This module contains all session-related domain models and repository
//! interfaces.
//!
//! # Module Structure
//!
//! - `model`: Core session domain model (`ChatSession`)
//! - `message`: Transcript message types (`MessageRole`, `ChatMessage`)
//! - `repository`: Repository traits for session and message persistence

mod message;
mod model;
mod repository;

// Re-export public API
pub use message::{ChatMessage, MessageRole};
pub use model::{ChatSession, DEFAULT_SESSION_NAME};
pub use repository::{MessageRepository, SessionRepository};
