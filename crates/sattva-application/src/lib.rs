pub mod auth;
pub mod chat;

pub use auth::AuthFlow;
pub use chat::{ChatController, ChatSnapshot, SendOutcome};
