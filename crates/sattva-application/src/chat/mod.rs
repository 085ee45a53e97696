//! Chat use case module.
//!
//! # Module Structure
//!
//! - `controller`: The session state machine (`ChatController`)
//! - `state`: Outcome and snapshot types

mod controller;
mod state;

#[cfg(test)]
mod controller_test;

pub use controller::{
    ACCESS_GRANTED_MESSAGE, ChatController, FOUND_MESSAGE, GREETING_MESSAGE,
    PERSIST_FAILED_MESSAGE, SEARCH_FAILED_MESSAGE, SEARCHING_MESSAGE,
};
pub use state::{ChatSnapshot, SendOutcome};
