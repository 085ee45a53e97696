//! Paywall/entitlement module.

mod resolver;

pub use resolver::{GatedResults, UNLOCK_PRICE_CENTS, resolve_unlock};
