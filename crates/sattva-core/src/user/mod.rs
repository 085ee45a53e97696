//! User domain module.
//!
//! # Module Structure
//!
//! - `model`: Profile and identity domain models
//! - `identity`: Identity provider trait and credential validation
//! - `repository`: Repository trait for profile persistence

mod identity;
mod model;
mod repository;

pub use identity::{IdentityProvider, MIN_PASSWORD_LEN, validate_credentials};
pub use model::{Identity, PaymentRecord, UserProfile};
pub use repository::{ProfilePatch, ProfileRepository};
