//! User domain models.

use serde::{Deserialize, Serialize};

/// Durable user profile held by the persistence gateway.
///
/// `is_premium` is the sole durable entitlement flag; it is set by a
/// successful payment write and read back on every profile load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub full_name: String,
    pub is_premium: bool,
    /// Last recorded payment status, when any payment has been made.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,
}

impl UserProfile {
    /// Creates a fresh, non-premium profile.
    pub fn new(user_id: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            full_name: full_name.into(),
            is_premium: false,
            payment_status: None,
        }
    }
}

/// A single simulated-payment record.
///
/// Inserted on payment confirmation; nothing is ever charged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub user_id: String,
    pub amount_cents: u32,
    pub status: String,
    pub payment_method: String,
    /// Timestamp when the record was created (ISO 8601 format).
    pub created_at: String,
}

impl PaymentRecord {
    /// Creates a completed demo-payment record stamped with the current
    /// time.
    pub fn demo(user_id: impl Into<String>, amount_cents: u32) -> Self {
        Self {
            user_id: user_id.into(),
            amount_cents,
            status: "completed".to_string(),
            payment_method: "demo_payment".to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// An authenticated identity returned by the identity provider.
///
/// The core only inspects presence/absence; the fields exist so the
/// presentation layer can greet the user and so persistence calls can be
/// scoped to an owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}
