//! Paywall/entitlement resolution.
//!
//! The unlock gate derives from the durable premium flag on the profile OR
//! a one-shot simulated-payment event scoped to the component's in-memory
//! lifetime. The local event is a read-through cache of an
//! eventually-consistent profile write, not an independent source of truth:
//! it does not survive a reload unless the durable flag was also set.

use serde::{Deserialize, Serialize};

use crate::retreat::{RetreatCandidate, RetreatView};
use crate::user::UserProfile;

/// Price of the simulated unlock, in cents.
pub const UNLOCK_PRICE_CENTS: u32 = 999;

/// Derives the unlock flag from the durable entitlement and the
/// session-local unlock event.
///
/// Pure and idempotent: the same inputs always produce the same answer.
pub fn resolve_unlock(profile: Option<&UserProfile>, local_unlock_event: bool) -> bool {
    profile.map(|p| p.is_premium).unwrap_or(false) || local_unlock_event
}

/// Retreat results as gated for rendering.
///
/// While locked, every card's booking link is absent and `obscured` is set
/// so a presentation layer hides or blurs the cards as a unit — field
/// visibility is not differentiated per card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatedResults {
    /// Whether the whole block should be visually obscured.
    pub obscured: bool,
    pub cards: Vec<RetreatView>,
}

impl GatedResults {
    /// Projects candidates through the paywall gate.
    pub fn gate(candidates: &[RetreatCandidate], unlocked: bool) -> Self {
        Self {
            obscured: !unlocked,
            cards: candidates.iter().map(|c| c.view(unlocked)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retreat::DATE_UNAVAILABLE;

    fn profile(premium: bool) -> UserProfile {
        UserProfile {
            user_id: "u-1".to_string(),
            full_name: "Ana".to_string(),
            is_premium: premium,
            payment_status: None,
        }
    }

    fn candidate() -> RetreatCandidate {
        RetreatCandidate {
            title: "Yoga retreat".to_string(),
            location: "retreat.guru".to_string(),
            date: DATE_UNAVAILABLE.to_string(),
            link: "https://retreat.guru/r/1".to_string(),
            image: "https://img.example/1.jpg".to_string(),
        }
    }

    #[test]
    fn test_locked_without_profile_or_event() {
        assert!(!resolve_unlock(None, false));
        assert!(!resolve_unlock(Some(&profile(false)), false));
    }

    #[test]
    fn test_premium_profile_unlocks() {
        assert!(resolve_unlock(Some(&profile(true)), false));
    }

    #[test]
    fn test_local_event_unlocks_without_durable_flag() {
        assert!(resolve_unlock(Some(&profile(false)), true));
        assert!(resolve_unlock(None, true));
    }

    #[test]
    fn test_resolve_unlock_is_idempotent() {
        let p = profile(false);
        let first = resolve_unlock(Some(&p), false);
        let second = resolve_unlock(Some(&p), false);
        assert_eq!(first, second);
    }

    #[test]
    fn test_locked_results_omit_booking_link_and_obscure_block() {
        let gated = GatedResults::gate(&[candidate()], false);
        assert!(gated.obscured);
        assert_eq!(gated.cards.len(), 1);
        assert!(gated.cards[0].booking_link.is_none());
        // Non-gated fields stay visible.
        assert_eq!(gated.cards[0].title, "Yoga retreat");
        assert_eq!(gated.cards[0].location, "retreat.guru");
    }

    #[test]
    fn test_unlocked_results_reveal_booking_link() {
        let gated = GatedResults::gate(&[candidate()], true);
        assert!(!gated.obscured);
        assert_eq!(
            gated.cards[0].booking_link.as_deref(),
            Some("https://retreat.guru/r/1")
        );
    }
}
