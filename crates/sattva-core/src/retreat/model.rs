//! Retreat domain models.

use serde::{Deserialize, Serialize};

/// Sentinel used when no date could be derived from a snippet.
pub const DATE_UNAVAILABLE: &str = "Date not available";

/// Generic image used when a result carries no nested thumbnail.
pub const FALLBACK_IMAGE_URL: &str = "https://source.unsplash.com/featured/?retreat";

/// A retreat record derived from a single search result item.
///
/// Produced fresh per query and never mutated, only filtered and sliced.
/// `date` is never empty: absent a recognizable date substring it holds
/// [`DATE_UNAVAILABLE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetreatCandidate {
    /// Result title, verbatim.
    pub title: String,
    /// Source display domain, verbatim.
    pub location: String,
    /// Free-text date, or the [`DATE_UNAVAILABLE`] sentinel.
    pub date: String,
    /// Booking URL, verbatim.
    pub link: String,
    /// Thumbnail URL, or the [`FALLBACK_IMAGE_URL`] fallback.
    pub image: String,
}

/// Render contract for a single retreat card.
///
/// Title, location, date, and image are always present; the booking link is
/// omitted entirely (not merely styled over) while the paywall is locked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetreatView {
    pub title: String,
    pub location: String,
    pub date: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_link: Option<String>,
}

impl RetreatCandidate {
    /// Projects the candidate into its render contract.
    ///
    /// # Arguments
    ///
    /// * `unlocked` - Whether the paywall is currently unlocked; governs
    ///   booking-link presence.
    pub fn view(&self, unlocked: bool) -> RetreatView {
        RetreatView {
            title: self.title.clone(),
            location: self.location.clone(),
            date: self.date.clone(),
            image: self.image.clone(),
            booking_link: unlocked.then(|| self.link.clone()),
        }
    }
}
