//! Snippet extraction: raw search items into retreat candidates.
//!
//! The extractor is a pure function over already-typed search items. It
//! filters items to the retreat topic, truncates to a fixed bound in
//! provider ranking order, and derives card fields with regex heuristics.
//! Malformed or sparse items degrade to sentinels and fallbacks; extraction
//! itself never fails.

use std::sync::OnceLock;

use regex::Regex;

use super::model::{DATE_UNAVAILABLE, FALLBACK_IMAGE_URL, RetreatCandidate};
use crate::search::SearchItem;

/// Source domains the search query is restricted to.
pub const SOURCE_DOMAINS: [&str; 3] = ["retreat.guru", "bookretreats.com", "tripaneer.com"];

/// Maximum number of candidates produced per query.
pub const MAX_CANDIDATES: usize = 5;

/// Topic filter applied to an item's concatenated title and snippet.
fn topic_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)retreat|yoga|meditation|wellness").expect("valid pattern"))
}

/// English month name (full or abbreviated), optional day number, optional
/// comma, 4-digit year.
fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"\b(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|Jun(?:e)?|Jul(?:y)?|Aug(?:ust)?|Sep(?:tember)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)(?:\s+\d{1,2})?,?\s+\d{4}\b",
        )
        .expect("valid pattern")
    })
}

/// Builds the provider query for a raw user query.
///
/// The template appends the retreat topic terms and the fixed
/// [`SOURCE_DOMAINS`] allowlist.
pub fn build_query(raw_query: &str) -> String {
    let sites = SOURCE_DOMAINS
        .iter()
        .map(|domain| format!("site:{domain}"))
        .collect::<Vec<_>>()
        .join(" OR ");
    format!("{raw_query} retreat yoga OR meditation OR wellness {sites}")
}

/// Transforms search items into retreat candidates.
///
/// Items are retained only if their concatenated title and snippet match
/// the retreat topic filter, then truncated to [`MAX_CANDIDATES`] in
/// provider order.
pub fn extract(items: &[SearchItem]) -> Vec<RetreatCandidate> {
    items
        .iter()
        .filter(|item| topic_pattern().is_match(&format!("{}{}", item.title, item.snippet)))
        .take(MAX_CANDIDATES)
        .map(candidate_from_item)
        .collect()
}

fn candidate_from_item(item: &SearchItem) -> RetreatCandidate {
    let date = date_pattern()
        .find(&item.snippet)
        .map(|found| found.as_str().to_string())
        .unwrap_or_else(|| DATE_UNAVAILABLE.to_string());

    RetreatCandidate {
        title: item.title.clone(),
        location: item.display_link.clone(),
        date,
        link: item.link.clone(),
        image: item
            .thumbnail
            .clone()
            .unwrap_or_else(|| FALLBACK_IMAGE_URL.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, snippet: &str) -> SearchItem {
        SearchItem {
            title: title.to_string(),
            snippet: snippet.to_string(),
            display_link: "retreat.guru".to_string(),
            link: "https://retreat.guru/r/1".to_string(),
            thumbnail: None,
        }
    }

    #[test]
    fn test_build_query_appends_topic_and_allowlist() {
        let query = build_query("Yoga in Bali");
        assert_eq!(
            query,
            "Yoga in Bali retreat yoga OR meditation OR wellness \
             site:retreat.guru OR site:bookretreats.com OR site:tripaneer.com"
        );
    }

    #[test]
    fn test_extract_ubud_scenario() {
        let items = vec![item(
            "10-Day Yoga Retreat in Ubud",
            "Join us March 15, 2025 in Bali",
        )];

        let candidates = extract(&items);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "10-Day Yoga Retreat in Ubud");
        assert_eq!(candidates[0].location, "retreat.guru");
        assert_eq!(candidates[0].date, "March 15, 2025");
        assert_eq!(candidates[0].link, "https://retreat.guru/r/1");
        assert_eq!(candidates[0].image, FALLBACK_IMAGE_URL);
    }

    #[test]
    fn test_extract_filters_off_topic_items() {
        let items = vec![
            item("Yoga weekend", "Stretch and breathe"),
            item("Cheap flights", "Fly to Bali for less"),
            item("Silent MEDITATION escape", "Ten days of silence"),
        ];

        let candidates = extract(&items);

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].title, "Yoga weekend");
        assert_eq!(candidates[1].title, "Silent MEDITATION escape");
    }

    #[test]
    fn test_extract_topic_match_spans_title_and_snippet() {
        // Neither field matches alone until concatenated with the other.
        let items = vec![item("Quiet escape in the hills", "A weekend wellness break")];
        assert_eq!(extract(&items).len(), 1);
    }

    #[test]
    fn test_extract_bounds_results_to_five() {
        let items: Vec<SearchItem> = (0..9)
            .map(|n| item(&format!("Retreat {n}"), "Yoga all week"))
            .collect();

        let candidates = extract(&items);

        assert_eq!(candidates.len(), MAX_CANDIDATES);
        // Provider ranking order is preserved, no re-ranking.
        assert_eq!(candidates[0].title, "Retreat 0");
        assert_eq!(candidates[4].title, "Retreat 4");
    }

    #[test]
    fn test_date_sentinel_when_no_match() {
        let items = vec![item("Yoga retreat", "Dates announced soon")];
        assert_eq!(extract(&items)[0].date, DATE_UNAVAILABLE);
    }

    #[test]
    fn test_date_abbreviated_month_without_day() {
        let items = vec![item("Yoga retreat", "Starting Sep 2025 in Goa")];
        assert_eq!(extract(&items)[0].date, "Sep 2025");
    }

    #[test]
    fn test_date_takes_first_match() {
        let items = vec![item(
            "Yoga retreat",
            "Sessions on January 3, 2025 and February 10, 2025",
        )];
        assert_eq!(extract(&items)[0].date, "January 3, 2025");
    }

    #[test]
    fn test_thumbnail_used_when_present() {
        let mut with_thumb = item("Yoga retreat", "All levels welcome");
        with_thumb.thumbnail = Some("https://img.example/thumb.jpg".to_string());

        let candidates = extract(&[with_thumb]);

        assert_eq!(candidates[0].image, "https://img.example/thumb.jpg");
    }

    #[test]
    fn test_extract_empty_input() {
        assert!(extract(&[]).is_empty());
    }
}
