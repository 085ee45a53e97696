//! Search domain models.
//!
//! Raw provider payloads are validated into these types exactly once at the
//! provider boundary; internal logic never re-checks optional field
//! presence.

use serde::{Deserialize, Serialize};

/// A single item returned by the web search provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchItem {
    /// Result title, as ranked and rendered by the provider.
    pub title: String,

    /// Free-text snippet accompanying the result.
    pub snippet: String,

    /// Display domain (host) of the result.
    pub display_link: String,

    /// Full URL of the result.
    pub link: String,

    /// First nested image thumbnail URL, when the provider supplied
    /// structured page metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// Result of a search call, in provider ranking order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// The query that was sent to the provider.
    pub query: String,

    /// Result items, in provider order. No re-ranking is applied.
    pub items: Vec<SearchItem>,
}

impl SearchResponse {
    /// Creates an empty response for `query`.
    pub fn empty(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            items: Vec::new(),
        }
    }
}
