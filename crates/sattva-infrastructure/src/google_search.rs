//! Google Custom Search provider.
//!
//! Sends a single Custom Search JSON API request per query and validates
//! the dynamic payload into typed [`SearchItem`]s at this boundary, so
//! downstream logic never re-checks optional fields. No pagination, no
//! retry, no rate-limit handling.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use sattva_core::error::{Result, SattvaError};
use sattva_core::search::{SearchItem, SearchProvider, SearchResponse};

use crate::config::SearchConfig;

const BASE_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// Search provider backed by the Google Custom Search JSON API.
#[derive(Clone)]
pub struct GoogleSearchProvider {
    client: Client,
    api_key: String,
    engine_id: String,
}

impl GoogleSearchProvider {
    /// Creates a provider with the given credentials.
    pub fn new(api_key: impl Into<String>, engine_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            engine_id: engine_id.into(),
        }
    }

    /// Creates a provider from loaded configuration.
    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(&config.api_key, &config.engine_id)
    }
}

#[async_trait]
impl SearchProvider for GoogleSearchProvider {
    async fn search(&self, query: &str) -> Result<SearchResponse> {
        tracing::debug!(target: "search", "Custom Search request: {query}");
        let response = self
            .client
            .get(BASE_URL)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
            ])
            .send()
            .await
            .map_err(|err| SattvaError::search(format!("Search request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read search error body".to_string());
            return Err(map_http_error(status, body));
        }

        let payload: SearchPayload = response
            .json()
            .await
            .map_err(|err| SattvaError::search(format!("Failed to parse search response: {err}")))?;
        tracing::debug!(target: "search", "Custom Search returned {} item(s)", payload.items.len());

        Ok(SearchResponse {
            query: query.to_string(),
            items: payload.items.into_iter().map(SearchItem::from).collect(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct SearchPayload {
    #[serde(default)]
    items: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    display_link: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    pagemap: Option<PageMap>,
}

#[derive(Debug, Deserialize)]
struct PageMap {
    #[serde(default)]
    cse_image: Vec<PageImage>,
}

#[derive(Debug, Deserialize)]
struct PageImage {
    #[serde(default)]
    src: Option<String>,
}

impl From<RawItem> for SearchItem {
    fn from(item: RawItem) -> Self {
        let thumbnail = item
            .pagemap
            .and_then(|pagemap| pagemap.cse_image.into_iter().next())
            .and_then(|image| image.src);
        SearchItem {
            title: item.title,
            snippet: item.snippet,
            display_link: item.display_link,
            link: item.link,
            thumbnail,
        }
    }
}

fn map_http_error(status: StatusCode, body: String) -> SattvaError {
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|err| err.get("message"))
                .and_then(|msg| msg.as_str())
                .map(|msg| msg.to_string())
        })
        .unwrap_or(body);
    SattvaError::search(format!("Search returned {}: {}", status.as_u16(), message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_maps_to_typed_items() {
        let json = r#"{
            "items": [
                {
                    "title": "10-Day Yoga Retreat in Ubud",
                    "snippet": "Join us March 15, 2025 in Bali",
                    "displayLink": "retreat.guru",
                    "link": "https://retreat.guru/r/ubud",
                    "pagemap": { "cse_image": [{ "src": "https://img.example/ubud.jpg" }] }
                },
                {
                    "title": "Wellness weekend",
                    "snippet": "No metadata here",
                    "displayLink": "tripaneer.com",
                    "link": "https://tripaneer.com/w/1"
                }
            ]
        }"#;

        let payload: SearchPayload = serde_json::from_str(json).unwrap();
        let items: Vec<SearchItem> = payload.items.into_iter().map(SearchItem::from).collect();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].display_link, "retreat.guru");
        assert_eq!(items[0].thumbnail.as_deref(), Some("https://img.example/ubud.jpg"));
        assert_eq!(items[1].thumbnail, None);
    }

    #[test]
    fn test_payload_without_items_is_empty() {
        let payload: SearchPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.items.is_empty());
    }

    #[test]
    fn test_http_error_extracts_provider_message() {
        let err = map_http_error(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error": {"message": "Quota exceeded"}}"#.to_string(),
        );
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Quota exceeded"));
    }
}
