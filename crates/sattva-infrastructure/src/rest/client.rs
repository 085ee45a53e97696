//! Typed client for the hosted backend.
//!
//! Wraps the backend's row endpoints (`/rest/v1/<table>` with `eq.`-style
//! filters) and its auth endpoints (`/auth/v1/...`). Wire errors are mapped
//! to [`SattvaError`] variants here so repository code never inspects raw
//! responses.

use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use sattva_core::error::{Result, SattvaError};

use crate::config::BackendConfig;

/// Builds an `eq.<value>` filter operand for a row query.
pub(crate) fn eq(value: &str) -> String {
    format!("eq.{value}")
}

/// Shared HTTP client for the hosted backend.
pub struct RestClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestClient {
    /// Creates a client for the given project URL and public API key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Creates a client from loaded configuration.
    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(&config.base_url, &config.api_key)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    /// Selects rows from `table` matching the given query parameters.
    pub(crate) async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let response = self
            .client
            .get(self.rest_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(query)
            .send()
            .await?;
        let response = Self::ensure_success(response, table).await?;
        Ok(response.json().await?)
    }

    /// Inserts `body` into `table`, returning the created rows.
    pub(crate) async fn insert<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
    ) -> Result<Vec<T>> {
        let response = self
            .client
            .post(self.rest_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        let response = Self::ensure_success(response, table).await?;
        Ok(response.json().await?)
    }

    /// Patches rows in `table` matching the query, returning the updated
    /// rows.
    pub(crate) async fn update<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> Result<Vec<T>> {
        let response = self
            .client
            .patch(self.rest_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=representation")
            .query(query)
            .json(body)
            .send()
            .await?;
        let response = Self::ensure_success(response, table).await?;
        Ok(response.json().await?)
    }

    /// Deletes rows in `table` matching the query.
    pub(crate) async fn delete(&self, table: &str, query: &[(&str, String)]) -> Result<()> {
        let response = self
            .client
            .delete(self.rest_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(query)
            .send()
            .await?;
        Self::ensure_success(response, table).await?;
        Ok(())
    }

    /// Posts to an auth endpoint, mapping rejections to
    /// [`SattvaError::Auth`] with the provider's human-readable message.
    pub(crate) async fn auth_post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: &B,
    ) -> Result<T> {
        let response = self
            .client
            .post(self.auth_url(path))
            .header("apikey", &self.api_key)
            .query(query)
            .json(body)
            .send()
            .await
            .map_err(|err| SattvaError::auth(format!("Authentication request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read auth error body".to_string());
            return Err(map_auth_error(status, text));
        }

        response
            .json()
            .await
            .map_err(|err| SattvaError::auth(format!("Failed to parse auth response: {err}")))
    }

    async fn ensure_success(response: Response, table: &str) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());
        Err(map_rest_error(status, table, text))
    }
}

fn map_rest_error(status: StatusCode, table: &str, body: String) -> SattvaError {
    let message = extract_message(&body, &["message", "hint"]).unwrap_or(body);
    SattvaError::data_access(format!(
        "Backend returned {} for '{}': {}",
        status.as_u16(),
        table,
        message
    ))
}

fn map_auth_error(status: StatusCode, body: String) -> SattvaError {
    let message =
        extract_message(&body, &["error_description", "msg", "message"]).unwrap_or(body);
    SattvaError::auth(format!("{} ({})", message, status.as_u16()))
}

fn extract_message(body: &str, keys: &[&str]) -> Option<String> {
    let json = serde_json::from_str::<serde_json::Value>(body).ok()?;
    keys.iter().find_map(|key| {
        json.get(key)
            .and_then(|value| value.as_str())
            .map(|value| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_error_uses_backend_message() {
        let err = map_rest_error(
            StatusCode::CONFLICT,
            "chat_sessions",
            r#"{"message": "duplicate key value"}"#.to_string(),
        );
        let text = err.to_string();
        assert!(text.contains("409"));
        assert!(text.contains("chat_sessions"));
        assert!(text.contains("duplicate key value"));
    }

    #[test]
    fn test_auth_error_prefers_error_description() {
        let err = map_auth_error(
            StatusCode::BAD_REQUEST,
            r#"{"error_description": "Invalid login credentials"}"#.to_string(),
        );
        assert!(err.is_auth());
        assert!(err.to_string().contains("Invalid login credentials"));
    }

    #[test]
    fn test_eq_operand() {
        assert_eq!(eq("abc"), "eq.abc");
    }
}
