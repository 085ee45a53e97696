//! Search provider trait definition.

use async_trait::async_trait;

use crate::error::Result;
use crate::search::SearchResponse;

/// External web search collaborator.
///
/// Implementations perform a single search call: no pagination, no retry,
/// no rate-limit handling. A failed call surfaces as
/// [`crate::error::SattvaError::Search`]; the caller recovers by treating
/// the result set as empty.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Executes a search with the given query.
    ///
    /// # Arguments
    /// * `query` - The fully built query string (see
    ///   [`crate::retreat::build_query`])
    ///
    /// # Returns
    /// A [`SearchResponse`] with items in provider ranking order.
    async fn search(&self, query: &str) -> Result<SearchResponse>;
}
