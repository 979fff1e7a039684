//! Snippet source trait for search-result text.
//!
//! The estimator issues plain-text queries such as
//! `"Acme revenue 123 Main St Springfield zippia"` and only cares about the
//! text snippets that come back. How they are fetched (HTML scraping, a
//! search API, a fixture file) is up to the implementation.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::SourceResult;

/// Fetches raw text snippets for a search query.
///
/// # Implementations
///
/// - `BingSource` / `TavilySource` in the `revenue-cli` driver
/// - [`crate::testing::MockSnippetSource`] - For testing
#[async_trait]
pub trait SnippetSource: Send + Sync {
    /// Snippets for the query, most relevant first.
    ///
    /// An empty result is not an error.
    async fn fetch_snippets(&self, query: &str) -> SourceResult<Vec<String>>;
}

#[async_trait]
impl<S: SnippetSource + ?Sized> SnippetSource for Arc<S> {
    async fn fetch_snippets(&self, query: &str) -> SourceResult<Vec<String>> {
        (**self).fetch_snippets(query).await
    }
}

#[async_trait]
impl<S: SnippetSource + ?Sized> SnippetSource for Box<S> {
    async fn fetch_snippets(&self, query: &str) -> SourceResult<Vec<String>> {
        (**self).fetch_snippets(query).await
    }
}
