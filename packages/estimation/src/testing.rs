//! Testing utilities including a mock snippet source.
//!
//! Useful for exercising the estimator without network access.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::error::{SourceError, SourceResult};
use crate::traits::source::SnippetSource;

/// A mock snippet source for testing.
///
/// Returns canned snippets per exact query string, an empty list for unknown
/// queries, and records every query it receives.
#[derive(Default, Clone)]
pub struct MockSnippetSource {
    /// Predefined snippets by query
    snippets: Arc<RwLock<HashMap<String, Vec<String>>>>,

    /// Queries that fail with an HTTP error
    failures: Arc<RwLock<HashSet<String>>>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockSnippetSource {
    /// Create a new mock source with no canned results.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add snippets for a query.
    pub fn with_snippets(self, query: impl Into<String>, snippets: &[&str]) -> Self {
        self.snippets.write().unwrap().insert(
            query.into(),
            snippets.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    /// Make a query fail.
    pub fn with_failure(self, query: impl Into<String>) -> Self {
        self.failures.write().unwrap().insert(query.into());
        self
    }

    /// Get all queries made to this mock, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// Clear call history.
    pub fn clear_calls(&self) {
        self.calls.write().unwrap().clear();
    }
}

#[async_trait]
impl SnippetSource for MockSnippetSource {
    async fn fetch_snippets(&self, query: &str) -> SourceResult<Vec<String>> {
        self.calls.write().unwrap().push(query.to_string());

        if self.failures.read().unwrap().contains(query) {
            return Err(SourceError::Http(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                format!("mock failure for {}", query),
            ))));
        }

        Ok(self
            .snippets
            .read()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default())
    }
}
