//! Request pacing for snippet sources.
//!
//! Wraps any SnippetSource with a governor quota so search backends are not
//! hammered when a ledger has thousands of rows.

use async_trait::async_trait;
use estimation::{SnippetSource, SourceResult};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

type DefaultRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// A snippet source wrapper that enforces a request quota.
pub struct PacedSource<S: SnippetSource> {
    inner: S,
    limiter: Arc<DefaultRateLimiter>,
}

impl<S: SnippetSource> PacedSource<S> {
    /// Allow `requests_per_minute` fetches per minute, one at a time.
    pub fn per_minute(source: S, requests_per_minute: NonZeroU32) -> Self {
        let quota = Quota::per_minute(requests_per_minute).allow_burst(nonzero_ext::nonzero!(1u32));
        Self::with_quota(source, quota)
    }

    /// Create with a custom quota.
    pub fn with_quota(source: S, quota: Quota) -> Self {
        Self {
            inner: source,
            limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: SnippetSource> SnippetSource for PacedSource<S> {
    async fn fetch_snippets(&self, query: &str) -> SourceResult<Vec<String>> {
        self.limiter.until_ready().await;
        self.inner.fetch_snippets(query).await
    }
}
