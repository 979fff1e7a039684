//! Snippet sources backing the estimator.
//!
//! - [`BingSource`] scrapes Bing result pages
//! - [`TavilySource`] calls the Tavily search API
//! - [`PacedSource`] wraps either with a request quota

pub mod bing;
pub mod paced;
pub mod tavily;

pub use bing::{parse_snippets, BingSource};
pub use paced::PacedSource;
pub use tavily::TavilySource;

use estimation::SourceError;

/// Map a reqwest failure onto the source error taxonomy.
pub(crate) fn http_error(err: reqwest::Error, query: &str) -> SourceError {
    if err.is_timeout() {
        SourceError::Timeout {
            query: query.to_string(),
        }
    } else {
        SourceError::Http(Box::new(err))
    }
}
