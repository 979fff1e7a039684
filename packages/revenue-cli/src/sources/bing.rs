//! Bing search-result scraping.
//!
//! Fetches the result page for a query and pulls snippet text out of the
//! result captions. No JavaScript rendering; whatever Bing serves to a plain
//! HTTP client is what gets parsed.

use async_trait::async_trait;
use estimation::{SnippetSource, SourceError, SourceResult};
use rand::seq::SliceRandom;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::http_error;

const SEARCH_URL: &str = "https://www.bing.com/search";

/// Rotated per request.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.1 Safari/605.1.15",
];

/// Result container, falling back to the whole page.
const CONTAINER_SELECTORS: &[&str] = &["ol#b_results", "body"];

/// Snippet-bearing elements, highest priority first.
const SNIPPET_SELECTORS: &[&str] = &[
    "[data-tag*=\"revenue\"]",
    ".b_caption.hasdl.b_stsp2",
    ".b_lineclamp2",
];

/// Scrapes snippets from Bing result pages.
pub struct BingSource {
    client: reqwest::Client,
    search_url: Url,
}

impl BingSource {
    pub fn new() -> anyhow::Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static("en-US,en;q=0.9"),
        );
        headers.insert(
            reqwest::header::REFERER,
            reqwest::header::HeaderValue::from_static("https://www.bing.com/"),
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            search_url: Url::parse(SEARCH_URL)?,
        })
    }

    /// Point at a different search endpoint (for a local fixture server).
    pub fn with_search_url(mut self, url: Url) -> Self {
        self.search_url = url;
        self
    }

    fn query_url(&self, query: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut().append_pair("q", query);
        url
    }
}

#[async_trait]
impl SnippetSource for BingSource {
    async fn fetch_snippets(&self, query: &str) -> SourceResult<Vec<String>> {
        let user_agent = USER_AGENTS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(USER_AGENTS[0]);

        let response = self
            .client
            .get(self.query_url(query))
            .header(reqwest::header::USER_AGENT, user_agent)
            .send()
            .await
            .map_err(|e| http_error(e, query))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                query: query.to_string(),
            });
        }

        let html = response.text().await.map_err(|e| http_error(e, query))?;
        let snippets = parse_snippets(&html);
        debug!(query, count = snippets.len(), "Parsed Bing snippets");
        Ok(snippets)
    }
}

/// Snippet texts from a result page, in selector priority order, deduplicated.
pub fn parse_snippets(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let container = CONTAINER_SELECTORS.iter().find_map(|s| {
        let selector = Selector::parse(s).ok()?;
        document.select(&selector).next()
    });
    let Some(container) = container else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut snippets = Vec::new();

    for selector_str in SNIPPET_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        for element in container.select(&selector) {
            let text = element_text(element);
            if !text.is_empty() && seen.insert(text.clone()) {
                snippets.push(text);
            }
        }
    }

    snippets
}

/// Text nodes trimmed and joined with single spaces.
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
