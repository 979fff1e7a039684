//! Tavily-backed snippet source.
//!
//! Uses Tavily's search API; each result's `content` field is a snippet.

use async_trait::async_trait;
use estimation::{SnippetSource, SourceError, SourceResult};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::http_error;

const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";

/// Tavily search request.
#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    query: &'a str,
    search_depth: &'a str,
    max_results: usize,
}

/// Tavily search response.
#[derive(Debug, Deserialize)]
struct TavilyResponse {
    results: Vec<TavilyResult>,
}

/// A single Tavily search result.
#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

impl TavilyResult {
    /// Content, or the title when a result carries no content.
    fn into_snippet(self) -> Option<String> {
        self.content
            .or(self.title)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

/// Snippet source backed by the Tavily search API.
pub struct TavilySource {
    client: reqwest::Client,
    api_key: SecretString,
    endpoint: String,
    max_results: usize,
}

impl TavilySource {
    pub fn new(api_key: impl Into<SecretString>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: TAVILY_SEARCH_URL.to_string(),
            max_results: 10,
        })
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl SnippetSource for TavilySource {
    async fn fetch_snippets(&self, query: &str) -> SourceResult<Vec<String>> {
        let request = TavilyRequest {
            query,
            search_depth: "basic",
            max_results: self.max_results,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
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

        let body: TavilyResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Malformed(e.to_string()))?;

        Ok(parse_results(body))
    }
}

fn parse_results(body: TavilyResponse) -> Vec<String> {
    body.results
        .into_iter()
        .filter_map(TavilyResult::into_snippet)
        .collect()
}
