// SearxNG JSON API collector.
//
// SearxNG meta-searches other engines and exposes results at
// `{endpoint}?q=...&format=json`. The instance must have the JSON format
// enabled in its settings.yml.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::error::CollectError;
use super::rate_limit::{request_timeout, with_retry, RateLimiter, RetryPolicy};
use super::traits::{SearchCollector, SearchResult};

const ENGINE_NAME: &str = "searxng";

pub struct SearxngCollector {
    client: Client,
    endpoint: String,
    rate_limiter: RateLimiter,
    retry: RetryPolicy,
    pages: u32,
}

impl SearxngCollector {
    pub fn new(endpoint: &str, rate_limit_s: f64, timeout_s: f64, pages: u32) -> Result<Self> {
        if endpoint.trim().is_empty() {
            anyhow::bail!("SearxNG engine needs an `endpoint`, e.g. http://localhost:8080/search");
        }
        let client = Client::builder()
            .timeout(request_timeout("searxng", timeout_s)?)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            rate_limiter: RateLimiter::new(rate_limit_s),
            retry: RetryPolicy::default(),
            pages: pages.max(1),
        })
    }

    async fn fetch(&self, query: &str, page: u32) -> Result<SearxngResponse> {
        let page = page.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("language", "en"),
                ("safesearch", "1"),
                ("pageno", page.as_str()),
            ])
            .send()
            .await
            .with_context(|| format!("Failed to call SearxNG at {}", self.endpoint))?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(CollectError::RateLimited {
                engine: ENGINE_NAME.to_string(),
            }
            .into());
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("SearxNG returned {}: {}", status, body);
        }

        response
            .json()
            .await
            .context("Failed to parse SearxNG response")
    }
}

#[async_trait]
impl SearchCollector for SearxngCollector {
    fn name(&self) -> &str {
        ENGINE_NAME
    }

    fn pages(&self) -> u32 {
        self.pages
    }

    async fn search_page(
        &self,
        query: &str,
        limit: usize,
        page: u32,
    ) -> Result<Vec<SearchResult>> {
        let response = with_retry(&self.rate_limiter, &self.retry, ENGINE_NAME, || {
            self.fetch(query, page)
        })
        .await?;

        let results = to_search_results(query, response, limit);
        debug!(query, page, results = results.len(), "SearxNG page fetched");
        Ok(results)
    }
}

/// Convert a SearxNG response into ranked results, keeping at most `limit`.
pub fn to_search_results(query: &str, response: SearxngResponse, limit: usize) -> Vec<SearchResult> {
    response
        .results
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(idx, item)| SearchResult {
            query: query.to_string(),
            engine: ENGINE_NAME.to_string(),
            rank: idx as u32 + 1,
            url: item.url.unwrap_or_default(),
            title: item.title.unwrap_or_default(),
            snippet: item.content.unwrap_or_default(),
            meta: serde_json::json!({ "engine": item.engine }),
        })
        .collect()
}

// --- SearxNG response types ---

#[derive(Debug, Default, Deserialize)]
pub struct SearxngResponse {
    #[serde(default)]
    pub results: Vec<SearxngItem>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearxngItem {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    /// Upstream engine that produced the hit
    #[serde(default)]
    pub engine: Option<String>,
}
