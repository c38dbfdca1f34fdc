// Reddit search client.
//
// Uses the public `search.json` listing (no OAuth). Results come newest
// first and are paged with the `after` cursor. Reddit rejects requests
// without a descriptive User-Agent.

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::error::CollectError;
use super::rate_limit::{request_timeout, with_retry, RateLimiter, RetryPolicy};
use crate::config::RedditFilters;
use crate::models::SocialPost;

pub const REDDIT_SEARCH_URL: &str = "https://www.reddit.com/search.json";
pub const USER_AGENT: &str = "sandcastle/0.1 (research pipeline)";
const REDDIT_BASE: &str = "https://www.reddit.com";

/// Posts requested per listing page (Reddit's maximum).
const PAGE_SIZE: u32 = 100;

pub struct RedditClient {
    client: Client,
    rate_limiter: RateLimiter,
    retry: RetryPolicy,
}

impl RedditClient {
    pub fn new(rate_limit_s: f64, timeout_s: f64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(request_timeout("reddit", timeout_s)?)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(rate_limit_s),
            retry: RetryPolicy::default(),
        })
    }

    /// One page of search results.
    pub async fn search(&self, query: &str, limit: u32, after: Option<&str>) -> Result<Listing> {
        with_retry(&self.rate_limiter, &self.retry, "reddit", || {
            self.fetch(query, limit, after)
        })
        .await
    }

    async fn fetch(&self, query: &str, limit: u32, after: Option<&str>) -> Result<Listing> {
        let limit = limit.to_string();
        let mut params = vec![
            ("q", query),
            ("sort", "new"),
            ("limit", limit.as_str()),
            ("type", "link"),
        ];
        if let Some(after) = after {
            params.push(("after", after));
        }

        let response = self
            .client
            .get(REDDIT_SEARCH_URL)
            .query(&params)
            .send()
            .await
            .context("Failed to call Reddit search")?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(CollectError::RateLimited {
                engine: "reddit".to_string(),
            }
            .into());
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Reddit search returned {}: {}", status, body);
        }

        response
            .json()
            .await
            .context("Failed to parse Reddit search response")
    }

    /// Every post for `query` that passes `filters`, walking up to
    /// `filters.max_pages` pages.
    pub async fn fetch_posts(&self, query: &str, filters: &RedditFilters) -> Result<Vec<RedditPost>> {
        let mut posts = Vec::new();
        let mut after: Option<String> = None;

        for page in 0..filters.max_pages {
            let listing = self.search(query, PAGE_SIZE, after.as_deref()).await?;
            if listing.data.children.is_empty() {
                break;
            }
            let fetched = listing.data.children.len();
            posts.extend(
                listing
                    .data
                    .children
                    .into_iter()
                    .map(|child| child.data)
                    .filter(|post| passes_filters(post, filters)),
            );
            debug!(query, page = page + 1, fetched, kept = posts.len(), "Reddit page fetched");

            after = listing.data.after;
            if after.is_none() {
                break;
            }
        }

        Ok(posts)
    }
}

/// Whether a post survives the configured filters.
pub fn passes_filters(post: &RedditPost, filters: &RedditFilters) -> bool {
    // Only an explicit `is_self: false` marks a link post
    if filters.only_posts && post.is_self == Some(false) {
        return false;
    }
    if !filters.allow_nsfw && post.over_18 {
        return false;
    }
    post.score >= filters.min_score && post.num_comments >= filters.min_comments
}

/// Build the stored row for a post collected under `query` for `window`.
pub fn post_to_row(post: &RedditPost, query: &str, window: &str, collected_at: &str) -> SocialPost {
    let permalink = format!("{}{}", REDDIT_BASE, post.permalink);
    SocialPost {
        id: super::post_fingerprint(&permalink),
        query: query.to_string(),
        window: window.to_string(),
        source_url: permalink,
        title: post.title.clone(),
        selftext: post.selftext.clone(),
        subreddit: post.subreddit.clone(),
        score: post.score,
        num_comments: post.num_comments,
        created_utc: post.created_utc as i64,
        collected_at: collected_at.to_string(),
        meta: serde_json::json!({ "id": post.id, "author": post.author }),
    }
}

// --- Reddit listing types ---

#[derive(Debug, Default, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub data: ListingData,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<ListingChild>,
    #[serde(default)]
    pub after: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListingChild {
    #[serde(default)]
    pub data: RedditPost,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RedditPost {
    pub id: String,
    pub title: String,
    pub selftext: String,
    pub subreddit: String,
    pub author: String,
    pub permalink: String,
    pub score: i64,
    pub num_comments: i64,
    /// Reddit sends this as a float
    pub created_utc: f64,
    pub is_self: Option<bool>,
    pub over_18: bool,
}
