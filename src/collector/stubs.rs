// Providers that are wired into the config but not usable yet.
//
// DuckDuckGo has no stable JSON endpoint; Brave needs a paid key and its
// client is not written. Both fail with a typed error so the collect loop can
// log and move on.

use anyhow::Result;
use async_trait::async_trait;

use super::error::CollectError;
use super::traits::{SearchCollector, SearchResult};

pub struct DuckDuckGoCollector;

#[async_trait]
impl SearchCollector for DuckDuckGoCollector {
    fn name(&self) -> &str {
        "ddg"
    }

    async fn search_page(&self, _query: &str, _limit: usize, _page: u32) -> Result<Vec<SearchResult>> {
        Err(CollectError::Disabled {
            engine: "ddg".to_string(),
            reason: "no stable endpoint; use SearxNG instead".to_string(),
        }
        .into())
    }
}

pub struct BraveCollector {
    api_key: String,
}

impl BraveCollector {
    pub fn new(api_key: String) -> Self {
        Self { api_key }
    }
}

#[async_trait]
impl SearchCollector for BraveCollector {
    fn name(&self) -> &str {
        "brave"
    }

    async fn search_page(&self, _query: &str, _limit: usize, _page: u32) -> Result<Vec<SearchResult>> {
        if self.api_key.is_empty() {
            return Err(CollectError::MissingApiKey {
                engine: "brave".to_string(),
                env_var: "BRAVE_API_KEY",
            }
            .into());
        }
        Err(CollectError::Disabled {
            engine: "brave".to_string(),
            reason: "client not implemented".to_string(),
        }
        .into())
    }
}
