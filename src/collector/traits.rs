// Search collector trait: the seam between providers and the collect loop.
//
// Each provider turns a query into pages of `SearchResult`s. The collect
// loop only sees this trait, so adding a provider means one new impl and one
// arm in `build_collectors`.

use anyhow::Result;
use async_trait::async_trait;

/// One hit returned by a search provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResult {
    pub query: String,
    pub engine: String,
    /// 1-based position within its page
    pub rank: u32,
    pub url: String,
    pub title: String,
    pub snippet: String,
    pub meta: serde_json::Value,
}

/// A search provider that can be paged through.
#[async_trait]
pub trait SearchCollector: Send + Sync {
    /// Engine name recorded on every row.
    fn name(&self) -> &str;

    /// How many pages the collect loop may request per query.
    fn pages(&self) -> u32 {
        1
    }

    /// Fetch one page (1-based) of at most `limit` results.
    async fn search_page(&self, query: &str, limit: usize, page: u32)
        -> Result<Vec<SearchResult>>;

    /// Walk pages until `limit` results or an empty page.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let mut results = Vec::new();
        for page in 1..=self.pages() {
            let batch = self.search_page(query, limit, page).await?;
            if batch.is_empty() {
                break;
            }
            for result in batch {
                results.push(result);
                if results.len() >= limit {
                    return Ok(results);
                }
            }
        }
        Ok(results)
    }
}
