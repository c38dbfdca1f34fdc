// Collectors: HTTP clients that turn searches into raw rows.
//
// Collectors only append to the raw logs. Everything downstream reads those
// logs as a snapshot, so nothing in here is needed to re-run processing.

pub mod error;
pub mod rate_limit;
pub mod reddit;
pub mod searxng;
pub mod stubs;
pub mod traits;

use anyhow::Result;
use sha2::{Digest, Sha256};

use crate::config::{EngineConfig, EngineKind};
use crate::models::RawResult;
use crate::text::url::host_of;
use crate::text::{canonicalize_url, normalize};

pub use error::{is_rate_limited, CollectError};
pub use reddit::RedditClient;
pub use searxng::SearxngCollector;
pub use stubs::{BraveCollector, DuckDuckGoCollector};
pub use traits::{SearchCollector, SearchResult};

fn sha256_hex(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Content fingerprint of a search result, used as its row id.
///
/// Two results with the same canonical URL and the same normalized title and
/// snippet get the same id, so re-collecting them is a no-op.
pub fn row_fingerprint(canonical_url: &str, title: &str, snippet: &str) -> String {
    sha256_hex(&format!(
        "{}|{}|{}",
        canonical_url.to_lowercase(),
        normalize(title),
        normalize(snippet)
    ))
}

/// Row id of a Reddit post.
pub fn post_fingerprint(permalink: &str) -> String {
    sha256_hex(permalink)
}

/// Whether the URL's host contains any blocked domain substring.
pub fn is_blocked(url: &str, blocked_domains: &[String]) -> bool {
    let Some(host) = host_of(url) else {
        return false;
    };
    blocked_domains
        .iter()
        .filter(|blocked| !blocked.is_empty())
        .any(|blocked| host.contains(&blocked.to_lowercase()))
}

/// Convert a search hit into a raw log row stamped with `collected_at`.
pub fn result_to_row(result: &SearchResult, collected_at: &str) -> RawResult {
    let canonical_url = canonicalize_url(&result.url);
    RawResult {
        id: row_fingerprint(&canonical_url, &result.title, &result.snippet),
        query: result.query.clone(),
        engine: result.engine.clone(),
        rank: result.rank,
        source_url: result.url.clone(),
        title: result.title.clone(),
        snippet: result.snippet.clone(),
        collected_at: collected_at.to_string(),
        meta: result.meta.clone(),
    }
}

/// Instantiate one collector per configured engine, in config order.
pub fn build_collectors(engines: &[EngineConfig]) -> Result<Vec<Box<dyn SearchCollector>>> {
    engines
        .iter()
        .map(|engine| -> Result<Box<dyn SearchCollector>> {
            Ok(match engine.name {
                EngineKind::Searxng => Box::new(SearxngCollector::new(
                    &engine.endpoint,
                    engine.rate_limit_s,
                    engine.timeout_s,
                    engine.pages,
                )?),
                EngineKind::Ddg => Box::new(DuckDuckGoCollector),
                EngineKind::Brave => Box::new(BraveCollector::new(engine.api_key.clone())),
            })
        })
        .collect()
}
