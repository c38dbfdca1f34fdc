// Reddit intent pipeline: collect posts per window, then rebuild intents
// from the whole posts log.
//
// Posts are fetched once per query. Each post is stored once, under the
// first configured window that contains its creation time. With the default
// ascending windows that is the narrowest one, so the windows act as
// disjoint age bands and a recent post is not also long-term evidence.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::collector::reddit::{post_to_row, RedditPost};
use crate::collector::{is_rate_limited, RedditClient};
use crate::config::Config;
use crate::intents::{build_intents, build_windows, windows_containing, IntentParams, TimeWindow};
use crate::io::{append_jsonl, read_jsonl, write_json};
use crate::models::{IntentReport, SocialPost};

/// Turn fetched posts into rows tagged with their window. Posts outside
/// every window, and posts whose id is already in `seen`, are skipped.
/// `seen` is updated.
pub fn window_rows(
    posts: &[RedditPost],
    query: &str,
    windows: &[TimeWindow],
    now: i64,
    collected_at: &str,
    seen: &mut HashSet<String>,
) -> Vec<SocialPost> {
    let mut rows = Vec::new();
    for post in posts {
        let created = post.created_utc as i64;
        let Some(window) = windows_containing(created, now, windows).into_iter().next() else {
            continue;
        };
        let row = post_to_row(post, query, window, collected_at);
        if seen.insert(row.id.clone()) {
            rows.push(row);
        }
    }
    rows
}

/// Build the intent report from the posts log and write it.
pub fn rebuild_intents(posts_path: &Path, intents_path: &Path, params: &IntentParams) -> Result<IntentReport> {
    let posts: Vec<SocialPost> = read_jsonl(posts_path)?;
    let report = build_intents(&posts, params);
    write_json(intents_path, &report)?;
    info!(
        posts = posts.len(),
        intents = report.intents.len(),
        path = %intents_path.display(),
        "Reddit intents written"
    );
    Ok(report)
}

/// Collect new posts for every configured query, append them, and rebuild
/// the intent report. Returns (rows added, report).
pub async fn run(config: &Config) -> Result<(usize, IntentReport)> {
    let posts_path = config.resolve(&config.outputs.reddit_posts);
    let intents_path = config.resolve(&config.outputs.reddit_intents);

    let windows = build_windows(&config.reddit.windows);
    if windows.is_empty() {
        anyhow::bail!(
            "No known Reddit windows configured. Use any of: 14d, 60d, 180d, 365d."
        );
    }

    let existing: Vec<SocialPost> = read_jsonl(&posts_path)?;
    let mut seen: HashSet<String> = existing.into_iter().map(|post| post.id).collect();

    let client = RedditClient::new(config.reddit.rate_limit_s, config.reddit.timeout_s)?;
    let mut added = 0usize;

    let pb = ProgressBar::new(config.reddit.queries.len() as u64);
    pb.set_style(ProgressStyle::default_bar().template("  Reddit [{bar:30}] {pos}/{len} {msg}")?);

    for query in &config.reddit.queries {
        pb.set_message(query.clone());
        match client.fetch_posts(query, &config.reddit.filters).await {
            Ok(posts) => {
                let now = chrono::Utc::now();
                let rows = window_rows(
                    &posts,
                    query,
                    &windows,
                    now.timestamp(),
                    &now.to_rfc3339(),
                    &mut seen,
                );
                append_jsonl(&posts_path, &rows)?;
                info!(query = %query, fetched = posts.len(), added = rows.len(), "Reddit query collected");
                added += rows.len();
            }
            Err(e) => {
                warn!(query = %query, error = %e, "Reddit search failed");
                if is_rate_limited(&e) {
                    info!("Rate limit reached, stopping Reddit collection");
                    break;
                }
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let report = rebuild_intents(&posts_path, &intents_path, &config.intent_params())?;
    Ok((added, report))
}
