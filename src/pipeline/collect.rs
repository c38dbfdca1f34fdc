// Search collection: run every configured query through every collector
// and append rows that are not yet in the raw log.
//
// The raw log is append-only and keyed by content fingerprint, so running
// collect twice never duplicates a row. Stop conditions, in the order they
// are checked: per-(query, engine) quota, global quota, wall-clock budget,
// consecutive pages with nothing new, and a 429 from the engine.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::time::{Duration, Instant};
use tracing::{info, warn};

use crate::collector::{is_blocked, is_rate_limited, result_to_row, SearchCollector};
use crate::config::Limits;
use crate::io::{append_jsonl, read_jsonl};
use crate::models::RawResult;

/// What one collect run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectSummary {
    pub added: usize,
    pub blocked: usize,
    pub already_seen: usize,
    pub failed_pages: usize,
    /// Why the run ended early, if it did
    pub stopped: Option<StopReason>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    GlobalMax,
    MaxMinutes,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::GlobalMax => write!(f, "global max reached"),
            StopReason::MaxMinutes => write!(f, "time budget exhausted"),
        }
    }
}

/// Inputs of a collect run.
pub struct CollectRun<'a> {
    pub queries: &'a [String],
    pub collectors: &'a [Box<dyn SearchCollector>],
    pub limits: &'a Limits,
    pub blocked_domains: &'a [String],
    pub output: &'a Path,
}

/// Collect and append new rows. Returns what happened.
pub async fn run(run: CollectRun<'_>) -> Result<CollectSummary> {
    let existing: Vec<RawResult> = read_jsonl(run.output)?;
    let mut seen: HashSet<String> = existing.into_iter().map(|row| row.id).collect();
    info!(existing = seen.len(), "Loaded raw log");

    let mut summary = CollectSummary::default();
    let started = Instant::now();
    let budget = Duration::from_secs(run.limits.max_minutes.saturating_mul(60));

    let pb = ProgressBar::new((run.queries.len() * run.collectors.len()) as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Collect [{bar:30}] {pos}/{len} {msg}")?,
    );

    // Collectors that answered 429 sit out the rest of the run.
    let mut rate_limited: HashSet<usize> = HashSet::new();

    'queries: for query in run.queries {
        for (slot, collector) in run.collectors.iter().enumerate() {
            if rate_limited.contains(&slot) {
                pb.inc(1);
                continue;
            }
            pb.set_message(format!("{} / {}", collector.name(), query));
            let mut added_for_pair = 0usize;
            let mut empty_pages = 0usize;

            for page in 1..=collector.pages() {
                let results = match collector
                    .search_page(query, run.limits.per_engine, page)
                    .await
                {
                    Ok(results) => results,
                    Err(e) => {
                        summary.failed_pages += 1;
                        warn!(
                            engine = collector.name(),
                            query = %query,
                            page,
                            error = %e,
                            "Collector error"
                        );
                        if is_rate_limited(&e) {
                            rate_limited.insert(slot);
                            info!(engine = collector.name(), "Rate limit reached, stopping collector");
                        }
                        break;
                    }
                };
                if results.is_empty() {
                    break;
                }

                let collected_at = chrono::Utc::now().to_rfc3339();
                let mut fresh = Vec::new();
                for result in &results {
                    if is_blocked(&result.url, run.blocked_domains) {
                        summary.blocked += 1;
                        continue;
                    }
                    let row = result_to_row(result, &collected_at);
                    if !seen.insert(row.id.clone()) {
                        summary.already_seen += 1;
                        continue;
                    }
                    fresh.push(row);
                    added_for_pair += 1;
                    if added_for_pair >= run.limits.per_query
                        || summary.added + fresh.len() >= run.limits.global_max
                    {
                        break;
                    }
                }

                append_jsonl(run.output, &fresh)?;
                summary.added += fresh.len();

                if summary.added >= run.limits.global_max {
                    summary.stopped = Some(StopReason::GlobalMax);
                    break 'queries;
                }
                if started.elapsed() > budget {
                    summary.stopped = Some(StopReason::MaxMinutes);
                    break 'queries;
                }
                if fresh.is_empty() {
                    empty_pages += 1;
                    if empty_pages >= run.limits.no_new_pages {
                        info!(engine = collector.name(), query = %query, "No new unique items, stopping");
                        break;
                    }
                }
                if added_for_pair >= run.limits.per_query {
                    break;
                }
            }
            pb.inc(1);
        }
    }
    pb.finish_and_clear();

    if let Some(reason) = summary.stopped {
        info!(%reason, "Collect stopped early");
    }
    info!(
        added = summary.added,
        blocked = summary.blocked,
        already_seen = summary.already_seen,
        failed_pages = summary.failed_pages,
        "Collect finished"
    );

    Ok(summary)
}
