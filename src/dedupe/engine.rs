// Item deduplication over one run's raw results.
//
// 1. Sort rows by id so iteration order is fixed.
// 2. Rows sharing a canonical URL are unioned with the first id seen for it.
// 3. Every pair whose normalized "{title} {snippet}" shingles reach the
//    Jaccard threshold is unioned.
// 4. Each disjoint set becomes one CanonicalItem; members are ordered by
//    collected_at to fix first/last seen.
//
// Step 3 is O(n²). The per-run volumes this runs on are in the hundreds to
// low thousands; anything larger wants an LSH pre-filter in front of it.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tracing::{debug, info};

use super::union_find::DisjointSet;
use crate::models::{CanonicalItem, ItemFlags, RawResult};
use crate::text::similarity::{jaccard_sets, pairwise_matches};
use crate::text::{canonicalize_url, normalize, shingles};

/// Tunables for near-duplicate detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DedupeParams {
    /// Minimum Jaccard similarity for two rows to merge (default 0.85)
    pub threshold: f64,
    /// Tokens per shingle (default 3)
    pub shingle_size: usize,
}

impl Default for DedupeParams {
    fn default() -> Self {
        Self {
            threshold: 0.85,
            shingle_size: 3,
        }
    }
}

/// A raw result with its canonical URL resolved.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RawRow {
    pub id: String,
    pub canonical_url: String,
    pub source_url: String,
    pub title: String,
    pub snippet: String,
    pub query: String,
    pub engine: String,
    pub collected_at: String,
}

impl RawRow {
    pub fn from_result(result: &RawResult) -> Self {
        Self {
            id: result.id.clone(),
            canonical_url: canonicalize_url(&result.source_url),
            source_url: result.source_url.clone(),
            title: result.title.clone(),
            snippet: result.snippet.clone(),
            query: result.query.clone(),
            engine: result.engine.clone(),
            collected_at: result.collected_at.clone(),
        }
    }

    fn similarity_text(&self) -> String {
        normalize(&format!("{} {}", self.title, self.snippet))
    }
}

/// Merge raw results into canonical items, ordered by item id.
pub fn dedupe(results: &[RawResult], params: &DedupeParams) -> Vec<CanonicalItem> {
    dedupe_rows(results.iter().map(RawRow::from_result).collect(), params)
}

/// Merge already-resolved rows into canonical items, ordered by item id.
pub fn dedupe_rows(mut rows: Vec<RawRow>, params: &DedupeParams) -> Vec<CanonicalItem> {
    // Field order on RawRow starts with id, so this is "by id" with every
    // other field as a tie-break for repeated ids.
    rows.sort();

    let mut set = DisjointSet::new(rows.iter().map(|row| row.id.clone()));
    let slots: Vec<usize> = rows
        .iter()
        .map(|row| set.index_of(&row.id).unwrap_or_default())
        .collect();

    let mut url_owner: HashMap<&str, usize> = HashMap::new();
    let mut url_merges = 0usize;
    for (row, &slot) in rows.iter().zip(&slots) {
        // An empty canonical URL identifies nothing.
        if row.canonical_url.is_empty() {
            continue;
        }
        match url_owner.get(row.canonical_url.as_str()) {
            Some(&owner) => {
                if set.union_index(slot, owner) {
                    url_merges += 1;
                }
            }
            None => {
                url_owner.insert(&row.canonical_url, slot);
            }
        }
    }

    let shingle_sets: Vec<HashSet<String>> = rows
        .iter()
        .map(|row| shingles(&row.similarity_text(), params.shingle_size))
        .collect();
    let similar = pairwise_matches(&shingle_sets, |a, b| jaccard_sets(a, b) >= params.threshold);
    let mut text_merges = 0usize;
    for &(i, j) in &similar {
        if set.union_index(slots[i], slots[j]) {
            text_merges += 1;
        }
    }

    debug!(
        rows = rows.len(),
        url_merges, text_merges, "Disjoint-set merging finished"
    );

    let mut grouped: BTreeMap<String, Vec<&RawRow>> = BTreeMap::new();
    for row in &rows {
        let representative = set.find(&row.id).unwrap_or(&row.id).to_string();
        grouped.entry(representative).or_default().push(row);
    }

    let items: Vec<CanonicalItem> = grouped
        .into_iter()
        .map(|(id, members)| build_item(id, members))
        .collect();

    info!(
        raw = rows.len(),
        deduped = items.len(),
        "Deduplicated raw results"
    );

    items
}

fn sorted_non_empty<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    values
        .filter(|value| !value.is_empty())
        .cloned()
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

fn build_item(id: String, mut members: Vec<&RawRow>) -> CanonicalItem {
    // Stable: equal timestamps keep id order.
    members.sort_by(|a, b| a.collected_at.cmp(&b.collected_at));

    let first = members[0];
    let last = members[members.len() - 1];

    CanonicalItem {
        id,
        canonical_url: first.canonical_url.clone(),
        member_ids: members
            .iter()
            .map(|row| row.id.clone())
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect(),
        original_urls: sorted_non_empty(members.iter().map(|row| &row.source_url)),
        titles: sorted_non_empty(members.iter().map(|row| &row.title)),
        snippets: sorted_non_empty(members.iter().map(|row| &row.snippet)),
        queries: sorted_non_empty(members.iter().map(|row| &row.query)),
        engines: sorted_non_empty(members.iter().map(|row| &row.engine)),
        first_seen: first.collected_at.clone(),
        last_seen: last.collected_at.clone(),
        flags: ItemFlags::default(),
    }
}
