// Unit tests for the disjoint-set and the deduplication engine.
//
// The engine's promises are structural (determinism, partition, smallest id
// wins), so most tests here check those properties over a mixed fixture
// rather than individual merges.

use std::collections::BTreeSet;

use sandcastle::dedupe::{dedupe, group_by, DedupeParams, DisjointSet};
use sandcastle::models::{CanonicalItem, RawResult};

fn row(id: &str, url: &str, title: &str, snippet: &str, at: &str) -> RawResult {
    RawResult {
        id: id.to_string(),
        query: "focus journal".to_string(),
        engine: "searxng".to_string(),
        source_url: url.to_string(),
        title: title.to_string(),
        snippet: snippet.to_string(),
        collected_at: at.to_string(),
        ..Default::default()
    }
}

/// A mix of URL duplicates, text duplicates, a transitive chain and loners.
fn fixture() -> Vec<RawResult> {
    vec![
        row("r07", "https://example.com/page?utm_source=x", "Focus journal", "Guided focus journal for busy minds", "2024-01-03T00:00:00Z"),
        row("r02", "https://example.com/page", "Focus journal", "Guided focus journal for busy minds", "2024-01-01T00:00:00Z"),
        row("r05", "https://shop.example/a", "Undated weekly planner printable pdf", "Minimal undated weekly planner printable pdf download", "2024-01-02T00:00:00Z"),
        row("r01", "https://other.example/b", "Undated weekly planner printable pdf", "Minimal undated weekly planner printable pdf download", "2024-01-05T00:00:00Z"),
        row("r09", "https://other.example/b#reviews", "Planner reviews", "What people say", "2024-01-06T00:00:00Z"),
        row("r03", "https://blog.example/gratitude", "Gratitude prompts", "Thirty days of gratitude prompts", "2024-01-02T00:00:00Z"),
        row("r08", "https://news.example/story", "Unrelated headline", "Nothing to do with journals", "2024-01-04T00:00:00Z"),
    ]
}

fn partition(items: &[CanonicalItem]) -> Vec<(String, Vec<String>)> {
    items
        .iter()
        .map(|item| (item.id.clone(), item.member_ids.clone()))
        .collect()
}

// ============================================================
// DisjointSet
// ============================================================

#[test]
fn union_find_transitive_with_smallest_representative() {
    let mut set = DisjointSet::new(["c", "b", "a", "d"]);
    set.union("c", "b");
    set.union("b", "a");
    assert_eq!(set.find("c"), Some("a"));
    assert_eq!(set.find("b"), Some("a"));
    assert_eq!(set.find("d"), Some("d"));
}

#[test]
fn union_find_order_independent() {
    let mut forward = DisjointSet::new(["x", "y", "z"]);
    forward.union("x", "y");
    forward.union("y", "z");

    let mut backward = DisjointSet::new(["z", "y", "x"]);
    backward.union("z", "y");
    backward.union("y", "x");

    assert_eq!(forward.groups(), backward.groups());
}

#[test]
fn group_by_partitions_and_sorts() {
    let items: Vec<String> = ["b1", "a2", "b2", "a1", "c1"].iter().map(|s| s.to_string()).collect();
    let groups = group_by(&items, |a, b| a[..1] == b[..1]);
    assert_eq!(
        groups,
        vec![
            vec!["a1".to_string(), "a2".to_string()],
            vec!["b1".to_string(), "b2".to_string()],
            vec!["c1".to_string()],
        ]
    );
}

// ============================================================
// dedupe: fixture scenarios
// ============================================================

#[test]
fn tracking_param_urls_merge() {
    let rows = vec![
        row("b", "https://example.com/page?utm_source=x", "One", "Alpha", "2024-01-02T00:00:00Z"),
        row("a", "https://example.com/page", "Two", "Beta", "2024-01-01T00:00:00Z"),
    ];
    let items = dedupe(&rows, &DedupeParams::default());
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].canonical_url, "https://example.com/page");
}

#[test]
fn identical_text_different_urls_merge() {
    let rows = vec![
        row("id-2", "https://one.example/x", "Deep work journal", "A journal for deep work sessions", "2024-01-01T00:00:00Z"),
        row("id-1", "https://two.example/y", "Deep Work Journal!", "A journal for deep-work sessions.", "2024-01-01T00:00:00Z"),
    ];
    let items = dedupe(&rows, &DedupeParams::default());
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "id-1");
    assert_eq!(items[0].original_urls.len(), 2);
}

// ============================================================
// dedupe: properties
// ============================================================

#[test]
fn fixture_groups() {
    let items = dedupe(&fixture(), &DedupeParams::default());
    assert_eq!(
        partition(&items),
        vec![
            // r01~r05 by text, r09 joins r01 by canonical URL
            ("r01".to_string(), vec!["r01".into(), "r05".into(), "r09".into()]),
            ("r02".to_string(), vec!["r02".into(), "r07".into()]),
            ("r03".to_string(), vec!["r03".into()]),
            ("r08".to_string(), vec!["r08".into()]),
        ]
    );
}

#[test]
fn dedupe_is_deterministic_under_reordering() {
    let params = DedupeParams::default();
    let baseline = dedupe(&fixture(), &params);

    let mut reversed = fixture();
    reversed.reverse();
    assert_eq!(dedupe(&reversed, &params), baseline);

    let mut rotated = fixture();
    rotated.rotate_left(3);
    assert_eq!(dedupe(&rotated, &params), baseline);

    // Running twice gives the same answer
    assert_eq!(dedupe(&fixture(), &params), baseline);
}

#[test]
fn dedupe_partitions_input_ids() {
    let rows = fixture();
    let items = dedupe(&rows, &DedupeParams::default());

    let mut seen = Vec::new();
    for item in &items {
        seen.extend(item.member_ids.iter().cloned());
    }
    let unique: BTreeSet<&String> = seen.iter().collect();
    assert_eq!(unique.len(), seen.len(), "an id landed in two items");

    let input: BTreeSet<String> = rows.iter().map(|r| r.id.clone()).collect();
    let output: BTreeSet<String> = seen.into_iter().collect();
    assert_eq!(input, output);
}

#[test]
fn item_id_is_smallest_member_and_items_sorted() {
    let items = dedupe(&fixture(), &DedupeParams::default());
    for item in &items {
        assert_eq!(&item.id, item.member_ids.iter().min().unwrap());
    }
    let ids: Vec<&String> = items.iter().map(|i| &i.id).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
}

#[test]
fn merged_item_fields() {
    let items = dedupe(&fixture(), &DedupeParams::default());
    let planner = &items[0];
    // Earliest member is r05 (2024-01-02)
    assert_eq!(planner.canonical_url, "https://shop.example/a");
    assert_eq!(planner.first_seen, "2024-01-02T00:00:00Z");
    assert_eq!(planner.last_seen, "2024-01-06T00:00:00Z");
    assert_eq!(
        planner.titles,
        vec!["Planner reviews", "Undated weekly planner printable pdf"]
    );
    assert_eq!(planner.queries, vec!["focus journal"]);
    assert_eq!(planner.engines, vec!["searxng"]);
    assert!(!planner.flags.blocked && !planner.flags.suspicious);
}

#[test]
fn threshold_controls_text_merging() {
    let rows = vec![
        row("a", "https://one.example/1", "Habit tracker", "Monthly habit tracker printable", "2024-01-01T00:00:00Z"),
        row("b", "https://two.example/2", "Habit tracker", "Monthly habit tracker printable pdf", "2024-01-01T00:00:00Z"),
    ];
    assert_eq!(dedupe(&rows, &DedupeParams::default()).len(), 2);
    let loose = DedupeParams { threshold: 0.5, shingle_size: 3 };
    assert_eq!(dedupe(&rows, &loose).len(), 1);
}
