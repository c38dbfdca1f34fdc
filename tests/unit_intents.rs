// Unit tests for time windows, phrase extraction, intent grouping and
// structural/temporal classification.

use std::collections::BTreeMap;

use sandcastle::intents::{
    build_intents, build_windows, classify_intent, extract_phrases, intent_id, windows_containing,
    IntentParams, TimeWindow,
};
use sandcastle::models::{IntentClass, SocialPost};

const DAY: i64 = 24 * 3600;

fn counts(pairs: &[(&str, u32)]) -> BTreeMap<String, u32> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn post(id: &str, title: &str, body: &str, window: &str, subreddit: &str) -> SocialPost {
    SocialPost {
        id: id.to_string(),
        window: window.to_string(),
        source_url: format!("https://www.reddit.com/r/{subreddit}/comments/{id}/"),
        title: title.to_string(),
        selftext: body.to_string(),
        subreddit: subreddit.to_string(),
        ..Default::default()
    }
}

// ============================================================
// windows
// ============================================================

#[test]
fn window_lengths() {
    let windows = build_windows(["14d", "60d", "180d", "365d"]);
    let seconds: Vec<i64> = windows.iter().map(|w| w.seconds).collect();
    assert_eq!(seconds, vec![1_209_600, 5_184_000, 15_552_000, 31_536_000]);
}

#[test]
fn window_bounds_are_inclusive() {
    let window = TimeWindow::from_label("14d").unwrap();
    let now = 2_000_000_000;
    assert_eq!(window.bounds(now), (now - 14 * DAY, now));
    assert!(window.contains(now - 14 * DAY, now));
    assert!(window.contains(now, now));
    assert!(!window.contains(now - 14 * DAY - 1, now));
    assert!(!window.contains(now + 1, now));
}

#[test]
fn windows_containing_nested() {
    let windows = build_windows(["14d", "60d", "180d", "365d"]);
    let now = 2_000_000_000;
    assert_eq!(
        windows_containing(now - 90 * DAY, now, &windows),
        vec!["180d", "365d"]
    );
    assert!(windows_containing(now - 400 * DAY, now, &windows).is_empty());
}

// ============================================================
// classify_intent
// ============================================================

#[test]
fn classification_scenarios() {
    assert_eq!(
        classify_intent(&counts(&[("14d", 3), ("60d", 2), ("180d", 0), ("365d", 0)])),
        IntentClass::Temporal
    );
    assert_eq!(
        classify_intent(&counts(&[("14d", 1), ("180d", 2), ("365d", 1)])),
        IntentClass::Structural
    );
}

#[test]
fn classification_fallbacks() {
    // Long-term only
    assert_eq!(classify_intent(&counts(&[("365d", 4)])), IntentClass::Structural);
    // No evidence at all: 0 >= 0
    assert_eq!(classify_intent(&BTreeMap::new()), IntentClass::Structural);
    // Unknown windows count toward distinct windows but not toward either side
    assert_eq!(
        classify_intent(&counts(&[("7d", 5), ("60d", 1)])),
        IntentClass::Temporal
    );
}

// ============================================================
// extract_phrases / intent_id
// ============================================================

#[test]
fn phrases_skip_stopwords_and_cap() {
    let phrases = extract_phrases("The best planner for the ADHD brain", 5);
    assert_eq!(phrases.len(), 5);
    assert!(phrases.iter().all(|p| !p.split(' ').any(|t| t == "the" || t == "for")));
    assert!(phrases.contains(&"adhd brain".to_string()));
}

#[test]
fn intent_ids() {
    assert_eq!(intent_id("undated planner"), "undated_planner");
    assert_eq!(intent_id("!!!"), "intent");
}

// ============================================================
// build_intents
// ============================================================

#[test]
fn intents_sorted_with_rules() {
    let posts = vec![
        post("1", "weekly meal prep", "", "14d", "mealprep"),
        post("2", "budget spreadsheet", "", "365d", "personalfinance"),
    ];
    let report = build_intents(&posts, &IntentParams::default());
    let ids: Vec<&str> = report.intents.iter().map(|i| i.intent_id.as_str()).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
    assert!(report.rules.structural_if.contains("180d"));
    assert!(report.rules.temporal_if.contains("recent"));
}

#[test]
fn recent_only_intent_is_temporal_and_long_running_is_structural() {
    let posts = vec![
        post("1", "sleep tracker", "", "14d", "sleep"),
        post("2", "sleep tracker", "", "60d", "sleep"),
        post("3", "tax binder", "", "14d", "tax"),
        post("4", "tax binder", "", "365d", "tax"),
    ];
    let report = build_intents(&posts, &IntentParams::default());
    let by_label: BTreeMap<&str, IntentClass> = report
        .intents
        .iter()
        .map(|i| (i.label.as_str(), i.classification))
        .collect();
    assert_eq!(by_label["sleep tracker"], IntentClass::Temporal);
    assert_eq!(by_label["tax binder"], IntentClass::Structural);
}

#[test]
fn example_snippets_truncated() {
    let body = "x".repeat(500);
    let posts = vec![post("1", "gift ideas", &body, "14d", "gifts")];
    let report = build_intents(&posts, &IntentParams::default());
    let intent = report
        .intents
        .iter()
        .find(|i| i.label == "gift ideas")
        .unwrap();
    assert_eq!(intent.examples[0].snippet.chars().count(), 200);
    assert_eq!(intent.examples[0].title, "gift ideas");
}

#[test]
fn looser_threshold_merges_more() {
    let posts = vec![
        post("1", "habit tracker app", "", "14d", "a"),
        post("2", "habit tracker journal", "", "14d", "b"),
    ];
    let strict = build_intents(&posts, &IntentParams { threshold: 1.0, shingle_size: 2 });
    let loose = build_intents(&posts, &IntentParams { threshold: 0.3, shingle_size: 2 });
    assert!(loose.intents.len() < strict.intents.len());
    let merged = loose
        .intents
        .iter()
        .find(|i| i.common_phrases.contains(&"habit tracker".to_string()))
        .unwrap();
    // Every phrase chains into one group at 0.3
    assert_eq!(loose.intents.len(), 1);
    assert_eq!(merged.label, "habit tracker");
    assert_eq!(merged.common_phrases.len(), 5);
    // "habit tracker" from both posts plus four single-post phrases
    assert_eq!(merged.evidence_counts["14d"], 6);
    assert_eq!(merged.top_subreddits.len(), 2);
}

#[test]
fn merged_group_caps_examples_at_five() {
    // Each post yields "notes notes" and "notes notes notes"; the two share
    // their only 2-shingle and merge into one group with 3 + 3 examples.
    let posts: Vec<SocialPost> = (1..=3)
        .map(|i| post(&i.to_string(), "notes notes notes", "", "14d", "notetaking"))
        .collect();
    let report = build_intents(&posts, &IntentParams::default());
    assert_eq!(report.intents.len(), 1);
    let intent = &report.intents[0];
    assert_eq!(intent.common_phrases, vec!["notes notes", "notes notes notes"]);
    assert_eq!(intent.evidence_counts["14d"], 6);
    assert_eq!(intent.examples.len(), 5);
}

#[test]
fn merged_group_caps_common_phrases_at_ten() {
    let posts = vec![
        post("1", "apple banana cherry damson elder fig", "", "14d", "a"),
        post("2", "grape hazel iris juniper kiwi lemon", "", "14d", "a"),
        post("3", "mango nectar olive papaya quince rhubarb", "", "14d", "a"),
    ];
    // Threshold 0 merges every phrase: 5 per post, 15 in one group
    let report = build_intents(&posts, &IntentParams { threshold: 0.0, shingle_size: 2 });
    assert_eq!(report.intents.len(), 1);
    let intent = &report.intents[0];
    assert_eq!(intent.evidence_counts["14d"], 15);
    assert_eq!(intent.common_phrases.len(), 10);
    let mut sorted = intent.common_phrases.clone();
    sorted.sort();
    assert_eq!(intent.common_phrases, sorted);
    assert_eq!(intent.label, intent.common_phrases[0]);
    assert_eq!(intent.examples.len(), 5);
}
