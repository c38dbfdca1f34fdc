// Intent classification over windowed social posts.
//
// Posts are reduced to a handful of ranked phrases; phrases that read alike
// (Jaccard over 2-word shingles) are merged through the disjoint-set, and each
// merged group is labelled structural or temporal from where in time its
// evidence sits.

pub mod classify;
pub mod phrases;
pub mod windows;

use std::collections::BTreeMap;

use tracing::info;

use crate::dedupe::group_by;
use crate::models::{IntentRecord, IntentReport, IntentRules, PhraseExample, SocialPost, SubredditCount};
use crate::text::{jaccard, normalize, FrequencyCounter};

pub use classify::classify_intent;
pub use phrases::{extract_phrases, MAX_PHRASES_PER_POST};
pub use windows::{build_windows, windows_containing, TimeWindow, DEFAULT_WINDOW_LABELS};

const EXAMPLES_PER_PHRASE: usize = 3;
const EXAMPLES_PER_INTENT: usize = 5;
const PHRASES_PER_INTENT: usize = 10;
const SUBREDDITS_PER_INTENT: usize = 5;
const EXAMPLE_SNIPPET_CHARS: usize = 200;
const INTENT_ID_CHARS: usize = 40;

/// Tunables for phrase grouping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntentParams {
    /// Minimum Jaccard similarity for two phrases to merge (default 0.6)
    pub threshold: f64,
    /// Tokens per shingle when comparing phrases (default 2)
    pub shingle_size: usize,
}

impl Default for IntentParams {
    fn default() -> Self {
        Self {
            threshold: 0.6,
            shingle_size: 2,
        }
    }
}

/// Evidence accumulated for one phrase.
#[derive(Debug, Default)]
struct PhraseEvidence {
    windows: BTreeMap<String, u32>,
    subreddits: FrequencyCounter,
    examples: Vec<PhraseExample>,
}

fn example_from(post: &SocialPost) -> PhraseExample {
    PhraseExample {
        source_url: post.source_url.clone(),
        title: post.title.clone(),
        snippet: post.selftext.chars().take(EXAMPLE_SNIPPET_CHARS).collect(),
    }
}

/// Stable identifier derived from a group label.
pub fn intent_id(label: &str) -> String {
    let id: String = normalize(label)
        .replace(' ', "_")
        .chars()
        .take(INTENT_ID_CHARS)
        .collect();
    if id.is_empty() {
        "intent".to_string()
    } else {
        id
    }
}

/// Build the intent report from every collected post.
pub fn build_intents(posts: &[SocialPost], params: &IntentParams) -> IntentReport {
    let mut evidence: BTreeMap<String, PhraseEvidence> = BTreeMap::new();

    for post in posts {
        let text = format!("{} {}", post.title, post.selftext);
        for phrase in extract_phrases(&text, MAX_PHRASES_PER_POST) {
            let entry = evidence.entry(phrase).or_default();
            if !post.window.is_empty() {
                *entry.windows.entry(post.window.clone()).or_insert(0) += 1;
            }
            entry.subreddits.add(&post.subreddit);
            if entry.examples.len() < EXAMPLES_PER_PHRASE {
                entry.examples.push(example_from(post));
            }
        }
    }

    let phrases: Vec<String> = evidence.keys().cloned().collect();
    let groups = group_by(&phrases, |a, b| {
        jaccard(a, b, params.shingle_size) >= params.threshold
    });

    let mut intents: Vec<IntentRecord> = groups
        .into_iter()
        .filter(|group| !group.is_empty())
        .map(|group| merge_group(&group, &evidence))
        .collect();
    intents.sort_by(|a, b| a.intent_id.cmp(&b.intent_id));

    info!(
        posts = posts.len(),
        phrases = phrases.len(),
        intents = intents.len(),
        "Built intents"
    );

    IntentReport {
        intents,
        rules: IntentRules::default(),
    }
}

/// Fold the evidence of a phrase group (ascending) into one record.
fn merge_group(group: &[String], evidence: &BTreeMap<String, PhraseEvidence>) -> IntentRecord {
    let label = group[0].clone();

    let mut windows: BTreeMap<String, u32> = BTreeMap::new();
    let mut subreddits = FrequencyCounter::new();
    let mut examples = Vec::new();

    for phrase in group {
        let Some(phrase_evidence) = evidence.get(phrase) else {
            continue;
        };
        for (window, count) in &phrase_evidence.windows {
            *windows.entry(window.clone()).or_insert(0) += count;
        }
        subreddits.merge(&phrase_evidence.subreddits);
        examples.extend(phrase_evidence.examples.iter().cloned());
    }
    examples.truncate(EXAMPLES_PER_INTENT);

    IntentRecord {
        intent_id: intent_id(&label),
        classification: classify_intent(&windows),
        label,
        evidence_counts: windows,
        common_phrases: group.iter().take(PHRASES_PER_INTENT).cloned().collect(),
        top_subreddits: subreddits
            .most_common(SUBREDDITS_PER_INTENT)
            .into_iter()
            .map(|(subreddit, count)| SubredditCount { subreddit, count })
            .collect(),
        examples,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IntentClass;

    fn post(title: &str, body: &str, window: &str, subreddit: &str) -> SocialPost {
        SocialPost {
            id: format!("{title}-{window}"),
            window: window.to_string(),
            source_url: format!("https://www.reddit.com/r/{subreddit}/{title}"),
            title: title.to_string(),
            selftext: body.to_string(),
            subreddit: subreddit.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_intent_id() {
        assert_eq!(intent_id("focus planner"), "focus_planner");
        assert_eq!(intent_id(""), "intent");
        assert_eq!(intent_id(&"word ".repeat(20)).len(), INTENT_ID_CHARS);
    }

    #[test]
    fn test_recent_only_phrase_is_temporal() {
        let posts = vec![
            post("adhd planner", "", "14d", "adhd"),
            post("adhd planner", "", "60d", "adhd"),
        ];
        let report = build_intents(&posts, &IntentParams::default());
        assert_eq!(report.intents.len(), 1);
        let intent = &report.intents[0];
        assert_eq!(intent.label, "adhd planner");
        assert_eq!(intent.intent_id, "adhd_planner");
        assert_eq!(intent.classification, IntentClass::Temporal);
        assert_eq!(intent.evidence_counts.get("14d"), Some(&1));
        assert_eq!(intent.evidence_counts.get("60d"), Some(&1));
        assert_eq!(
            intent.top_subreddits,
            vec![SubredditCount { subreddit: "adhd".into(), count: 2 }]
        );
        assert_eq!(intent.examples.len(), 2);
    }

    #[test]
    fn test_repeated_phrase_across_windows_is_structural() {
        let posts = vec![
            post("budget planner", "", "14d", "personalfinance"),
            post("budget planner", "", "365d", "ynab"),
        ];
        let report = build_intents(&posts, &IntentParams::default());
        assert_eq!(report.intents.len(), 1);
        let intent = &report.intents[0];
        assert_eq!(intent.classification, IntentClass::Structural);
        assert_eq!(intent.top_subreddits.len(), 2);
    }

    #[test]
    fn test_similar_phrases_merge() {
        // "notes notes" and "notes notes notes" have the same 2-word shingle set.
        let posts = vec![post("notes notes notes", "", "14d", "notetaking")];
        let report = build_intents(&posts, &IntentParams::default());
        assert_eq!(report.intents.len(), 1);
        let intent = &report.intents[0];
        assert_eq!(intent.label, "notes notes");
        assert_eq!(intent.common_phrases, vec!["notes notes", "notes notes notes"]);
        assert_eq!(intent.evidence_counts.get("14d"), Some(&2));
    }

    #[test]
    fn test_distinct_phrases_stay_apart() {
        let posts = vec![post("budget planner", "", "14d", "a"), post("meal prep", "", "14d", "b")];
        let report = build_intents(&posts, &IntentParams::default());
        let ids: Vec<&str> = report.intents.iter().map(|i| i.intent_id.as_str()).collect();
        assert_eq!(ids, vec!["budget_planner", "meal_prep"]);
    }

    #[test]
    fn test_examples_capped() {
        let posts: Vec<SocialPost> = (0..10)
            .map(|i| post("habit tracker", "", "14d", &format!("sub{i}")))
            .collect();
        let report = build_intents(&posts, &IntentParams::default());
        assert_eq!(report.intents.len(), 1);
        assert_eq!(report.intents[0].examples.len(), EXAMPLES_PER_PHRASE);
        assert_eq!(report.intents[0].evidence_counts.get("14d"), Some(&10));
    }

    #[test]
    fn test_empty_posts() {
        let report = build_intents(&[], &IntentParams::default());
        assert!(report.intents.is_empty());
        assert_eq!(report.rules, IntentRules::default());
    }
}
