// Data models: the records that flow between pipeline stages and land in
// the JSON artifacts.
//
// Input records are lenient (`#[serde(default)]` everywhere) because the
// collectors are append-only logs written by older versions too; a missing
// field becomes an empty string or zero rather than a rejected line.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One collected search result, as stored in the raw results log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawResult {
    /// Content fingerprint (see `collector::row_fingerprint`)
    pub id: String,
    pub query: String,
    pub engine: String,
    pub rank: u32,
    pub source_url: String,
    pub title: String,
    pub snippet: String,
    /// ISO-8601 UTC timestamp
    pub collected_at: String,
    pub meta: serde_json::Value,
}

/// Status bits carried by every canonical item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFlags {
    pub blocked: bool,
    pub suspicious: bool,
}

/// One or more raw results judged to be the same thing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalItem {
    /// Lexicographically smallest member id
    pub id: String,
    /// Canonical URL of the earliest-collected member
    pub canonical_url: String,
    /// Every raw result id merged into this item, ascending
    #[serde(default)]
    pub member_ids: Vec<String>,
    pub original_urls: Vec<String>,
    pub titles: Vec<String>,
    pub snippets: Vec<String>,
    pub queries: Vec<String>,
    pub engines: Vec<String>,
    pub first_seen: String,
    pub last_seen: String,
    #[serde(default)]
    pub flags: ItemFlags,
}

impl CanonicalItem {
    /// Titles followed by snippets, space-joined. Used for keyword matching
    /// and term extraction.
    pub fn title_snippet_text(&self) -> String {
        self.titles
            .iter()
            .chain(self.snippets.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Snippets followed by titles, space-joined. Used for intent tagging.
    pub fn snippet_title_text(&self) -> String {
        self.snippets
            .iter()
            .chain(self.titles.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A topic in the configured taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterDefinition {
    pub cluster_id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// The items that landed in one taxonomy cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    pub cluster_id: String,
    pub label: String,
    /// Canonical item ids, ascending
    pub items: Vec<String>,
    /// Intent tags found on member items, ascending
    pub intent_tags: Vec<String>,
    pub top_terms: Vec<String>,
    pub top_bigrams: Vec<String>,
}

/// The `clusters` artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterReport {
    pub clusters: Vec<ClusterAssignment>,
}

/// A ranked unigram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCount {
    pub term: String,
    pub count: u32,
}

/// A ranked contiguous token pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BigramCount {
    pub bigram: String,
    pub count: u32,
}

/// Term annotations for one cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterTerms {
    pub top_terms: Vec<TermCount>,
    pub top_bigrams: Vec<BigramCount>,
}

/// The `terms` artifact, keyed by cluster id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermsReport {
    pub cluster_terms: BTreeMap<String, ClusterTerms>,
}

/// One collected Reddit post, already tagged with the time window it was
/// collected for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialPost {
    pub id: String,
    pub query: String,
    pub window: String,
    pub source_url: String,
    pub title: String,
    pub selftext: String,
    pub subreddit: String,
    pub score: i64,
    pub num_comments: i64,
    pub created_utc: i64,
    pub collected_at: String,
    pub meta: serde_json::Value,
}

/// A post quoted as evidence for an intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseExample {
    pub source_url: String,
    pub title: String,
    pub snippet: String,
}

/// Subreddit frequency within an intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubredditCount {
    pub subreddit: String,
    pub count: u32,
}

/// Whether an intent persists across old and new windows or is recent-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentClass {
    Structural,
    Temporal,
}

impl IntentClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentClass::Structural => "structural",
            IntentClass::Temporal => "temporal",
        }
    }
}

impl std::fmt::Display for IntentClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A group of lexically similar phrases with merged evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentRecord {
    pub intent_id: String,
    pub label: String,
    /// Window label -> number of posts carrying a member phrase
    pub evidence_counts: BTreeMap<String, u32>,
    pub classification: IntentClass,
    pub common_phrases: Vec<String>,
    pub top_subreddits: Vec<SubredditCount>,
    pub examples: Vec<PhraseExample>,
}

/// Human-readable statement of the classification rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentRules {
    pub structural_if: String,
    pub temporal_if: String,
}

impl Default for IntentRules {
    fn default() -> Self {
        Self {
            structural_if: "evidence in >=2 windows including one of {180d,365d} and recent {14d or 60d} > 0"
                .to_string(),
            temporal_if: "evidence mostly in recent windows and near-zero in {180d,365d}".to_string(),
        }
    }
}

/// The `reddit_intents` artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentReport {
    pub intents: Vec<IntentRecord>,
    pub rules: IntentRules,
}

/// Canonical-URL host frequency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainCount {
    pub domain: String,
    pub count: u32,
}

/// Corpus-health warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    /// One domain supplies more than half of the deduplicated items
    DomainMonoculture,
    /// Tagged clusters average fewer than one intent tag
    LowIntentDensity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warn,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityIssue {
    pub code: IssueCode,
    pub severity: Severity,
    pub details: BTreeMap<String, f64>,
}

/// The `quality` artifact. Recomputed from scratch every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub raw_count: usize,
    pub deduped_count: usize,
    pub dedupe_ratio: f64,
    pub top_domains: Vec<DomainCount>,
    pub intent_density: f64,
    pub issues: Vec<QualityIssue>,
}

impl QualityReport {
    pub fn has_issue(&self, code: IssueCode) -> bool {
        self.issues.iter().any(|issue| issue.code == code)
    }
}
