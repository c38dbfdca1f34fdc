// Pipeline configuration, loaded from a TOML file.
//
// Every section and field has a serde default, so an empty file is a valid
// config. Secrets stay in the environment (.env is loaded at startup by
// dotenvy); the file only names endpoints, limits and the taxonomy.

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::dedupe::DedupeParams;
use crate::intents::{IntentParams, DEFAULT_WINDOW_LABELS};
use crate::models::ClusterDefinition;

/// Paths of every artifact the pipeline reads or writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputPaths {
    pub raw_results: PathBuf,
    pub deduped: PathBuf,
    pub clusters: PathBuf,
    pub terms: PathBuf,
    pub quality: PathBuf,
    pub reddit_posts: PathBuf,
    pub reddit_intents: PathBuf,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            raw_results: PathBuf::from("data/raw_results.jsonl"),
            deduped: PathBuf::from("data/deduped.json"),
            clusters: PathBuf::from("data/clusters.json"),
            terms: PathBuf::from("data/terms.json"),
            quality: PathBuf::from("data/quality.json"),
            reddit_posts: PathBuf::from("data/reddit_posts.jsonl"),
            reddit_intents: PathBuf::from("data/reddit_intents.json"),
        }
    }
}

impl OutputPaths {
    /// (key, path) pairs in a fixed order, for checks that walk all outputs.
    pub fn entries(&self) -> [(&'static str, &Path); 7] {
        [
            ("raw_results", self.raw_results.as_path()),
            ("deduped", self.deduped.as_path()),
            ("clusters", self.clusters.as_path()),
            ("terms", self.terms.as_path()),
            ("quality", self.quality.as_path()),
            ("reddit_posts", self.reddit_posts.as_path()),
            ("reddit_intents", self.reddit_intents.as_path()),
        ]
    }
}

/// Stop conditions for the collect loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// New rows per (query, engine) pair
    pub per_query: usize,
    /// Results requested from an engine per page
    pub per_engine: usize,
    /// New rows per run
    pub global_max: usize,
    pub max_minutes: u64,
    /// Consecutive pages without a new row before giving up on an engine
    pub no_new_pages: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            per_query: 50,
            per_engine: 50,
            global_max: 1000,
            max_minutes: 10,
            no_new_pages: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    Searxng,
    Ddg,
    Brave,
}

impl EngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Searxng => "searxng",
            EngineKind::Ddg => "ddg",
            EngineKind::Brave => "brave",
        }
    }
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One `[[engines]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub name: EngineKind,
    #[serde(default)]
    pub endpoint: String,
    /// Minimum seconds between requests
    #[serde(default = "default_rate_limit_s")]
    pub rate_limit_s: f64,
    #[serde(default = "default_timeout_s")]
    pub timeout_s: f64,
    #[serde(default = "default_pages")]
    pub pages: u32,
    #[serde(default)]
    pub api_key: String,
}

fn default_rate_limit_s() -> f64 {
    1.0
}

fn default_timeout_s() -> f64 {
    10.0
}

fn default_pages() -> u32 {
    1
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filters {
    /// Host substrings whose results are never recorded
    pub blocked_domains: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedditFilters {
    pub min_score: i64,
    pub min_comments: i64,
    pub allow_nsfw: bool,
    /// Keep self posts only
    pub only_posts: bool,
    pub max_pages: u32,
}

impl Default for RedditFilters {
    fn default() -> Self {
        Self {
            min_score: 0,
            min_comments: 0,
            allow_nsfw: false,
            only_posts: true,
            max_pages: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedditConfig {
    pub queries: Vec<String>,
    pub windows: Vec<String>,
    pub rate_limit_s: f64,
    pub timeout_s: f64,
    pub filters: RedditFilters,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            queries: Vec::new(),
            windows: DEFAULT_WINDOW_LABELS.iter().map(|s| s.to_string()).collect(),
            rate_limit_s: default_rate_limit_s(),
            timeout_s: default_timeout_s(),
            filters: RedditFilters::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    pub clusters: Vec<ClusterDefinition>,
    /// Extra intent tags: name -> regex, merged over the built-in set
    pub intent_tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub dedupe: f64,
    pub intent_grouping: f64,
    pub dedupe_shingle_size: usize,
    pub phrase_shingle_size: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        let dedupe = DedupeParams::default();
        let intents = IntentParams::default();
        Self {
            dedupe: dedupe.threshold,
            intent_grouping: intents.threshold,
            dedupe_shingle_size: dedupe.shingle_size,
            phrase_shingle_size: intents.shingle_size,
        }
    }
}

/// Central configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub queries: Vec<String>,
    pub outputs: OutputPaths,
    pub limits: Limits,
    pub engines: Vec<EngineConfig>,
    pub filters: Filters,
    pub reddit: RedditConfig,
    pub clustering: ClusteringConfig,
    pub thresholds: Thresholds,
    /// Directory of the loaded file; relative output paths resolve against it
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(config)
    }

    /// Parse TOML text and apply environment fallbacks. `base_dir` is left
    /// empty, so output paths resolve against the working directory.
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        config.apply_env();
        Ok(config)
    }

    /// Fill secrets the file left empty from the environment.
    fn apply_env(&mut self) {
        let brave_key = env::var("BRAVE_API_KEY").unwrap_or_default();
        for engine in &mut self.engines {
            if engine.name == EngineKind::Brave && engine.api_key.is_empty() {
                engine.api_key = brave_key.clone();
            }
        }
    }

    /// Resolve a configured path against the config file's directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        resolve_path(&self.base_dir, path)
    }

    pub fn dedupe_params(&self) -> DedupeParams {
        DedupeParams {
            threshold: self.thresholds.dedupe,
            shingle_size: self.thresholds.dedupe_shingle_size,
        }
    }

    pub fn intent_params(&self) -> IntentParams {
        IntentParams {
            threshold: self.thresholds.intent_grouping,
            shingle_size: self.thresholds.phrase_shingle_size,
        }
    }

    /// Check that there is something to search for.
    /// Call this before `collect`.
    pub fn require_search(&self) -> Result<()> {
        if self.queries.is_empty() {
            anyhow::bail!(
                "No queries configured. Add a top-level `queries = [...]` to the config file."
            );
        }
        if self.engines.is_empty() {
            anyhow::bail!(
                "No engines configured. Add at least one [[engines]] section, e.g.\n\
                 [[engines]]\n\
                 name = \"searxng\"\n\
                 endpoint = \"http://localhost:8080/search\""
            );
        }
        Ok(())
    }

    /// Check that the Reddit section names queries.
    pub fn require_reddit(&self) -> Result<()> {
        if self.reddit.queries.is_empty() {
            anyhow::bail!(
                "No Reddit queries configured. Add `queries = [...]` under [reddit]."
            );
        }
        Ok(())
    }
}

/// Absolute paths pass through; relative ones are joined onto `base`.
pub fn resolve_path(base: &Path, value: &Path) -> PathBuf {
    if value.is_absolute() {
        value.to_path_buf()
    } else {
        base.join(value)
    }
}
