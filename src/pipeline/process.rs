// Processing pipeline: raw log -> deduped items -> clusters -> terms -> quality.
//
// Reads the whole raw log as one snapshot and rewrites all four artifacts.
// Re-running on an unchanged log produces byte-identical output.

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use crate::cluster::{annotate_clusters, assign_clusters, build_terms, IntentTagger, DEFAULT_TERM_LIMIT};
use crate::config::Config;
use crate::dedupe::dedupe;
use crate::io::{read_jsonl, write_json};
use crate::models::{CanonicalItem, ClusterReport, QualityReport, RawResult, TermsReport};
use crate::quality::compute_quality;

/// Everything a processing run produced.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub raw_count: usize,
    pub items: Vec<CanonicalItem>,
    pub clusters: ClusterReport,
    pub terms: TermsReport,
    pub quality: QualityReport,
}

/// Run every processing stage in memory.
pub fn process_rows(rows: &[RawResult], config: &Config) -> ProcessOutcome {
    let items = dedupe(rows, &config.dedupe_params());

    let tagger = IntentTagger::with_overrides(&config.clustering.intent_tags);
    let mut clusters = assign_clusters(&items, &config.clustering.clusters, &tagger);
    let terms = build_terms(&items, &clusters, DEFAULT_TERM_LIMIT);
    annotate_clusters(&mut clusters, &terms);

    let quality = compute_quality(rows.len(), &items, &clusters);

    ProcessOutcome {
        raw_count: rows.len(),
        items,
        clusters,
        terms,
        quality,
    }
}

/// Read the raw log, process it, and write the deduped, clusters, terms and
/// quality artifacts. Returns the outcome and the paths written.
pub fn run(config: &Config) -> Result<(ProcessOutcome, Vec<PathBuf>)> {
    let raw_path = config.resolve(&config.outputs.raw_results);
    let rows: Vec<RawResult> = read_jsonl(&raw_path)?;
    info!(path = %raw_path.display(), rows = rows.len(), "Loaded raw results");

    let outcome = process_rows(&rows, config);

    let deduped_path = config.resolve(&config.outputs.deduped);
    let clusters_path = config.resolve(&config.outputs.clusters);
    let terms_path = config.resolve(&config.outputs.terms);
    let quality_path = config.resolve(&config.outputs.quality);

    write_json(&deduped_path, &outcome.items)?;
    write_json(&clusters_path, &outcome.clusters)?;
    write_json(&terms_path, &outcome.terms)?;
    write_json(&quality_path, &outcome.quality)?;

    info!(
        raw = outcome.raw_count,
        deduped = outcome.items.len(),
        clusters = outcome.clusters.clusters.len(),
        issues = outcome.quality.issues.len(),
        "Processing complete"
    );

    Ok((
        outcome,
        vec![deduped_path, clusters_path, terms_path, quality_path],
    ))
}
