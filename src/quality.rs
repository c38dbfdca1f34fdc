// Corpus-health metrics over one processing run.
//
// Nothing here is persisted between runs; the report is a pure function of
// the raw count, the deduplicated items and the cluster report.

use std::collections::BTreeMap;

use crate::models::{
    CanonicalItem, ClusterReport, DomainCount, IssueCode, QualityIssue, QualityReport, Severity,
};
use crate::text::url::domain_of;
use crate::text::FrequencyCounter;

const TOP_DOMAINS: usize = 10;

/// Share of deduplicated items above which one domain is a monoculture.
const MONOCULTURE_SHARE: f64 = 0.5;

/// Average tags per tagged cluster below which intent coverage is thin.
const MIN_INTENT_DENSITY: f64 = 1.0;

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Compute the quality report.
pub fn compute_quality(
    raw_count: usize,
    deduped: &[CanonicalItem],
    clusters: &ClusterReport,
) -> QualityReport {
    let deduped_count = deduped.len();
    let dedupe_ratio = if raw_count == 0 {
        0.0
    } else {
        1.0 - deduped_count as f64 / raw_count as f64
    };

    let domains: FrequencyCounter = deduped
        .iter()
        .filter_map(|item| domain_of(&item.canonical_url))
        .collect();
    let top_domains: Vec<DomainCount> = domains
        .most_common(TOP_DOMAINS)
        .into_iter()
        .map(|(domain, count)| DomainCount { domain, count })
        .collect();

    let intent_total: usize = clusters.clusters.iter().map(|c| c.intent_tags.len()).sum();
    let tagged_clusters = clusters
        .clusters
        .iter()
        .filter(|c| !c.intent_tags.is_empty())
        .count();
    let intent_density = intent_total as f64 / tagged_clusters.max(1) as f64;

    let mut issues = Vec::new();
    if let Some(top) = top_domains.first() {
        let top_ratio = top.count as f64 / deduped_count.max(1) as f64;
        if top_ratio > MONOCULTURE_SHARE {
            issues.push(QualityIssue {
                code: IssueCode::DomainMonoculture,
                severity: Severity::Warn,
                details: BTreeMap::from([("top_ratio".to_string(), top_ratio)]),
            });
        }
    }
    if intent_density < MIN_INTENT_DENSITY {
        issues.push(QualityIssue {
            code: IssueCode::LowIntentDensity,
            severity: Severity::Warn,
            details: BTreeMap::from([("intent_density".to_string(), intent_density)]),
        });
    }

    QualityReport {
        raw_count,
        deduped_count,
        dedupe_ratio: round4(dedupe_ratio),
        top_domains,
        intent_density,
        issues,
    }
}
