// Frequency-ranked terms and bigrams per cluster.
//
// Member texts are tokenized and concatenated in item-id order; bigrams are
// contiguous token pairs over that concatenation. Equal counts keep the
// order in which the term was first seen.

use std::collections::HashMap;

use tracing::debug;

use crate::models::{
    BigramCount, CanonicalItem, ClusterReport, ClusterTerms, TermCount, TermsReport,
};
use crate::text::{tokenize, FrequencyCounter};

/// How many terms and bigrams to keep per cluster.
pub const DEFAULT_TERM_LIMIT: usize = 20;

/// Rank unigrams and bigrams over a sequence of texts.
pub fn extract_terms<'a, I>(texts: I, limit: usize) -> ClusterTerms
where
    I: IntoIterator<Item = &'a str>,
{
    let tokens: Vec<String> = texts.into_iter().flat_map(tokenize).collect();

    let unigrams: FrequencyCounter = tokens.iter().collect();
    let bigrams: FrequencyCounter = tokens
        .windows(2)
        .map(|pair| format!("{} {}", pair[0], pair[1]))
        .collect();

    ClusterTerms {
        top_terms: unigrams
            .most_common(limit)
            .into_iter()
            .map(|(term, count)| TermCount { term, count })
            .collect(),
        top_bigrams: bigrams
            .most_common(limit)
            .into_iter()
            .map(|(bigram, count)| BigramCount { bigram, count })
            .collect(),
    }
}

/// Term annotations for every cluster in the report.
pub fn build_terms(items: &[CanonicalItem], report: &ClusterReport, limit: usize) -> TermsReport {
    let by_id: HashMap<&str, &CanonicalItem> =
        items.iter().map(|item| (item.id.as_str(), item)).collect();

    let cluster_terms = report
        .clusters
        .iter()
        .map(|cluster| {
            let texts: Vec<String> = cluster
                .items
                .iter()
                .filter_map(|id| by_id.get(id.as_str()))
                .map(|item| item.title_snippet_text())
                .collect();
            let terms = extract_terms(texts.iter().map(String::as_str), limit);
            debug!(
                cluster = %cluster.cluster_id,
                terms = terms.top_terms.len(),
                bigrams = terms.top_bigrams.len(),
                "Extracted cluster terms"
            );
            (cluster.cluster_id.clone(), terms)
        })
        .collect();

    TermsReport { cluster_terms }
}

/// Copy ranked term strings into each cluster's `top_terms`/`top_bigrams`.
pub fn annotate_clusters(report: &mut ClusterReport, terms: &TermsReport) {
    for cluster in &mut report.clusters {
        let Some(entry) = terms.cluster_terms.get(&cluster.cluster_id) else {
            continue;
        };
        cluster.top_terms = entry.top_terms.iter().map(|t| t.term.clone()).collect();
        cluster.top_bigrams = entry.top_bigrams.iter().map(|b| b.bigram.clone()).collect();
    }
}
