// Keyword-driven cluster assignment.
//
// Each item's normalized titles+snippets are scored against every cluster's
// normalized keywords (substring hits). The highest hit count wins; equal
// counts go to the smaller cluster_id. Items with no hits at all belong to
// no cluster.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use super::tags::IntentTagger;
use crate::models::{CanonicalItem, ClusterAssignment, ClusterDefinition, ClusterReport};
use crate::text::normalize;

struct TaxonomyEntry {
    definition: ClusterDefinition,
    /// Normalized, non-empty keywords
    keywords: Vec<String>,
}

/// The configured cluster definitions, ordered by cluster_id, with keywords
/// pre-normalized.
pub struct Taxonomy {
    entries: Vec<TaxonomyEntry>,
}

impl Taxonomy {
    /// Build from configuration. A repeated cluster_id keeps its first
    /// definition.
    pub fn new(definitions: &[ClusterDefinition]) -> Self {
        let mut by_id: BTreeMap<&str, &ClusterDefinition> = BTreeMap::new();
        for definition in definitions {
            by_id
                .entry(definition.cluster_id.as_str())
                .or_insert(definition);
        }

        let entries = by_id
            .into_values()
            .map(|definition| TaxonomyEntry {
                definition: definition.clone(),
                keywords: definition
                    .keywords
                    .iter()
                    .map(|keyword| normalize(keyword))
                    .filter(|keyword| !keyword.is_empty())
                    .collect(),
            })
            .collect();

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of keywords of each cluster found in already-normalized text,
    /// in cluster_id order.
    pub fn keyword_hits(&self, normalized_text: &str) -> Vec<(&str, usize)> {
        self.entries
            .iter()
            .map(|entry| {
                let hits = entry
                    .keywords
                    .iter()
                    .filter(|keyword| normalized_text.contains(keyword.as_str()))
                    .count();
                (entry.definition.cluster_id.as_str(), hits)
            })
            .collect()
    }

    /// The winning cluster_id for already-normalized text, if any keyword hit.
    pub fn best_match(&self, normalized_text: &str) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;
        // Entries are in ascending id order, so only a strictly higher count
        // displaces the current best.
        for (cluster_id, hits) in self.keyword_hits(normalized_text) {
            if hits == 0 {
                continue;
            }
            match best {
                Some((_, best_hits)) if hits <= best_hits => {}
                _ => best = Some((cluster_id, hits)),
            }
        }
        best.map(|(cluster_id, _)| cluster_id)
    }
}

/// Assign every item to at most one cluster and collect intent tags.
///
/// Every configured cluster appears in the report, ordered by cluster_id,
/// even when no item matched it. Term fields are left empty; see
/// `annotate_clusters`.
pub fn assign_clusters(
    items: &[CanonicalItem],
    definitions: &[ClusterDefinition],
    tagger: &IntentTagger,
) -> ClusterReport {
    let taxonomy = Taxonomy::new(definitions);

    let mut members: BTreeMap<String, (BTreeSet<String>, BTreeSet<String>)> = BTreeMap::new();
    let mut unassigned = 0usize;

    for item in items {
        let text = normalize(&item.title_snippet_text());
        match taxonomy.best_match(&text) {
            Some(cluster_id) => {
                let (ids, tags) = members.entry(cluster_id.to_string()).or_default();
                ids.insert(item.id.clone());
                tags.extend(tagger.tag(&item.snippet_title_text()));
            }
            None => unassigned += 1,
        }
    }

    let clusters: Vec<ClusterAssignment> = taxonomy
        .entries
        .iter()
        .map(|entry| {
            let (ids, tags) = members
                .remove(&entry.definition.cluster_id)
                .unwrap_or_default();
            debug!(
                cluster = %entry.definition.cluster_id,
                items = ids.len(),
                tags = tags.len(),
                "Cluster assigned"
            );
            ClusterAssignment {
                cluster_id: entry.definition.cluster_id.clone(),
                label: entry.definition.label.clone(),
                items: ids.into_iter().collect(),
                intent_tags: tags.into_iter().collect(),
                top_terms: Vec::new(),
                top_bigrams: Vec::new(),
            }
        })
        .collect();

    info!(
        clusters = clusters.len(),
        items = items.len(),
        unassigned,
        "Assigned items to clusters"
    );

    ClusterReport { clusters }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemFlags;

    fn definition(id: &str, keywords: &[&str]) -> ClusterDefinition {
        ClusterDefinition {
            cluster_id: id.to_string(),
            label: format!("Label {id}"),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn item(id: &str, title: &str, snippet: &str) -> CanonicalItem {
        CanonicalItem {
            id: id.to_string(),
            canonical_url: format!("https://example.com/{id}"),
            member_ids: vec![id.to_string()],
            original_urls: vec![],
            titles: vec![title.to_string()],
            snippets: vec![snippet.to_string()],
            queries: vec![],
            engines: vec![],
            first_seen: String::new(),
            last_seen: String::new(),
            flags: ItemFlags::default(),
        }
    }

    #[test]
    fn test_tie_goes_to_smaller_cluster_id() {
        let taxonomy = Taxonomy::new(&[
            definition("b_cluster", &["journal"]),
            definition("a_cluster", &["focus"]),
        ]);
        assert_eq!(taxonomy.best_match("focus journal"), Some("a_cluster"));
    }

    #[test]
    fn test_highest_hit_count_wins() {
        let taxonomy = Taxonomy::new(&[
            definition("a", &["focus"]),
            definition("b", &["journal", "prompts"]),
        ]);
        assert_eq!(taxonomy.best_match("focus journal prompts"), Some("b"));
    }

    #[test]
    fn test_keywords_are_normalized() {
        let taxonomy = Taxonomy::new(&[definition("a", &["Habit-Tracker!"])]);
        assert_eq!(taxonomy.best_match("monthly habit tracker"), Some("a"));
    }

    #[test]
    fn test_empty_keywords_never_hit() {
        let taxonomy = Taxonomy::new(&[definition("a", &["", "!!"])]);
        assert_eq!(taxonomy.best_match("anything at all"), None);
    }

    #[test]
    fn test_unmatched_items_dropped() {
        let items = vec![
            item("i1", "Focus planner", "Printable focus planner pdf"),
            item("i2", "Weather today", "Sunny skies"),
        ];
        let report = assign_clusters(
            &items,
            &[definition("focus", &["focus"])],
            &IntentTagger::builtin(),
        );
        assert_eq!(report.clusters.len(), 1);
        assert_eq!(report.clusters[0].items, vec!["i1"]);
        assert_eq!(
            report.clusters[0].intent_tags,
            vec!["pdf", "planner"]
        );
    }

    #[test]
    fn test_empty_taxonomy() {
        let items = vec![item("i1", "Focus planner", "")];
        let report = assign_clusters(&items, &[], &IntentTagger::builtin());
        assert!(report.clusters.is_empty());
    }

    #[test]
    fn test_clusters_sorted_and_kept_when_empty() {
        let report = assign_clusters(
            &[],
            &[definition("zeta", &["z"]), definition("alpha", &["a"])],
            &IntentTagger::builtin(),
        );
        let ids: Vec<&str> = report.clusters.iter().map(|c| c.cluster_id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);
    }
}
