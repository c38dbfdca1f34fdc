// Cluster assignment: bucket canonical items into the configured taxonomy,
// tag them with purchase intents, and rank the vocabulary of each bucket.

pub mod assign;
pub mod tags;
pub mod terms;

pub use assign::{assign_clusters, Taxonomy};
pub use tags::IntentTagger;
pub use terms::{annotate_clusters, build_terms, extract_terms, DEFAULT_TERM_LIMIT};
