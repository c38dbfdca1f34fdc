// Deduplication: merge raw results into canonical items.
//
// Two raw results are the same item when they share a canonical URL or when
// their title+snippet text is near-identical. Merging is transitive and runs
// through a disjoint-set whose representative is always the smallest id, so
// the output does not depend on input order.

pub mod engine;
pub mod union_find;

pub use engine::{dedupe, DedupeParams, RawRow};
pub use union_find::{group_by, DisjointSet};
