// Jaccard similarity over shingle sets.
//
//   |A ∩ B| / |A ∪ B|
//
// Two empty sets are treated as identical (1.0); exactly one empty set
// scores 0.0. The pairwise helper fans comparisons out over rayon; callers
// reduce the matching pairs serially, so results never depend on scheduling.

use std::collections::HashSet;

use rayon::prelude::*;

use super::normalize::shingles;

/// Jaccard similarity of the `shingle_size`-shingle sets of two texts.
pub fn jaccard(a: &str, b: &str, shingle_size: usize) -> f64 {
    jaccard_sets(&shingles(a, shingle_size), &shingles(b, shingle_size))
}

/// Jaccard similarity of two precomputed shingle sets.
pub fn jaccard_sets(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let intersection = small.iter().filter(|s| large.contains(*s)).count();
    let union = a.len() + b.len() - intersection;

    intersection as f64 / union as f64
}

/// All index pairs `(i, j)` with `i < j` for which `predicate` holds.
///
/// Comparisons run in parallel; the returned pairs are in ascending
/// `(i, j)` order.
pub fn pairwise_matches<T, F>(items: &[T], predicate: F) -> Vec<(usize, usize)>
where
    T: Sync,
    F: Fn(&T, &T) -> bool + Sync,
{
    let n = items.len();
    let predicate = &predicate;

    (0..n)
        .into_par_iter()
        .flat_map_iter(move |i| {
            ((i + 1)..n)
                .filter(move |&j| predicate(&items[i], &items[j]))
                .map(move |j| (i, j))
        })
        .collect()
}
