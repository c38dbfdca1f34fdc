// Arena-indexed disjoint-set over string keys.
//
// Keys are sorted once at construction and mapped to dense indices, so
// "smaller index" and "lexicographically smaller key" are the same thing.
// Union always keeps the smaller root, which makes the representative of a
// set its smallest member no matter what order unions arrive in.

use std::collections::{BTreeMap, HashMap};

use crate::text::similarity::pairwise_matches;

/// Union-find with path compression and a smallest-key-wins union rule.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    keys: Vec<String>,
    index: HashMap<String, usize>,
    parent: Vec<usize>,
}

impl DisjointSet {
    /// Build singleton sets for every distinct key.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        keys.sort();
        keys.dedup();

        let index = keys
            .iter()
            .enumerate()
            .map(|(i, key)| (key.clone(), i))
            .collect();
        let parent = (0..keys.len()).collect();

        Self {
            keys,
            index,
            parent,
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Dense index of `key`, if it is part of the universe.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Representative key of the set containing `key`.
    pub fn find(&mut self, key: &str) -> Option<&str> {
        let i = self.index_of(key)?;
        let root = self.find_index(i);
        Some(&self.keys[root])
    }

    /// Representative index of the set containing index `i`.
    pub fn find_index(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        // Path compression
        let mut node = i;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }

        root
    }

    /// Merge the sets containing `a` and `b`. Returns true if they were
    /// previously separate; unknown keys are ignored.
    pub fn union(&mut self, a: &str, b: &str) -> bool {
        match (self.index_of(a), self.index_of(b)) {
            (Some(ia), Some(ib)) => self.union_index(ia, ib),
            _ => false,
        }
    }

    /// Index form of `union`.
    pub fn union_index(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find_index(a);
        let root_b = self.find_index(b);
        if root_a == root_b {
            return false;
        }

        let (keep, absorb) = if root_a < root_b {
            (root_a, root_b)
        } else {
            (root_b, root_a)
        };
        self.parent[absorb] = keep;
        true
    }

    /// The current partition: each group ascending, groups ordered by their
    /// representative.
    pub fn groups(&mut self) -> Vec<Vec<String>> {
        let mut grouped: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        for i in 0..self.keys.len() {
            let root = self.find_index(i);
            grouped.entry(root).or_default().push(self.keys[i].clone());
        }
        grouped.into_values().collect()
    }
}

/// Partition `items` by applying `predicate` to every unordered pair.
///
/// O(n²) comparisons. Duplicate items collapse into one key.
pub fn group_by<F>(items: &[String], predicate: F) -> Vec<Vec<String>>
where
    F: Fn(&str, &str) -> bool + Sync,
{
    let mut set = DisjointSet::new(items.iter().cloned());
    let keys: Vec<String> = set.keys.clone();

    for (i, j) in pairwise_matches(&keys, |a, b| predicate(a.as_str(), b.as_str())) {
        set.union_index(i, j);
    }

    set.groups()
}
