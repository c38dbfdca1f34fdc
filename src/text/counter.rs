// Insertion-ordered frequency counter.
//
// Ranking ties resolve by first-seen order, so the counter remembers the
// order in which each key was first added.

use std::collections::HashMap;

/// Counts occurrences of string keys, remembering first-seen order.
#[derive(Debug, Clone, Default)]
pub struct FrequencyCounter {
    index: HashMap<String, usize>,
    entries: Vec<(String, u32)>,
}

impl FrequencyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `key`.
    pub fn add(&mut self, key: &str) {
        self.add_n(key, 1);
    }

    /// Count `n` occurrences of `key`. A zero count still registers the key.
    pub fn add_n(&mut self, key: &str, n: u32) {
        match self.index.get(key) {
            Some(&slot) => self.entries[slot].1 += n,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), n));
            }
        }
    }

    /// Fold another counter in, keeping this counter's order for known keys.
    pub fn merge(&mut self, other: &FrequencyCounter) {
        for (key, count) in &other.entries {
            self.add_n(key, *count);
        }
    }

    pub fn get(&self, key: &str) -> u32 {
        self.index
            .get(key)
            .map(|&slot| self.entries[slot].1)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(key, count)| (key.as_str(), *count))
    }

    /// The `limit` most frequent keys, highest count first. Equal counts keep
    /// first-seen order.
    pub fn most_common(&self, limit: usize) -> Vec<(String, u32)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(limit);
        ranked
    }
}

impl<S: AsRef<str>> FromIterator<S> for FrequencyCounter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut counter = FrequencyCounter::new();
        for key in iter {
            counter.add(key.as_ref());
        }
        counter
    }
}
