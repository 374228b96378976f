//! Weighted accumulation and ranking.
//!
//! Both analyzers fold a stream of (key, weight) pairs into per-key
//! totals and then rank the keys by total. Insertion order is kept so
//! that ties rank in first-seen order and output is deterministic.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;
use std::ops::AddAssign;

/// Per-key running totals that remember first-seen order
#[derive(Debug, Clone)]
pub struct WeightedTally<K, W> {
    index: HashMap<K, usize>,
    entries: Vec<(K, W)>,
}

impl<K, W> Default for WeightedTally<K, W> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<K, W> WeightedTally<K, W>
where
    K: Eq + Hash + Clone,
    W: AddAssign + Copy + PartialOrd,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `weight` to the running total of `key`
    pub fn add(&mut self, key: K, weight: W) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1 += weight,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, weight));
            }
        }
    }

    /// Current total for `key`
    pub fn get(&self, key: &K) -> Option<W> {
        self.index.get(key).map(|&slot| self.entries[slot].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Totals in first-seen order
    pub fn into_entries(self) -> Vec<(K, W)> {
        self.entries
    }

    /// Totals sorted descending; equal totals keep first-seen order
    pub fn into_ranked(self) -> Vec<(K, W)> {
        let mut entries = self.entries;
        rank_descending(&mut entries, |entry| entry.1);
        entries
    }
}

impl<K, W> FromIterator<(K, W)> for WeightedTally<K, W>
where
    K: Eq + Hash + Clone,
    W: AddAssign + Copy + PartialOrd,
{
    fn from_iter<I: IntoIterator<Item = (K, W)>>(iter: I) -> Self {
        let mut tally = Self::new();
        for (key, weight) in iter {
            tally.add(key, weight);
        }
        tally
    }
}

/// Stable descending sort by an extracted weight
///
/// Incomparable weights (NaN) are treated as equal.
pub fn rank_descending<T, W, F>(items: &mut [T], weight: F)
where
    W: PartialOrd,
    F: Fn(&T) -> W,
{
    items.sort_by(|a, b| {
        weight(b)
            .partial_cmp(&weight(a))
            .unwrap_or(Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_per_key() {
        let tally: WeightedTally<&str, u64> =
            vec![("a", 1), ("b", 5), ("a", 3)].into_iter().collect();

        assert_eq!(tally.get(&"a"), Some(4));
        assert_eq!(tally.get(&"b"), Some(5));
        assert_eq!(tally.get(&"c"), None);
        assert_eq!(tally.len(), 2);
    }

    #[test]
    fn test_ranked_ties_keep_first_seen_order() {
        let tally: WeightedTally<&str, f64> =
            vec![("x", 2.0), ("y", 5.0), ("z", 2.0), ("w", 2.0)].into_iter().collect();

        let keys: Vec<_> = tally.into_ranked().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["y", "x", "z", "w"]);
    }

    #[test]
    fn test_entries_in_first_seen_order() {
        let tally: WeightedTally<&str, u64> =
            vec![("b", 1), ("a", 9), ("b", 1)].into_iter().collect();
        assert_eq!(tally.into_entries(), vec![("b", 2), ("a", 9)]);
    }

    #[test]
    fn test_empty_tally() {
        let tally: WeightedTally<u32, f64> = WeightedTally::new();
        assert!(tally.is_empty());
        assert!(tally.into_ranked().is_empty());
    }
}
