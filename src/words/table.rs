//! Word → count aggregation and top-K ranking

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// A word and the number of times it was seen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: u64,
}

impl WordCount {
    pub fn new(word: impl Into<String>, count: u64) -> Self {
        Self {
            word: word.into(),
            count,
        }
    }
}

/// Ranking order: count descending, then word ascending by bytes
///
/// Total over distinct words, so a ranking never depends on arrival order.
pub fn rank_order(a: &WordCount, b: &WordCount) -> Ordering {
    b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word))
}

/// Sort by [`rank_order`] and keep at most `k` entries
pub fn top_k(mut entries: Vec<WordCount>, k: usize) -> Vec<WordCount> {
    entries.sort_by(rank_order);
    entries.truncate(k);
    entries
}

/// Insertion-ordered word table
///
/// Lookup goes through an index map; entries stay in the order words were
/// first seen.
#[derive(Debug, Default)]
pub struct WordTable {
    entries: Vec<WordCount>,
    index: HashMap<String, usize>,
    total: u64,
}

impl WordTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the word's count, inserting it with 1 on first sight
    pub fn record(&mut self, word: &str) {
        self.total += 1;
        match self.index.get(word) {
            Some(&slot) => self.entries[slot].count += 1,
            None => {
                self.index.insert(word.to_string(), self.entries.len());
                self.entries.push(WordCount::new(word, 1));
            }
        }
    }

    pub fn count(&self, word: &str) -> Option<u64> {
        self.index.get(word).map(|&slot| self.entries[slot].count)
    }

    /// Number of distinct words
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of words recorded, duplicates included
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Entries in first-seen order
    pub fn entries(&self) -> &[WordCount] {
        &self.entries
    }

    /// Consume the table and return its `k` highest-ranked entries
    pub fn into_top_k(self, k: usize) -> Vec<WordCount> {
        top_k(self.entries, k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn table_of(words: &[&str]) -> WordTable {
        let mut table = WordTable::new();
        for word in words {
            table.record(word);
        }
        table
    }

    #[test]
    fn test_record_counts_and_keeps_insertion_order() {
        let table = table_of(&["the", "cat", "sat", "the", "mat", "the", "cat", "ran"]);
        let order: Vec<&str> = table.entries().iter().map(|e| e.word.as_str()).collect();
        assert_eq!(order, ["the", "cat", "sat", "mat", "ran"]);
        assert_eq!(table.count("the"), Some(3));
        assert_eq!(table.count("cat"), Some(2));
        assert_eq!(table.count("dog"), None);
        assert_eq!(table.len(), 5);
        assert_eq!(table.total(), 8);
    }

    #[test]
    fn test_top_k_breaks_ties_by_word() {
        let table = table_of(&["the", "cat", "sat", "the", "mat", "the", "cat", "ran"]);
        let top = table.into_top_k(3);
        assert_eq!(
            top,
            vec![
                WordCount::new("the", 3),
                WordCount::new("cat", 2),
                WordCount::new("mat", 1),
            ]
        );
    }

    #[test]
    fn test_top_k_larger_than_table() {
        let top = table_of(&["one", "two"]).into_top_k(10);
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn test_top_k_of_empty_table() {
        assert!(WordTable::new().into_top_k(5).is_empty());
    }

    proptest! {
        #[test]
        fn test_top_k_independent_of_arrival_order(
            words in prop::collection::vec("[a-e]{2}", 0..200),
            k in 1usize..10,
        ) {
            let forward = table_of(&words.iter().map(String::as_str).collect::<Vec<_>>());
            let backward = table_of(&words.iter().rev().map(String::as_str).collect::<Vec<_>>());
            prop_assert_eq!(forward.into_top_k(k), backward.into_top_k(k));
        }

        #[test]
        fn test_table_total_matches_input(words in prop::collection::vec("[a-z]{2,4}", 0..100)) {
            let table = table_of(&words.iter().map(String::as_str).collect::<Vec<_>>());
            let summed: u64 = table.entries().iter().map(|e| e.count).sum();
            prop_assert_eq!(summed, words.len() as u64);
            prop_assert_eq!(table.total(), words.len() as u64);
        }
    }
}
