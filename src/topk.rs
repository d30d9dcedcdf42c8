//! bounded top-k selection of the most similar database entries
//!
//! The selector keeps a min oriented heap of at most k scored entries, so the
//! auxiliary memory is O(k) whatever the size of the profile table and the
//! whole search costs O(n log k) instead of sorting all n scores.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::ingest::ProfileTable;
use crate::profile::BigramProfile;
use crate::similarity::{jaccard_similarity, SimilarityResult};

/// keeps the k highest scoring entries seen so far.
/// Entries are kept in a min heap keyed by similarity : as long as fewer than k
/// entries were inserted every entry is retained, after that a new entry evicts
/// the current minimum when it scores higher.
pub struct TopKSelector {
    capacity: usize,
    heap: BinaryHeap<Reverse<SimilarityResult>>,
} // end of TopKSelector

impl TopKSelector {
    /// allocates a selector retaining at most capacity entries, capacity must be >= 1
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "TopKSelector capacity must be >= 1");
        TopKSelector {
            capacity,
            heap: BinaryHeap::with_capacity(capacity + 1),
        }
    } // end of new

    /// offers a scored entry to the selector
    pub fn insert(&mut self, result: SimilarityResult) {
        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(result));
        } else if let Some(Reverse(current_min)) = self.heap.peek() {
            if result.get_similarity() > current_min.get_similarity() {
                self.heap.pop();
                self.heap.push(Reverse(result));
            }
        }
    } // end of insert

    /// number of entries currently retained
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// consumes the selector, returning the retained entries sorted by
    /// decreasing similarity
    pub fn into_sorted_results(self) -> Vec<SimilarityResult> {
        // ascending on Reverse is descending on similarity
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(result)| result)
            .collect()
    } // end of into_sorted_results
} // end of impl TopKSelector

//===========================================================================

/// scores every entry of the table against the query profile and returns the
/// min(top_k, table size) best entries sorted by decreasing similarity.
pub fn find_most_similar(
    query: &BigramProfile,
    table: &ProfileTable,
    top_k: usize,
) -> Vec<SimilarityResult> {
    let mut selector = TopKSelector::new(top_k);
    for rank in 0..table.len() {
        let similarity = jaccard_similarity(query, table.get_profile(rank));
        selector.insert(SimilarityResult::new(
            similarity,
            table.get_name(rank).clone(),
        ));
    }
    let results = selector.into_sorted_results();
    log::debug!(
        "find_most_similar, table size : {}, nb results : {}",
        table.len(),
        results.len()
    );
    results
} // end of find_most_similar

//===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn table_of(records: &[(&str, &[u8])]) -> ProfileTable {
        let mut table = ProfileTable::new();
        let mut names: Vec<String> = records.iter().map(|(n, _)| n.to_string()).collect();
        let profiles = records
            .iter()
            .map(|(_, s)| BigramProfile::from_sequence(s).unwrap())
            .collect();
        table.append_chunk(&mut names, profiles);
        table
    }

    #[test]
    fn selector_keeps_the_k_best() {
        let mut selector = TopKSelector::new(3);
        for (i, sim) in [0.1, 0.8, 0.3, 0.9, 0.2, 0.7].iter().enumerate() {
            selector.insert(SimilarityResult::new(*sim, format!("seq{}", i)));
        }
        let results = selector.into_sorted_results();
        let sims: Vec<f64> = results.iter().map(|r| r.get_similarity()).collect();
        assert_eq!(sims, vec![0.9, 0.8, 0.7]);
    }

    #[test]
    fn selector_returns_all_when_under_capacity() {
        let mut selector = TopKSelector::new(10);
        selector.insert(SimilarityResult::new(0.5, String::from("a")));
        selector.insert(SimilarityResult::new(0.6, String::from("b")));
        let results = selector.into_sorted_results();
        assert_eq!(results.len(), 2);
        assert!(results[0].get_similarity() >= results[1].get_similarity());
    }

    #[test]
    fn search_returns_min_of_k_and_table_size() {
        let table = table_of(&[("x", b"ABAB"), ("y", b"BCBC"), ("z", b"CDCD")]);
        let query = BigramProfile::from_sequence(b"ABAB").unwrap();
        assert_eq!(find_most_similar(&query, &table, 2).len(), 2);
        assert_eq!(find_most_similar(&query, &table, 10).len(), 3);
        // scores sorted non increasing, and every returned score >= every non returned one
        let top2 = find_most_similar(&query, &table, 2);
        let all = find_most_similar(&query, &table, 3);
        assert!(top2[0].get_similarity() >= top2[1].get_similarity());
        assert!(top2[1].get_similarity() >= all[2].get_similarity());
    }

    #[test]
    fn exact_matches_rank_first() {
        // table AA, AA, AB with query AA : both AA entries at 1., ahead of AB
        let table = table_of(&[("first", b"AA"), ("second", b"AA"), ("third", b"AB")]);
        let query = BigramProfile::from_sequence(b"AA").unwrap();
        let results = find_most_similar(&query, &table, 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].get_similarity(), 1.);
        assert_eq!(results[1].get_similarity(), 1.);
        for r in &results {
            assert_ne!(r.get_name(), "third");
        }
    }

    #[test]
    fn empty_table_gives_empty_results() {
        let table = ProfileTable::new();
        let query = BigramProfile::from_sequence(b"AA").unwrap();
        assert!(find_most_similar(&query, &table, 5).is_empty());
    }
} // end of mod tests
