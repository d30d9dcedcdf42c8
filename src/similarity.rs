//! similarity between two bigram profiles
//!
//! The metric is a jaccard similarity on the multiset of bigrams :
//! intersection over union by count. Two identical non empty sequences get 1.,
//! sequences sharing no bigram get 0.

use std::cmp::Ordering;

use crate::profile::{BigramProfile, NB_BIGRAMS};

/// jaccard-by-count similarity of two profiles :
/// sum over the 676 slots of min(x\[i\], y\[i\]) divided by
/// (x.total + y.total - sum of min).
/// When both totals are 0 the ratio is undefined, we return 0. so that empty
/// profiles never rank above a real match.
pub fn jaccard_similarity(x: &BigramProfile, y: &BigramProfile) -> f64 {
    let x_counts = x.get_counts();
    let y_counts = y.get_counts();
    let mut sum_min: u64 = 0;
    for i in 0..NB_BIGRAMS {
        sum_min += x_counts[i].min(y_counts[i]) as u64;
    }
    let sum_max = x.get_total() + y.get_total() - sum_min;
    if sum_max == 0 {
        return 0.;
    }
    sum_min as f64 / sum_max as f64
} // end of jaccard_similarity

//===========================================================================

/// The similarity of one database entry to the query, with the name of the entry.
/// Results are ordered by similarity (total order via [f64::total_cmp]) so they
/// can live in a heap, see [crate::topk::TopKSelector].
#[derive(Debug, Clone)]
pub struct SimilarityResult {
    similarity: f64,
    name: String,
} // end of SimilarityResult

impl SimilarityResult {
    pub fn new(similarity: f64, name: String) -> Self {
        SimilarityResult { similarity, name }
    }

    /// returns the similarity to the query, in [0., 1.]
    pub fn get_similarity(&self) -> f64 {
        self.similarity
    }

    /// returns the name of the database entry
    pub fn get_name(&self) -> &String {
        &self.name
    }
} // end of impl SimilarityResult

impl PartialEq for SimilarityResult {
    fn eq(&self, other: &Self) -> bool {
        self.similarity.total_cmp(&other.similarity) == Ordering::Equal
    }
}

impl Eq for SimilarityResult {}

impl PartialOrd for SimilarityResult {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimilarityResult {
    fn cmp(&self, other: &Self) -> Ordering {
        self.similarity.total_cmp(&other.similarity)
    }
}

//===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(seq: &[u8]) -> BigramProfile {
        BigramProfile::from_sequence(seq).unwrap()
    }

    #[test]
    fn self_similarity_is_one() {
        for seq in [&b"AA"[..], b"ABCDEFGH", b"MALWMRLLPLLALLALW"] {
            let p = profile(seq);
            assert_eq!(jaccard_similarity(&p, &p), 1.);
        }
    }

    #[test]
    fn similarity_is_symmetric_and_bounded() {
        let seqs: [&[u8]; 4] = [b"ABAB", b"BABA", b"QWERTY", b"AAAAAAA"];
        for x in &seqs {
            for y in &seqs {
                let s_xy = jaccard_similarity(&profile(x), &profile(y));
                let s_yx = jaccard_similarity(&profile(y), &profile(x));
                assert_eq!(s_xy, s_yx);
                assert!((0. ..=1.).contains(&s_xy));
            }
        }
    }

    #[test]
    fn disjoint_bigrams_give_zero() {
        let s = jaccard_similarity(&profile(b"AAAA"), &profile(b"BBBB"));
        assert_eq!(s, 0.);
    }

    #[test]
    fn degenerate_profiles_give_zero() {
        // both totals 0, the explicit policy is 0., not a division fault
        let empty = profile(b"");
        assert_eq!(jaccard_similarity(&empty, &empty), 0.);
        let single = profile(b"A");
        assert_eq!(jaccard_similarity(&empty, &single), 0.);
    }

    #[test]
    fn result_ordering_follows_similarity() {
        let low = SimilarityResult::new(0.2, String::from("low"));
        let high = SimilarityResult::new(0.9, String::from("high"));
        assert!(low < high);
        assert_eq!(low, SimilarityResult::new(0.2, String::from("other name")));
    }
} // end of mod tests
