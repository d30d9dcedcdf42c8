//! bigram profile of a protein sequence
//!
//! A sequence over the 26 letter uppercase alphabet is reduced to the counts of
//! its 676 possible ordered letter pairs, stored in a fixed size array so that
//! comparing two profiles is a O(676) scan with good cache locality.

use crate::error::ProcessingError;

/// size of the uppercase alphabet
pub const NB_LETTERS: usize = 26;

/// number of ordered letter pairs
pub const NB_BIGRAMS: usize = NB_LETTERS * NB_LETTERS;

#[inline]
fn bigram_index(c1: u8, c2: u8) -> usize {
    (c1 - b'A') as usize * NB_LETTERS + (c2 - b'A') as usize
}

/// The bigram frequency profile of one sequence.
/// Invariant : total == sum of all counts == max(0, sequence length - 1) when
/// built from a single valid sequence. A profile is immutable once constructed.
#[derive(Clone)]
pub struct BigramProfile {
    /// counts of each ordered letter pair, indexed by (c1 - 'A') * 26 + (c2 - 'A')
    counts: [u32; NB_BIGRAMS],
    /// sum of all pair counts
    total: u64,
} // end of BigramProfile

impl BigramProfile {
    /// builds the profile of a sequence by sliding a window of 2 adjacent letters.
    /// A sequence of less than 2 letters gives the all zero profile.
    /// Any byte outside A..=Z (lowercase included) is refused with [ProcessingError::InvalidAlphabet].
    /// This is a pure function, safe to call concurrently on distinct sequences.
    pub fn from_sequence(sequence: &[u8]) -> Result<Self, ProcessingError> {
        let mut counts = [0u32; NB_BIGRAMS];
        let mut total: u64 = 0;
        // we must check the whole sequence, a last invalid byte must be refused
        // even though it opens no window
        for (position, symbol) in sequence.iter().enumerate() {
            if !symbol.is_ascii_uppercase() {
                return Err(ProcessingError::InvalidAlphabet {
                    symbol: *symbol,
                    position,
                });
            }
        }
        for window in sequence.windows(2) {
            counts[bigram_index(window[0], window[1])] += 1;
            total += 1;
        }
        Ok(BigramProfile { counts, total })
    } // end of from_sequence

    /// returns the count of every ordered letter pair
    pub fn get_counts(&self) -> &[u32; NB_BIGRAMS] {
        &self.counts
    }

    /// returns the sum of all pair counts
    pub fn get_total(&self) -> u64 {
        self.total
    }
} // end of impl BigramProfile

//===========================================================================

// end of mod tests
