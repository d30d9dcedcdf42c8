//! error kinds surfaced by profiling and ingestion.

use thiserror::Error;

/// Errors occurring while building profiles or reading a record source.
/// All computations are deterministic, so there is nothing to retry : a failed
/// input is reported to the caller, never silently skipped.
#[derive(Error, Debug)]
pub enum ProcessingError {
    /// a sequence contained a byte outside the A..=Z alphabet.
    /// The profiler refuses such a sequence instead of indexing out of the 26x26 table.
    #[error("invalid symbol 0x{symbol:02x} at position {position} in sequence")]
    InvalidAlphabet { symbol: u8, position: usize },

    /// the record source could not be parsed
    #[error("record source parse error : {0}")]
    Parse(#[from] needletail::errors::ParseError),

    /// the record source could not be read
    #[error("record source io error : {0}")]
    Io(#[from] std::io::Error),
}
