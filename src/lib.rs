//! protsearch library
//!
//! Builds bigram frequency profiles of protein sequences read from fasta files
//! and searches the k most similar proteins to a query sequence under a
//! jaccard-by-count metric on bigram multisets.
//!
//! Profiles of a whole file are built chunk by chunk, each chunk profiled in
//! parallel with a bounded number of worker threads, see [batch] and [ingest].

pub mod answer;
pub mod batch;
pub mod error;
pub mod ingest;
pub mod profile;
pub mod similarity;
pub mod topk;
pub mod utils;
