//! contains processing parameters shared by ingestion and query

pub mod parameters;

pub use parameters::*;
