//! contains answer to a query
//!
//! The search core produces an ordered list of [SimilarityResult], this module
//! only formats it for whatever sink the caller provides.

use std::io::Write;

use crate::similarity::SimilarityResult;

/// An answer has the number of records ingested in the table, the id of the
/// query and the ordered list of most similar entries.
pub struct SearchAnswer<'a> {
    /// nb records in the profile table the query ran against
    nb_records: usize,
    /// query id
    query_id: String,
    ///
    neighbours: &'a [SimilarityResult],
} // end of SearchAnswer

impl<'a> SearchAnswer<'a> {
    pub fn new(nb_records: usize, query_id: String, neighbours: &'a [SimilarityResult]) -> Self {
        SearchAnswer {
            nb_records,
            query_id,
            neighbours,
        }
    }

    pub fn get_neighbours(&self) -> &[SimilarityResult] {
        self.neighbours
    }

    /// dump the answer : the ingested count, then one line per neighbour with
    /// its rank, name and similarity in decreasing order
    pub fn dump(&self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "successfully read {} proteins", self.nb_records)?;
        writeln!(
            out,
            "top {} neighbours of query {} :",
            self.neighbours.len(),
            self.query_id
        )?;
        for (rank, neighbour) in self.neighbours.iter().enumerate() {
            writeln!(
                out,
                "{}. {} (similarity : {:.4})",
                rank + 1,
                neighbour.get_name(),
                neighbour.get_similarity()
            )?;
        }
        Ok(())
    } // end of dump
} // end of impl SearchAnswer

//===========================================================================

// end of mod tests
