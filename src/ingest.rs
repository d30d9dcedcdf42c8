//! chunked ingestion of a record source into a profile table
//!
//! Records are accumulated into chunks of chunk_size sequences, each chunk is
//! profiled in parallel by [crate::batch::build_profiles_parallel] and the
//! resulting profiles are appended to the growing table at the global running
//! offset. Chunks are strictly sequential : no work of chunk n+1 starts before
//! the batch build of chunk n has returned, so memory stays bounded by the
//! chunk size and the final table is globally ordered.

use std::path::Path;
use std::time::SystemTime;

use cpu_time::ProcessTime;
use needletail::{parse_fastx_file, FastxReader};

use crate::batch::build_profiles_parallel;
use crate::error::ProcessingError;
use crate::profile::BigramProfile;
use crate::utils::parameters::ProcessingParams;

/// a (name, sequence) couple as read from the record source.
/// The raw sequence is consumed to build a profile and then dropped, only the
/// name is retained alongside the profile.
pub struct Record {
    name: String,
    sequence: Vec<u8>,
} // end of Record

impl Record {
    pub fn new(name: String, sequence: Vec<u8>) -> Self {
        Record { name, sequence }
    }

    pub fn get_name(&self) -> &String {
        &self.name
    }

    pub fn get_sequence(&self) -> &[u8] {
        &self.sequence
    }

    pub fn into_parts(self) -> (String, Vec<u8>) {
        (self.name, self.sequence)
    }
} // end of impl Record

//===========================================================================

/// the accumulated (name, profile) couples, parallel indexed : the i-th name
/// corresponds to the i-th profile. Grows chunk by chunk during ingestion and
/// is never mutated afterwards.
pub struct ProfileTable {
    names: Vec<String>,
    profiles: Vec<BigramProfile>,
} // end of ProfileTable

impl ProfileTable {
    pub fn new() -> Self {
        ProfileTable {
            names: Vec::new(),
            profiles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ProfileTable {
            names: Vec::with_capacity(capacity),
            profiles: Vec::with_capacity(capacity),
        }
    }

    /// number of records stored
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get_name(&self, rank: usize) -> &String {
        &self.names[rank]
    }

    pub fn get_profile(&self, rank: usize) -> &BigramProfile {
        &self.profiles[rank]
    }

    /// appends the names and profiles of one chunk at the current running offset.
    /// Both vectors must be parallel, the chunk local slot i becomes the global
    /// slot (previous len + i).
    pub fn append_chunk(&mut self, names: &mut Vec<String>, profiles: Vec<BigramProfile>) {
        assert_eq!(names.len(), profiles.len());
        self.names.append(names);
        self.profiles.extend(profiles);
    } // end of append_chunk
} // end of impl ProfileTable

impl Default for ProfileTable {
    fn default() -> Self {
        ProfileTable::new()
    }
}

//===========================================================================

/// the fasta record source, parsed with needletail as everywhere else.
/// A record begins at each '>' marker line, its sequence is the concatenation
/// of the following non marker lines, so the number of records yielded equals
/// the number of markers in the file. An empty file yields no record at all
/// instead of a parse error.
pub struct FastaRecordSource {
    reader: Option<Box<dyn FastxReader>>,
} // end of FastaRecordSource

impl FastaRecordSource {
    pub fn open(path: &Path) -> Result<Self, ProcessingError> {
        let metadata = std::fs::metadata(path)?;
        if metadata.len() == 0 {
            log::warn!("empty record source : {:?}", path);
            return Ok(FastaRecordSource { reader: None });
        }
        let reader = parse_fastx_file(path)?;
        Ok(FastaRecordSource {
            reader: Some(reader),
        })
    } // end of open
} // end of impl FastaRecordSource

impl Iterator for FastaRecordSource {
    type Item = Result<Record, ProcessingError>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;
        match reader.next() {
            None => None,
            Some(Err(e)) => Some(Err(ProcessingError::from(e))),
            Some(Ok(seqrec)) => {
                let name = String::from_utf8_lossy(seqrec.id()).into_owned();
                let sequence = seqrec.seq().into_owned();
                Some(Ok(Record::new(name, sequence)))
            }
        }
    } // end of next
} // end of impl Iterator

//===========================================================================

/// consumes a record source chunk by chunk and returns the full profile table.
///
/// Every chunk_size records the accumulated sequences go through the parallel
/// batch builder, the final partial chunk goes through the same path so no
/// record is dropped. On a source or profiling error ingestion aborts and the
/// partial table is discarded : the caller gets the error, never a silently
/// truncated table.
pub fn process_records_in_chunks<I>(
    records: I,
    params: &ProcessingParams,
) -> Result<ProfileTable, ProcessingError>
where
    I: IntoIterator<Item = Result<Record, ProcessingError>>,
{
    let chunk_size = params.get_chunk_size();
    let max_concurrency = params.get_max_concurrency();
    //
    let mut table = ProfileTable::with_capacity(chunk_size);
    let mut chunk_names: Vec<String> = Vec::with_capacity(chunk_size);
    let mut chunk_sequences: Vec<Vec<u8>> = Vec::with_capacity(chunk_size);
    let mut nb_chunks = 0;
    //
    for record in records {
        let (name, sequence) = record?.into_parts();
        chunk_names.push(name);
        chunk_sequences.push(sequence);
        if chunk_sequences.len() >= chunk_size {
            let profiles = build_profiles_parallel(&chunk_sequences, max_concurrency)?;
            table.append_chunk(&mut chunk_names, profiles);
            chunk_sequences.clear();
            nb_chunks += 1;
            log::info!(
                "chunk {} processed, nb records so far : {}",
                nb_chunks,
                table.len()
            );
        }
    }
    // the last partial chunk, if any
    if !chunk_sequences.is_empty() {
        let profiles = build_profiles_parallel(&chunk_sequences, max_concurrency)?;
        table.append_chunk(&mut chunk_names, profiles);
        nb_chunks += 1;
    }
    log::debug!(
        "process_records_in_chunks, nb chunks : {}, nb records : {}",
        nb_chunks,
        table.len()
    );
    Ok(table)
} // end of process_records_in_chunks

/// opens a fasta file and runs the chunked ingestion on it, logging timing
pub fn process_fasta_file(
    path: &Path,
    params: &ProcessingParams,
) -> Result<ProfileTable, ProcessingError> {
    log::info!("process_fasta_file, processing file : {:?}", path);
    let start_t = SystemTime::now();
    let cpu_start = ProcessTime::now();
    //
    let source = FastaRecordSource::open(path)?;
    let table = process_records_in_chunks(source, params)?;
    //
    let cpu_time = cpu_start.elapsed().as_secs();
    let elapsed_t = start_t.elapsed().unwrap().as_secs() as f32;
    log::info!(
        "process_fasta_file, nb records : {}, cpu time(s) : {}, elapsed time(s) : {}",
        table.len(),
        cpu_time,
        elapsed_t
    );
    Ok(table)
} // end of process_fasta_file

//===========================================================================

// end of mod tests
