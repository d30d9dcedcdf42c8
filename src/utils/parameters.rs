//! structures related to processing parameters

use std::fs::OpenOptions;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::to_writer;

/// Gathers the parameters driving ingestion and query.
/// To be dumped alongside results so a run can be reproduced.
#[derive(Copy, Clone, Serialize, Deserialize)]
pub struct ProcessingParams {
    /// nb records accumulated before a parallel batch build
    chunk_size: usize,
    /// nb profiling operations running at once inside a chunk
    max_concurrency: usize,
    /// result set size of a query
    top_k: usize,
} // end of ProcessingParams

impl Default for ProcessingParams {
    fn default() -> Self {
        ProcessingParams {
            chunk_size: 10_000,
            max_concurrency: 6,
            top_k: 100,
        }
    }
} // end of default for ProcessingParams

impl ProcessingParams {
    /// all three parameters must be >= 1
    pub fn new(chunk_size: usize, max_concurrency: usize, top_k: usize) -> Self {
        assert!(chunk_size >= 1, "chunk_size must be >= 1");
        assert!(max_concurrency >= 1, "max_concurrency must be >= 1");
        assert!(top_k >= 1, "top_k must be >= 1");
        ProcessingParams {
            chunk_size,
            max_concurrency,
            top_k,
        }
    } // end of new

    /// returns nb records per batch
    pub fn get_chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// returns nb concurrent profiling operations per chunk
    pub fn get_max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// returns the result set size
    pub fn get_top_k(&self) -> usize {
        self.top_k
    }

    pub fn dump_json(&self, dirpath: &Path) -> Result<(), String> {
        //
        let filepath = dirpath.join("parameters.json");
        //
        log::info!("dumping ProcessingParams in json file : {:?}", filepath);
        //
        let fileres = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&filepath);
        if fileres.is_err() {
            log::error!(
                "ProcessingParams dump : dump could not open file {:?}",
                filepath.as_os_str()
            );
            println!(
                "ProcessingParams dump: could not open file {:?}",
                filepath.as_os_str()
            );
            return Err("ProcessingParams dump failed".to_string());
        }
        //
        let mut writer = BufWriter::new(fileres.unwrap());
        let _ = to_writer(&mut writer, &self).unwrap();
        //
        Ok(())
    } // end of dump_json

    /// reload from a json dump, to rerun a query with the parameters of a previous run
    pub fn reload_json(dirpath: &Path) -> Result<Self, String> {
        log::info!("in reload_json");
        //
        let filepath = dirpath.join("parameters.json");
        let fileres = OpenOptions::new().read(true).open(&filepath);
        if fileres.is_err() {
            log::error!(
                "ProcessingParams reload_json : reload could not open file {:?}",
                filepath.as_os_str()
            );
            println!(
                "ProcessingParams reload_json: could not open file {:?}",
                filepath.as_os_str()
            );
            return Err("ProcessingParams reload_json could not open file".to_string());
        }
        //
        let loadfile = fileres.unwrap();
        let reader = BufReader::new(loadfile);
        let params: Self = serde_json::from_reader(reader).unwrap();
        //
        log::info!(
            "ProcessingParams reload, chunk_size : {}, max_concurrency : {}, top_k : {}",
            params.chunk_size,
            params.max_concurrency,
            params.top_k
        );
        //
        Ok(params)
    } // end of reload_json
} // end of impl ProcessingParams

//===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_and_reload() {
        let params = ProcessingParams::new(500, 4, 20);
        let dir = std::env::temp_dir().join("protsearch_params_test");
        std::fs::create_dir_all(&dir).unwrap();
        params.dump_json(&dir).unwrap();
        let reloaded = ProcessingParams::reload_json(&dir).unwrap();
        assert_eq!(reloaded.get_chunk_size(), 500);
        assert_eq!(reloaded.get_max_concurrency(), 4);
        assert_eq!(reloaded.get_top_k(), 20);
    }

    #[test]
    fn defaults_match_original_run() {
        let params = ProcessingParams::default();
        assert_eq!(params.get_chunk_size(), 10_000);
        assert_eq!(params.get_max_concurrency(), 6);
        assert_eq!(params.get_top_k(), 100);
    }
} // end of mod tests
