//! full pipeline test : fasta file -> chunked ingestion -> query -> ranked answer

use std::io::Write;
use std::path::PathBuf;

use protsearch::answer::SearchAnswer;
use protsearch::ingest::{process_fasta_file, FastaRecordSource};
use protsearch::profile::BigramProfile;
use protsearch::topk::find_most_similar;
use protsearch::utils::parameters::ProcessingParams;

fn write_temp_fasta(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn fasta_source_concatenates_record_lines() {
    // the sequence of a record is the concatenation of all lines up to the next marker
    let path = write_temp_fasta(
        "protsearch_source_test.fasta",
        ">sp|P01308|INS_HUMAN\nMALWMRLLPL\nLALLALWGPD\n>short\nAA\n",
    );
    let records: Vec<_> = FastaRecordSource::open(&path)
        .unwrap()
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get_sequence(), b"MALWMRLLPLLALLALWGPD");
    assert!(records[0].get_name().starts_with("sp|P01308|INS_HUMAN"));
    assert_eq!(records[1].get_sequence(), b"AA");
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn search_pipeline_ranks_the_identical_record_first() {
    let path = write_temp_fasta(
        "protsearch_pipeline_test.fasta",
        ">insulin\nMALWMRLLPLLALLALWGPDPAAAFVNQHLCGSHLVEALYLVCGERGFFYTPKT\n\
         >decoy1\nKKKKKKKKKKKKKKKKKKKK\n\
         >decoy2\nGGGGGGGGGGGGGGGGGGGG\n\
         >halfmatch\nMALWMRLLPLLALLALWGPDQQQQQQQQQQQQQQQQQQQQQQQQQQQQQQQQQQ\n",
    );
    // small chunk size so several batch builds happen
    let params = ProcessingParams::new(2, 3, 3);
    let table = process_fasta_file(&path, &params).unwrap();
    assert_eq!(table.len(), 4);
    //
    let query = BigramProfile::from_sequence(
        b"MALWMRLLPLLALLALWGPDPAAAFVNQHLCGSHLVEALYLVCGERGFFYTPKT",
    )
    .unwrap();
    let neighbours = find_most_similar(&query, &table, params.get_top_k());
    assert_eq!(neighbours.len(), 3);
    assert_eq!(neighbours[0].get_name(), "insulin");
    assert_eq!(neighbours[0].get_similarity(), 1.);
    for window in neighbours.windows(2) {
        assert!(window[0].get_similarity() >= window[1].get_similarity());
    }
    //
    let answer = SearchAnswer::new(table.len(), String::from("insulin_query"), &neighbours);
    let mut out: Vec<u8> = Vec::new();
    answer.dump(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("successfully read 4 proteins"));
    assert!(text.contains("1. insulin (similarity : 1.0000)"));
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn empty_fasta_file_gives_empty_table() {
    let path = write_temp_fasta("protsearch_empty_test.fasta", "");
    let params = ProcessingParams::default();
    let table = process_fasta_file(&path, &params).unwrap();
    assert!(table.is_empty());
    let query = BigramProfile::from_sequence(b"AA").unwrap();
    assert!(find_most_similar(&query, &table, 100).is_empty());
    std::fs::remove_file(&path).unwrap();
}
