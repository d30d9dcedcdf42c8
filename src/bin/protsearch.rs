//! protsearch --file [-f] file --query [-q] sequence --nbanswers [-n] nb
//!
//! - --file : fasta file containing the protein database to search in
//! - --query : the protein sequence to compare, given inline on the command line
//! - --queryfile : alternative to --query, a fasta file whose first record is the query
//! - --nbanswers [-n] : number of most similar proteins to return, default 100
//! - --chunk : number of records profiled per batch, default 10000
//! - --nbthreads [-j] : number of concurrent profiling operations per batch, defaults to the number of cores
//! - --out [-o] : file receiving the ranked answer, default output.txt, also echoed on stdout

// the database file is read record by record, profiled chunk by chunk with a
// bounded worker pool, then the query profile is scored against every record
// and the k best are kept in a bounded heap.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use clap::{Arg, ArgAction, Command};
use cpu_time::ProcessTime;

// for logging (debug mostly, switched at compile time in cargo.toml)
use env_logger::Builder;

// our crate
use protsearch::answer::SearchAnswer;
use protsearch::ingest::{process_fasta_file, FastaRecordSource};
use protsearch::profile::BigramProfile;
use protsearch::topk::find_most_similar;
use protsearch::utils::parameters::ProcessingParams;

// install a logger facility
pub fn init_log() -> u64 {
    Builder::from_default_env().init();
    println!("\n ************** initializing logger *****************\n");
    return 1;
}

/// reads the query sequence : either given inline or the first record of a fasta file
fn get_query(matches: &clap::ArgMatches) -> anyhow::Result<(String, Vec<u8>)> {
    if let Some(query) = matches.get_one::<String>("query") {
        println!("query sequence given inline, length {}", query.len());
        return Ok((String::from("query"), query.as_bytes().to_vec()));
    }
    if let Some(queryfile) = matches.get_one::<String>("queryfile") {
        println!("reading query from file {}", queryfile);
        let mut source = FastaRecordSource::open(Path::new(queryfile))?;
        match source.next() {
            Some(record) => {
                let (name, sequence) = record?.into_parts();
                return Ok((name, sequence));
            }
            None => {
                anyhow::bail!("query file {} contains no record", queryfile);
            }
        }
    }
    anyhow::bail!("one of --query or --queryfile is mandatory");
} // end of get_query

fn run(
    datafile: &Path,
    query_id: String,
    query_sequence: &[u8],
    params: &ProcessingParams,
    outpath: &Path,
) -> anyhow::Result<()> {
    //
    let start_t = SystemTime::now();
    let cpu_start = ProcessTime::now();
    //
    let table = process_fasta_file(datafile, params)?;
    println!("successfully read {} proteins", table.len());
    //
    let query_profile = BigramProfile::from_sequence(query_sequence)?;
    let neighbours = find_most_similar(&query_profile, &table, params.get_top_k());
    //
    let answer = SearchAnswer::new(table.len(), query_id, &neighbours);
    let outfile = File::create(outpath)?;
    let mut out = BufWriter::new(outfile);
    answer.dump(&mut out)?;
    out.flush()?;
    let mut stdout = std::io::stdout();
    answer.dump(&mut stdout)?;
    println!("results written to file {:?}", outpath);
    // dump processing parameters alongside the answer so the run can be replayed
    let paramdir = outpath.parent().unwrap_or(Path::new("."));
    if let Err(msg) = params.dump_json(paramdir) {
        log::error!("could not dump parameters : {}", msg);
    }
    //
    let cpu_time = cpu_start.elapsed().as_secs();
    let elapsed_t = start_t.elapsed().unwrap().as_secs() as f32;
    log::info!("search : cpu time(s) {}", cpu_time);
    log::info!("search : elapsed time(s) {}", elapsed_t);
    //
    Ok(())
} // end of run

fn main() {
    let _ = init_log();
    //
    let matches = Command::new("protsearch")
        .version("0.1.0")
        .about("top-k most similar proteins under a bigram jaccard-by-count metric")
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .required(true)
                .value_name("FILE")
                .help("fasta file containing the protein database")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("query")
                .short('q')
                .long("query")
                .value_name("SEQUENCE")
                .help("protein sequence to compare, inline")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("queryfile")
                .long("queryfile")
                .value_name("FILE")
                .help("fasta file whose first record is the query")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("nbanswers")
                .short('n')
                .long("nbanswers")
                .value_name("NB")
                .help("number of most similar proteins asked for, default 100")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("chunk")
                .long("chunk")
                .value_name("SIZE")
                .help("number of records profiled per batch, default 10000")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("nbthreads")
                .short('j')
                .long("nbthreads")
                .value_name("NB")
                .help("number of concurrent profiling operations, defaults to nb cores")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("out")
                .short('o')
                .long("out")
                .value_name("FILE")
                .help("output file for the ranked answer, default output.txt")
                .action(ArgAction::Set),
        )
        .get_matches();

    // decode matches, check for the database file
    let datafile = matches.get_one::<String>("file").unwrap();
    let datapath = PathBuf::from(datafile);
    if !datapath.is_file() {
        println!("error, not a file : {:?}", datafile);
        std::process::exit(1);
    }
    //
    let defaults = ProcessingParams::default();
    let mut top_k = defaults.get_top_k();
    if let Some(nb) = matches.get_one::<String>("nbanswers") {
        top_k = nb.parse::<usize>().unwrap_or_else(|_| {
            println!("parsing of nbanswers failed : {}", nb);
            std::process::exit(1);
        });
        println!("nb answers asked for : {}", top_k);
    } else {
        println!("using default nb answers : {}", top_k);
    }
    //
    let mut chunk_size = defaults.get_chunk_size();
    if let Some(size) = matches.get_one::<String>("chunk") {
        chunk_size = size.parse::<usize>().unwrap_or_else(|_| {
            println!("parsing of chunk failed : {}", size);
            std::process::exit(1);
        });
        println!("chunk size : {}", chunk_size);
    } else {
        println!("using default chunk size : {}", chunk_size);
    }
    //
    let max_concurrency;
    if let Some(nb) = matches.get_one::<String>("nbthreads") {
        max_concurrency = nb.parse::<usize>().unwrap_or_else(|_| {
            println!("parsing of nbthreads failed : {}", nb);
            std::process::exit(1);
        });
        println!("nb threads : {}", max_concurrency);
    } else {
        max_concurrency = num_cpus::get();
        println!("using nb cores as nb threads : {}", max_concurrency);
    }
    if top_k == 0 || chunk_size == 0 || max_concurrency == 0 {
        println!("nbanswers, chunk and nbthreads must all be >= 1");
        std::process::exit(1);
    }
    let params = ProcessingParams::new(chunk_size, max_concurrency, top_k);
    //
    let outpath = match matches.get_one::<String>("out") {
        Some(out) => PathBuf::from(out),
        None => PathBuf::from("output.txt"),
    };
    //
    let (query_id, query_sequence) = match get_query(&matches) {
        Ok(query) => query,
        Err(e) => {
            println!("could not get query : {}", e);
            std::process::exit(1);
        }
    };
    //
    if let Err(e) = run(&datapath, query_id, &query_sequence, &params, &outpath) {
        log::error!("search failed : {}", e);
        println!("search failed : {}", e);
        std::process::exit(1);
    }
} // end of main
