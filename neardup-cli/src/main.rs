use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

use neardup::NearDupSearcher;
use simhash::TokenRule;

#[derive(Parser, Debug)]
#[clap(
    name = "neardup",
    about = "A program to find near-duplicate documents in the Hamming space."
)]
struct Args {
    /// File path to a document file to be searched, one document per line.
    #[clap(short = 'i', long)]
    document_path: PathBuf,

    /// Tolerance: the maximum Hamming distance considered a near duplicate
    /// (must be less than the fingerprint width).
    #[clap(short = 'k', long, default_value = "2")]
    tolerance: u32,

    /// Fingerprint width in bits, in the range of [1,128].
    #[clap(short = 'f', long, default_value = "64")]
    num_bits: u32,

    /// Window size for shingling in feature extraction (must be more than 0).
    #[clap(short = 'w', long, default_value = "4")]
    window_size: usize,

    /// Regex pattern selecting token substrings of lower-cased lines.
    /// If None, word characters and CJK ideographs are used.
    #[clap(short = 't', long)]
    token_pattern: Option<String>,

    /// Seed value for random values.
    #[clap(short = 's', long)]
    seed: Option<u64>,

    /// Disables parallel construction.
    #[clap(short = 'p', long)]
    disable_parallel: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let document_path = args.document_path;
    let tolerance = args.tolerance;
    let num_bits = args.num_bits;
    let window_size = args.window_size;
    let token_pattern = args.token_pattern;
    let seed = args.seed;
    let disable_parallel = args.disable_parallel;

    let mut searcher = NearDupSearcher::new(num_bits, tolerance, seed)?
        .window_size(window_size)?
        .shows_progress(true)
        .big_bucket_hook(|key, len| {
            eprintln!(
                "Big bucket found. partition={}, len={len}",
                key.partition
            );
        });
    if let Some(pattern) = token_pattern {
        searcher = searcher.token_rule(TokenRule::new(&pattern)?);
    }

    let texts: Vec<String> = texts_iter(File::open(&document_path)?).collect();
    eprintln!("Indexing {} documents...", texts.len());
    let start = Instant::now();
    searcher = if disable_parallel {
        searcher.index_documents(&texts)
    } else {
        searcher.index_documents_in_parallel(&texts)
    };
    eprintln!(
        "Produced {} fingerprints in {} sec, populating {} buckets",
        searcher.len(),
        start.elapsed().as_secs_f64(),
        searcher.index().bucket_count()
    );

    eprintln!("Finding all near-duplicate pairs...");
    let start = Instant::now();
    let mut results = vec![];
    for (i, text) in texts.iter().enumerate() {
        for obj_id in searcher.search_near_dups(text) {
            let j: usize = obj_id.parse()?;
            if i < j {
                results.push((i, j));
            }
        }
    }
    results.sort_unstable();
    eprintln!("Done in {} sec", start.elapsed().as_secs_f64());

    println!("i,j,dist");
    for (i, j) in results {
        let dist = searcher
            .fingerprint(&texts[i])
            .distance(&searcher.fingerprint(&texts[j]));
        println!("{i},{j},{dist}");
    }

    Ok(())
}

fn texts_iter<R>(rdr: R) -> impl Iterator<Item = String>
where
    R: Read,
{
    BufReader::new(rdr).lines().map(|line| line.unwrap())
}
