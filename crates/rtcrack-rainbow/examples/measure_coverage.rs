//! Empirical measurement of rainbow table coverage
//!
//! Generates a table with the given parameters, measures how many plaintexts
//! of the space its chains reach, and compares with the classic estimate
//! for a single rainbow table.
//!
//! Usage: cargo run --example measure_coverage -p rtcrack-rainbow --release -- <charset> <max_length> <chain_length> <n_chains>
//!
//! Example: cargo run --example measure_coverage -p rtcrack-rainbow --release -- loweralpha 4 500 2000

use rtcrack_rainbow::app::coverage::{build_plaintext_bitmap, missing_plaintexts, report_from_bitmap};
use rtcrack_rainbow::{Algorithm, GenerationRequest};
use std::env;
use std::time::Instant;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 5 {
        eprintln!("Usage: {} <charset> <max_length> <chain_length> <n_chains>", args[0]);
        eprintln!();
        eprintln!("Example: {} loweralpha 4 500 2000", args[0]);
        std::process::exit(1);
    }

    let charset_name = &args[1];
    let max_length: usize = args[2].parse().expect("Invalid max_length");
    let chain_length: u32 = args[3].parse().expect("Invalid chain_length");
    let n_chains: usize = args[4].parse().expect("Invalid n_chains");

    let request = GenerationRequest::new(Algorithm::Md5, charset_name.as_str())
        .with_lengths(1, max_length)
        .with_chain_length(chain_length)
        .with_chains(n_chains)
        .with_seed(1);
    let config = request.config().expect("Invalid parameters");
    let space = config.charset().space_size() as f64;

    println!("==========================================================================");
    println!("Empirical Coverage Measurement");
    println!("==========================================================================");
    println!();
    println!("Parameters:");
    println!("  Charset: {}", config.charset());
    println!("  Plaintext space (N): {}", space);
    println!("  Chain length (t): {}", chain_length);
    println!("  Chains (m): {}", n_chains);
    println!();

    // Theoretical prediction (single table)
    let mt_n = (n_chains as f64) * (chain_length as f64) / space;
    let eta = 1.0 / (1.0 + 0.7 * mt_n);
    let coverage_pred = 1.0 - (-mt_n * eta).exp();
    println!("Theoretical prediction:");
    println!("  Coverage: {:.4}%", coverage_pred * 100.0);
    println!();

    let start = Instant::now();
    let table = request.execute().expect("Failed to generate table");
    println!("Generated in {:.2}s", start.elapsed().as_secs_f64());

    let start = Instant::now();
    let bitmap = build_plaintext_bitmap(&table).expect("Coverage space too large");
    let report = report_from_bitmap(&bitmap);
    println!("Bitmap built in {:.2}s", start.elapsed().as_secs_f64());
    println!();

    let stats = table.stats();
    println!("Measured:");
    println!("  Reachable: {}", report.reachable_count);
    println!("  Missing: {}", report.missing_count);
    println!("  Coverage: {:.4}%", report.coverage * 100.0);
    println!("  Merged chains: {} ({:.2}%)", stats.merged_chains, stats.merge_rate * 100.0);
    println!();

    let sample = missing_plaintexts(&bitmap, table.charset(), 10);
    if !sample.is_empty() {
        println!("First unreachable plaintexts:");
        for plaintext in sample {
            println!("  {}", plaintext);
        }
    }
}
