//! Time-memory trade-off experiment
//!
//! Generates SHA1 / alphanumeric / length 1-6 / chain length 200 tables for a
//! list of chain counts and reports, for each table: generation time, file
//! size, the average time to crack the digest of "ab1", and the success rate
//! over random plaintexts.
//!
//! Usage: cargo run --example tradeoff_analysis -p rtcrack-rainbow --release -- [n_chains...]
//!
//! Example: cargo run --example tradeoff_analysis -p rtcrack-rainbow --release -- 1000 5000

use rand::SeedableRng;
use rand::rngs::StdRng;
use rtcrack_rainbow::infra::table_io::save_table;
use rtcrack_rainbow::{Algorithm, Cracker, GenerationRequest, RainbowError};
use std::env;
use std::time::{Duration, Instant};
use tempfile::TempDir;

const N_CHAINS_LIST: [usize; 5] = [1000, 5000, 10000, 20000, 40000];
const CHAIN_LENGTH: u32 = 200;
const TARGET_PASSWORD: &str = "ab1";
const CRACK_REPEATS: u32 = 5;
const RANDOM_TARGETS: usize = 200;
const SEED: u64 = 2024;

struct ExperimentRow {
    chains: usize,
    file_size_kb: f64,
    generation: Duration,
    crack: Duration,
    target_found: bool,
    success_rate: f64,
    merge_rate: f64,
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let chain_counts: Vec<usize> = if args.is_empty() {
        N_CHAINS_LIST.to_vec()
    } else {
        match args.iter().map(|a| a.parse()).collect::<Result<Vec<_>, _>>() {
            Ok(counts) => counts,
            Err(e) => {
                eprintln!("Invalid chain count: {}", e);
                std::process::exit(1);
            }
        }
    };

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let target = Algorithm::Sha1.hash(TARGET_PASSWORD.as_bytes());

    println!("Starting experiment...");
    println!("Target digest: {} (for password '{}')", target, TARGET_PASSWORD);
    println!();

    let mut rows = Vec::with_capacity(chain_counts.len());
    for n_chains in chain_counts {
        println!("--- Testing with n_chains = {} ---", n_chains);

        let request = GenerationRequest::new(Algorithm::Sha1, "alphanumeric")
            .with_lengths(1, 6)
            .with_chain_length(CHAIN_LENGTH)
            .with_chains(n_chains)
            .with_seed(SEED);

        // 1. Generation time
        let start = Instant::now();
        let table = request.execute().expect("Failed to generate table");
        let generation = start.elapsed();
        println!("Generation took: {:.2} s", generation.as_secs_f64());

        // 2. File size
        let path = temp_dir.path().join(format!("table_{}.rt", n_chains));
        save_table(&path, &table).expect("Failed to save table");
        let file_size_kb = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0) as f64 / 1024.0;
        println!("File size: {:.2} KB", file_size_kb);

        // 3. Crack time for the fixed target (average over repeats)
        let cracker = Cracker::new(&table);
        let mut target_found = false;
        let start = Instant::now();
        for _ in 0..CRACK_REPEATS {
            target_found = cracker.crack(&target).is_ok();
        }
        let crack = start.elapsed() / CRACK_REPEATS;
        println!(
            "Cracking took (avg of {}): {:.4} s, found: {}",
            CRACK_REPEATS,
            crack.as_secs_f64(),
            target_found
        );

        // 4. Success rate over random plaintexts
        let mut rng = StdRng::seed_from_u64(SEED ^ n_chains as u64);
        let mut cracked = 0;
        for _ in 0..RANDOM_TARGETS {
            let plaintext = table.charset().random_plaintext(&mut rng);
            match cracker.crack(&table.algorithm().hash(plaintext.as_bytes())) {
                Ok(_) => cracked += 1,
                Err(RainbowError::NotFound) => {}
                Err(e) => panic!("unexpected crack error: {}", e),
            }
        }
        let success_rate = cracked as f64 / RANDOM_TARGETS as f64;
        println!("Random targets cracked: {}/{}", cracked, RANDOM_TARGETS);
        println!();

        rows.push(ExperimentRow {
            chains: n_chains,
            file_size_kb,
            generation,
            crack,
            target_found,
            success_rate,
            merge_rate: table.stats().merge_rate,
        });
    }

    println!("--- Experiment Summary ---");
    println!("| Chains | File Size (KB) | Generation Time (s) | Cracking Time (s) | Target Found | Success Rate | Merge Rate |");
    println!("|-------:|---------------:|--------------------:|------------------:|:------------:|-------------:|-----------:|");
    for row in &rows {
        println!(
            "| {} | {:.4} | {:.4} | {:.4} | {} | {:.2}% | {:.2}% |",
            row.chains,
            row.file_size_kb,
            row.generation.as_secs_f64(),
            row.crack.as_secs_f64(),
            if row.target_found { "yes" } else { "no" },
            row.success_rate * 100.0,
            row.merge_rate * 100.0
        );
    }
}
