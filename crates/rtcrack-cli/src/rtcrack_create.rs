//! Rainbow table creation CLI
//!
//! Usage: rtcrack_create <ALGORITHM> [OUTPUT] [options]
//!
//! Example: rtcrack_create sha1 -c loweralpha --max-length 5 -t 500 -n 20000

mod common;

use anyhow::{Context, Result};
use clap::Parser;
use common::{LogLevel, file_size_kb, init_tracing, print_progress};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rtcrack_rainbow::app::generator::generate_table_with_progress;
use rtcrack_rainbow::constants::{
    DEFAULT_CHAIN_LENGTH, DEFAULT_CHARSET, DEFAULT_MAX_LENGTH, DEFAULT_MIN_LENGTH,
    DEFAULT_NUM_CHAINS, NAMED_CHARSETS,
};
use rtcrack_rainbow::infra::table_io::{save_table, table_file_name};
use rtcrack_rainbow::{Algorithm, Charset, TableConfig};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "rtcrack_create", about = "Generate a rainbow table", version)]
struct Args {
    /// Digest algorithm (md5 or sha1)
    algorithm: Algorithm,

    /// Output file (defaults to e.g. sha1_alphanumeric#1-6_200.rt)
    output: Option<PathBuf>,

    /// Named charset
    #[arg(short, long, default_value = DEFAULT_CHARSET, conflicts_with = "alphabet")]
    charset: String,

    /// Literal alphabet instead of a named charset
    #[arg(long)]
    alphabet: Option<String>,

    /// Shortest plaintext length
    #[arg(long, default_value_t = DEFAULT_MIN_LENGTH)]
    min_length: usize,

    /// Longest plaintext length
    #[arg(long, default_value_t = DEFAULT_MAX_LENGTH)]
    max_length: usize,

    /// Digests per chain
    #[arg(short = 't', long, default_value_t = DEFAULT_CHAIN_LENGTH)]
    chain_length: u32,

    /// Number of chains to generate
    #[arg(short = 'n', long, default_value_t = DEFAULT_NUM_CHAINS)]
    chains: usize,

    /// RNG seed for reproducible tables
    #[arg(long)]
    seed: Option<u64>,

    /// Set the logging level
    #[arg(long, value_enum, env = "RTCRACK_LOG", default_value = "warn")]
    log_level: LogLevel,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level);

    let (charset, charset_name) = match &args.alphabet {
        Some(alphabet) => (
            Charset::new(alphabet, args.min_length, args.max_length),
            "custom",
        ),
        None => (
            Charset::named(&args.charset, args.min_length, args.max_length),
            args.charset.as_str(),
        ),
    };
    let charset = charset.with_context(|| {
        let names: Vec<&str> = NAMED_CHARSETS.iter().map(|(name, _)| *name).collect();
        format!("Invalid charset (named charsets: {})", names.join(", "))
    })?;
    let config = TableConfig::new(args.algorithm, charset, args.chain_length)
        .context("Invalid table parameters")?;

    let output = args.output.clone().unwrap_or_else(|| {
        PathBuf::from(table_file_name(
            args.algorithm,
            charset_name,
            args.min_length,
            args.max_length,
            args.chain_length,
        ))
    });

    println!("Generating rainbow table...");
    println!("  Algorithm: {}", config.algorithm());
    println!("  Charset: {}", config.charset());
    println!("  Plaintext space: {}", config.charset().space_size());
    println!("  Chain length: {}", config.chain_length());
    println!("  Chains: {}", args.chains);

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let start = Instant::now();
    let table = generate_table_with_progress(&config, args.chains, &mut rng, |current, total| {
        print_progress("Generation", current, total)
    });
    println!();
    println!(
        "Generated {} chains in {:.2} seconds",
        table.len(),
        start.elapsed().as_secs_f64()
    );

    let stats = table.stats();
    println!(
        "Merged chains: {} of {} ({:.2}%)",
        stats.merged_chains,
        stats.chain_count,
        stats.merge_rate * 100.0
    );

    println!("Saving table to {}...", output.display());
    save_table(&output, &table)
        .with_context(|| format!("Failed to save table to {}", output.display()))?;
    println!("File size: {:.2} KB", file_size_kb(&output));

    println!();
    println!("Done! Total time: {:.2} seconds", start.elapsed().as_secs_f64());
    Ok(())
}
