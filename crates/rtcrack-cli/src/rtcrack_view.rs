//! Rainbow table inspection CLI
//!
//! Usage: rtcrack_view <TABLE> [--limit N] [--coverage]

mod common;

use anyhow::{Context, Result};
use clap::Parser;
use common::{LogLevel, file_size_kb, init_tracing, print_progress};
use rtcrack_rainbow::app::coverage::{build_plaintext_bitmap_with_progress, report_from_bitmap};
use rtcrack_rainbow::infra::table_io::load_table;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rtcrack_view", about = "Show the contents of a rainbow table", version)]
struct Args {
    /// Table file produced by rtcrack_create
    table: PathBuf,

    /// Number of chains to list
    #[arg(short, long, default_value_t = 10)]
    limit: usize,

    /// Also measure how much of the plaintext space the chains reach
    #[arg(long)]
    coverage: bool,

    /// Set the logging level
    #[arg(long, value_enum, env = "RTCRACK_LOG", default_value = "warn")]
    log_level: LogLevel,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level);

    let table = load_table(&args.table)
        .with_context(|| format!("Failed to load table {}", args.table.display()))?;
    let charset = table.charset();

    println!("--- Table Parameters ---");
    println!("Algorithm: {}", table.algorithm());
    println!("Charset: {:?}", charset.alphabet());
    println!("Min Length: {}", charset.min_length());
    println!("Max Length: {}", charset.max_length());
    println!("Chain Length: {}", table.chain_length());
    println!("Number of Chains: {}", table.len());
    println!("File Size: {:.2} KB", file_size_kb(&args.table));

    let stats = table.stats();
    println!();
    println!("--- Statistics ---");
    println!("Plaintext space: {}", charset.space_size());
    println!("Indexed chains: {}", stats.indexed_chains);
    println!(
        "Merged chains: {} ({:.2}%)",
        stats.merged_chains,
        stats.merge_rate * 100.0
    );

    println!();
    println!("--- Chains (end digest : start) ---");
    for entry in table.iter().take(args.limit) {
        println!("{} : {}", entry.end_digest, entry.start);
    }
    if table.len() > args.limit {
        println!("... (and {} more)", table.len() - args.limit);
    }

    if args.coverage {
        println!();
        println!("--- Coverage ---");
        let bitmap = build_plaintext_bitmap_with_progress(&table, |current, total| {
            print_progress("Coverage", current, total)
        })
        .context("Failed to measure coverage")?;
        println!();
        let report = report_from_bitmap(&bitmap);
        println!("Reachable plaintexts: {}", report.reachable_count);
        println!("Missing plaintexts: {}", report.missing_count);
        println!("Coverage: {:.4}%", report.coverage * 100.0);
    }

    Ok(())
}
