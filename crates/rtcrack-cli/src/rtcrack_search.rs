//! Digest cracking CLI
//!
//! Usage: rtcrack_search <TABLE> [DIGEST...]
//! Without digest arguments, hex digests are read from stdin, one per line.
//!
//! Example:
//!   rtcrack_search sha1_alphanumeric#1-6_200.rt 2aae6c35c94fcfb415dbe95f408b9ce91ee846ed
//!   cat digests.txt | rtcrack_search sha1_alphanumeric#1-6_200.rt

mod common;

use anyhow::{Context, Result};
use clap::Parser;
use common::{LogLevel, init_tracing};
use rtcrack_rainbow::{Algorithm, Cracker, Digest, RainbowError, Table, ValidationOptions};
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::warn;

#[cfg(feature = "mmap")]
use rtcrack_rainbow::MappedTable;

#[cfg(not(feature = "mmap"))]
use rtcrack_rainbow::infra::table_io::load_table_with_validation;

#[derive(Parser)]
#[command(name = "rtcrack_search", about = "Crack digests with a rainbow table", version)]
struct Args {
    /// Table file produced by rtcrack_create
    table: PathBuf,

    /// Hex digests to crack (read from stdin when omitted)
    digests: Vec<String>,

    /// Reject tables built for another algorithm
    #[arg(short, long)]
    algorithm: Option<Algorithm>,

    /// Reject tables built with another chain length
    #[arg(short = 't', long)]
    chain_length: Option<u32>,

    /// Set the logging level
    #[arg(long, value_enum, env = "RTCRACK_LOG", default_value = "warn")]
    log_level: LogLevel,
}

#[cfg(feature = "mmap")]
fn open_table(path: &Path, options: &ValidationOptions) -> Result<Table> {
    let mapped = MappedTable::open_with_validation(path, options)
        .with_context(|| format!("Failed to open table {}", path.display()))?;
    mapped
        .to_table()
        .with_context(|| format!("Failed to read chains from {}", path.display()))
}

#[cfg(not(feature = "mmap"))]
fn open_table(path: &Path, options: &ValidationOptions) -> Result<Table> {
    load_table_with_validation(path, options)
        .with_context(|| format!("Failed to load table {}", path.display()))
}

fn crack_one(cracker: &Cracker<'_>, input: &str) {
    let target = match Digest::from_hex(input) {
        Ok(digest) => digest,
        Err(e) => {
            warn!(input, "skipping invalid digest");
            println!("{} : invalid ({})", input, e);
            return;
        }
    };

    let start = Instant::now();
    match cracker.crack(&target) {
        Ok(plaintext) => println!(
            "{} : {} ({:.3}s)",
            target,
            plaintext,
            start.elapsed().as_secs_f64()
        ),
        Err(RainbowError::NotFound) => println!(
            "{} : not found ({:.3}s)",
            target,
            start.elapsed().as_secs_f64()
        ),
        Err(e) => println!("{} : error ({})", target, e),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level);

    let options = ValidationOptions {
        expected_algorithm: args.algorithm,
        expected_chain_length: args.chain_length,
        require_chains: false,
    };

    let load_start = Instant::now();
    let table = open_table(&args.table, &options)?;
    println!(
        "Loaded {} chains ({}, {}, chain length {}) in {:.2} seconds",
        table.len(),
        table.algorithm(),
        table.charset(),
        table.chain_length(),
        load_start.elapsed().as_secs_f64()
    );

    let cracker = Cracker::new(&table);
    if args.digests.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line.context("Failed to read digest from stdin")?;
            let input = line.trim();
            if !input.is_empty() {
                crack_one(&cracker, input);
            }
        }
    } else {
        for input in &args.digests {
            crack_one(&cracker, input.trim());
        }
    }

    Ok(())
}
