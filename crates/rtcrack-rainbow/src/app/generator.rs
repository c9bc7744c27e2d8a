//! Table generation workflow
//!
//! This module provides functions for generating rainbow tables.
//!
//! Start plaintexts are sampled sequentially from one RNG, chains are built
//! on the rayon pool, and the results are inserted in sampling order. With a
//! fixed seed the resulting table, including which chain owns each index
//! slot, is identical across runs and thread counts.

use crate::constants::{
    DEFAULT_CHAIN_LENGTH, DEFAULT_CHARSET, DEFAULT_MAX_LENGTH, DEFAULT_MIN_LENGTH,
    DEFAULT_NUM_CHAINS, PROGRESS_INTERVAL,
};
use crate::domain::chain::ChainEntry;
use crate::domain::charset::{Charset, Plaintext};
use crate::domain::digest::Algorithm;
use crate::domain::table::{Table, TableConfig};
use crate::error::RainbowResult;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

/// Parameters of a table generation run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
    pub algorithm: Algorithm,
    /// One of `NAMED_CHARSETS`
    pub charset_name: String,
    pub min_length: usize,
    pub max_length: usize,
    pub chain_length: u32,
    pub n_chains: usize,
    /// RNG seed for start sampling (None = seeded from OS entropy)
    pub seed: Option<u64>,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Sha1,
            charset_name: DEFAULT_CHARSET.to_string(),
            min_length: DEFAULT_MIN_LENGTH,
            max_length: DEFAULT_MAX_LENGTH,
            chain_length: DEFAULT_CHAIN_LENGTH,
            n_chains: DEFAULT_NUM_CHAINS,
            seed: None,
        }
    }
}

impl GenerationRequest {
    /// Create a request with default lengths, chain length and chain count
    pub fn new(algorithm: Algorithm, charset_name: impl Into<String>) -> Self {
        Self {
            algorithm,
            charset_name: charset_name.into(),
            ..Self::default()
        }
    }

    pub fn with_lengths(mut self, min_length: usize, max_length: usize) -> Self {
        self.min_length = min_length;
        self.max_length = max_length;
        self
    }

    pub fn with_chain_length(mut self, chain_length: u32) -> Self {
        self.chain_length = chain_length;
        self
    }

    pub fn with_chains(mut self, n_chains: usize) -> Self {
        self.n_chains = n_chains;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate the request into a table configuration
    pub fn config(&self) -> RainbowResult<TableConfig> {
        let charset = Charset::named(&self.charset_name, self.min_length, self.max_length)?;
        TableConfig::new(self.algorithm, charset, self.chain_length)
    }

    /// Generate the requested table
    pub fn execute(&self) -> RainbowResult<Table> {
        self.execute_with_progress(|_, _| {})
    }

    /// Generate the requested table with progress callback
    pub fn execute_with_progress<F>(&self, on_progress: F) -> RainbowResult<Table>
    where
        F: Fn(usize, usize) + Sync, // (current, total)
    {
        let config = self.config()?;
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(generate_table_with_progress(
            &config,
            self.n_chains,
            &mut rng,
            on_progress,
        ))
    }
}

/// Draw `n_chains` start plaintexts in order
pub fn sample_starts<R: Rng + ?Sized>(charset: &Charset, n_chains: usize, rng: &mut R) -> Vec<Plaintext> {
    (0..n_chains).map(|_| charset.random_plaintext(rng)).collect()
}

/// Generate a rainbow table
pub fn generate_table<R: Rng + ?Sized>(config: &TableConfig, n_chains: usize, rng: &mut R) -> Table {
    generate_table_with_progress(config, n_chains, rng, |_, _| {})
}

/// Generate table with progress callback
pub fn generate_table_with_progress<R, F>(
    config: &TableConfig,
    n_chains: usize,
    rng: &mut R,
    on_progress: F,
) -> Table
where
    R: Rng + ?Sized,
    F: Fn(usize, usize) + Sync, // (current, total)
{
    debug!(n_chains, charset = %config.charset(), "sampling start plaintexts");
    let starts = sample_starts(config.charset(), n_chains, rng);

    let chains = build_chains_with_progress(config, starts, on_progress);
    let table = Table::from_chains(config.clone(), chains);

    let stats = table.stats();
    info!(
        algorithm = %config.algorithm(),
        chain_length = config.chain_length(),
        chains = stats.chain_count,
        indexed = stats.indexed_chains,
        merged = stats.merged_chains,
        "generated rainbow table"
    );
    table
}

/// Build chains for the given starts in parallel, preserving their order
pub fn build_chains_with_progress<F>(
    config: &TableConfig,
    starts: Vec<Plaintext>,
    on_progress: F,
) -> Vec<ChainEntry>
where
    F: Fn(usize, usize) + Sync,
{
    let builder = config.chain_builder();
    let chain_length = config.chain_length();
    let total = starts.len();
    let progress = AtomicUsize::new(0);

    let chains: Vec<ChainEntry> = starts
        .into_par_iter()
        .map(|start| {
            let entry = builder.build_chain(start, chain_length);
            let done = progress.fetch_add(1, Ordering::Relaxed) + 1;
            if done % PROGRESS_INTERVAL == 0 {
                on_progress(done, total);
            }
            entry
        })
        .collect();

    on_progress(total, total);
    chains
}
