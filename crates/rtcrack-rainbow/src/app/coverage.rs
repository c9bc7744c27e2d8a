//! Coverage measurement workflow
//!
//! This module provides functions for building plaintext bitmaps and
//! extracting plaintexts that are not reachable from any chain in the
//! rainbow table.

use crate::constants::{MAX_COVERAGE_SPACE, PROGRESS_INTERVAL};
use crate::domain::charset::{Charset, Plaintext};
use crate::domain::coverage::PlaintextBitmap;
use crate::domain::table::Table;
use crate::error::{RainbowError, RainbowResult};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

/// Result of coverage measurement
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageReport {
    /// Total number of plaintexts in the charset
    pub space_size: u64,
    /// Number of reachable plaintexts
    pub reachable_count: u64,
    /// Number of missing plaintexts
    pub missing_count: u64,
    /// Coverage ratio (0.0 to 1.0)
    pub coverage: f64,
}

/// Build a plaintext bitmap from the table
///
/// Processes all chains in parallel using rayon.
///
/// # Errors
/// `InvalidConfig` when the charset space exceeds `MAX_COVERAGE_SPACE`.
pub fn build_plaintext_bitmap(table: &Table) -> RainbowResult<PlaintextBitmap> {
    build_plaintext_bitmap_with_progress(table, |_, _| {})
}

/// Build a plaintext bitmap from the table with progress callback
pub fn build_plaintext_bitmap_with_progress<F>(
    table: &Table,
    on_progress: F,
) -> RainbowResult<PlaintextBitmap>
where
    F: Fn(usize, usize) + Sync, // (current, total)
{
    let charset = table.charset();
    let space_size = charset.space_size();
    if space_size > MAX_COVERAGE_SPACE {
        return Err(RainbowError::InvalidConfig(format!(
            "plaintext space of {} exceeds the coverage limit of {}",
            space_size, MAX_COVERAGE_SPACE
        )));
    }

    let bitmap = PlaintextBitmap::new(space_size);
    let builder = table.config().chain_builder();
    let chain_length = table.chain_length();
    let total = table.len();
    let progress = AtomicUsize::new(0);

    table.chains().par_iter().for_each(|entry| {
        for (plaintext, _) in builder.walk(entry.start.clone(), chain_length) {
            bitmap.set(charset.counter_of(&plaintext));
        }

        let count = progress.fetch_add(1, Ordering::Relaxed) + 1;
        if count % PROGRESS_INTERVAL == 0 {
            on_progress(count, total);
        }
    });

    on_progress(total, total);
    Ok(bitmap)
}

/// Measure how much of the plaintext space the table reaches
pub fn measure_coverage(table: &Table) -> RainbowResult<CoverageReport> {
    let bitmap = build_plaintext_bitmap(table)?;
    let report = report_from_bitmap(&bitmap);
    info!(
        space = report.space_size,
        reachable = report.reachable_count,
        coverage = report.coverage,
        "measured table coverage"
    );
    Ok(report)
}

/// Summarise a bitmap
pub fn report_from_bitmap(bitmap: &PlaintextBitmap) -> CoverageReport {
    let space_size = bitmap.size();
    let reachable_count = bitmap.count_reachable();
    let coverage = if space_size == 0 {
        0.0
    } else {
        reachable_count as f64 / space_size as f64
    };
    CoverageReport {
        space_size,
        reachable_count,
        missing_count: space_size - reachable_count,
        coverage,
    }
}

/// List up to `limit` plaintexts no chain reaches, in counter order
pub fn missing_plaintexts(bitmap: &PlaintextBitmap, charset: &Charset, limit: usize) -> Vec<Plaintext> {
    bitmap
        .missing()
        .filter_map(|counter| charset.decode_counter(counter))
        .take(limit)
        .collect()
}
