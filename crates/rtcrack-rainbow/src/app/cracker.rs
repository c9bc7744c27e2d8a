//! Crack workflow implementation
//!
//! This module recovers the plaintext of a target digest using a rainbow
//! table. For every chain position `p` (from the last one down to 0) the
//! target is assumed to sit at `p`:
//!
//! 1. Calculate the chain end by reducing and hashing from `p` to the end
//! 2. Look the end digest up in the table index
//! 3. Walk the indexed chain from its start to confirm the match
//!
//! A confirmed match is authoritative; a walk that never meets the target is
//! a false alarm. Identical candidate endpoints are only tried once.

use crate::domain::chain::ChainBuilder;
use crate::domain::charset::Plaintext;
use crate::domain::digest::Digest;
use crate::domain::table::Table;
use crate::error::{RainbowError, RainbowResult};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

/// Counters collected by [`Cracker::crack_with_stats`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CrackStats {
    /// Chain positions examined
    pub positions_tried: u32,
    /// Positions skipped because their candidate endpoint was already tried
    pub duplicate_endpoints: u32,
    /// Candidate endpoints present in the index
    pub index_hits: u32,
    /// Index hits whose chain did not contain the target
    pub false_alarms: u32,
}

/// Searches a read-only table for plaintexts of target digests
pub struct Cracker<'t> {
    table: &'t Table,
    builder: ChainBuilder<'t>,
}

impl<'t> Cracker<'t> {
    pub fn new(table: &'t Table) -> Self {
        Self {
            table,
            builder: table.config().chain_builder(),
        }
    }

    pub fn table(&self) -> &'t Table {
        self.table
    }

    /// Recover the plaintext whose digest equals `target`
    ///
    /// Candidate endpoints for every position are computed in parallel, and
    /// the chain walks run in parallel as well. The result is the first
    /// confirmed match in descending-position order, independent of thread
    /// scheduling.
    ///
    /// # Errors
    /// `InvalidDigest` when `target` has the wrong size for the table's
    /// algorithm, `NotFound` when no chain contains it.
    pub fn crack(&self, target: &Digest) -> RainbowResult<Plaintext> {
        self.check_target(target)?;
        if self.table.is_empty() {
            return Err(RainbowError::NotFound);
        }

        let chain_length = self.table.chain_length();
        let candidates: Vec<Digest> = (0..chain_length)
            .into_par_iter()
            .rev()
            .map(|position| self.candidate_endpoint(target, position))
            .collect();

        let mut seen = FxHashSet::default();
        let starts: Vec<(u32, &Plaintext)> = (0..chain_length)
            .rev()
            .zip(candidates)
            .filter(|(_, endpoint)| seen.insert(endpoint.clone()))
            .filter_map(|(position, endpoint)| {
                self.table
                    .lookup_by_end_digest(&endpoint)
                    .map(|start| (position, start))
            })
            .collect();

        starts
            .par_iter()
            .find_map_first(|(position, start)| {
                let found = self.builder.find_in_chain(start, chain_length, target);
                if found.is_none() {
                    trace!(position, start = %start, "false alarm");
                }
                found
            })
            .inspect(|plaintext| debug!(digest = %target, plaintext = %plaintext, "digest cracked"))
            .ok_or(RainbowError::NotFound)
    }

    /// Sequential crack that also reports search counters
    ///
    /// Returns the same plaintext as [`Cracker::crack`].
    pub fn crack_with_stats(&self, target: &Digest) -> RainbowResult<(Option<Plaintext>, CrackStats)> {
        self.check_target(target)?;

        let chain_length = self.table.chain_length();
        let mut stats = CrackStats::default();
        let mut seen = FxHashSet::default();

        for position in (0..chain_length).rev() {
            stats.positions_tried += 1;
            let endpoint = self.candidate_endpoint(target, position);
            if !seen.insert(endpoint.clone()) {
                stats.duplicate_endpoints += 1;
                continue;
            }

            let Some(start) = self.table.lookup_by_end_digest(&endpoint) else {
                continue;
            };
            stats.index_hits += 1;

            match self.builder.find_in_chain(start, chain_length, target) {
                Some(plaintext) => return Ok((Some(plaintext), stats)),
                None => stats.false_alarms += 1,
            }
        }

        Ok((None, stats))
    }

    /// End digest of the chain that would hold `target` at `position`
    fn candidate_endpoint(&self, target: &Digest, position: u32) -> Digest {
        let chain_length = self.table.chain_length();
        if position + 1 >= chain_length {
            return target.clone();
        }
        let next = self.builder.reduce(target, position);
        self.builder.advance(&next, position + 1, chain_length)
    }

    fn check_target(&self, target: &Digest) -> RainbowResult<()> {
        let expected = self.table.algorithm().size();
        if target.len() != expected {
            return Err(RainbowError::InvalidDigest(format!(
                "{} digests are {} bytes, got {}",
                self.table.algorithm(),
                expected,
                target.len()
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Crack request boundary
// =============================================================================

/// Crack request: a hex-encoded target digest
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrackRequest {
    pub target_digest: String,
}

impl CrackRequest {
    pub fn new(target_digest: impl Into<String>) -> Self {
        Self {
            target_digest: target_digest.into(),
        }
    }
}

/// Crack response; `plaintext` is present exactly when `found` is true
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrackResponse {
    pub found: bool,
    pub plaintext: Option<String>,
}

/// Answer a crack request against `table`
///
/// A digest the table does not cover is a normal `found: false` response.
///
/// # Errors
/// `InvalidDigest` when the request is not hex or has the wrong size.
pub fn handle_crack_request(request: &CrackRequest, table: &Table) -> RainbowResult<CrackResponse> {
    let target = Digest::from_hex(&request.target_digest)?;
    match Cracker::new(table).crack(&target) {
        Ok(plaintext) => Ok(CrackResponse {
            found: true,
            plaintext: Some(plaintext.into_string()),
        }),
        Err(RainbowError::NotFound) => Ok(CrackResponse {
            found: false,
            plaintext: None,
        }),
        Err(e) => Err(e),
    }
}
