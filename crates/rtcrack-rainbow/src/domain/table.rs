//! In-memory rainbow table
//!
//! Chains are kept in insertion order. The index maps each end digest to the
//! first chain that produced it; later chains with the same end digest
//! (merges) stay in the chain list but are unreachable through the index.

use crate::domain::chain::{ChainBuilder, ChainEntry};
use crate::domain::charset::{Charset, Plaintext};
use crate::domain::digest::{Algorithm, Digest};
use crate::domain::table_format::{self, TableHeader};
use crate::error::{RainbowError, RainbowResult};
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;

/// Parameters shared by every chain of a table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableConfig {
    algorithm: Algorithm,
    charset: Charset,
    chain_length: u32,
}

impl TableConfig {
    /// # Errors
    /// `InvalidConfig` when `chain_length` is 0
    pub fn new(algorithm: Algorithm, charset: Charset, chain_length: u32) -> RainbowResult<Self> {
        if chain_length == 0 {
            return Err(RainbowError::InvalidConfig(
                "chain length must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            algorithm,
            charset,
            chain_length,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn charset(&self) -> &Charset {
        &self.charset
    }

    pub fn chain_length(&self) -> u32 {
        self.chain_length
    }

    /// Chain builder bound to this configuration's algorithm and charset
    pub fn chain_builder(&self) -> ChainBuilder<'_> {
        ChainBuilder::new(self.algorithm, &self.charset)
    }
}

/// Merge statistics of a table
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableStats {
    /// Number of stored chains
    pub chain_count: usize,
    /// Number of distinct end digests (chains reachable through the index)
    pub indexed_chains: usize,
    /// Chains whose end digest was already indexed
    pub merged_chains: usize,
    /// `merged_chains / chain_count` (0.0 for an empty table)
    pub merge_rate: f64,
}

/// Rainbow table: chain list plus end-digest index
#[derive(Clone, Debug)]
pub struct Table {
    config: TableConfig,
    chains: Vec<ChainEntry>,
    index: FxHashMap<Digest, usize>,
}

impl Table {
    pub fn new(config: TableConfig) -> Self {
        Self::with_capacity(config, 0)
    }

    pub fn with_capacity(config: TableConfig, capacity: usize) -> Self {
        Self {
            config,
            chains: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Build a table by inserting `chains` in order
    pub fn from_chains(config: TableConfig, chains: impl IntoIterator<Item = ChainEntry>) -> Self {
        let mut table = Self::new(config);
        for entry in chains {
            table.insert_entry(entry);
        }
        table
    }

    /// Append a chain
    ///
    /// # Returns
    /// `true` if the chain took the index slot for `end_digest`, `false` if
    /// an earlier chain already owns it.
    pub fn insert(&mut self, start: Plaintext, end_digest: Digest) -> bool {
        self.insert_entry(ChainEntry::new(start, end_digest))
    }

    /// Append a chain entry, see [`Table::insert`]
    pub fn insert_entry(&mut self, entry: ChainEntry) -> bool {
        let position = self.chains.len();
        let indexed = match self.index.entry(entry.end_digest.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(position);
                true
            }
            Entry::Occupied(_) => false,
        };
        self.chains.push(entry);
        indexed
    }

    /// Start plaintext of the chain owning `end_digest`
    pub fn lookup_by_end_digest(&self, end_digest: &Digest) -> Option<&Plaintext> {
        self.index
            .get(end_digest)
            .map(|&position| &self.chains[position].start)
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn algorithm(&self) -> Algorithm {
        self.config.algorithm
    }

    pub fn charset(&self) -> &Charset {
        &self.config.charset
    }

    pub fn chain_length(&self) -> u32 {
        self.config.chain_length
    }

    pub fn chains(&self) -> &[ChainEntry] {
        &self.chains
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChainEntry> {
        self.chains.iter()
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn stats(&self) -> TableStats {
        let chain_count = self.chains.len();
        let indexed_chains = self.index.len();
        let merged_chains = chain_count - indexed_chains;
        let merge_rate = if chain_count == 0 {
            0.0
        } else {
            merged_chains as f64 / chain_count as f64
        };
        TableStats {
            chain_count,
            indexed_chains,
            merged_chains,
            merge_rate,
        }
    }

    /// Header describing this table in the persisted format
    pub fn header(&self) -> TableHeader {
        TableHeader::for_table(self)
    }

    /// Encode the table in the persisted format
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = self.header().to_bytes();
        let record_size = 1 + self.charset().max_length() + self.algorithm().size();
        buf.reserve(self.chains.len() * record_size);
        for entry in &self.chains {
            table_format::encode_record(entry, &mut buf);
        }
        buf
    }

    /// Decode a table from the persisted format
    ///
    /// # Errors
    /// `CorruptTable` on malformed or truncated data, `UnsupportedAlgorithm`
    /// on an unknown algorithm tag.
    pub fn deserialize(bytes: &[u8]) -> RainbowResult<Self> {
        table_format::read_table(bytes)
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config && self.chains == other.chains
    }
}

impl Eq for Table {}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TableConfig {
        TableConfig::new(Algorithm::Md5, Charset::new("ab", 1, 3).unwrap(), 4).unwrap()
    }

    fn plaintext(text: &str) -> Plaintext {
        config().charset().plaintext(text).unwrap()
    }

    #[test]
    fn test_zero_chain_length_rejected() {
        let charset = Charset::new("ab", 1, 3).unwrap();
        assert!(matches!(
            TableConfig::new(Algorithm::Sha1, charset, 0),
            Err(RainbowError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut table = Table::new(config());
        let digest = Algorithm::Md5.hash(b"end");

        assert!(table.insert(plaintext("ab"), digest.clone()));
        assert_eq!(table.lookup_by_end_digest(&digest), Some(&plaintext("ab")));
        assert_eq!(table.lookup_by_end_digest(&Algorithm::Md5.hash(b"x")), None);
    }

    #[test]
    fn test_first_insert_keeps_index_slot() {
        let mut table = Table::new(config());
        let digest = Algorithm::Md5.hash(b"end");

        assert!(table.insert(plaintext("a"), digest.clone()));
        assert!(!table.insert(plaintext("bb"), digest.clone()));

        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup_by_end_digest(&digest), Some(&plaintext("a")));
    }

    #[test]
    fn test_stats() {
        let mut table = Table::new(config());
        assert_eq!(table.stats().merge_rate, 0.0);

        table.insert(plaintext("a"), Algorithm::Md5.hash(b"1"));
        table.insert(plaintext("b"), Algorithm::Md5.hash(b"1"));
        table.insert(plaintext("aa"), Algorithm::Md5.hash(b"2"));
        table.insert(plaintext("ab"), Algorithm::Md5.hash(b"3"));

        let stats = table.stats();
        assert_eq!(stats.chain_count, 4);
        assert_eq!(stats.indexed_chains, 3);
        assert_eq!(stats.merged_chains, 1);
        assert!((stats.merge_rate - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_serialize_round_trip() {
        let config = config();
        let builder = config.chain_builder();
        let chains: Vec<_> = ["a", "ab", "bba", "b"]
            .iter()
            .map(|text| builder.build_chain(plaintext(text), config.chain_length()))
            .collect();
        let table = Table::from_chains(config.clone(), chains);

        let restored = Table::deserialize(&table.serialize()).expect("Failed to deserialize");

        assert_eq!(restored, table);
        assert_eq!(restored.chain_length(), 4);
        assert_eq!(restored.charset().alphabet(), "ab");
        for entry in table.iter() {
            assert!(restored.lookup_by_end_digest(&entry.end_digest).is_some());
        }
    }

    #[test]
    fn test_serialize_empty_table() {
        let table = Table::new(config());
        let restored = Table::deserialize(&table.serialize()).unwrap();
        assert!(restored.is_empty());
        assert_eq!(restored.config(), table.config());
    }
}
