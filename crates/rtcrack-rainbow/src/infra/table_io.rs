//! Table file I/O operations
//!
//! This module provides functions for reading and writing rainbow table files.

use crate::constants::TABLE_FILE_EXTENSION;
use crate::domain::digest::Algorithm;
use crate::domain::table::Table;
use crate::domain::table_format::{
    TableHeader, ValidationOptions, read_table_with_validation, write_table,
};
use crate::error::RainbowResult;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

#[cfg(feature = "mmap")]
use crate::domain::table_format::{read_records, validate_header};
#[cfg(feature = "mmap")]
use memmap2::Mmap;

/// Save table to file
pub fn save_table(path: impl AsRef<Path>, table: &Table) -> RainbowResult<()> {
    let file = File::create(path)?;
    write_table(table, BufWriter::new(file))?;
    Ok(())
}

/// Load table from file
pub fn load_table(path: impl AsRef<Path>) -> RainbowResult<Table> {
    load_table_with_validation(path, &ValidationOptions::for_inspection())
}

/// Load table from file, rejecting headers that do not match `options`
pub fn load_table_with_validation(
    path: impl AsRef<Path>,
    options: &ValidationOptions,
) -> RainbowResult<Table> {
    let file = File::open(path)?;
    read_table_with_validation(BufReader::new(file), options)
}

/// Read only the header of a table file
pub fn read_header(path: impl AsRef<Path>) -> RainbowResult<TableHeader> {
    let file = File::open(path)?;
    TableHeader::read_from(&mut BufReader::new(file))
}

/// Conventional file name for a table, e.g. `sha1_alphanumeric#1-6_200.rt`
pub fn table_file_name(
    algorithm: Algorithm,
    charset_name: &str,
    min_length: usize,
    max_length: usize,
    chain_length: u32,
) -> String {
    format!(
        "{}_{}#{}-{}_{}.{}",
        algorithm.tag().to_ascii_lowercase(),
        charset_name,
        min_length,
        max_length,
        chain_length,
        TABLE_FILE_EXTENSION
    )
}

// =============================================================================
// Memory-mapped table I/O (mmap feature)
// =============================================================================

/// Memory-mapped rainbow table file
///
/// The header is parsed on open; chain records are decoded from the mapping
/// on demand by [`MappedTable::to_table`], avoiding a second buffered copy of
/// the file.
#[cfg(feature = "mmap")]
pub struct MappedTable {
    mmap: Mmap,
    header: TableHeader,
    body_offset: usize,
}

#[cfg(feature = "mmap")]
impl MappedTable {
    /// Open a table file as memory-mapped
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or mapped, or if the
    /// header is malformed.
    pub fn open(path: impl AsRef<Path>) -> RainbowResult<Self> {
        Self::open_with_validation(path, &ValidationOptions::for_inspection())
    }

    /// Open a table file and validate its header against `options`
    pub fn open_with_validation(
        path: impl AsRef<Path>,
        options: &ValidationOptions,
    ) -> RainbowResult<Self> {
        let file = File::open(path)?;
        // SAFETY: the mapping is read-only and the file is not modified while mapped
        let mmap = unsafe { Mmap::map(&file)? };

        let mut cursor: &[u8] = &mmap;
        let header = TableHeader::read_from(&mut cursor)?;
        validate_header(&header, options)?;
        let body_offset = mmap.len() - cursor.len();

        Ok(Self {
            mmap,
            header,
            body_offset,
        })
    }

    pub fn header(&self) -> &TableHeader {
        &self.header
    }

    /// Get the number of chains declared by the header
    pub fn len(&self) -> u64 {
        self.header.chain_count
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.header.chain_count == 0
    }

    /// Size of the mapped file in bytes
    pub fn file_len(&self) -> usize {
        self.mmap.len()
    }

    /// Decode every chain record into an indexed table
    pub fn to_table(&self) -> RainbowResult<Table> {
        read_records(&self.mmap[self.body_offset..], self.header.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::charset::Charset;
    use crate::domain::table::TableConfig;
    use crate::error::RainbowError;
    use tempfile::TempDir;

    fn sample_table() -> Table {
        let charset = Charset::named("numeric", 1, 4).unwrap();
        let config = TableConfig::new(Algorithm::Md5, charset, 8).unwrap();
        let builder = config.chain_builder();
        let chains: Vec<_> = ["1", "42", "999", "2024"]
            .iter()
            .map(|text| builder.build_chain(config.charset().plaintext(text).unwrap(), 8))
            .collect();
        Table::from_chains(config, chains)
    }

    #[test]
    fn test_save_and_load_table() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("table.rt");
        let table = sample_table();

        save_table(&path, &table).expect("Failed to save");
        let loaded = load_table(&path).expect("Failed to load");

        assert_eq!(table, loaded);
    }

    #[test]
    fn test_saved_file_matches_serialize() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.rt");
        let table = sample_table();

        save_table(&path, &table).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), table.serialize());
    }

    #[test]
    fn test_read_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.rt");
        let table = sample_table();
        save_table(&path, &table).unwrap();

        let header = read_header(&path).unwrap();
        assert_eq!(header, table.header());
        assert_eq!(header.chain_count, 4);
    }

    #[test]
    fn test_load_with_validation_mismatch() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.rt");
        save_table(&path, &sample_table()).unwrap();

        let result = load_table_with_validation(&path, &ValidationOptions::for_crack(Algorithm::Sha1));
        assert!(matches!(result, Err(RainbowError::InvalidConfig(_))));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_table("/nonexistent/path/file.rt");
        assert!(matches!(result, Err(RainbowError::Io(_))));
    }

    #[test]
    fn test_table_file_name() {
        assert_eq!(
            table_file_name(Algorithm::Sha1, "alphanumeric", 1, 6, 200),
            "sha1_alphanumeric#1-6_200.rt"
        );
    }

    #[cfg(feature = "mmap")]
    #[test]
    fn test_mapped_table_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.rt");
        let table = sample_table();
        save_table(&path, &table).unwrap();

        let mapped = MappedTable::open(&path).expect("Failed to open");

        assert_eq!(mapped.len(), 4);
        assert!(!mapped.is_empty());
        assert_eq!(mapped.header(), &table.header());
        assert_eq!(mapped.file_len(), table.serialize().len());
        assert_eq!(mapped.to_table().unwrap(), table);
    }

    #[cfg(feature = "mmap")]
    #[test]
    fn test_mapped_table_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.rt");
        let table = Table::new(sample_table().config().clone());
        save_table(&path, &table).unwrap();

        let mapped = MappedTable::open(&path).unwrap();

        assert!(mapped.is_empty());
        assert!(mapped.to_table().unwrap().is_empty());
    }
}
