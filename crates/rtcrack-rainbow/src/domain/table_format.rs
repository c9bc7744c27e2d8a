//! Rainbow table file format definitions
//!
//! Little-endian layout:
//!
//! | field          | encoding                         |
//! |----------------|----------------------------------|
//! | magic          | 8 bytes `RBOWTBL\0`              |
//! | version        | u16                              |
//! | algorithm tag  | u8 length + ASCII (`MD5`/`SHA1`) |
//! | alphabet       | u16 length + ASCII               |
//! | min length     | u8                               |
//! | max length     | u8                               |
//! | chain length   | u32                              |
//! | chain count    | u64                              |
//!
//! followed by `chain count` records of `u8 length + plaintext + digest`.

use crate::constants::{FILE_FORMAT_VERSION, TABLE_MAGIC};
use crate::domain::chain::ChainEntry;
use crate::domain::charset::{Charset, Plaintext};
use crate::domain::digest::{Algorithm, Digest};
use crate::domain::table::{Table, TableConfig};
use crate::error::{RainbowError, RainbowResult};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{self, Read, Write};

/// Upper bound on records preallocated from an untrusted chain count
const MAX_PREALLOCATED_CHAINS: usize = 1 << 20;

/// Table file header metadata
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableHeader {
    /// File format version
    pub version: u16,
    /// Digest algorithm of every chain
    pub algorithm: Algorithm,
    /// Alphabet and length range of the plaintexts
    pub charset: Charset,
    /// Chain length (digests per chain)
    pub chain_length: u32,
    /// Number of chain records following the header
    pub chain_count: u64,
}

impl TableHeader {
    /// Header describing `table`
    pub fn for_table(table: &Table) -> Self {
        Self {
            version: FILE_FORMAT_VERSION,
            algorithm: table.algorithm(),
            charset: table.charset().clone(),
            chain_length: table.chain_length(),
            chain_count: table.len() as u64,
        }
    }

    /// Table configuration carried by the header
    pub fn config(&self) -> RainbowResult<TableConfig> {
        TableConfig::new(self.algorithm, self.charset.clone(), self.chain_length)
    }

    /// Serialize header to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let tag = self.algorithm.tag().as_bytes();
        let alphabet = self.charset.alphabet().as_bytes();
        let mut buf = Vec::with_capacity(27 + tag.len() + alphabet.len());

        buf.extend_from_slice(&TABLE_MAGIC);
        buf.extend_from_slice(&self.version.to_le_bytes());
        buf.push(tag.len() as u8);
        buf.extend_from_slice(tag);
        buf.extend_from_slice(&(alphabet.len() as u16).to_le_bytes());
        buf.extend_from_slice(alphabet);
        buf.push(self.charset.min_length() as u8);
        buf.push(self.charset.max_length() as u8);
        buf.extend_from_slice(&self.chain_length.to_le_bytes());
        buf.extend_from_slice(&self.chain_count.to_le_bytes());

        buf
    }

    /// Deserialize header from a reader
    pub fn read_from<R: Read>(reader: &mut R) -> RainbowResult<Self> {
        let mut magic = [0u8; 8];
        reader.read_exact(&mut magic).map_err(truncated("header"))?;
        if magic != TABLE_MAGIC {
            return Err(RainbowError::CorruptTable(
                "invalid magic number: not a rainbow table file".to_string(),
            ));
        }

        let version = reader
            .read_u16::<LittleEndian>()
            .map_err(truncated("header"))?;
        if version != FILE_FORMAT_VERSION {
            return Err(RainbowError::CorruptTable(format!(
                "unsupported format version {}",
                version
            )));
        }

        let tag_len = reader.read_u8().map_err(truncated("header"))? as usize;
        let tag = read_ascii(reader, tag_len, "algorithm tag")?;
        let algorithm: Algorithm = tag.parse()?;

        let alphabet_len = reader
            .read_u16::<LittleEndian>()
            .map_err(truncated("header"))? as usize;
        let alphabet = read_ascii(reader, alphabet_len, "alphabet")?;

        let min_length = reader.read_u8().map_err(truncated("header"))? as usize;
        let max_length = reader.read_u8().map_err(truncated("header"))? as usize;
        let charset = Charset::new(&alphabet, min_length, max_length)
            .map_err(|e| RainbowError::CorruptTable(format!("header charset: {}", e)))?;

        let chain_length = reader
            .read_u32::<LittleEndian>()
            .map_err(truncated("header"))?;
        if chain_length == 0 {
            return Err(RainbowError::CorruptTable(
                "chain length is zero".to_string(),
            ));
        }

        let chain_count = reader
            .read_u64::<LittleEndian>()
            .map_err(truncated("header"))?;

        Ok(Self {
            version,
            algorithm,
            charset,
            chain_length,
            chain_count,
        })
    }
}

/// Append one chain record to `buf`
pub fn encode_record(entry: &ChainEntry, buf: &mut Vec<u8>) {
    buf.push(entry.start.len() as u8);
    buf.extend_from_slice(entry.start.as_bytes());
    buf.extend_from_slice(entry.end_digest.as_bytes());
}

/// Stream a table in the persisted format
pub fn write_table<W: Write>(table: &Table, mut writer: W) -> io::Result<()> {
    writer.write_all(&table.header().to_bytes())?;

    let mut record = Vec::with_capacity(1 + table.charset().max_length() + table.algorithm().size());
    for entry in table.iter() {
        record.clear();
        encode_record(entry, &mut record);
        writer.write_all(&record)?;
    }

    writer.flush()
}

/// Read a table in the persisted format
///
/// The reader must end right after the last record.
pub fn read_table<R: Read>(reader: R) -> RainbowResult<Table> {
    read_table_with_validation(reader, &ValidationOptions::default())
}

/// Read a table, rejecting headers that do not match `options`
pub fn read_table_with_validation<R: Read>(
    mut reader: R,
    options: &ValidationOptions,
) -> RainbowResult<Table> {
    let header = TableHeader::read_from(&mut reader)?;
    validate_header(&header, options)?;
    read_records(reader, header)
}

/// Read the chain records following an already-parsed header
pub(crate) fn read_records<R: Read>(mut reader: R, header: TableHeader) -> RainbowResult<Table> {
    let config = header.config()?;
    let charset = header.charset.clone();
    let digest_size = header.algorithm.size();
    let capacity = usize::try_from(header.chain_count)
        .unwrap_or(usize::MAX)
        .min(MAX_PREALLOCATED_CHAINS);
    let mut table = Table::with_capacity(config, capacity);

    let mut plaintext = Vec::with_capacity(charset.max_length());
    let mut digest = vec![0u8; digest_size];

    for chain in 0..header.chain_count {
        let length = reader.read_u8().map_err(truncated("chain record"))? as usize;
        if length < charset.min_length() || length > charset.max_length() {
            return Err(RainbowError::CorruptTable(format!(
                "chain {}: plaintext length {} outside {}..={}",
                chain,
                length,
                charset.min_length(),
                charset.max_length()
            )));
        }

        plaintext.resize(length, 0);
        reader
            .read_exact(&mut plaintext)
            .map_err(truncated("chain record"))?;
        if !charset.contains(&plaintext) {
            return Err(RainbowError::CorruptTable(format!(
                "chain {}: plaintext contains symbols outside the alphabet",
                chain
            )));
        }

        reader
            .read_exact(&mut digest)
            .map_err(truncated("chain record"))?;

        table.insert(
            Plaintext::from_ascii(plaintext.clone()),
            Digest::new(digest.clone()),
        );
    }

    let mut probe = [0u8; 1];
    if reader.read(&mut probe)? != 0 {
        return Err(RainbowError::CorruptTable(format!(
            "trailing bytes after {} chains",
            header.chain_count
        )));
    }

    Ok(table)
}

/// Validation options for table loading
#[derive(Clone, Debug, Default)]
pub struct ValidationOptions {
    /// Expected digest algorithm (None = skip validation)
    pub expected_algorithm: Option<Algorithm>,
    /// Expected chain length (None = skip validation)
    pub expected_chain_length: Option<u32>,
    /// Require at least one chain
    pub require_chains: bool,
}

impl ValidationOptions {
    /// Create options for cracking digests of `algorithm`
    pub fn for_crack(algorithm: Algorithm) -> Self {
        Self {
            expected_algorithm: Some(algorithm),
            expected_chain_length: None,
            require_chains: true,
        }
    }

    /// Create options for inspection (no validation)
    pub fn for_inspection() -> Self {
        Self::default()
    }
}

/// Validate header against options
pub fn validate_header(header: &TableHeader, options: &ValidationOptions) -> RainbowResult<()> {
    if let Some(expected) = options.expected_algorithm
        && header.algorithm != expected
    {
        return Err(RainbowError::InvalidConfig(format!(
            "algorithm mismatch: expected {}, found {}",
            expected, header.algorithm
        )));
    }

    if let Some(expected) = options.expected_chain_length
        && header.chain_length != expected
    {
        return Err(RainbowError::InvalidConfig(format!(
            "chain length mismatch: expected {}, found {}",
            expected, header.chain_length
        )));
    }

    if options.require_chains && header.chain_count == 0 {
        return Err(RainbowError::InvalidConfig("table has no chains".to_string()));
    }

    Ok(())
}

fn read_ascii<R: Read>(reader: &mut R, len: usize, field: &str) -> RainbowResult<String> {
    let mut bytes = vec![0u8; len];
    reader.read_exact(&mut bytes).map_err(truncated("header"))?;
    if !bytes.is_ascii() {
        return Err(RainbowError::CorruptTable(format!("{} is not ASCII", field)));
    }
    Ok(bytes.into_iter().map(char::from).collect())
}

/// Map end-of-input to `CorruptTable`, pass other I/O errors through
fn truncated(section: &'static str) -> impl Fn(io::Error) -> RainbowError {
    move |e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            RainbowError::CorruptTable(format!("truncated {}", section))
        } else {
            RainbowError::Io(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        let charset = Charset::new("abc", 2, 4).unwrap();
        let config = TableConfig::new(Algorithm::Sha1, charset, 5).unwrap();
        let builder = config.chain_builder();
        let chains: Vec<_> = ["aa", "abc", "cccc"]
            .iter()
            .map(|text| builder.build_chain(config.charset().plaintext(text).unwrap(), 5))
            .collect();
        Table::from_chains(config, chains)
    }

    #[test]
    fn test_header_roundtrip() {
        let header = sample_table().header();
        let bytes = header.to_bytes();
        let restored = TableHeader::read_from(&mut bytes.as_slice()).unwrap();
        assert_eq!(header, restored);
    }

    #[test]
    fn test_header_layout() {
        let bytes = sample_table().header().to_bytes();
        assert_eq!(&bytes[0..8], &TABLE_MAGIC);
        assert_eq!(u16::from_le_bytes([bytes[8], bytes[9]]), FILE_FORMAT_VERSION);
        assert_eq!(bytes[10], 4);
        assert_eq!(&bytes[11..15], b"SHA1");
        assert_eq!(u16::from_le_bytes([bytes[15], bytes[16]]), 3);
        assert_eq!(&bytes[17..20], b"abc");
        assert_eq!(bytes[20], 2);
        assert_eq!(bytes[21], 4);
        assert_eq!(bytes.len(), 8 + 2 + 1 + 4 + 2 + 3 + 2 + 4 + 8);
    }

    #[test]
    fn test_invalid_magic() {
        let mut bytes = sample_table().serialize();
        bytes[0] = b'X';
        assert!(matches!(
            read_table(bytes.as_slice()),
            Err(RainbowError::CorruptTable(_))
        ));
    }

    #[test]
    fn test_unsupported_version() {
        let mut bytes = sample_table().serialize();
        bytes[8] = 99;
        assert!(matches!(
            read_table(bytes.as_slice()),
            Err(RainbowError::CorruptTable(msg)) if msg.contains("version")
        ));
    }

    #[test]
    fn test_write_table_matches_serialize() {
        let table = sample_table();
        let mut streamed = Vec::new();
        write_table(&table, &mut streamed).unwrap();
        assert_eq!(streamed, table.serialize());
    }

    #[test]
    fn test_validation_algorithm_mismatch() {
        let header = sample_table().header();
        let options = ValidationOptions::for_crack(Algorithm::Md5);
        assert!(matches!(
            validate_header(&header, &options),
            Err(RainbowError::InvalidConfig(_))
        ));
        assert!(validate_header(&header, &ValidationOptions::for_crack(Algorithm::Sha1)).is_ok());
    }

    #[test]
    fn test_validation_chain_length_mismatch() {
        let header = sample_table().header();
        let options = ValidationOptions {
            expected_chain_length: Some(6),
            ..Default::default()
        };
        assert!(validate_header(&header, &options).is_err());
    }

    #[test]
    fn test_validation_empty_table() {
        let config = sample_table().config().clone();
        let header = Table::new(config).header();
        assert!(validate_header(&header, &ValidationOptions::for_inspection()).is_ok());
        assert!(validate_header(&header, &ValidationOptions::for_crack(Algorithm::Sha1)).is_err());
    }
}
