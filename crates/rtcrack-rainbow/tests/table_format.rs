//! Persisted table format tests
//!
//! Byte offsets below refer to a SHA1 table over alphabet "ab" (lengths 1..=3)
//! holding a single chain that starts at "aab":
//!
//! | bytes  | field                   |
//! |--------|-------------------------|
//! | 0..8   | magic                   |
//! | 8..10  | version                 |
//! | 10     | tag length (4)          |
//! | 11..15 | "SHA1"                  |
//! | 15..17 | alphabet length (2)     |
//! | 17..19 | "ab"                    |
//! | 19, 20 | min / max length        |
//! | 21..25 | chain length            |
//! | 25..33 | chain count             |
//! | 33..57 | record (1 + 3 + 20)     |

use rtcrack_rainbow::constants::{FILE_FORMAT_VERSION, TABLE_MAGIC};
use rtcrack_rainbow::domain::table_format::{TableHeader, ValidationOptions, read_table};
use rtcrack_rainbow::infra::table_io::{load_table_with_validation, save_table};
use rtcrack_rainbow::{Algorithm, Charset, RainbowError, Table, TableConfig};
use tempfile::TempDir;

fn single_chain_table() -> Table {
    let charset = Charset::new("ab", 1, 3).unwrap();
    let config = TableConfig::new(Algorithm::Sha1, charset, 4).unwrap();
    let start = config.charset().plaintext("aab").unwrap();
    let entry = config.chain_builder().build_chain(start, 4);
    Table::from_chains(config, [entry])
}

fn assert_corrupt(bytes: &[u8]) {
    let result = Table::deserialize(bytes);
    assert!(
        matches!(result, Err(RainbowError::CorruptTable(_))),
        "expected CorruptTable, got {:?}",
        result
    );
}

#[test]
fn test_layout_offsets() {
    let bytes = single_chain_table().serialize();
    assert_eq!(bytes.len(), 57);
    assert_eq!(&bytes[0..8], &TABLE_MAGIC);
    assert_eq!(u16::from_le_bytes([bytes[8], bytes[9]]), FILE_FORMAT_VERSION);
    assert_eq!(&bytes[11..15], b"SHA1");
    assert_eq!(&bytes[17..19], b"ab");
    assert_eq!((bytes[19], bytes[20]), (1, 3));
    assert_eq!(u32::from_le_bytes(bytes[21..25].try_into().unwrap()), 4);
    assert_eq!(u64::from_le_bytes(bytes[25..33].try_into().unwrap()), 1);
    assert_eq!(bytes[33], 3);
    assert_eq!(&bytes[34..37], b"aab");
    assert_eq!(
        hex::encode(&bytes[37..57]),
        "e0c9035898dd52fc65c41454cec9c4d2611bfb37"
    );
}

#[test]
fn test_round_trip_preserves_fields() {
    let table = single_chain_table();
    let restored = Table::deserialize(&table.serialize()).unwrap();

    assert_eq!(restored.algorithm(), table.algorithm());
    assert_eq!(restored.charset(), table.charset());
    assert_eq!(restored.chain_length(), table.chain_length());
    assert_eq!(restored.chains(), table.chains());
}

#[test]
fn test_round_trip_keeps_merged_chains() {
    let charset = Charset::new("ab", 1, 3).unwrap();
    let config = TableConfig::new(Algorithm::Md5, charset, 4).unwrap();
    let end = Algorithm::Md5.hash(b"shared");
    let mut table = Table::new(config.clone());
    table.insert(config.charset().plaintext("a").unwrap(), end.clone());
    table.insert(config.charset().plaintext("b").unwrap(), end.clone());

    let restored = Table::deserialize(&table.serialize()).unwrap();

    assert_eq!(restored.len(), 2);
    assert_eq!(restored.stats().merged_chains, 1);
    assert_eq!(restored.lookup_by_end_digest(&end).map(|p| p.as_str()), Some("a"));
}

#[test]
fn test_empty_input() {
    assert_corrupt(&[]);
}

#[test]
fn test_truncated_header() {
    let bytes = single_chain_table().serialize();
    assert_corrupt(&bytes[..20]);
}

#[test]
fn test_truncated_record() {
    let bytes = single_chain_table().serialize();
    assert_corrupt(&bytes[..bytes.len() - 1]);
    assert_corrupt(&bytes[..35]);
}

#[test]
fn test_trailing_bytes() {
    let mut bytes = single_chain_table().serialize();
    bytes.push(0);
    assert_corrupt(&bytes);
}

#[test]
fn test_chain_count_larger_than_records() {
    let mut bytes = single_chain_table().serialize();
    bytes[25..33].copy_from_slice(&2u64.to_le_bytes());
    assert_corrupt(&bytes);
}

#[test]
fn test_chain_count_smaller_than_records() {
    let mut bytes = single_chain_table().serialize();
    bytes[25..33].copy_from_slice(&0u64.to_le_bytes());
    assert_corrupt(&bytes);
}

#[test]
fn test_zero_chain_length() {
    let mut bytes = single_chain_table().serialize();
    bytes[21..25].copy_from_slice(&0u32.to_le_bytes());
    assert_corrupt(&bytes);
}

#[test]
fn test_plaintext_length_outside_range() {
    let mut bytes = single_chain_table().serialize();
    bytes[33] = 5;
    assert_corrupt(&bytes);
}

#[test]
fn test_plaintext_symbol_outside_alphabet() {
    let mut bytes = single_chain_table().serialize();
    bytes[34] = b'z';
    assert_corrupt(&bytes);
}

#[test]
fn test_inverted_length_range() {
    let mut bytes = single_chain_table().serialize();
    bytes[19] = 3;
    bytes[20] = 1;
    assert_corrupt(&bytes);
}

#[test]
fn test_unknown_algorithm_tag() {
    let mut bytes = single_chain_table().serialize();
    bytes[11..15].copy_from_slice(b"SHA9");
    let result = Table::deserialize(&bytes);
    assert!(
        matches!(&result, Err(RainbowError::UnsupportedAlgorithm(tag)) if tag == "SHA9"),
        "got {:?}",
        result
    );
}

#[test]
fn test_header_reader_stops_at_records() {
    let bytes = single_chain_table().serialize();
    let mut cursor = bytes.as_slice();
    let header = TableHeader::read_from(&mut cursor).unwrap();
    assert_eq!(header.chain_count, 1);
    assert_eq!(cursor.len(), 24);
}

#[test]
fn test_read_table_from_reader() {
    let table = single_chain_table();
    let bytes = table.serialize();
    assert_eq!(read_table(std::io::Cursor::new(bytes)).unwrap(), table);
}

#[test]
fn test_file_validation_for_crack() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("single.rt");
    save_table(&path, &single_chain_table()).expect("Failed to save");

    let ok = load_table_with_validation(&path, &ValidationOptions::for_crack(Algorithm::Sha1));
    assert!(ok.is_ok());

    let mismatch = load_table_with_validation(&path, &ValidationOptions::for_crack(Algorithm::Md5));
    assert!(matches!(mismatch, Err(RainbowError::InvalidConfig(_))));
}
