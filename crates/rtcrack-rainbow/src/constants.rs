//! Rainbow table related constants
//!
//! Defaults for generation requests, the persisted file format and the
//! named charsets accepted by `Charset::named`.

// =============================================================================
// Generation defaults
// =============================================================================

/// Default chain length (steps per chain)
pub const DEFAULT_CHAIN_LENGTH: u32 = 200;

/// Default number of chains per table
pub const DEFAULT_NUM_CHAINS: usize = 10_000;

/// Default minimum plaintext length
pub const DEFAULT_MIN_LENGTH: usize = 1;

/// Default maximum plaintext length
pub const DEFAULT_MAX_LENGTH: usize = 6;

/// Default charset name
pub const DEFAULT_CHARSET: &str = "alphanumeric";

/// Upper bound for `max_length` (plaintext lengths are stored as one byte)
pub const MAX_PLAINTEXT_LENGTH: usize = 64;

/// Largest plaintext space accepted by the coverage bitmap (2^32 bits = 512 MB)
pub const MAX_COVERAGE_SPACE: u64 = 1u64 << 32;

/// Progress callbacks fire roughly once per this many chains
pub const PROGRESS_INTERVAL: usize = 10_000;

// =============================================================================
// File format
// =============================================================================

/// Magic number identifying a table file
pub const TABLE_MAGIC: [u8; 8] = *b"RBOWTBL\0";

/// Current file format version
pub const FILE_FORMAT_VERSION: u16 = 1;

/// Conventional table file extension
pub const TABLE_FILE_EXTENSION: &str = "rt";

// =============================================================================
// Named charsets
// =============================================================================

const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";

/// Charsets selectable by name, as `(name, alphabet)` pairs
pub const NAMED_CHARSETS: [(&str, &str); 8] = [
    ("numeric", DIGITS),
    ("hex", "0123456789abcdef"),
    ("loweralpha", LOWER),
    ("upperalpha", UPPER),
    ("mixalpha", "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ"),
    ("loweralpha-numeric", "abcdefghijklmnopqrstuvwxyz0123456789"),
    (
        "alphanumeric",
        "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789",
    ),
    (
        "ascii-printable",
        " !\"#$%&'()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`abcdefghijklmnopqrstuvwxyz{|}~",
    ),
];

/// Look up the alphabet of a named charset
pub fn named_alphabet(name: &str) -> Option<&'static str> {
    NAMED_CHARSETS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, alphabet)| *alphabet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_alphabet_lookup() {
        assert_eq!(named_alphabet("numeric"), Some(DIGITS));
        assert_eq!(named_alphabet("alphanumeric").map(str::len), Some(62));
        assert_eq!(named_alphabet("ascii-printable").map(str::len), Some(95));
        assert_eq!(named_alphabet("klingon"), None);
    }

    #[test]
    fn test_magic_length() {
        assert_eq!(TABLE_MAGIC.len(), 8);
    }
}
