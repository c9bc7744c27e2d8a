//! Digest functions
//!
//! Chain building and cracking only see the [`DigestFunction`] capability.
//! [`Algorithm`] is the closed set of functions a table can be persisted with.

use crate::error::{RainbowError, RainbowResult};
use md5::{Digest as _, Md5};
use sha1::Sha1;
use std::fmt;
use std::str::FromStr;

/// Fixed-length digest bytes
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest(Vec<u8>);

impl Digest {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Parse a hex string (upper or lower case)
    pub fn from_hex(text: &str) -> RainbowResult<Self> {
        hex::decode(text.trim())
            .map(Self)
            .map_err(|e| RainbowError::InvalidDigest(format!("'{}': {}", text.trim(), e)))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl From<Vec<u8>> for Digest {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// Produces a fixed-length digest from bytes
pub trait DigestFunction: Send + Sync {
    fn digest(&self, input: &[u8]) -> Digest;

    /// Length in bytes of every digest this function returns
    fn digest_size(&self) -> usize;
}

/// Supported hash algorithms
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Md5,
    Sha1,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::Md5, Algorithm::Sha1];

    /// Tag written to table files
    pub fn tag(&self) -> &'static str {
        match self {
            Algorithm::Md5 => "MD5",
            Algorithm::Sha1 => "SHA1",
        }
    }

    pub fn hash(&self, input: &[u8]) -> Digest {
        match self {
            Algorithm::Md5 => Digest(Md5::digest(input).to_vec()),
            Algorithm::Sha1 => Digest(Sha1::digest(input).to_vec()),
        }
    }

    pub fn size(&self) -> usize {
        match self {
            Algorithm::Md5 => 16,
            Algorithm::Sha1 => 20,
        }
    }
}

impl DigestFunction for Algorithm {
    fn digest(&self, input: &[u8]) -> Digest {
        self.hash(input)
    }

    fn digest_size(&self) -> usize {
        self.size()
    }
}

impl FromStr for Algorithm {
    type Err = RainbowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(Algorithm::Md5),
            "sha1" | "sha-1" => Ok(Algorithm::Sha1),
            _ => Err(RainbowError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_md5_known_vector() {
        assert_eq!(
            Algorithm::Md5.hash(b"hello").to_hex(),
            "5d41402abc4b2a76b9719d911017c592"
        );
    }

    #[test]
    fn test_sha1_known_vector() {
        assert_eq!(
            Algorithm::Sha1.hash(b"aa").to_hex(),
            "e0c9035898dd52fc65c41454cec9c4d2611bfb37"
        );
    }

    #[test]
    fn test_digest_sizes() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.hash(b"x").len(), algorithm.digest_size());
        }
    }

    #[test]
    fn test_hash_deterministic() {
        assert_eq!(Algorithm::Sha1.hash(b"abc"), Algorithm::Sha1.hash(b"abc"));
        assert_ne!(Algorithm::Sha1.hash(b"abc"), Algorithm::Sha1.hash(b"abd"));
    }

    #[test]
    fn test_parse_algorithm() {
        assert_eq!("MD5".parse::<Algorithm>().unwrap(), Algorithm::Md5);
        assert_eq!("sha1".parse::<Algorithm>().unwrap(), Algorithm::Sha1);
        assert_eq!("SHA-1".parse::<Algorithm>().unwrap(), Algorithm::Sha1);
        assert!(matches!(
            "sha256".parse::<Algorithm>(),
            Err(RainbowError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn test_tag_round_trip() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.tag().parse::<Algorithm>().unwrap(), algorithm);
        }
    }

    #[test]
    fn test_digest_hex() {
        let digest = Digest::from_hex("5D41402ABC4B2A76B9719D911017C592").unwrap();
        assert_eq!(digest, Algorithm::Md5.hash(b"hello"));
        assert_eq!(digest.to_string(), "5d41402abc4b2a76b9719d911017c592");
        assert!(matches!(
            Digest::from_hex("xyz"),
            Err(RainbowError::InvalidDigest(_))
        ));
    }
}
