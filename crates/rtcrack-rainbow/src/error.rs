//! Error types shared by every layer of the crate

use std::io;
use thiserror::Error;

/// Errors produced while configuring, generating, persisting or cracking tables
#[derive(Debug, Error)]
pub enum RainbowError {
    /// Alphabet or length range cannot describe a plaintext space
    #[error("invalid charset: {0}")]
    InvalidCharset(String),

    /// Table parameters are outside their supported range
    #[error("invalid table configuration: {0}")]
    InvalidConfig(String),

    /// A string does not belong to the configured charset
    #[error("invalid plaintext: {0}")]
    InvalidPlaintext(String),

    /// Target digest is not valid hex or has the wrong size
    #[error("invalid digest: {0}")]
    InvalidDigest(String),

    /// Persisted table is truncated or internally inconsistent
    #[error("corrupt table: {0}")]
    CorruptTable(String),

    /// Algorithm tag is not one of MD5 / SHA1
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// No chain in the table covers the target digest
    #[error("digest not found in table")]
    NotFound,

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result alias used throughout the crate
pub type RainbowResult<T> = Result<T, RainbowError>;
