//! rtcrack-rainbow - Rainbow table generation and digest cracking
//!
//! This crate provides functionality to:
//! - Map plaintexts over a configurable charset to and from a dense index space
//! - Build rainbow chains with MD5 or SHA1 and a step-dependent reduction function
//! - Store chains in a table indexed by end digest, persisted in a compact binary format
//! - Recover plaintexts from target digests by searching every chain position

pub mod app;
pub mod constants;
pub mod domain;
pub mod error;
pub mod infra;

// Re-export commonly used types
pub use app::cracker::{CrackRequest, CrackResponse, Cracker};
pub use app::generator::{GenerationRequest, generate_table};
pub use constants::*;
pub use domain::chain::{ChainBuilder, ChainEntry};
pub use domain::charset::{Charset, Plaintext};
pub use domain::digest::{Algorithm, Digest, DigestFunction};
pub use domain::reduction::reduce_digest;
pub use domain::table::{Table, TableConfig, TableStats};
pub use domain::table_format::ValidationOptions;
pub use error::{RainbowError, RainbowResult};

#[cfg(feature = "mmap")]
pub use infra::table_io::MappedTable;
