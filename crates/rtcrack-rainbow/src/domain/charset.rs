//! Charset codec
//!
//! Maps plaintexts over an ASCII alphabet and a length range to and from a
//! dense integer space. Symbols are least-significant first: the first
//! character of a plaintext is the lowest digit of its index.
//!
//! Two index spaces are exposed:
//! - per length: `decode(index, length)` / `encode(plaintext)`
//! - global counter over every allowed length, shortest lengths first:
//!   `decode_counter(counter)` / `counter_of(plaintext)`

use crate::constants::{MAX_PLAINTEXT_LENGTH, named_alphabet};
use crate::error::{RainbowError, RainbowResult};
use rand::Rng;
use std::fmt;

/// A plaintext whose symbols and length belong to some charset
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Plaintext(String);

impl Plaintext {
    /// Build from ASCII bytes already known to belong to a charset
    pub(crate) fn from_ascii(bytes: Vec<u8>) -> Self {
        Self(bytes.into_iter().map(char::from).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Plaintext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<[u8]> for Plaintext {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Alphabet plus length range describing a plaintext space
///
/// Immutable once built. The alphabet is deduplicated (first occurrence
/// wins) and restricted to printable ASCII.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Charset {
    alphabet: String,
    min_length: usize,
    max_length: usize,
    /// Number of plaintexts of each length, indexed by `length - min_length`
    length_sizes: Vec<u64>,
    space_size: u64,
}

impl Charset {
    /// Create a charset from an explicit alphabet
    ///
    /// # Errors
    /// `InvalidCharset` when the alphabet is empty or not printable ASCII,
    /// when `min_length` is 0 or exceeds `max_length`, when `max_length`
    /// exceeds `MAX_PLAINTEXT_LENGTH`, or when the total number of
    /// plaintexts does not fit in a `u64`.
    pub fn new(alphabet: &str, min_length: usize, max_length: usize) -> RainbowResult<Self> {
        let mut symbols: Vec<u8> = Vec::with_capacity(alphabet.len());
        for c in alphabet.chars() {
            if !c.is_ascii() || c.is_ascii_control() {
                return Err(RainbowError::InvalidCharset(format!(
                    "symbol {:?} is not printable ASCII",
                    c
                )));
            }
            let byte = c as u8;
            if !symbols.contains(&byte) {
                symbols.push(byte);
            }
        }

        if symbols.is_empty() {
            return Err(RainbowError::InvalidCharset("alphabet is empty".to_string()));
        }
        if min_length == 0 {
            return Err(RainbowError::InvalidCharset(
                "minimum length must be at least 1".to_string(),
            ));
        }
        if min_length > max_length {
            return Err(RainbowError::InvalidCharset(format!(
                "minimum length {} exceeds maximum length {}",
                min_length, max_length
            )));
        }
        if max_length > MAX_PLAINTEXT_LENGTH {
            return Err(RainbowError::InvalidCharset(format!(
                "maximum length {} exceeds the supported limit of {}",
                max_length, MAX_PLAINTEXT_LENGTH
            )));
        }

        let too_large = || {
            RainbowError::InvalidCharset(format!(
                "plaintext space of {} symbols with lengths {}..={} does not fit in 64 bits",
                symbols.len(),
                min_length,
                max_length
            ))
        };

        let base = symbols.len() as u128;
        let mut length_sizes = Vec::with_capacity(max_length - min_length + 1);
        let mut total: u128 = 0;
        for length in min_length..=max_length {
            let size = base
                .checked_pow(length as u32)
                .filter(|size| *size <= u64::MAX as u128)
                .ok_or_else(too_large)?;
            total += size;
            if total > u64::MAX as u128 {
                return Err(too_large());
            }
            length_sizes.push(size as u64);
        }

        Ok(Self {
            alphabet: symbols.into_iter().map(char::from).collect(),
            min_length,
            max_length,
            length_sizes,
            space_size: total as u64,
        })
    }

    /// Create a charset from one of `NAMED_CHARSETS`
    pub fn named(name: &str, min_length: usize, max_length: usize) -> RainbowResult<Self> {
        let alphabet = named_alphabet(name).ok_or_else(|| {
            RainbowError::InvalidCharset(format!("unknown charset name '{}'", name))
        })?;
        Self::new(alphabet, min_length, max_length)
    }

    pub fn alphabet(&self) -> &str {
        &self.alphabet
    }

    /// Number of distinct symbols
    pub fn base(&self) -> u64 {
        self.alphabet.len() as u64
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Total number of plaintexts across every allowed length
    pub fn space_size(&self) -> u64 {
        self.space_size
    }

    /// Number of plaintexts of exactly `length` symbols
    pub fn length_space(&self, length: usize) -> Option<u64> {
        if length < self.min_length || length > self.max_length {
            return None;
        }
        Some(self.length_sizes[length - self.min_length])
    }

    /// Check whether `bytes` is a plaintext of this charset
    pub fn contains(&self, bytes: &[u8]) -> bool {
        (self.min_length..=self.max_length).contains(&bytes.len())
            && bytes.iter().all(|b| self.alphabet.as_bytes().contains(b))
    }

    /// Validate a string as a plaintext of this charset
    pub fn plaintext(&self, text: &str) -> RainbowResult<Plaintext> {
        if !self.contains(text.as_bytes()) {
            return Err(RainbowError::InvalidPlaintext(format!(
                "'{}' is not within charset {}",
                text, self
            )));
        }
        Ok(Plaintext(text.to_string()))
    }

    /// Decode an index in `[0, base^length)` into a plaintext of that length
    ///
    /// Returns `None` when the length is outside the range or the index is
    /// too large.
    pub fn decode(&self, index: u64, length: usize) -> Option<Plaintext> {
        let size = self.length_space(length)?;
        (index < size).then(|| self.decode_unchecked(index, length))
    }

    /// Encode a plaintext of this charset into its per-length index
    ///
    /// Exact inverse of [`Charset::decode`]. The plaintext must come from
    /// this charset.
    pub fn encode(&self, plaintext: &Plaintext) -> u64 {
        let base = self.base();
        plaintext
            .as_bytes()
            .iter()
            .rev()
            .fold(0u64, |acc, &b| acc * base + self.position(b))
    }

    /// Decode a global counter in `[0, space_size)` into a plaintext
    pub fn decode_counter(&self, counter: u64) -> Option<Plaintext> {
        let mut remaining = counter;
        for (offset, &size) in self.length_sizes.iter().enumerate() {
            if remaining < size {
                return Some(self.decode_unchecked(remaining, self.min_length + offset));
            }
            remaining -= size;
        }
        None
    }

    /// Global counter of a plaintext, the inverse of [`Charset::decode_counter`]
    pub fn counter_of(&self, plaintext: &Plaintext) -> u64 {
        let shorter = plaintext.len().saturating_sub(self.min_length);
        let offset: u64 = self.length_sizes.iter().take(shorter).sum();
        offset + self.encode(plaintext)
    }

    /// Draw a random plaintext: uniform length, then uniform index
    pub fn random_plaintext<R: Rng + ?Sized>(&self, rng: &mut R) -> Plaintext {
        let length = rng.gen_range(self.min_length..=self.max_length);
        let index = rng.gen_range(0..self.length_sizes[length - self.min_length]);
        self.decode_unchecked(index, length)
    }

    pub(crate) fn decode_unchecked(&self, mut index: u64, length: usize) -> Plaintext {
        let symbols = self.alphabet.as_bytes();
        let base = self.base();
        let mut bytes = Vec::with_capacity(length);
        for _ in 0..length {
            bytes.push(symbols[(index % base) as usize]);
            index /= base;
        }
        Plaintext::from_ascii(bytes)
    }

    fn position(&self, symbol: u8) -> u64 {
        self.alphabet
            .bytes()
            .position(|s| s == symbol)
            .unwrap_or(0) as u64
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" (length {}..={})",
            self.alphabet, self.min_length, self.max_length
        )
    }
}
