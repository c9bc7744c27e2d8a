//! Chain operations implementation
//!
//! A chain alternates digest and reduction. Position `i` holds
//! `plaintext_i` and `digest_i = H(plaintext_i)`, and
//! `plaintext_{i+1} = reduce(digest_i, i)`. A chain of length `L` performs
//! `L` digests; only `plaintext_0` and `digest_{L-1}` are persisted.

use crate::domain::charset::{Charset, Plaintext};
use crate::domain::digest::{Algorithm, Digest, DigestFunction};
use crate::domain::reduction::reduce_digest;

/// Chain entry structure
///
/// File format: (start plaintext, end digest)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainEntry {
    /// Starting plaintext of the chain
    pub start: Plaintext,
    /// Digest at the last position of the chain
    pub end_digest: Digest,
}

impl ChainEntry {
    /// Create a new chain entry
    pub fn new(start: Plaintext, end_digest: Digest) -> Self {
        Self { start, end_digest }
    }
}

/// Drives a digest function and the reduction function over a charset
#[derive(Clone, Debug)]
pub struct ChainBuilder<'a, H = Algorithm> {
    hasher: H,
    charset: &'a Charset,
}

impl<'a, H: DigestFunction> ChainBuilder<'a, H> {
    pub fn new(hasher: H, charset: &'a Charset) -> Self {
        Self { hasher, charset }
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    pub fn charset(&self) -> &'a Charset {
        self.charset
    }

    #[inline]
    pub fn hash(&self, plaintext: &Plaintext) -> Digest {
        self.hasher.digest(plaintext.as_bytes())
    }

    #[inline]
    pub fn reduce(&self, digest: &Digest, step: u32) -> Plaintext {
        reduce_digest(digest, step, self.charset)
    }

    /// Compute a single chain
    ///
    /// Starting from `start`, alternate digest and reduction so that exactly
    /// `chain_length` digests are computed, and return the final digest
    /// together with the start.
    pub fn build_chain(&self, start: Plaintext, chain_length: u32) -> ChainEntry {
        let end_digest = self.advance(&start, 0, chain_length);
        ChainEntry { start, end_digest }
    }

    /// Replay a chain forward from an intermediate position
    ///
    /// # Arguments
    /// * `plaintext` - The plaintext sitting at position `from_step`
    /// * `from_step` - Position of `plaintext` in the chain
    /// * `to_step` - Chain length; the digest at position `to_step - 1` is returned
    ///
    /// # Returns
    /// The digest at position `to_step - 1`, or the digest of `plaintext`
    /// itself when `from_step >= to_step - 1`.
    pub fn advance(&self, plaintext: &Plaintext, from_step: u32, to_step: u32) -> Digest {
        let mut digest = self.hash(plaintext);
        for step in from_step..to_step.saturating_sub(1) {
            let next = self.reduce(&digest, step);
            digest = self.hash(&next);
        }
        digest
    }

    /// Walk a chain from its start looking for a plaintext hashing to `target`
    ///
    /// # Returns
    /// `Some(plaintext)` at the first position whose digest equals `target`,
    /// `None` when the whole chain was walked without a match (false alarm).
    pub fn find_in_chain(
        &self,
        start: &Plaintext,
        chain_length: u32,
        target: &Digest,
    ) -> Option<Plaintext> {
        self.walk(start.clone(), chain_length)
            .find(|(_, digest)| digest == target)
            .map(|(plaintext, _)| plaintext)
    }

    /// Enumerate every (plaintext, digest) position of a chain
    pub fn walk(&self, start: Plaintext, chain_length: u32) -> ChainWalk<'_, 'a, H> {
        ChainWalk {
            builder: self,
            next: Some(start),
            step: 0,
            chain_length,
        }
    }
}

/// Iterator over the positions of one chain, see [`ChainBuilder::walk`]
pub struct ChainWalk<'b, 'a, H> {
    builder: &'b ChainBuilder<'a, H>,
    next: Option<Plaintext>,
    step: u32,
    chain_length: u32,
}

impl<H: DigestFunction> Iterator for ChainWalk<'_, '_, H> {
    type Item = (Plaintext, Digest);

    fn next(&mut self) -> Option<Self::Item> {
        if self.step >= self.chain_length {
            return None;
        }
        let plaintext = self.next.take()?;
        let digest = self.builder.hash(&plaintext);
        if self.step + 1 < self.chain_length {
            self.next = Some(self.builder.reduce(&digest, self.step));
        }
        self.step += 1;
        Some((plaintext, digest))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.chain_length.saturating_sub(self.step) as usize;
        (remaining, Some(remaining))
    }
}
