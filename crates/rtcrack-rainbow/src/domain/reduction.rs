//! Reduction function
//!
//! Maps a digest and a chain step to a plaintext of the charset:
//! 1. fold the digest into a u64 (8-byte little-endian chunks, `rotl(23) ^ chunk`)
//! 2. add `step * 0x9e3779b97f4a7c15` and apply the SplitMix64 finalizer
//! 3. take the result modulo the charset's total space and decode it as a
//!    global counter, so shorter lengths are picked in proportion to their size

use crate::domain::charset::{Charset, Plaintext};
use crate::domain::digest::Digest;

/// Golden-ratio increment separating steps
const STEP_INCREMENT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Fold arbitrary digest bytes into a 64-bit seed
#[inline]
pub fn fold_digest(bytes: &[u8]) -> u64 {
    bytes.chunks(8).fold(0u64, |seed, chunk| {
        let mut buf = [0u8; 8];
        buf[..chunk.len()].copy_from_slice(chunk);
        seed.rotate_left(23) ^ u64::from_le_bytes(buf)
    })
}

/// Mix a step index into a folded seed
#[inline]
pub fn mix_step(seed: u64, step: u32) -> u64 {
    let mut h = seed.wrapping_add((step as u64).wrapping_mul(STEP_INCREMENT));
    h = (h ^ (h >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    h = (h ^ (h >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    h ^ (h >> 31)
}

/// Reduce a digest at the given step into a plaintext of `charset`
#[inline]
pub fn reduce_digest(digest: &Digest, step: u32, charset: &Charset) -> Plaintext {
    let counter = mix_step(fold_digest(digest.as_bytes()), step) % charset.space_size();
    // counter < space_size, so decoding cannot fall through
    charset
        .decode_counter(counter)
        .unwrap_or_else(|| charset.decode_unchecked(0, charset.min_length()))
}
