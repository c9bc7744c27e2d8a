//! Plaintext coverage bitmap for tracking reachable plaintexts
//!
//! This module provides a bitmap data structure for tracking which plaintext
//! counters are reachable from a rainbow table. It uses atomic operations for
//! thread-safe concurrent access.

use std::sync::atomic::{AtomicU64, Ordering};

/// Plaintext reachability bitmap
///
/// One bit per global plaintext counter (see `Charset::decode_counter`).
/// Uses `AtomicU64` for thread-safe concurrent bit setting.
pub struct PlaintextBitmap {
    /// Bitmap storage (64 bits per element)
    bits: Vec<AtomicU64>,
    /// Number of valid bits
    size: u64,
}

impl PlaintextBitmap {
    /// Create a bitmap of `size` bits, all cleared
    pub fn new(size: u64) -> Self {
        let words = size.div_ceil(64) as usize;
        let bits = (0..words).map(|_| AtomicU64::new(0)).collect();
        Self { bits, size }
    }

    /// Number of tracked counters
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Set the bit for the specified counter (thread-safe)
    #[inline]
    pub fn set(&self, counter: u64) {
        debug_assert!(counter < self.size);
        let index = (counter / 64) as usize;
        let bit = 1u64 << (counter % 64);
        self.bits[index].fetch_or(bit, Ordering::Relaxed);
    }

    /// Check if the specified counter is reachable
    #[inline]
    pub fn is_set(&self, counter: u64) -> bool {
        if counter >= self.size {
            return false;
        }
        let index = (counter / 64) as usize;
        let bit = 1u64 << (counter % 64);
        (self.bits[index].load(Ordering::Relaxed) & bit) != 0
    }

    /// Count the number of reachable counters
    pub fn count_reachable(&self) -> u64 {
        self.bits
            .iter()
            .map(|atomic| atomic.load(Ordering::Relaxed).count_ones() as u64)
            .sum()
    }

    /// Count the number of missing counters
    pub fn count_missing(&self) -> u64 {
        self.size - self.count_reachable()
    }

    /// Iterate over counters whose bit is clear, in ascending order
    pub fn missing(&self) -> impl Iterator<Item = u64> + '_ {
        let size = self.size;
        self.bits
            .iter()
            .enumerate()
            .filter_map(|(i, atomic)| {
                let bits = atomic.load(Ordering::Relaxed);
                // All bits set, no missing counters in this block
                (bits != u64::MAX).then_some((i as u64 * 64, bits))
            })
            .flat_map(|(base, bits)| {
                (0..64u64)
                    .filter(move |bit| bits & (1u64 << bit) == 0)
                    .map(move |bit| base + bit)
            })
            .take_while(move |&counter| counter < size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitmap_new_all_zero() {
        let bitmap = PlaintextBitmap::new(1000);
        assert!(!bitmap.is_set(0));
        assert!(!bitmap.is_set(999));
        assert_eq!(bitmap.count_reachable(), 0);
        assert_eq!(bitmap.count_missing(), 1000);
    }

    #[test]
    fn test_bitmap_set_and_get() {
        let bitmap = PlaintextBitmap::new(100);

        bitmap.set(42);
        assert!(bitmap.is_set(42));
        assert!(!bitmap.is_set(41));
        assert!(!bitmap.is_set(43));
    }

    #[test]
    fn test_bitmap_boundary_values() {
        let bitmap = PlaintextBitmap::new(130);

        bitmap.set(0);
        bitmap.set(63);
        bitmap.set(64);
        bitmap.set(129);

        assert!(bitmap.is_set(0));
        assert!(bitmap.is_set(63));
        assert!(bitmap.is_set(64));
        assert!(bitmap.is_set(129));
        assert!(!bitmap.is_set(130));
        assert_eq!(bitmap.count_reachable(), 4);
    }

    #[test]
    fn test_bitmap_set_idempotent() {
        let bitmap = PlaintextBitmap::new(10);
        bitmap.set(3);
        bitmap.set(3);
        assert_eq!(bitmap.count_reachable(), 1);
    }

    #[test]
    fn test_missing_stops_at_size() {
        let bitmap = PlaintextBitmap::new(70);
        for counter in 0..70 {
            if counter != 5 && counter != 68 {
                bitmap.set(counter);
            }
        }
        let missing: Vec<u64> = bitmap.missing().collect();
        assert_eq!(missing, vec![5, 68]);
        assert_eq!(bitmap.count_missing(), 2);
    }

    #[test]
    fn test_missing_full_block_skipped() {
        let bitmap = PlaintextBitmap::new(128);
        for counter in 0..64 {
            bitmap.set(counter);
        }
        assert_eq!(bitmap.missing().next(), Some(64));
        assert_eq!(bitmap.missing().count(), 64);
    }
}
