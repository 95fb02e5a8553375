//! Fixed-length, byte-packed bit set
//!
//! Bit `i` lives in byte `i / 8` under mask `1 << (i % 8)`, so the backing
//! storage is exactly `ceil(size / 8)` bytes.

use crate::{FerricError, Result};
use bit_vec::BitVec;

/// A fixed-size array of bits with checked accessors
#[derive(Debug, Clone, PartialEq)]
pub struct BitSet {
    bits: BitVec<u8>,
}

impl BitSet {
    /// Create a zeroed bit set holding `size` bits
    ///
    /// Fails with [`FerricError::InvalidArgument`] unless `size > 0`.
    pub fn new(size: i64) -> Result<Self> {
        if size <= 0 {
            return Err(FerricError::InvalidArgument(format!(
                "Bit set size must be > 0, got {}",
                size
            )));
        }
        let size = usize::try_from(size).map_err(|_| {
            FerricError::InvalidArgument(format!("Bit set size {} exceeds address space", size))
        })?;

        // Fail before bit_vec aborts on an impossible allocation
        let mut storage: Vec<u8> = Vec::new();
        storage.try_reserve_exact(size.div_ceil(8)).map_err(|e| {
            FerricError::InvalidArgument(format!(
                "Bit set of {} bits cannot be allocated: {}",
                size, e
            ))
        })?;
        drop(storage);

        Ok(BitSet {
            bits: zeroed(size),
        })
    }

    fn check_index(&self, index: i64) -> Result<usize> {
        match usize::try_from(index) {
            Ok(i) if i < self.bits.len() => Ok(i),
            _ => Err(FerricError::IndexOutOfRange {
                index,
                size: self.bits.len(),
            }),
        }
    }

    /// Turn the bit at `index` on
    pub fn set(&mut self, index: i64) -> Result<()> {
        let i = self.check_index(index)?;
        self.bits.set(i, true);
        Ok(())
    }

    /// Turn the bit at `index` off
    pub fn clear(&mut self, index: i64) -> Result<()> {
        let i = self.check_index(index)?;
        self.bits.set(i, false);
        Ok(())
    }

    /// Whether the bit at `index` is on
    pub fn get(&self, index: i64) -> Result<bool> {
        let i = self.check_index(index)?;
        Ok(self.bits.get(i).unwrap_or(false))
    }

    /// Set a bit the caller already knows is in range
    pub(crate) fn set_bit(&mut self, i: usize) {
        self.bits.set(i, true);
    }

    /// Read a bit the caller already knows is in range
    pub(crate) fn bit(&self, i: usize) -> bool {
        self.bits.get(i).unwrap_or(false)
    }

    /// Reset every bit to 0
    pub fn clear_all(&mut self) {
        self.bits = zeroed(self.bits.len());
    }

    /// Number of bits set to 1
    pub fn bit_count(&self) -> usize {
        self.bits
            .storage()
            .iter()
            .map(|byte| byte.count_ones() as usize)
            .sum()
    }

    /// Fraction of bits set, in `[0, 1]`
    pub fn fill_ratio(&self) -> f64 {
        if self.bits.is_empty() {
            return 0.0;
        }
        self.bit_count() as f64 / self.bits.len() as f64
    }

    /// Total number of addressable bits
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Always false for a constructed bit set
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// The packed backing bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.bits.storage()
    }

    /// The first `min(n, len)` bits, for visualisation
    pub fn sample(&self, n: usize) -> Vec<bool> {
        self.bits.iter().take(n).collect()
    }
}

fn zeroed(size: usize) -> BitVec<u8> {
    let mut bits = BitVec::<u8>::default();
    bits.grow(size, false);
    bits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_non_positive_size() {
        assert!(matches!(
            BitSet::new(0),
            Err(FerricError::InvalidArgument(_))
        ));
        assert!(matches!(
            BitSet::new(-3),
            Err(FerricError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_new_rejects_unallocatable_size() {
        assert!(matches!(
            BitSet::new(i64::MAX),
            Err(FerricError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_storage_is_byte_packed() {
        assert_eq!(BitSet::new(1).unwrap().as_bytes().len(), 1);
        assert_eq!(BitSet::new(8).unwrap().as_bytes().len(), 1);
        assert_eq!(BitSet::new(9).unwrap().as_bytes().len(), 2);

        let bits = BitSet::new(9586).unwrap();
        assert_eq!(bits.as_bytes().len(), 1199);
        assert!(bits.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_set_get_clear() {
        let mut bits = BitSet::new(20).unwrap();

        bits.set(0).unwrap();
        bits.set(9).unwrap();
        bits.set(19).unwrap();

        assert!(bits.get(0).unwrap());
        assert!(bits.get(9).unwrap());
        assert!(bits.get(19).unwrap());
        assert!(!bits.get(1).unwrap());

        // Bit 9 is the second bit of the second byte
        assert_eq!(bits.as_bytes()[1], 0b0000_0010);

        bits.clear(9).unwrap();
        assert!(!bits.get(9).unwrap());
        assert_eq!(bits.bit_count(), 2);
    }

    #[test]
    fn test_bounds() {
        let mut bits = BitSet::new(10).unwrap();

        assert_eq!(
            bits.get(-1),
            Err(FerricError::IndexOutOfRange { index: -1, size: 10 })
        );
        assert_eq!(
            bits.set(10),
            Err(FerricError::IndexOutOfRange { index: 10, size: 10 })
        );
        assert!(bits.set(-1).is_err());
        assert!(bits.clear(10).is_err());
        assert!(bits.get(9).is_ok());
    }

    #[test]
    fn test_set_is_idempotent() {
        let mut bits = BitSet::new(16).unwrap();
        bits.set(5).unwrap();
        let once = bits.clone();
        bits.set(5).unwrap();
        assert_eq!(bits, once);
        assert_eq!(bits.bit_count(), 1);
    }

    #[test]
    fn test_clear_all_and_fill_ratio() {
        let mut bits = BitSet::new(10).unwrap();
        assert_eq!(bits.fill_ratio(), 0.0);

        for i in 0..5 {
            bits.set(i).unwrap();
        }
        assert_eq!(bits.bit_count(), 5);
        assert!((bits.fill_ratio() - 0.5).abs() < 1e-12);

        for i in 0..10 {
            bits.set(i).unwrap();
        }
        assert_eq!(bits.fill_ratio(), 1.0);

        bits.clear_all();
        assert_eq!(bits.bit_count(), 0);
        assert_eq!(bits.len(), 10);
    }

    #[test]
    fn test_sample() {
        let mut bits = BitSet::new(4).unwrap();
        bits.set(1).unwrap();
        assert_eq!(bits.sample(500), vec![false, true, false, false]);
        assert_eq!(bits.sample(2), vec![false, true]);
    }
}
