//! Standard Bloom filter implementation
//!
//! A space-efficient probabilistic data structure for membership testing.
//! Sized once from a capacity and target error rate; never resized, and items
//! are never removed.

use crate::bitset::BitSet;
use crate::hash::{DoubleHasher, FilterItem, Indices};
use crate::params::{expected_fpr, optimal_bloom_parameters};
use crate::Result;
use tracing::{debug, trace};

/// A standard Bloom filter
#[derive(Debug)]
pub struct BloomFilter {
    /// Bit array storing the filter data
    bits: BitSet,
    /// Digest pair used to derive probe positions
    hasher: DoubleHasher,
    capacity: usize,
    error_rate: f64,
    /// Number of hash functions (k)
    num_hashes: usize,
    /// Number of add calls, duplicates included
    count: usize,
}

impl BloomFilter {
    /// Create a new Bloom filter
    ///
    /// # Arguments
    /// * `capacity` - Expected number of elements to insert
    /// * `error_rate` - Target false positive rate, strictly between 0 and 1
    ///
    /// The bit array size and number of hash functions are derived with
    /// [`optimal_bloom_parameters`].
    pub fn new(capacity: i64, error_rate: f64) -> Result<Self> {
        Self::with_hasher(capacity, error_rate, DoubleHasher::default())
    }

    /// Create a Bloom filter that derives positions from a custom digest pair
    pub fn with_hasher(capacity: i64, error_rate: f64, hasher: DoubleHasher) -> Result<Self> {
        let params = optimal_bloom_parameters(capacity, error_rate)?;
        let bits = BitSet::new(params.num_bits as i64)?;

        debug!(
            capacity,
            error_rate,
            num_bits = params.num_bits,
            num_hashes = params.num_hashes,
            ?hasher,
            "created bloom filter"
        );

        Ok(BloomFilter {
            bits,
            hasher,
            capacity: capacity as usize,
            error_rate,
            num_hashes: params.num_hashes,
            count: 0,
        })
    }

    fn indices<T: FilterItem + ?Sized>(&self, item: &T) -> Indices {
        self.hasher.indices(
            &item.to_filter_bytes(),
            self.bits.len() as u64,
            self.num_hashes,
        )
    }

    /// Insert an item into the filter
    ///
    /// Always increments the element count, even if the item was already present.
    pub fn add<T: FilterItem + ?Sized>(&mut self, item: &T) {
        for idx in self.indices(item) {
            self.bits.set_bit(idx);
        }
        self.count += 1;
        trace!(count = self.count, "added item");
    }

    /// Check if an item might be in the filter
    /// Returns true if the item might be present (with possible false positives)
    /// Returns false if the item is definitely not present
    pub fn contains<T: FilterItem + ?Sized>(&self, item: &T) -> bool {
        self.indices(item).all(|idx| self.bits.bit(idx))
    }

    /// The `k` bit positions an item maps to, in probe order
    pub fn hash_indices<T: FilterItem + ?Sized>(&self, item: &T) -> Vec<usize> {
        self.indices(item).collect()
    }

    /// Each probe position of an item paired with its current bit value
    pub fn probe<T: FilterItem + ?Sized>(&self, item: &T) -> Vec<(usize, bool)> {
        self.indices(item)
            .map(|idx| (idx, self.bits.bit(idx)))
            .collect()
    }

    /// Number of add calls so far
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of bits set
    pub fn bit_count(&self) -> usize {
        self.bits.bit_count()
    }

    /// Fraction of bits set
    pub fn fill_ratio(&self) -> f64 {
        self.bits.fill_ratio()
    }

    /// Theoretical false positive rate at the current element count
    pub fn estimated_fpr(&self) -> f64 {
        expected_fpr(self.bits.len(), self.num_hashes, self.count)
    }

    /// Declared capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Target false positive rate
    pub fn error_rate(&self) -> f64 {
        self.error_rate
    }

    /// Size of the bit array (m)
    pub fn num_bits(&self) -> usize {
        self.bits.len()
    }

    /// Get the number of hash functions (k)
    pub fn num_hashes(&self) -> usize {
        self.num_hashes
    }

    /// Bits of storage per declared element
    pub fn bits_per_element(&self) -> f64 {
        self.bits.len() as f64 / self.capacity as f64
    }

    /// Bytes backing the bit array
    pub fn memory_bytes(&self) -> usize {
        self.bits.as_bytes().len()
    }

    /// Read-only view of the bit array
    pub fn bits(&self) -> &BitSet {
        &self.bits
    }

    /// Get statistics about the filter
    pub fn stats(&self) -> BloomStats {
        BloomStats {
            capacity: self.capacity,
            error_rate: self.error_rate,
            bits_total: self.bits.len(),
            bits_on: self.bit_count(),
            fill_ratio_percent: percent(self.fill_ratio()),
            hash_functions: self.num_hashes,
            elements_added: self.count,
        }
    }
}

/// Ratio as a percentage rounded half-to-even to two decimals
fn percent(ratio: f64) -> f64 {
    (ratio * 100.0 * 100.0).round_ties_even() / 100.0
}

/// Statistics about a Bloom filter
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BloomStats {
    pub capacity: usize,
    pub error_rate: f64,
    pub bits_total: usize,
    pub bits_on: usize,
    /// Percentage of bits set, rounded to two decimals
    pub fill_ratio_percent: f64,
    pub hash_functions: usize,
    pub elements_added: usize,
}

impl std::fmt::Display for BloomStats {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "BloomFilter Stats:\n\
             - Capacity: {} elements\n\
             - Error rate: {}\n\
             - Bits: {} on / {} total ({:.2}%)\n\
             - Hash functions: {}\n\
             - Elements added: {}",
            self.capacity,
            self.error_rate,
            self.bits_on,
            self.bits_total,
            self.fill_ratio_percent,
            self.hash_functions,
            self.elements_added
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::{HashFunction, Md5Hash, Sha256Hash};
    use crate::FerricError;

    #[test]
    fn test_bloom_filter_basic() {
        let mut bloom = BloomFilter::new(1000, 0.01).unwrap();

        assert_eq!(bloom.num_bits(), 9586);
        assert_eq!(bloom.num_hashes(), 7);

        bloom.add("alpha");
        bloom.add("beta");
        bloom.add(&String::from("gamma"));

        assert!(bloom.contains("alpha"));
        assert!(bloom.contains("beta"));
        assert!(bloom.contains("gamma"));

        // The fill ratio should be > 0 after insertions
        assert!(bloom.fill_ratio() > 0.0);
    }

    #[test]
    fn test_bloom_filter_false_negatives() {
        let mut bloom = BloomFilter::new(1000, 0.01).unwrap();

        // Nothing is set in a fresh filter
        let item = "definitely-missing";
        assert!(!bloom.contains(item));

        bloom.add(item);
        assert!(bloom.contains(item));
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        for (capacity, rate) in [(0, 0.01), (-5, 0.01), (10, 0.0), (10, 1.0)] {
            assert!(matches!(
                BloomFilter::new(capacity, rate),
                Err(FerricError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_str_and_bytes_hash_alike() {
        let mut bloom = BloomFilter::new(100, 0.01).unwrap();
        bloom.add("héllo");

        assert!(bloom.contains("héllo".as_bytes()));
        assert_eq!(
            bloom.hash_indices("héllo"),
            bloom.hash_indices(&"héllo".as_bytes().to_vec())
        );
    }

    #[test]
    fn test_scalars_hash_as_text() {
        let mut bloom = BloomFilter::new(100, 0.01).unwrap();
        bloom.add(&42u64);

        assert!(bloom.contains("42"));
        assert_eq!(bloom.hash_indices(&42i32), bloom.hash_indices("42"));
    }

    #[test]
    fn test_duplicate_add_counts_twice() {
        let mut bloom = BloomFilter::new(100, 0.01).unwrap();

        bloom.add("same");
        let pattern = bloom.bits().clone();
        bloom.add("same");

        assert_eq!(bloom.bits(), &pattern);
        assert_eq!(bloom.len(), 2);
    }

    #[test]
    fn test_hash_indices_and_probe() {
        let mut bloom = BloomFilter::new(1000, 0.01).unwrap();
        let indices = bloom.hash_indices("word");

        assert_eq!(indices.len(), 7);
        assert!(indices.iter().all(|&i| i < 9586));
        assert!(bloom.probe("word").iter().all(|&(_, on)| !on));

        bloom.add("word");
        let probe = bloom.probe("word");
        assert_eq!(probe.iter().map(|&(i, _)| i).collect::<Vec<_>>(), indices);
        assert!(probe.iter().all(|&(_, on)| on));
    }

    #[test]
    fn test_bloom_filter_stats() {
        let mut bloom = BloomFilter::new(1000, 0.01).unwrap();

        for i in 0..100 {
            bloom.add(&format!("item-{}", i));
        }

        let stats = bloom.stats();
        assert_eq!(stats.capacity, 1000);
        assert_eq!(stats.error_rate, 0.01);
        assert_eq!(stats.bits_total, 9586);
        assert_eq!(stats.bits_on, bloom.bit_count());
        assert_eq!(stats.hash_functions, 7);
        assert_eq!(stats.elements_added, 100);
        assert!(stats.fill_ratio_percent > 0.0 && stats.fill_ratio_percent <= 100.0);
        assert!(bloom.estimated_fpr() > 0.0);

        let rendered = stats.to_string();
        assert!(rendered.contains("Elements added: 100"));
    }

    #[test]
    fn test_accessors() {
        let bloom = BloomFilter::new(1000, 0.01).unwrap();

        assert!(bloom.is_empty());
        assert_eq!(bloom.capacity(), 1000);
        assert_eq!(bloom.error_rate(), 0.01);
        assert_eq!(bloom.memory_bytes(), 1199);
        assert!((bloom.bits_per_element() - 9.586).abs() < 1e-9);
        assert_eq!(bloom.estimated_fpr(), 0.0);
    }

    #[test]
    fn test_fill_percent_rounds_half_to_even() {
        // 1594 / 1600 = 99.625%
        assert_eq!(percent(1594.0 / 1600.0), 99.62);
        assert_eq!(percent(1.0 / 8.0), 12.5);
        assert_eq!(percent(0.0), 0.0);
        assert_eq!(percent(1.0), 100.0);
    }

    #[test]
    fn test_unallocatable_capacity_is_an_error() {
        assert!(matches!(
            BloomFilter::new(100_000_000_000_000_000, 0.01),
            Err(FerricError::InvalidArgument(_))
        ));
    }

    struct Reversed(Box<dyn HashFunction>);

    impl HashFunction for Reversed {
        fn digest(&self, data: &[u8]) -> Vec<u8> {
            let mut out = self.0.digest(data);
            out.reverse();
            out
        }

        fn name(&self) -> String {
            format!("reversed-{}", self.0.name())
        }
    }

    #[test]
    fn test_custom_hasher() {
        let hasher = DoubleHasher::new(
            Box::new(Reversed(Box::new(Sha256Hash))),
            Box::new(Md5Hash),
        );
        let mut custom = BloomFilter::with_hasher(1000, 0.01, hasher).unwrap();
        let standard = BloomFilter::new(1000, 0.01).unwrap();

        custom.add("x");
        assert!(custom.contains("x"));
        assert_ne!(custom.hash_indices("x"), standard.hash_indices("x"));
    }
}
