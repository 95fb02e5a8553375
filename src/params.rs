//! Optimal Bloom filter sizing

use crate::{FerricError, Result};
use std::f64::consts::LN_2;

/// Filter dimensions derived from a capacity and target error rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomParameters {
    pub num_bits: usize,
    pub num_hashes: usize,
    /// False positive rate expected once `capacity` items are inserted
    pub expected_fpr: f64,
}

/// Calculate optimal Bloom filter parameters
///
/// ```text
/// m = ceil(-n * ln(p) / ln(2)^2)
/// k = max(1, round((m / n) * ln(2)))
/// ```
///
/// `k` rounds half to even.
pub fn optimal_bloom_parameters(capacity: i64, error_rate: f64) -> Result<BloomParameters> {
    if capacity <= 0 {
        return Err(FerricError::InvalidArgument(format!(
            "Capacity must be > 0, got {}",
            capacity
        )));
    }
    if !(error_rate > 0.0 && error_rate < 1.0) {
        return Err(FerricError::InvalidArgument(format!(
            "Error rate must be strictly between 0 and 1, got {}",
            error_rate
        )));
    }

    let n = capacity as f64;
    let ln2_squared = LN_2 * LN_2;
    let bits = (-n * error_rate.ln() / ln2_squared).ceil();
    if bits > i64::MAX as f64 {
        return Err(FerricError::InvalidArgument(format!(
            "Capacity {} with error rate {} needs more bits than addressable",
            capacity, error_rate
        )));
    }
    let num_bits = bits as usize;

    let num_hashes = (((num_bits as f64) / n) * LN_2).round_ties_even().max(1.0) as usize;

    Ok(BloomParameters {
        num_bits,
        num_hashes,
        expected_fpr: expected_fpr(num_bits, num_hashes, capacity as usize),
    })
}

/// Theoretical false positive rate after `inserted` items: `(1 - e^(-k n / m))^k`
pub fn expected_fpr(num_bits: usize, num_hashes: usize, inserted: usize) -> f64 {
    if num_bits == 0 || inserted == 0 {
        return 0.0;
    }
    let k = num_hashes as f64;
    let exponent = -k * inserted as f64 / num_bits as f64;
    (1.0 - exponent.exp()).powi(num_hashes as i32)
}
