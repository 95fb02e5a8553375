//! Filter configuration

use crate::params::{optimal_bloom_parameters, BloomParameters};
use crate::{BloomFilter, Result};

/// Declared capacity and target false positive rate of a filter
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BloomConfig {
    pub capacity: i64,
    pub error_rate: f64,
}

impl Default for BloomConfig {
    fn default() -> Self {
        BloomConfig {
            capacity: 1000,
            error_rate: 0.01,
        }
    }
}

impl BloomConfig {
    pub fn new(capacity: i64, error_rate: f64) -> Self {
        BloomConfig {
            capacity,
            error_rate,
        }
    }

    /// Check the configuration and return the parameters it derives
    pub fn validate(&self) -> Result<BloomParameters> {
        optimal_bloom_parameters(self.capacity, self.error_rate)
    }

    pub fn build(&self) -> Result<BloomFilter> {
        BloomFilter::new(self.capacity, self.error_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BloomConfig::default();
        let params = config.validate().unwrap();
        assert_eq!(params.num_bits, 9586);

        let bloom = config.build().unwrap();
        assert_eq!(bloom.num_hashes(), 7);
    }

    #[test]
    fn test_invalid_config() {
        assert!(BloomConfig::new(0, 0.01).validate().is_err());
        assert!(BloomConfig::new(10, 1.0).build().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_with_defaults() {
        let config: BloomConfig = serde_json::from_str(r#"{"capacity": 5000}"#).unwrap();
        assert_eq!(config, BloomConfig::new(5000, 0.01));
    }
}
