//! # Ferric Bloom
//!
//! A fixed-memory Bloom filter for approximate set membership.
//! The filter is sized from a declared capacity and target false positive rate,
//! and derives its `k` probe positions by double hashing a SHA-256 and an MD5 digest.

pub mod bitset;
pub mod bloom;
pub mod config;
pub mod hash;
pub mod params;

pub use bitset::BitSet;
pub use bloom::{BloomFilter, BloomStats};
pub use config::BloomConfig;
pub use hash::{DoubleHasher, FilterItem, HashFunction, Md5Hash, Sha256Hash};
pub use params::{optimal_bloom_parameters, BloomParameters};

// Python bindings
#[cfg(feature = "python")]
pub mod python_module;

/// Common error types for the library
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FerricError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Index {index} out of range for bit set of size {size}")]
    IndexOutOfRange { index: i64, size: usize },
}

pub type Result<T> = std::result::Result<T, FerricError>;
