//! Hashing for Bloom filters
//!
//! Items are normalised to bytes, digested by two independent hash functions,
//! and the `k` probe positions are derived by double hashing
//! (Kirsch and Mitzenmacher): `index_i = (h1 + i * h2) mod m`.
//!
//! Both digests are read as big-endian unsigned integers. They are wider than
//! any machine integer, so each is reduced modulo `m` one byte at a time
//! (Horner's method) before combining, which yields exactly the same residues as
//! arbitrary-precision arithmetic on the full digests.

use md5::Md5;
use sha2::{Digest, Sha256};
use std::borrow::Cow;
use std::fmt;

/// Values that can be inserted into or queried against a filter
///
/// Strings are encoded as UTF-8, byte sequences pass through unchanged, and
/// scalar values are hashed through their `Display` text.
pub trait FilterItem {
    fn to_filter_bytes(&self) -> Cow<'_, [u8]>;
}

impl FilterItem for str {
    fn to_filter_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl FilterItem for String {
    fn to_filter_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl FilterItem for [u8] {
    fn to_filter_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self)
    }
}

impl FilterItem for Vec<u8> {
    fn to_filter_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl<const N: usize> FilterItem for [u8; N] {
    fn to_filter_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl<T: FilterItem + ?Sized> FilterItem for &T {
    fn to_filter_bytes(&self) -> Cow<'_, [u8]> {
        (**self).to_filter_bytes()
    }
}

macro_rules! impl_display_item {
    ($($t:ty),*) => {
        $(
            impl FilterItem for $t {
                fn to_filter_bytes(&self) -> Cow<'_, [u8]> {
                    Cow::Owned(self.to_string().into_bytes())
                }
            }
        )*
    };
}

impl_display_item!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, bool, char);

/// Trait for the digest functions feeding the double hasher
pub trait HashFunction: Send + Sync {
    /// Digest the input bytes
    fn digest(&self, data: &[u8]) -> Vec<u8>;

    /// Get a name/identifier for this hash function
    fn name(&self) -> String;
}

/// SHA-256, 256-bit digest
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hash;

impl HashFunction for Sha256Hash {
    fn digest(&self, data: &[u8]) -> Vec<u8> {
        Sha256::digest(data).to_vec()
    }

    fn name(&self) -> String {
        "sha256".to_string()
    }
}

/// MD5, 128-bit digest
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Hash;

impl HashFunction for Md5Hash {
    fn digest(&self, data: &[u8]) -> Vec<u8> {
        Md5::digest(data).to_vec()
    }

    fn name(&self) -> String {
        "md5".to_string()
    }
}

/// Reduce a big-endian unsigned integer modulo `modulus`
///
/// `modulus` must be non-zero.
pub fn reduce_be(digest: &[u8], modulus: u64) -> u64 {
    let m = u128::from(modulus);
    digest
        .iter()
        .fold(0u128, |acc, &byte| ((acc << 8) | u128::from(byte)) % m) as u64
}

/// Generates probe positions from a pair of independent digests
pub struct DoubleHasher {
    primary: Box<dyn HashFunction>,
    secondary: Box<dyn HashFunction>,
}

impl DoubleHasher {
    /// Build a hasher from an explicit digest pair; `primary` supplies `h1`
    pub fn new(primary: Box<dyn HashFunction>, secondary: Box<dyn HashFunction>) -> Self {
        DoubleHasher { primary, secondary }
    }

    /// Positions `(h1 + i * h2) mod num_bits` for `i` in `0..num_hashes`
    ///
    /// `num_bits` must be non-zero.
    pub fn indices(&self, data: &[u8], num_bits: u64, num_hashes: usize) -> Indices {
        Indices {
            h1: reduce_be(&self.primary.digest(data), num_bits),
            h2: reduce_be(&self.secondary.digest(data), num_bits),
            modulus: num_bits,
            next: 0,
            count: num_hashes,
        }
    }

    /// Names of the digest pair, primary first
    pub fn names(&self) -> (String, String) {
        (self.primary.name(), self.secondary.name())
    }
}

impl Default for DoubleHasher {
    /// SHA-256 for `h1`, MD5 for `h2`
    fn default() -> Self {
        DoubleHasher::new(Box::new(Sha256Hash), Box::new(Md5Hash))
    }
}

impl fmt::Debug for DoubleHasher {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("DoubleHasher")
            .field("primary", &self.primary.name())
            .field("secondary", &self.secondary.name())
            .finish()
    }
}

/// Iterator over the probe positions of one item
#[derive(Debug, Clone)]
pub struct Indices {
    h1: u64,
    h2: u64,
    modulus: u64,
    next: usize,
    count: usize,
}

impl Iterator for Indices {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.next >= self.count {
            return None;
        }
        let i = self.next as u128;
        self.next += 1;
        let idx = (u128::from(self.h1) + i * u128::from(self.h2)) % u128::from(self.modulus);
        Some(idx as usize)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Indices {}
