//! Bloom filter for SSTable negative lookups
//!
//! Each SSTable carries one filter over all of its keys (tombstones
//! included). A negative answer means the key is definitely absent from
//! that table; a positive answer means it might be present.
//!
//! Probes use double hashing, `h1 + i * h2`, with both hashes taken from
//! CRC32 under different seeds.

use crate::error::{Result, TinyTableError};

const SEED_PRIMARY: u32 = 0x9747_b28c;
const SEED_SECONDARY: u32 = 0x5bd1_e995;

/// Lower bound on filter size so tiny tables are not saturated
const MIN_BITS: usize = 64;

/// A fixed-size bloom filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloomFilter {
    bits: Vec<u8>,
    num_probes: u32,
}

impl BloomFilter {
    /// Size a filter for `expected_keys` at `bits_per_key`
    pub fn new(expected_keys: usize, bits_per_key: usize) -> Self {
        let num_bits = (expected_keys * bits_per_key).max(MIN_BITS);
        // k = bits_per_key * ln(2) minimises the false positive rate
        let num_probes = ((bits_per_key as f64) * 0.69) as u32;

        Self {
            bits: vec![0u8; num_bits.div_ceil(8)],
            num_probes: num_probes.clamp(1, 30),
        }
    }

    /// Record a key
    pub fn insert(&mut self, key: &[u8]) {
        let num_bits = self.num_bits();
        for bit in Self::probes(key, self.num_probes, num_bits) {
            self.bits[bit / 8] |= 1 << (bit % 8);
        }
    }

    /// `false` only if the key was never inserted
    pub fn may_contain(&self, key: &[u8]) -> bool {
        let num_bits = self.num_bits();
        Self::probes(key, self.num_probes, num_bits)
            .all(|bit| self.bits[bit / 8] & (1 << (bit % 8)) != 0)
    }

    /// Encoded form: `[num_probes u8][bit array]`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(1 + self.bits.len());
        bytes.push(self.num_probes as u8);
        bytes.extend_from_slice(&self.bits);
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match bytes.split_first() {
            Some((&num_probes, bits)) if num_probes > 0 && !bits.is_empty() => Ok(Self {
                bits: bits.to_vec(),
                num_probes: num_probes as u32,
            }),
            _ => Err(TinyTableError::Storage(format!(
                "malformed bloom filter block ({} bytes)",
                bytes.len()
            ))),
        }
    }

    fn num_bits(&self) -> usize {
        self.bits.len() * 8
    }

    fn probes(key: &[u8], num_probes: u32, num_bits: usize) -> impl Iterator<Item = usize> {
        let h1 = Self::hash(key, SEED_PRIMARY) as u64;
        let h2 = Self::hash(key, SEED_SECONDARY) as u64 | 1;
        (0..num_probes as u64)
            .map(move |i| (h1.wrapping_add(i.wrapping_mul(h2)) % num_bits as u64) as usize)
    }

    fn hash(key: &[u8], seed: u32) -> u32 {
        let mut hasher = crc32fast::Hasher::new_with_initial(seed);
        hasher.update(key);
        hasher.finalize()
    }
}
