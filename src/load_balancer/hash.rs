//! Client address hashing.
//!
//! 32-bit FNV-1 (multiply, then xor) over the raw bytes of the address
//! string. Deterministic across processes and platforms, which keeps a
//! client pinned to the same backend for as long as the healthy set is
//! unchanged.
//!
//! Hashing an in-memory byte slice cannot fail, so there is no fallback
//! path: every address yields a real hash.

use std::hash::Hasher;

const OFFSET_BASIS: u32 = 0x811c_9dc5;
const PRIME: u32 = 0x0100_0193;

/// Streaming FNV-1 32-bit hasher.
#[derive(Debug, Clone, Copy)]
pub struct Fnv1Hasher(u32);

impl Fnv1Hasher {
    pub fn new() -> Self {
        Self(OFFSET_BASIS)
    }

    pub fn finish32(&self) -> u32 {
        self.0
    }
}

impl Default for Fnv1Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for Fnv1Hasher {
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.0 = self.0.wrapping_mul(PRIME);
            self.0 ^= u32::from(byte);
        }
    }

    fn finish(&self) -> u64 {
        u64::from(self.0)
    }
}

/// FNV-1 32-bit hash of `bytes`.
pub fn fnv1_32(bytes: &[u8]) -> u32 {
    let mut hasher = Fnv1Hasher::new();
    hasher.write(bytes);
    hasher.finish32()
}

/// Hash of a client address as it appears on the wire (`ip:port`).
pub fn hash_address(address: &str) -> u32 {
    fnv1_32(address.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_offset_basis() {
        assert_eq!(fnv1_32(b""), OFFSET_BASIS);
    }

    #[test]
    fn reference_vectors() {
        // Published FNV-1 32-bit test vectors.
        assert_eq!(fnv1_32(b"a"), 0x050c_5d7e);
        assert_eq!(fnv1_32(b"foobar"), 0x31f0_b262);
    }

    #[test]
    fn known_client_addresses() {
        assert_eq!(hash_address("192.168.0.0:80"), 65_249_880);
        assert_eq!(hash_address("127.0.0.0:8080"), 958_394_273);
        assert_eq!(hash_address("26.143.218.9:80"), 1_282_104_361);
    }

    #[test]
    fn streaming_matches_one_shot() {
        let mut hasher = Fnv1Hasher::default();
        hasher.write(b"10.1.2.3");
        hasher.write(b":4567");
        assert_eq!(hasher.finish32(), hash_address("10.1.2.3:4567"));
        assert_eq!(hasher.finish(), u64::from(hash_address("10.1.2.3:4567")));
    }
}
