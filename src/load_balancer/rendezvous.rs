//! Rendezvous (highest random weight) hashing strategy.

use std::hash::Hasher;

use crate::load_balancer::{backend::BackendAddress, hash::Fnv1Hasher, LoadBalancer, Selection};

/// Scores every healthy backend against the client and picks the highest.
///
/// A client only moves when its own backend leaves the healthy set, so a
/// flapping backend does not reshuffle everybody else. Ties go to the
/// backend listed first.
#[derive(Debug, Default)]
pub struct RendezvousHash;

impl RendezvousHash {
    pub fn new() -> Self {
        Self
    }
}

fn score(client: &str, backend: &BackendAddress) -> u32 {
    let mut hasher = Fnv1Hasher::new();
    hasher.write(client.as_bytes());
    hasher.write(&[0xff]);
    hasher.write(backend.as_str().as_bytes());
    mix(hasher.finish32())
}

// murmur3 fmix32: FNV-1 leaves the trailing bytes poorly spread.
fn mix(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

impl LoadBalancer for RendezvousHash {
    fn select(&self, client: &str, backends: &[BackendAddress]) -> Option<Selection> {
        let mut best: Option<Selection> = None;
        for (index, backend) in backends.iter().enumerate() {
            let hash = score(client, backend);
            if best.map_or(true, |top| hash > top.hash) {
                best = Some(Selection { index, hash });
            }
        }
        best
    }
}
