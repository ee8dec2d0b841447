//! Modulo hashing strategy.

use crate::load_balancer::{backend::BackendAddress, hash::hash_address, LoadBalancer, Selection};

/// Picks `hash(client) mod N` over the current healthy list.
///
/// Any change in the size of the healthy list can move clients that were
/// on unaffected backends.
#[derive(Debug, Default)]
pub struct ModuloHash;

impl ModuloHash {
    pub fn new() -> Self {
        Self
    }
}

impl LoadBalancer for ModuloHash {
    fn select(&self, client: &str, backends: &[BackendAddress]) -> Option<Selection> {
        if backends.is_empty() {
            return None;
        }
        let hash = hash_address(client);
        Some(Selection {
            index: hash as usize % backends.len(),
            hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backends(n: usize) -> Vec<BackendAddress> {
        (0..n).map(|i| BackendAddress::new(format!("server{}:8080", i + 1))).collect()
    }

    #[test]
    fn known_indices_over_three_backends() {
        let lb = ModuloHash::new();
        let pool = backends(3);
        assert_eq!(
            lb.select("192.168.0.0:80", &pool),
            Some(Selection { index: 0, hash: 65_249_880 })
        );
        assert_eq!(lb.select("127.0.0.0:8080", &pool).map(|s| s.index), Some(2));
        assert_eq!(lb.select("26.143.218.9:80", &pool).map(|s| s.index), Some(1));
    }

    #[test]
    fn empty_set_selects_nothing() {
        let lb = ModuloHash::new();
        assert_eq!(lb.select("192.168.0.0:80", &[]), None);
    }

    #[test]
    fn index_always_in_range() {
        let lb = ModuloHash::new();
        for n in 1..8 {
            let pool = backends(n);
            for port in 1000..1200 {
                let client = format!("10.0.0.{}:{}", port % 255, port);
                let selection = lb.select(&client, &pool).unwrap();
                assert!(selection.index < n);
                assert_eq!(selection.hash, hash_address(&client));
            }
        }
    }

    #[test]
    fn deterministic_for_fixed_set() {
        let lb = ModuloHash::new();
        let pool = backends(5);
        let first = lb.select("172.16.4.2:51234", &pool);
        for _ in 0..10 {
            assert_eq!(lb.select("172.16.4.2:51234", &pool), first);
        }
    }
}
