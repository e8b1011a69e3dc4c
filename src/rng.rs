//! Randomness shared across request handlers

use rand::rngs::{StdRng, SysRng};
use rand::{RngExt, SeedableRng};
use std::sync::{Mutex, MutexGuard};
use uuid::Builder;

/// Process-wide randomness source.
///
/// Injected rather than ambient so tests can seed it and assert exact id
/// sequences and fallback selections.
#[derive(Debug)]
pub struct Randomness {
    rng: Mutex<StdRng>,
}

impl Randomness {
    /// OS-seeded source for normal operation
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::try_from_rng(&mut SysRng).expect("OS RNG unavailable")),
        }
    }

    /// Deterministic source, used in tests
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Mints a fresh v4 UUID string
    pub fn next_id(&self) -> String {
        let bytes: [u8; 16] = self.lock().random();
        Builder::from_random_bytes(bytes).into_uuid().to_string()
    }

    /// Uniform choice from a fixed set
    pub fn pick<'a>(&self, options: &'a [&'a str]) -> &'a str {
        let index = self.lock().random_range(0..options.len());
        options[index]
    }

    fn lock(&self) -> MutexGuard<'_, StdRng> {
        // A poisoned RNG lock carries no invalid state worth bailing over.
        self.rng.lock().unwrap_or_else(|err| err.into_inner())
    }
}

impl Default for Randomness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_sources_agree() {
        let first = Randomness::seeded(42);
        let second = Randomness::seeded(42);
        assert_eq!(first.next_id(), second.next_id());
        let options = ["a", "b", "c"];
        for _ in 0..16 {
            assert_eq!(first.pick(&options), second.pick(&options));
        }
    }

    #[test]
    fn ids_are_unique_uuids() {
        let rng = Randomness::seeded(7);
        let first = rng.next_id();
        let second = rng.next_id();
        assert_ne!(first, second);
        assert_eq!(first.len(), 36);
        assert!(uuid::Uuid::parse_str(&first).is_ok());
    }

    #[test]
    fn pick_stays_in_set() {
        let rng = Randomness::new();
        let options = ["x", "y", "z"];
        for _ in 0..32 {
            assert!(options.contains(&rng.pick(&options)));
        }
    }
}
