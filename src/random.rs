use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Seed used by `SeededRandomGenerator::default()`.
pub const DEFAULT_SEED: u64 = 1001;

/// Source of randomness threaded through tree generation, random players and move search.
///
/// Every random decision of the engine goes through this trait, so a seeded implementation
/// replays a whole game deterministically.
pub trait RandomGenerator: Default {
    /// Returns a number in `[from, to)`.
    fn next_range(&mut self, from: u32, to: u32) -> u32;

    /// Returns a number in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    fn next_bool(&mut self) -> bool {
        self.next_range(0, 2) == 1
    }

    fn get_random_from_slice<'a, K>(&mut self, items: &'a [K]) -> &'a K {
        &items[self.next_range(0, items.len() as u32) as usize]
    }
}

/// Thread-local entropy, for interactive games that should differ on every run.
#[derive(Default)]
pub struct StandardRandomGenerator;

impl RandomGenerator for StandardRandomGenerator {
    fn next_range(&mut self, from: u32, to: u32) -> u32 {
        rand::rng().random_range(from..to)
    }

    fn next_f64(&mut self) -> f64 {
        rand::rng().random()
    }
}

/// Reproducible generator backed by ChaCha20.
pub struct SeededRandomGenerator {
    rng: ChaCha20Rng,
}

impl Default for SeededRandomGenerator {
    fn default() -> Self {
        SeededRandomGenerator::new(DEFAULT_SEED)
    }
}

impl RandomGenerator for SeededRandomGenerator {
    fn next_range(&mut self, from: u32, to: u32) -> u32 {
        self.rng.random_range(from..to)
    }

    fn next_f64(&mut self) -> f64 {
        self.rng.random()
    }
}

impl SeededRandomGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::random::{RandomGenerator, SeededRandomGenerator};

    #[test]
    fn same_seed_same_numbers() {
        let mut first = SeededRandomGenerator::new(42);
        let mut second = SeededRandomGenerator::new(42);
        for _ in 0..32 {
            assert_eq!(first.next_range(0, 1000), second.next_range(0, 1000));
        }
    }

    #[test]
    fn range_is_half_open() {
        let mut rng = SeededRandomGenerator::default();
        for _ in 0..1000 {
            let value = rng.next_range(3, 7);
            assert!((3..7).contains(&value));
        }
        for _ in 0..1000 {
            let value = rng.next_f64();
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn random_from_slice_stays_in_bounds() {
        let items = [432, 6542, 534, 6, 13];
        let mut rng = SeededRandomGenerator::new(7);
        for _ in 0..100 {
            assert!(items.contains(rng.get_random_from_slice(&items)));
        }
    }
}
