//! `std::hash` adapters so a [`HashStrategy`] can drive any hash map.
//!
//! A hasher that has absorbed exactly one `u64` finishes with exactly
//! `strategy.digest(key)`; wider keys are folded first.

use super::strategy::HashStrategy;
use std::hash::{BuildHasher, Hasher};

/// Streaming hasher backed by a [`HashStrategy`].
#[derive(Debug, Clone)]
pub struct StrategyHasher {
    strategy: HashStrategy,
    seed: Option<u64>,
    state: u64,
}

impl StrategyHasher {
    /// Multiplier used to fold multi-word input.
    const MULTIPLIER: u64 = 0x517c_c1b7_2722_0a95;

    /// Creates a hasher that reads the process seed when it finishes.
    #[must_use]
    pub const fn new(strategy: HashStrategy) -> Self {
        Self {
            strategy,
            seed: None,
            state: 0,
        }
    }

    /// Creates a hasher with an explicit seed.
    #[must_use]
    pub const fn with_seed(strategy: HashStrategy, seed: u64) -> Self {
        Self {
            strategy,
            seed: Some(seed),
            state: 0,
        }
    }
}

impl Hasher for StrategyHasher {
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state = self.state.wrapping_mul(Self::MULTIPLIER) ^ u64::from(byte);
        }
    }

    fn write_u8(&mut self, i: u8) {
        self.write_u64(u64::from(i));
    }

    fn write_u32(&mut self, i: u32) {
        self.write_u64(u64::from(i));
    }

    fn write_u64(&mut self, i: u64) {
        // Starting from zero, a single word passes through unchanged.
        self.state = self.state.wrapping_mul(Self::MULTIPLIER) ^ i;
    }

    fn write_usize(&mut self, i: usize) {
        self.write_u64(i as u64);
    }

    fn finish(&self) -> u64 {
        match self.seed {
            Some(seed) => self.strategy.digest_with_seed(self.state, seed),
            None => self.strategy.digest(self.state),
        }
    }
}

/// Builder for [`StrategyHasher`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyBuildHasher {
    strategy: HashStrategy,
    seed: Option<u64>,
}

impl StrategyBuildHasher {
    /// Builder using the process seed.
    ///
    /// Nothing is drawn here; hashers read the process seed when they finish.
    #[must_use]
    pub const fn new(strategy: HashStrategy) -> Self {
        Self {
            strategy,
            seed: None,
        }
    }

    /// Builder using an explicit seed instead of the process seed.
    #[must_use]
    pub const fn with_seed(strategy: HashStrategy, seed: u64) -> Self {
        Self {
            strategy,
            seed: Some(seed),
        }
    }

    /// The strategy hashers from this builder apply.
    #[must_use]
    pub const fn strategy(&self) -> HashStrategy {
        self.strategy
    }

    /// The explicit seed, or `None` if hashers defer to the process seed.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl Default for StrategyBuildHasher {
    fn default() -> Self {
        Self::new(HashStrategy::default())
    }
}

impl BuildHasher for StrategyBuildHasher {
    type Hasher = StrategyHasher;

    fn build_hasher(&self) -> Self::Hasher {
        match self.seed {
            Some(seed) => StrategyHasher::with_seed(self.strategy, seed),
            None => StrategyHasher::new(self.strategy),
        }
    }
}

/// `hashbrown` map hashed by a [`HashStrategy`].
pub type StrategyHashMap<K, V> = hashbrown::HashMap<K, V, StrategyBuildHasher>;
