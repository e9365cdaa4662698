//! The three keyed hash strategies under comparison.

use super::mix::splitmix64;
use super::seed::process_seed;
use crate::error::{Error, Result};
use core::fmt;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A keyed hash function mapping an integer key to a bucket-selecting digest.
///
/// The set is closed: these are exactly the variants the benchmark compares.
///
/// ```
/// use hashflood::HashStrategy;
///
/// assert_eq!(HashStrategy::Identity.digest(42), 42);
/// assert_eq!(HashStrategy::SeededIdentity.digest_with_seed(42, 8), 50);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HashStrategy {
    /// `digest = key`. Trivially floodable.
    Identity,
    /// `digest = key + seed`. Shifts collisions to another bucket without
    /// breaking them up.
    SeededIdentity,
    /// `digest = splitmix64(key + seed)`. Resists pattern-based flooding.
    #[default]
    SeededAvalanche,
}

impl HashStrategy {
    /// All strategies, weakest first.
    pub const ALL: [Self; 3] = [Self::Identity, Self::SeededIdentity, Self::SeededAvalanche];

    /// Computes the digest of `key` using the process seed.
    ///
    /// The first seeded digest in a process draws the seed.
    #[inline]
    pub fn digest(self, key: u64) -> u64 {
        match self {
            Self::Identity => key,
            Self::SeededIdentity | Self::SeededAvalanche => {
                self.digest_with_seed(key, process_seed())
            }
        }
    }

    /// Computes the digest of `key` under an explicit seed.
    #[inline]
    #[must_use]
    pub const fn digest_with_seed(self, key: u64, seed: u64) -> u64 {
        match self {
            Self::Identity => key,
            Self::SeededIdentity => key.wrapping_add(seed),
            Self::SeededAvalanche => splitmix64(key.wrapping_add(seed)),
        }
    }

    /// Returns true if the digest depends on the seed.
    #[must_use]
    pub const fn is_seeded(self) -> bool {
        !matches!(self, Self::Identity)
    }

    /// Returns the strategy name as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::SeededIdentity => "seeded-identity",
            Self::SeededAvalanche => "seeded-avalanche",
        }
    }
}

impl fmt::Display for HashStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashStrategy {
    type Err = Error;

    /// Accepts the canonical names plus the `standard`/`custom`/`robust`
    /// aliases used in the classic write-ups of this attack.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "identity" | "standard" => Ok(Self::Identity),
            "seeded-identity" | "custom" => Ok(Self::SeededIdentity),
            "seeded-avalanche" | "robust" | "splitmix" => Ok(Self::SeededAvalanche),
            other => Err(Error::UnknownVariant {
                kind: "hash strategy",
                value: other.to_owned(),
                expected: "identity, seeded-identity, seeded-avalanche",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::mix::mean_avalanche;
    use crate::test_utils::init_test_logging;
    use proptest::prelude::*;

    #[test]
    fn identity_is_key() {
        init_test_logging();
        crate::test_phase!("identity_is_key");
        for key in [0, 1, 107_897, u64::MAX] {
            assert_eq!(HashStrategy::Identity.digest(key), key);
            assert_eq!(HashStrategy::Identity.digest_with_seed(key, 99), key);
        }
        crate::test_complete!("identity_is_key");
    }

    #[test]
    fn seeded_identity_wraps() {
        init_test_logging();
        assert_eq!(HashStrategy::SeededIdentity.digest_with_seed(u64::MAX, 2), 1);
    }

    #[test]
    fn seeded_avalanche_is_splitmix_of_sum() {
        init_test_logging();
        let seed = 0x1234_5678;
        assert_eq!(
            HashStrategy::SeededAvalanche.digest_with_seed(7, seed),
            splitmix64(7 + seed)
        );
        assert_eq!(HashStrategy::SeededAvalanche.digest_with_seed(0, 0), 0xe220_a839_7b1d_cdaf);
    }

    #[test]
    fn process_digest_uses_process_seed() {
        init_test_logging();
        let seed = process_seed();
        for strategy in HashStrategy::ALL {
            assert_eq!(strategy.digest(1234), strategy.digest_with_seed(1234, seed));
        }
    }

    #[test]
    fn avalanche_flips_about_half_the_bits() {
        init_test_logging();
        crate::test_phase!("avalanche_flips_about_half_the_bits");

        let seed = 0x0bad_5eed;
        let keys = (1..=1000u64).map(|i| i.wrapping_mul(107_897));
        let score = mean_avalanche(keys, |k| HashStrategy::SeededAvalanche.digest_with_seed(k, seed));
        crate::assert_with_log!((30.0..34.0).contains(&score), "mean flipped bits", 32.0, score);

        let weak = mean_avalanche(1..=1000u64, |k| HashStrategy::SeededIdentity.digest_with_seed(k, seed));
        assert!(weak < 8.0, "seeded identity scored {weak}");

        crate::test_complete!("avalanche_flips_about_half_the_bits");
    }

    #[test]
    fn every_input_bit_avalanches() {
        init_test_logging();
        let seed = 0xfeed_f00d;
        for bit in 0..u64::BITS {
            let mut flips = 0u64;
            for i in 1..=1000u64 {
                let key = splitmix64(i);
                let a = HashStrategy::SeededAvalanche.digest_with_seed(key, seed);
                let b = HashStrategy::SeededAvalanche.digest_with_seed(key ^ (1 << bit), seed);
                flips += u64::from((a ^ b).count_ones());
            }
            let mean = flips as f64 / 1000.0;
            assert!((28.0..36.0).contains(&mean), "bit {bit}: mean {mean}");
        }
    }

    #[test]
    fn names_and_aliases_parse() {
        for strategy in HashStrategy::ALL {
            assert_eq!(strategy.to_string().parse::<HashStrategy>().unwrap(), strategy);
        }
        assert_eq!("standard".parse::<HashStrategy>().unwrap(), HashStrategy::Identity);
        assert_eq!("custom".parse::<HashStrategy>().unwrap(), HashStrategy::SeededIdentity);
        assert_eq!("robust".parse::<HashStrategy>().unwrap(), HashStrategy::SeededAvalanche);
        assert!("fnv".parse::<HashStrategy>().is_err());
    }

    proptest! {
        #[test]
        fn digest_is_deterministic(key: u64, seed: u64) {
            for strategy in HashStrategy::ALL {
                prop_assert_eq!(strategy.digest(key), strategy.digest(key));
                prop_assert_eq!(
                    strategy.digest_with_seed(key, seed),
                    strategy.digest_with_seed(key, seed)
                );
            }
        }

        #[test]
        fn seeded_identity_preserves_differences(a: u64, b: u64, seed: u64) {
            let s = HashStrategy::SeededIdentity;
            prop_assert_eq!(
                s.digest_with_seed(a, seed).wrapping_sub(s.digest_with_seed(b, seed)),
                a.wrapping_sub(b)
            );
        }
    }
}
