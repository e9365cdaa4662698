//! Bucket-count policies and growth schedule.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Largest bucket count a table is sized for. Requests above it are
/// clamped, and configurations asking for more are rejected.
pub const MAX_BUCKETS: usize = 1 << 30;

/// Smallest load factor [`TableConfig::validate`] accepts.
pub const MIN_LOAD_FACTOR: f64 = 1e-3;

/// How a digest is reduced to a bucket index, and which bucket counts are
/// legal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BucketPolicy {
    /// Prime bucket counts, index = `digest % buckets`.
    #[default]
    Prime,
    /// Power-of-two bucket counts, index = `digest & (buckets - 1)`.
    PowerOfTwo,
}

impl BucketPolicy {
    /// Smallest legal bucket count that is at least `n`, with `n` clamped to
    /// `1..=MAX_BUCKETS`.
    #[must_use]
    pub fn normalize(self, n: usize) -> usize {
        let n = n.clamp(1, MAX_BUCKETS);
        match self {
            // Primes just above MAX_BUCKETS fit in a usize.
            Self::Prime => next_prime(n.max(2)).unwrap_or(n),
            Self::PowerOfTwo => n.next_power_of_two(),
        }
    }

    /// Maps a digest to a bucket in `0..bucket_count`.
    #[inline]
    #[must_use]
    pub fn index(self, digest: u64, bucket_count: usize) -> usize {
        debug_assert!(bucket_count > 0);
        match self {
            Self::Prime => (digest % bucket_count as u64) as usize,
            Self::PowerOfTwo => (digest as usize) & (bucket_count - 1),
        }
    }

    /// Returns the policy name as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Prime => "prime",
            Self::PowerOfTwo => "power-of-two",
        }
    }
}

impl FromStr for BucketPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "prime" => Ok(Self::Prime),
            "power-of-two" | "pow2" => Ok(Self::PowerOfTwo),
            other => Err(Error::UnknownVariant {
                kind: "bucket policy",
                value: other.to_owned(),
                expected: "prime, power-of-two",
            }),
        }
    }
}

/// Returns true if `n` is prime.
#[must_use]
pub fn is_prime(n: u64) -> bool {
    match n {
        0 | 1 => false,
        2 | 3 => true,
        _ if n % 2 == 0 || n % 3 == 0 => false,
        _ => {
            let mut d = 5u64;
            while d.saturating_mul(d) <= n {
                if n % d == 0 || n % (d + 2) == 0 {
                    return false;
                }
                d += 6;
            }
            true
        }
    }
}

/// Smallest prime `>= n`, or `None` if it does not fit in a `usize`.
#[must_use]
pub fn next_prime(n: usize) -> Option<usize> {
    let mut candidate = n.max(2);
    while !is_prime(candidate as u64) {
        candidate = candidate.checked_add(1)?;
    }
    Some(candidate)
}

/// Sizing parameters for a [`ChainedTable`](super::ChainedTable).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableConfig {
    /// Bucket-count policy.
    pub policy: BucketPolicy,
    /// Requested bucket count before the first insertion, rounded up by the
    /// policy.
    pub initial_buckets: usize,
    /// Entries per bucket that trigger growth. `inf` disables growth.
    pub max_load_factor: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            policy: BucketPolicy::Prime,
            initial_buckets: 8,
            max_load_factor: 1.0,
        }
    }
}

impl TableConfig {
    /// A table that never grows past `buckets` (rounded by the policy).
    #[must_use]
    pub fn fixed(policy: BucketPolicy, buckets: usize) -> Self {
        Self {
            policy,
            initial_buckets: buckets,
            max_load_factor: f64::INFINITY,
        }
    }

    /// Checks that the configuration describes a usable table.
    pub fn validate(&self) -> Result<()> {
        if self.initial_buckets == 0 || self.initial_buckets > MAX_BUCKETS {
            return Err(Error::InvalidTable(format!(
                "initial_buckets must be in 1..={MAX_BUCKETS}, got {}",
                self.initial_buckets
            )));
        }
        if self.max_load_factor.is_nan() || self.max_load_factor < MIN_LOAD_FACTOR {
            return Err(Error::InvalidTable(format!(
                "max_load_factor must be at least {MIN_LOAD_FACTOR}, got {}",
                self.max_load_factor
            )));
        }
        if self.capacity(self.initial_bucket_count()) == 0 {
            return Err(Error::InvalidTable(format!(
                "{} initial buckets at load factor {} hold no entries",
                self.initial_bucket_count(),
                self.max_load_factor
            )));
        }
        Ok(())
    }

    /// Bucket count of a freshly built table.
    #[must_use]
    pub fn initial_bucket_count(&self) -> usize {
        self.policy.normalize(self.initial_buckets)
    }

    /// Most entries `buckets` buckets hold before the table grows.
    #[must_use]
    pub fn capacity(&self, buckets: usize) -> u64 {
        // Saturating float-to-int cast; infinity maps to u64::MAX.
        (buckets as f64 * self.max_load_factor).floor() as u64
    }

    /// Returns true if holding `len` entries in `buckets` buckets exceeds the
    /// load factor.
    #[inline]
    #[must_use]
    pub fn needs_growth(&self, buckets: usize, len: usize) -> bool {
        len as u64 > self.capacity(buckets)
    }

    /// Bucket count after growing from `buckets` to hold `len` entries.
    ///
    /// At least doubles, then rounds to the policy. Once `buckets` reaches
    /// [`MAX_BUCKETS`] the result stops growing.
    #[must_use]
    pub fn grown(&self, buckets: usize, len: usize) -> usize {
        let needed = (len as f64 / self.max_load_factor).ceil() as usize;
        let next = self.policy.normalize(buckets.saturating_mul(2).max(needed));
        next.max(buckets)
    }

    /// Bucket counts the table passes through while `iterations` distinct
    /// keys are inserted, each paired with how many insertions it absorbs.
    #[must_use]
    pub fn growth_schedule(&self, iterations: u64) -> Vec<(usize, u64)> {
        let mut schedule = Vec::new();
        let mut buckets = self.initial_bucket_count();
        let mut inserted = 0u64;
        loop {
            let upto = self.capacity(buckets).min(iterations);
            schedule.push((buckets, upto.saturating_sub(inserted)));
            inserted = upto;
            if inserted >= iterations {
                return schedule;
            }
            let next = self.grown(buckets, (inserted + 1) as usize);
            if next == buckets {
                // Capped: the last table takes the remaining insertions.
                if let Some(last) = schedule.last_mut() {
                    last.1 += iterations - inserted;
                }
                return schedule;
            }
            buckets = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::init_test_logging;

    #[test]
    fn primality() {
        init_test_logging();
        crate::test_phase!("primality");
        let primes: Vec<u64> = (0..50).filter(|&n| is_prime(n)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47]);
        assert!(is_prime(107_897));
        assert!(is_prime(126_271));
        assert!(!is_prime(107_897 * 3));
        crate::test_complete!("primality");
    }

    #[test]
    fn normalize_rounds_up() {
        init_test_logging();
        assert_eq!(BucketPolicy::Prime.normalize(0), 2);
        assert_eq!(BucketPolicy::Prime.normalize(8), 11);
        assert_eq!(BucketPolicy::Prime.normalize(13), 13);
        assert_eq!(BucketPolicy::PowerOfTwo.normalize(0), 1);
        assert_eq!(BucketPolicy::PowerOfTwo.normalize(9), 16);
        assert_eq!(BucketPolicy::PowerOfTwo.normalize(64), 64);
    }

    #[test]
    fn index_stays_in_range() {
        init_test_logging();
        for digest in [0u64, 1, 63, 64, 65, u64::MAX] {
            assert!(BucketPolicy::Prime.index(digest, 61) < 61);
            assert!(BucketPolicy::PowerOfTwo.index(digest, 64) < 64);
        }
        assert_eq!(BucketPolicy::Prime.index(122, 61), 0);
        assert_eq!(BucketPolicy::PowerOfTwo.index(0x1_0005, 16), 5);
    }

    #[test]
    fn growth_at_least_doubles() {
        init_test_logging();
        let config = TableConfig::default();
        assert_eq!(config.initial_bucket_count(), 11);
        assert!(!config.needs_growth(11, 11));
        assert!(config.needs_growth(11, 12));
        let next = config.grown(11, 12);
        assert!(next >= 22 && is_prime(next as u64), "{next}");
    }

    #[test]
    fn fixed_table_never_grows() {
        init_test_logging();
        let config = TableConfig::fixed(BucketPolicy::PowerOfTwo, 64);
        assert!(!config.needs_growth(64, 1_000_000));
        assert_eq!(config.growth_schedule(10_000), vec![(64, 10_000)]);
    }

    #[test]
    fn schedule_accounts_for_every_insertion() {
        init_test_logging();
        let config = TableConfig::default();
        let schedule = config.growth_schedule(200_000);
        let total: u64 = schedule.iter().map(|&(_, n)| n).sum();
        assert_eq!(total, 200_000);
        assert!(schedule.windows(2).all(|w| w[1].0 >= 2 * w[0].0));
        let (last, _) = *schedule.last().unwrap();
        assert!(config.capacity(last) >= 200_000);
    }

    #[test]
    fn validate_rejects_degenerate_tables() {
        init_test_logging();
        let mut config = TableConfig::default();
        assert!(config.validate().is_ok());
        config.initial_buckets = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidTable(_))));
        config.initial_buckets = 4;
        config.max_load_factor = 0.0;
        assert!(config.validate().is_err());
        config.max_load_factor = f64::NAN;
        assert!(config.validate().is_err());
        config.max_load_factor = f64::INFINITY;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_tables_too_large_or_too_sparse() {
        init_test_logging();
        crate::test_phase!("validate_rejects_tables_too_large_or_too_sparse");

        let huge = TableConfig {
            initial_buckets: usize::MAX,
            ..TableConfig::default()
        };
        assert!(matches!(huge.validate(), Err(Error::InvalidTable(_))));
        let at_cap = TableConfig {
            initial_buckets: MAX_BUCKETS,
            ..TableConfig::default()
        };
        assert!(at_cap.validate().is_ok());

        let sparse = TableConfig {
            max_load_factor: 1e-300,
            ..TableConfig::default()
        };
        assert!(matches!(sparse.validate(), Err(Error::InvalidTable(_))));
        // 11 buckets at 0.05 hold no entry before growing.
        let empty = TableConfig {
            max_load_factor: 0.05,
            ..TableConfig::default()
        };
        assert!(matches!(empty.validate(), Err(Error::InvalidTable(_))));

        crate::test_complete!("validate_rejects_tables_too_large_or_too_sparse");
    }

    #[test]
    fn next_prime_reports_overflow() {
        init_test_logging();
        assert_eq!(next_prime(0), Some(2));
        assert_eq!(next_prime(24), Some(29));
        assert_eq!(next_prime(usize::MAX), None);
        assert!(BucketPolicy::Prime.normalize(usize::MAX) <= MAX_BUCKETS + 64);
        assert_eq!(BucketPolicy::PowerOfTwo.normalize(usize::MAX), MAX_BUCKETS);
    }

    #[test]
    fn schedule_stops_at_bucket_cap() {
        init_test_logging();
        crate::test_phase!("schedule_stops_at_bucket_cap");

        // One entry per MAX_BUCKETS buckets: the first growth already wants
        // more buckets than the cap allows.
        let config = TableConfig {
            policy: BucketPolicy::PowerOfTwo,
            initial_buckets: MAX_BUCKETS,
            max_load_factor: 1.0 / MAX_BUCKETS as f64,
        };
        assert_eq!(config.grown(MAX_BUCKETS, 2), MAX_BUCKETS);
        let schedule = config.growth_schedule(10);
        assert_eq!(schedule, vec![(MAX_BUCKETS, 10)]);

        crate::test_complete!("schedule_stops_at_bucket_cap");
    }

    #[test]
    fn policy_names_parse() {
        assert_eq!("prime".parse::<BucketPolicy>().unwrap(), BucketPolicy::Prime);
        assert_eq!("pow2".parse::<BucketPolicy>().unwrap(), BucketPolicy::PowerOfTwo);
        assert_eq!(
            BucketPolicy::PowerOfTwo.as_str().parse::<BucketPolicy>().unwrap(),
            BucketPolicy::PowerOfTwo
        );
        assert!("fibonacci".parse::<BucketPolicy>().is_err());
    }
}
