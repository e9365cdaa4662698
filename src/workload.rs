//! The flooding workload: insert `(i * m, i)` for `i = 1..=N`, then walk the
//! table once.
//!
//! The aggregate `sum((key / m) * value)` forces every entry to be read back
//! and equals `N(N+1)(2N+1)/6` whenever `N * m` fits in 64 bits.

use crate::error::{Error, Result};
use crate::hash::{HashStrategy, StrategyBuildHasher, StrategyHashMap};
use crate::table::{BucketStats, ChainedTable, TableConfig};
use core::fmt;
use serde::{Deserialize, Serialize, Serializer};
use std::hint::black_box;
use std::num::NonZeroU64;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Insertions per run in the reference benchmark.
pub const DEFAULT_ITERATIONS: u64 = 200_000;

/// Multipliers the reference benchmark runs with.
pub const REFERENCE_MULTIPLIERS: [u64; 2] = [107_897, 126_271];

/// Which table implementation a run populates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    /// [`ChainedTable`] with the configured bucket policy.
    #[default]
    Chained,
    /// `hashbrown::HashMap` driven by the same strategy.
    Hashbrown,
}

impl Backend {
    /// Returns the backend name as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chained => "chained",
            Self::Hashbrown => "hashbrown",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "chained" => Ok(Self::Chained),
            "hashbrown" => Ok(Self::Hashbrown),
            other => Err(Error::UnknownVariant {
                kind: "backend",
                value: other.to_owned(),
                expected: "chained, hashbrown",
            }),
        }
    }
}

/// One benchmark run.
///
/// ```
/// use hashflood::{HashStrategy, Workload};
///
/// let report = Workload::new(107_897, 1_000)?
///     .with_strategy(HashStrategy::SeededAvalanche)
///     .run()?;
/// assert_eq!(report.sum, hashflood::expected_aggregate(1_000));
/// # Ok::<(), hashflood::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Workload {
    multiplier: NonZeroU64,
    iterations: u64,
    strategy: HashStrategy,
    backend: Backend,
    table: TableConfig,
    seed: Option<u64>,
}

impl Workload {
    /// Workload inserting `iterations` keys spaced `multiplier` apart.
    ///
    /// Rejects `multiplier == 0`, which would collapse every key onto `0`,
    /// and `iterations == 0`.
    pub fn new(multiplier: u64, iterations: u64) -> Result<Self> {
        let multiplier = NonZeroU64::new(multiplier).ok_or(Error::ZeroMultiplier)?;
        if iterations == 0 {
            return Err(Error::ZeroIterations);
        }
        Ok(Self {
            multiplier,
            iterations,
            strategy: HashStrategy::default(),
            backend: Backend::default(),
            table: TableConfig::default(),
            seed: None,
        })
    }

    /// Selects the hash strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: HashStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Selects the table implementation.
    #[must_use]
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Sets the chained table's sizing.
    pub fn with_table(mut self, table: TableConfig) -> Result<Self> {
        table.validate()?;
        self.table = table;
        Ok(self)
    }

    /// Hashes with `seed` instead of the process seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The key spacing.
    #[must_use]
    pub fn multiplier(&self) -> u64 {
        self.multiplier.get()
    }

    /// Number of insertions.
    #[must_use]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// The selected strategy.
    #[must_use]
    pub fn strategy(&self) -> HashStrategy {
        self.strategy
    }

    /// Explicit seed, if one was set with [`with_seed`](Self::with_seed).
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn build_hasher(&self) -> StrategyBuildHasher {
        match self.seed {
            Some(seed) => StrategyBuildHasher::with_seed(self.strategy, seed),
            None => StrategyBuildHasher::new(self.strategy),
        }
    }

    /// Builds a fresh table, fills it, walks it, and reports how long that
    /// took.
    pub fn run(&self) -> Result<WorkloadReport> {
        let span = tracing::debug_span!(
            "workload",
            multiplier = self.multiplier.get(),
            iterations = self.iterations,
            strategy = %self.strategy,
            backend = %self.backend,
        );
        let _guard = span.enter();

        let hasher = self.build_hasher();
        let report = match self.backend {
            Backend::Chained => self.run_chained(hasher)?,
            Backend::Hashbrown => self.run_hashbrown(hasher),
        };

        tracing::info!(
            seconds = report.elapsed.as_secs_f64(),
            sum = report.sum,
            entries = report.entries,
            probes = report.probes,
            "workload complete"
        );
        Ok(report)
    }

    fn run_chained(&self, hasher: StrategyBuildHasher) -> Result<WorkloadReport> {
        let m = self.multiplier;
        let start = Instant::now();
        let mut table = ChainedTable::with_hasher(self.table, hasher)?;
        for i in 1..=self.iterations {
            table.insert(i.wrapping_mul(m.get()), i);
        }
        let sum = black_box(aggregate(table.iter(), m));
        let elapsed = start.elapsed();

        Ok(self.report(
            elapsed,
            sum,
            table.len(),
            Some(table.bucket_stats()),
            Some(table.probe_count()),
        ))
    }

    fn run_hashbrown(&self, hasher: StrategyBuildHasher) -> WorkloadReport {
        let m = self.multiplier;
        let start = Instant::now();
        let mut map = StrategyHashMap::with_hasher(hasher);
        for i in 1..=self.iterations {
            map.insert(i.wrapping_mul(m.get()), i);
        }
        let sum = black_box(aggregate(map.iter(), m));
        let elapsed = start.elapsed();

        self.report(elapsed, sum, map.len(), None, None)
    }

    fn report(
        &self,
        elapsed: Duration,
        sum: u64,
        entries: usize,
        bucket_stats: Option<BucketStats>,
        probes: Option<u64>,
    ) -> WorkloadReport {
        WorkloadReport {
            multiplier: self.multiplier.get(),
            iterations: self.iterations,
            strategy: self.strategy,
            backend: self.backend,
            elapsed,
            sum,
            entries,
            bucket_stats,
            probes,
        }
    }
}

/// Outcome of one [`Workload::run`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkloadReport {
    /// Key spacing.
    pub multiplier: u64,
    /// Insertions performed.
    pub iterations: u64,
    /// Strategy used.
    pub strategy: HashStrategy,
    /// Table implementation used.
    pub backend: Backend,
    /// Wall time for build, insertion and traversal.
    #[serde(rename = "seconds", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    /// `sum((key / m) * value)` over every entry, wrapping.
    pub sum: u64,
    /// Distinct keys in the table.
    pub entries: usize,
    /// Final bucket occupancy (chained backend only).
    pub bucket_stats: Option<BucketStats>,
    /// Key comparisons performed (chained backend only).
    pub probes: Option<u64>,
}

impl WorkloadReport {
    /// Returns true if the aggregate equals `N(N+1)(2N+1)/6`.
    #[must_use]
    pub fn matches_expected_aggregate(&self) -> bool {
        self.sum == expected_aggregate(self.iterations)
    }
}

impl fmt::Display for WorkloadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x = {}: {:.3} seconds, sum = {}",
            self.multiplier,
            self.elapsed.as_secs_f64(),
            self.sum
        )
    }
}

fn serialize_secs<S: Serializer>(elapsed: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64())
}

/// `sum((key / m) * value)` over `entries`, wrapping.
pub fn aggregate<'a, I>(entries: I, multiplier: NonZeroU64) -> u64
where
    I: IntoIterator<Item = (&'a u64, &'a u64)>,
{
    entries
        .into_iter()
        .fold(0u64, |sum, (&key, &value)| sum.wrapping_add((key / multiplier).wrapping_mul(value)))
}

/// `N(N+1)(2N+1)/6` modulo 2^64.
#[must_use]
pub fn expected_aggregate(n: u64) -> u64 {
    let mut factors = [u128::from(n), u128::from(n) + 1, 2 * u128::from(n) + 1];
    // Divide out 2 and 3 exactly before the products can wrap.
    if let Some(even) = factors.iter_mut().find(|f| **f % 2 == 0) {
        *even /= 2;
    }
    if let Some(triple) = factors.iter_mut().find(|f| **f % 3 == 0) {
        *triple /= 3;
    }
    factors
        .iter()
        .fold(1u64, |acc, &f| acc.wrapping_mul(f as u64))
}

/// Multiplier that floods unmixed strategies in a [`ChainedTable`] configured
/// by `table`.
///
/// Returns the bucket count in force for the most insertions while
/// `iterations` keys go in. Every key `i * m` is then a multiple of the bucket
/// count, so `Identity` sends all of them to bucket 0 and `SeededIdentity` to
/// bucket `seed % m` for that whole stretch.
#[must_use]
pub fn adversarial_multiplier(iterations: u64, table: &TableConfig) -> u64 {
    table
        .growth_schedule(iterations)
        .into_iter()
        .max_by_key(|&(_, absorbed)| absorbed)
        .map_or(1, |(buckets, _)| buckets as u64)
}
