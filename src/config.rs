//! Benchmark configuration.
//!
//! Defaults reproduce the reference run: `SeededAvalanche` over a chained
//! prime-bucket table, 200 000 insertions, multipliers 107 897 and 126 271.
//! With the `config-file` feature the same structure loads from TOML:
//!
//! ```toml
//! iterations = 50000
//! multipliers = [107897, 126271]
//! strategies = ["identity", "seeded-avalanche"]
//! backend = "chained"
//!
//! [table]
//! policy = "prime"
//! initial_buckets = 8
//! max_load_factor = 1.0
//!
//! [seed]
//! source = "os"
//! ```

use crate::error::{Error, Result};
use crate::hash::{HashStrategy, SeedSource};
use crate::table::TableConfig;
use crate::workload::{Backend, DEFAULT_ITERATIONS, REFERENCE_MULTIPLIERS, Workload};
use serde::{Deserialize, Serialize};

/// How the process seed is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeedConfig {
    /// Source drawn from on first use.
    pub source: SeedSource,
    /// Fixed seed installed before any run; overrides `source`.
    pub value: Option<u64>,
}

/// Everything a benchmark invocation needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
    /// Insertions per run.
    pub iterations: u64,
    /// One run per multiplier (per strategy).
    pub multipliers: Vec<u64>,
    /// Strategies to compare.
    pub strategies: Vec<HashStrategy>,
    /// Table implementation.
    pub backend: Backend,
    /// Chained table sizing.
    pub table: TableConfig,
    /// Process seed selection.
    pub seed: SeedConfig,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            multipliers: REFERENCE_MULTIPLIERS.to_vec(),
            strategies: vec![HashStrategy::SeededAvalanche],
            backend: Backend::Chained,
            table: TableConfig::default(),
            seed: SeedConfig::default(),
        }
    }
}

impl BenchConfig {
    /// Parses a TOML document. Missing keys keep their defaults.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    #[cfg(feature = "config-file")]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loaded benchmark config");
        Self::from_toml_str(&text)
    }

    /// Rejects configurations no run could execute.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(Error::ZeroIterations);
        }
        if self.multipliers.is_empty() {
            return Err(Error::NoMultipliers);
        }
        if self.multipliers.contains(&0) {
            return Err(Error::ZeroMultiplier);
        }
        if self.strategies.is_empty() {
            return Err(Error::NoStrategies);
        }
        self.table.validate()
    }

    /// Workloads in execution order: strategies outermost, multipliers
    /// innermost.
    ///
    /// A fixed `seed.value` is carried by every workload, so runs are
    /// reproducible without touching the process seed.
    pub fn workloads(&self) -> Result<Vec<Workload>> {
        self.validate()?;
        let mut out = Vec::with_capacity(self.strategies.len() * self.multipliers.len());
        for &strategy in &self.strategies {
            for &multiplier in &self.multipliers {
                let mut workload = Workload::new(multiplier, self.iterations)?
                    .with_strategy(strategy)
                    .with_backend(self.backend)
                    .with_table(self.table)?;
                if let Some(seed) = self.seed.value {
                    workload = workload.with_seed(seed);
                }
                out.push(workload);
            }
        }
        Ok(out)
    }
}
