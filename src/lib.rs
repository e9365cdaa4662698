//! Hashflood: a hash-flooding micro-benchmark.
//!
//! # Overview
//!
//! A hash table is only O(1) on average if its hash spreads keys across
//! buckets. An adversary who knows the hash and the bucket count can choose
//! keys that all land in one bucket, turning N insertions into O(N^2) work.
//! This crate measures that effect for three keyed hash strategies:
//!
//! - [`HashStrategy::Identity`]: the key itself. Keys spaced by a multiple of
//!   the bucket count all collide.
//! - [`HashStrategy::SeededIdentity`]: key plus a per-process seed. The seed
//!   moves the collision to another bucket but keeps it.
//! - [`HashStrategy::SeededAvalanche`]: SplitMix64 of key plus seed. Every
//!   output bit depends on every input bit, so no spacing survives.
//!
//! # Module Structure
//!
//! - [`hash`]: strategies, the SplitMix64 mixer, the process seed, and
//!   `std::hash` adapters
//! - [`table`]: a chained hash table with prime or power-of-two buckets, plus
//!   occupancy diagnostics
//! - [`workload`]: the insert/aggregate benchmark run and attack derivation
//! - [`config`]: benchmark configuration (TOML with `config-file`)
//! - [`error`](mod@error): error types
//!
//! # Example
//!
//! ```
//! use hashflood::{HashStrategy, TableConfig, Workload, adversarial_multiplier};
//!
//! let table = TableConfig::default();
//! let m = adversarial_multiplier(2_000, &table);
//! let report = Workload::new(m, 2_000)?
//!     .with_strategy(HashStrategy::SeededAvalanche)
//!     .with_table(table)?
//!     .run()?;
//! assert!(report.matches_expected_aggregate());
//! println!("{report}");
//! # Ok::<(), hashflood::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]

pub mod config;
pub mod error;
pub mod hash;
pub mod table;
pub mod workload;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::{BenchConfig, SeedConfig};
pub use error::{Error, Result};
pub use hash::{
    HashStrategy, SeedSource, StrategyBuildHasher, StrategyHashMap, StrategyHasher,
    install_process_seed, is_process_seed_initialized, process_seed, splitmix64,
};
pub use table::{BucketPolicy, BucketStats, ChainedTable, TableConfig, occupancy};
pub use workload::{
    Backend, DEFAULT_ITERATIONS, REFERENCE_MULTIPLIERS, Workload, WorkloadReport,
    adversarial_multiplier, aggregate, expected_aggregate,
};
