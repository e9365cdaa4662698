//! Error types for configuration and seeding.
//!
//! Nothing inside a timed workload run can fail. Errors are raised while
//! validating input or initializing the process seed, before any table is
//! built, or while encoding a finished report.

use thiserror::Error;

/// Errors produced by `hashflood`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The process seed was already drawn (or installed) and cannot change.
    #[error("process seed already initialized to {current:#018x}")]
    SeedAlreadyInitialized {
        /// The seed currently in force.
        current: u64,
    },

    /// A multiplier of zero collapses every key `i * 0` onto key `0`.
    #[error("multiplier must be non-zero: every key i * 0 collapses to 0")]
    ZeroMultiplier,

    /// The workload needs at least one insertion.
    #[error("iteration count must be at least 1")]
    ZeroIterations,

    /// No multipliers were configured.
    #[error("at least one multiplier is required")]
    NoMultipliers,

    /// No strategies were configured.
    #[error("at least one hash strategy is required")]
    NoStrategies,

    /// The table configuration is unusable.
    #[error("invalid table configuration: {0}")]
    InvalidTable(String),

    /// A name did not match any known variant.
    #[error("unknown {kind} `{value}` (expected one of: {expected})")]
    UnknownVariant {
        /// What was being parsed.
        kind: &'static str,
        /// The rejected input.
        value: String,
        /// Accepted spellings.
        expected: &'static str,
    },

    /// Reading a config file failed.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// A config file was not valid TOML for [`BenchConfig`](crate::BenchConfig).
    #[cfg(feature = "config-file")]
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A report could not be encoded as JSON.
    #[cfg(feature = "cli")]
    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, Error>;
