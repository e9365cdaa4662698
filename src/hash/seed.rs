//! Process-wide hash seed.
//!
//! The seed is drawn at most once per process, on the first digest that needs
//! it, and is fixed from then on. Initialization goes through a [`OnceLock`],
//! so threads racing on first use all observe the same value.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

static PROCESS_SEED: OnceLock<u64> = OnceLock::new();

/// Where a fresh seed comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeedSource {
    /// Nanosecond reading of the system clock at first use.
    #[default]
    Clock,
    /// Operating-system entropy.
    Os,
}

impl SeedSource {
    /// Draws a new seed from this source.
    ///
    /// OS entropy failures fall back to the clock.
    #[must_use]
    pub fn draw(self) -> u64 {
        match self {
            Self::Clock => clock_seed(),
            Self::Os => {
                let mut buf = [0u8; 8];
                match getrandom::fill(&mut buf) {
                    Ok(()) => u64::from_le_bytes(buf),
                    Err(err) => {
                        tracing::warn!(%err, "OS entropy unavailable, seeding from clock");
                        clock_seed()
                    }
                }
            }
        }
    }

    /// Returns the source name as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clock => "clock",
            Self::Os => "os",
        }
    }
}

impl FromStr for SeedSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "clock" => Ok(Self::Clock),
            "os" => Ok(Self::Os),
            other => Err(Error::UnknownVariant {
                kind: "seed source",
                value: other.to_owned(),
                expected: "clock, os",
            }),
        }
    }
}

fn clock_seed() -> u64 {
    let since_epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|err| err.duration());
    since_epoch.as_nanos() as u64
}

/// Returns the process seed, drawing it from the clock on first call.
#[inline]
pub fn process_seed() -> u64 {
    *PROCESS_SEED.get_or_init(|| {
        let seed = SeedSource::Clock.draw();
        tracing::trace!(source = "clock", seed, "process seed initialized");
        seed
    })
}

/// Initializes the process seed from `source`, or returns the seed already in
/// force.
pub fn init_process_seed(source: SeedSource) -> u64 {
    *PROCESS_SEED.get_or_init(|| {
        let seed = source.draw();
        tracing::trace!(source = source.as_str(), seed, "process seed initialized");
        seed
    })
}

/// Fixes the process seed to `seed`.
///
/// Fails once any seeded digest has been computed or a seed was already
/// installed; the seed never changes after first use.
pub fn install_process_seed(seed: u64) -> Result<()> {
    PROCESS_SEED.set(seed).map_err(|_| Error::SeedAlreadyInitialized {
        current: process_seed(),
    })?;
    tracing::trace!(source = "installed", seed, "process seed initialized");
    Ok(())
}

/// Returns true once the process seed has been drawn or installed.
pub fn is_process_seed_initialized() -> bool {
    PROCESS_SEED.get().is_some()
}
