//! Keyed hash strategies, the process seed, and `std::hash` adapters.

pub mod build;
pub mod mix;
pub mod seed;
pub mod strategy;

pub use build::{StrategyBuildHasher, StrategyHashMap, StrategyHasher};
pub use mix::{bit_distance, mean_avalanche, splitmix64};
pub use seed::{
    SeedSource, init_process_seed, install_process_seed, is_process_seed_initialized,
    process_seed,
};
pub use strategy::HashStrategy;
