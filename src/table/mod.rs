//! Chained hash table and bucket diagnostics.

pub mod chained;
pub mod policy;
pub mod stats;

pub use chained::ChainedTable;
pub use policy::{BucketPolicy, MAX_BUCKETS, MIN_LOAD_FACTOR, TableConfig, is_prime, next_prime};
pub use stats::{BucketStats, occupancy};
