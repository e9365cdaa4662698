//! Bucket occupancy diagnostics.

use super::policy::BucketPolicy;
use serde::{Deserialize, Serialize};
use std::hash::BuildHasher;

/// Occupancy summary of a bucket array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketStats {
    /// Number of buckets.
    pub bucket_count: usize,
    /// Number of entries across all buckets.
    pub entries: usize,
    /// Size of the fullest bucket.
    pub max_bucket: usize,
    /// Buckets holding nothing.
    pub empty_buckets: usize,
}

impl BucketStats {
    /// Summarizes per-bucket sizes.
    pub fn from_sizes<I>(sizes: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut stats = Self {
            bucket_count: 0,
            entries: 0,
            max_bucket: 0,
            empty_buckets: 0,
        };
        for size in sizes {
            stats.bucket_count += 1;
            stats.entries += size;
            stats.max_bucket = stats.max_bucket.max(size);
            if size == 0 {
                stats.empty_buckets += 1;
            }
        }
        stats
    }

    /// Mean entries per bucket under a perfect spread.
    #[must_use]
    pub fn expected_per_bucket(&self) -> f64 {
        if self.bucket_count == 0 {
            return 0.0;
        }
        self.entries as f64 / self.bucket_count as f64
    }

    /// Fullest bucket relative to the expected size; 1.0 is a perfect spread.
    ///
    /// Expected sizes below one entry are rounded up to one, so sparse tables
    /// are not penalized for holding a pair in one bucket.
    #[must_use]
    pub fn skew(&self) -> f64 {
        if self.entries == 0 {
            return 0.0;
        }
        self.max_bucket as f64 / self.expected_per_bucket().max(1.0)
    }
}

/// Buckets `keys` would occupy in a table of `bucket_count` buckets, without
/// building the table.
///
/// Duplicate keys are counted every time they appear.
pub fn occupancy<S, I>(hasher: &S, policy: BucketPolicy, bucket_count: usize, keys: I) -> BucketStats
where
    S: BuildHasher,
    I: IntoIterator<Item = u64>,
{
    let bucket_count = bucket_count.max(1);
    let mut sizes = vec![0usize; bucket_count];
    for key in keys {
        sizes[policy.index(hasher.hash_one(key), bucket_count)] += 1;
    }
    BucketStats::from_sizes(sizes)
}
