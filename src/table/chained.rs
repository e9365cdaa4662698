//! Separate-chaining hash table with a pluggable bucket policy.
//!
//! Every bucket is a chain scanned linearly, so the cost of an insertion is
//! the length of the chain its digest lands in. A hash that funnels keys into
//! one bucket turns each insertion into a scan of everything inserted so far.

use super::policy::TableConfig;
use super::stats::BucketStats;
use crate::error::Result;
use crate::hash::{HashStrategy, StrategyBuildHasher};
use std::hash::{BuildHasher, Hash};
use std::mem;

/// Hash table resolving collisions by chaining.
///
/// Bucket index is `policy.index(hasher.hash_one(key), bucket_count)`.
#[derive(Debug, Clone)]
pub struct ChainedTable<K, V, S = StrategyBuildHasher> {
    buckets: Vec<Vec<(K, V)>>,
    len: usize,
    config: TableConfig,
    hasher: S,
    probes: u64,
}

impl<K, V> ChainedTable<K, V, StrategyBuildHasher>
where
    K: Hash + Eq,
{
    /// Empty table with the default configuration, hashed by `strategy` under
    /// the process seed.
    #[must_use]
    pub fn new(strategy: HashStrategy) -> Self {
        Self::build(TableConfig::default(), StrategyBuildHasher::new(strategy))
    }
}

impl<K, V, S> ChainedTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Empty table sized by `config`, hashed by `hasher`.
    pub fn with_hasher(config: TableConfig, hasher: S) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, hasher))
    }

    fn build(config: TableConfig, hasher: S) -> Self {
        let buckets = std::iter::repeat_with(Vec::new)
            .take(config.initial_bucket_count())
            .collect();
        Self {
            buckets,
            len: 0,
            config,
            hasher,
            probes: 0,
        }
    }

    #[inline]
    fn bucket_of(&self, key: &K) -> usize {
        self.config
            .policy
            .index(self.hasher.hash_one(key), self.buckets.len())
    }

    /// Inserts `value` under `key`, returning the value it replaced.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut idx = self.bucket_of(&key);
        for (k, v) in &mut self.buckets[idx] {
            self.probes += 1;
            if *k == key {
                return Some(mem::replace(v, value));
            }
        }

        if self.config.needs_growth(self.buckets.len(), self.len + 1) {
            let target = self.config.grown(self.buckets.len(), self.len + 1);
            if target > self.buckets.len() {
                self.rehash(target);
                idx = self.bucket_of(&key);
            }
        }
        self.buckets[idx].push((key, value));
        self.len += 1;
        None
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.buckets[self.bucket_of(key)]
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let idx = self.bucket_of(key);
        self.buckets[idx]
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Returns true if `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.bucket_of(key);
        let chain = &mut self.buckets[idx];
        let mut found = None;
        for (pos, (k, _)) in chain.iter().enumerate() {
            self.probes += 1;
            if k == key {
                found = Some(pos);
                break;
            }
        }
        let pos = found?;
        self.len -= 1;
        Some(chain.swap_remove(pos).1)
    }

    fn rehash(&mut self, bucket_count: usize) {
        tracing::debug!(
            from = self.buckets.len(),
            to = bucket_count,
            entries = self.len,
            "rehashing chained table"
        );
        let old = mem::replace(
            &mut self.buckets,
            std::iter::repeat_with(Vec::new).take(bucket_count).collect(),
        );
        for (key, value) in old.into_iter().flatten() {
            let idx = self.bucket_of(&key);
            self.buckets[idx].push((key, value));
        }
    }
}

impl<K, V, S> ChainedTable<K, V, S> {
    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the table holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current number of buckets.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Entries per bucket.
    #[must_use]
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    /// Key comparisons performed by insertions and removals so far.
    ///
    /// Grows linearly with inserted keys under a good hash and quadratically
    /// under a flooded one.
    #[must_use]
    pub fn probe_count(&self) -> u64 {
        self.probes
    }

    /// The table's sizing configuration.
    #[must_use]
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// The table's hash builder.
    #[must_use]
    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Iterates every entry once, in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets.iter().flatten().map(|(k, v)| (k, v))
    }

    /// Removes every entry, keeping the bucket count.
    pub fn clear(&mut self) {
        for chain in &mut self.buckets {
            chain.clear();
        }
        self.len = 0;
    }

    /// Occupancy of the current bucket array.
    #[must_use]
    pub fn bucket_stats(&self) -> BucketStats {
        BucketStats::from_sizes(self.buckets.iter().map(Vec::len))
    }
}

impl<K, V, S> Extend<(K, V)> for ChainedTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}
