//! Sharded Router Module
//!
//! Spreads keys across independently locked engine instances so that calls
//! on different shards never contend.
//!
//! ```text
//!   key ──► fnv1a_32(key) % shard_count ──► shard i ──► engine (own lock)
//! ```
//!
//! The router holds no lock itself. Every call touches exactly one shard, so
//! at most one shard lock is held at a time.

use std::fmt;
use std::time::Duration;

use tracing::debug;

use crate::cache::{ensure_positive, fnv1a_32, Cache, EvictionPolicy, LfuCache, LruCache};
use crate::error::Result;

// == Sharded Cache ==
/// Fixed set of engine instances addressed by key hash.
pub struct ShardedCache<V> {
    shards: Box<[Box<dyn Cache<V>>]>,
}

impl<V: Clone + Send + 'static> ShardedCache<V> {
    // == Constructor ==
    /// Builds `shard_count` engines, each created by `factory(shard_capacity)`.
    ///
    /// Fails with `InvalidConfiguration` when either count is zero, or with
    /// the first error returned by `factory`. No shard outlives a failed
    /// construction.
    ///
    /// # Example
    /// ```
    /// use shard_cache::cache::{Cache, LruCache, ShardedCache};
    ///
    /// let cache = ShardedCache::new(4, 128, LruCache::new).unwrap();
    /// cache.set("foo", "bar".to_string(), None);
    /// assert_eq!(cache.get("foo"), Some("bar".to_string()));
    /// ```
    pub fn new<C, F>(shard_count: usize, shard_capacity: usize, factory: F) -> Result<Self>
    where
        C: Cache<V> + 'static,
        F: Fn(usize) -> Result<C>,
    {
        ensure_positive("shard count", shard_count)?;
        ensure_positive("shard capacity", shard_capacity)?;

        let shards = (0..shard_count)
            .map(|_| factory(shard_capacity).map(|shard| Box::new(shard) as Box<dyn Cache<V>>))
            .collect::<Result<Vec<_>>>()?
            .into_boxed_slice();

        debug!(shard_count, shard_capacity, "created sharded cache");
        Ok(Self { shards })
    }

    /// Builds every shard with the engine named by `policy`.
    pub fn with_policy(
        shard_count: usize,
        shard_capacity: usize,
        policy: EvictionPolicy,
    ) -> Result<Self> {
        match policy {
            EvictionPolicy::Lru => Self::new(shard_count, shard_capacity, LruCache::new),
            EvictionPolicy::Lfu => Self::new(shard_count, shard_capacity, LfuCache::new),
        }
    }
}

impl<V> ShardedCache<V> {
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    // == Shard Index ==
    /// Index of the shard owning `key`, always in `[0, shard_count)`.
    pub fn shard_index(&self, key: &str) -> usize {
        // u32 -> usize is lossless on every supported target
        fnv1a_32(key.as_bytes()) as usize % self.shards.len()
    }

    fn shard(&self, key: &str) -> &dyn Cache<V> {
        &*self.shards[self.shard_index(key)]
    }

    /// Entry count of each shard, in shard order.
    pub fn shard_lens(&self) -> Vec<usize> {
        self.shards.iter().map(|shard| shard.len()).collect()
    }
}

impl<V> Cache<V> for ShardedCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        self.shard(key).get(key)
    }

    fn set(&self, key: &str, value: V, ttl: Option<Duration>) {
        self.shard(key).set(key, value, ttl)
    }

    fn delete(&self, key: &str) -> bool {
        self.shard(key).delete(key)
    }

    fn contains(&self, key: &str) -> bool {
        self.shard(key).contains(key)
    }

    /// Sum over shards, each read under its own lock in turn.
    fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.len()).sum()
    }

    /// Sum of per-shard capacities; each shard bounds itself independently.
    fn capacity(&self) -> usize {
        self.shards.iter().map(|shard| shard.capacity()).sum()
    }

    fn purge_expired(&self) -> usize {
        self.shards.iter().map(|shard| shard.purge_expired()).sum()
    }

    fn clear(&self) {
        self.shards.iter().for_each(|shard| shard.clear());
    }

    fn debug_validate_invariants(&self) {
        self.shards
            .iter()
            .for_each(|shard| shard.debug_validate_invariants());
    }
}

impl<V> fmt::Debug for ShardedCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShardedCache")
            .field("shards", &self.shards.len())
            .finish()
    }
}
