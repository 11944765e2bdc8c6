//! Cache Module
//!
//! Fixed-capacity eviction engines (LRU and LFU) and the sharded router that
//! spreads keys across independently locked engine instances.
//!
//! The node arena and intrusive lists behind the engines are crate-private:
//!
//! ```compile_fail
//! use shard_cache::cache::NodeArena;
//! ```

mod entry;
mod hash;
mod lfu;
mod list;
mod lru;
mod sharded;


use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::CacheError;

// Re-export public types
pub use entry::CacheEntry;
pub use hash::fnv1a_32;
pub use lfu::LfuCache;
pub use lru::LruCache;
pub use sharded::ShardedCache;

// == Cache Trait ==
/// Uniform contract shared by the eviction engines and the sharded router.
///
/// Every method takes `&self`; implementations synchronize internally, so a
/// single instance can be shared across threads.
pub trait Cache<V>: Send + Sync {
    /// Returns the value for `key` if present and not expired.
    ///
    /// A hit counts as an access for the eviction policy. An expired entry is
    /// removed and reported as a miss.
    fn get(&self, key: &str) -> Option<V>;

    /// Inserts or replaces the value for `key`.
    ///
    /// `ttl` of `None` or zero means the entry never expires. Inserting into a
    /// full engine evicts one entry first.
    fn set(&self, key: &str, value: V, ttl: Option<Duration>);

    /// Removes `key`, returning whether an entry was present.
    fn delete(&self, key: &str) -> bool;

    /// Checks for a live entry without counting as an access.
    fn contains(&self, key: &str) -> bool;

    /// Number of stored entries, expired ones included.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries.
    fn capacity(&self) -> usize;

    /// Removes every expired entry and returns how many were dropped.
    fn purge_expired(&self) -> usize;

    /// Removes every entry.
    fn clear(&self);

    /// Panics if internal index and list structures disagree.
    fn debug_validate_invariants(&self) {}
}

// == Eviction Policy ==
/// Selects the engine built for each shard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EvictionPolicy {
    /// Least recently used
    #[default]
    Lru,
    /// Least frequently used, ties broken by recency
    Lfu,
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvictionPolicy::Lru => f.write_str("lru"),
            EvictionPolicy::Lfu => f.write_str("lfu"),
        }
    }
}

impl FromStr for EvictionPolicy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" => Ok(EvictionPolicy::Lru),
            "lfu" => Ok(EvictionPolicy::Lfu),
            other => Err(CacheError::InvalidConfiguration(format!(
                "unknown eviction policy '{}'",
                other
            ))),
        }
    }
}

/// Rejects a zero capacity or shard count.
pub(crate) fn ensure_positive(name: &str, value: usize) -> crate::error::Result<()> {
    if value == 0 {
        return Err(CacheError::InvalidConfiguration(format!(
            "{} must be greater than zero",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_from_str() {
        assert_eq!("lru".parse::<EvictionPolicy>().unwrap(), EvictionPolicy::Lru);
        assert_eq!(" LFU ".parse::<EvictionPolicy>().unwrap(), EvictionPolicy::Lfu);
        assert!(matches!(
            "arc".parse::<EvictionPolicy>(),
            Err(CacheError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_policy_display_round_trip() {
        for policy in [EvictionPolicy::Lru, EvictionPolicy::Lfu] {
            assert_eq!(policy.to_string().parse::<EvictionPolicy>().unwrap(), policy);
        }
    }

    #[test]
    fn test_ensure_positive() {
        assert!(ensure_positive("capacity", 1).is_ok());
        assert!(matches!(
            ensure_positive("capacity", 0),
            Err(CacheError::InvalidConfiguration(_))
        ));
    }
}
