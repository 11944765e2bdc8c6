//! Configuration Module
//!
//! Handles loading and managing cache and host configuration from
//! environment variables.

use std::env;

use crate::cache::EvictionPolicy;

/// Cache and host configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults. Unparseable values fall back to the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Number of independently locked shards
    pub shard_count: usize,
    /// Maximum number of entries in each shard
    pub shard_capacity: usize,
    /// Eviction engine used by every shard
    pub policy: EvictionPolicy,
    /// HTTP server port
    pub server_port: u16,
    /// Expiry sweep interval in seconds, 0 = lazy expiration only
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SHARD_COUNT` - Number of shards (default: 16)
    /// - `SHARD_CAPACITY` - Entries per shard (default: 1024)
    /// - `EVICTION_POLICY` - `lru` or `lfu` (default: lru)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            shard_count: parse_var("SHARD_COUNT").unwrap_or(defaults.shard_count),
            shard_capacity: parse_var("SHARD_CAPACITY").unwrap_or(defaults.shard_capacity),
            policy: parse_var("EVICTION_POLICY").unwrap_or(defaults.policy),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shard_count: 16,
            shard_capacity: 1024,
            policy: EvictionPolicy::Lru,
            server_port: 3000,
            cleanup_interval: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.shard_count, 16);
        assert_eq!(config.shard_capacity, 1024);
        assert_eq!(config.policy, EvictionPolicy::Lru);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, 1);
    }

    #[test]
    fn test_config_from_env() {
        // Single test touching the environment to avoid races between tests
        for name in [
            "SHARD_COUNT",
            "SHARD_CAPACITY",
            "EVICTION_POLICY",
            "SERVER_PORT",
            "CLEANUP_INTERVAL",
        ] {
            env::remove_var(name);
        }
        assert_eq!(Config::from_env(), Config::default());

        env::set_var("SHARD_COUNT", "4");
        env::set_var("EVICTION_POLICY", "lfu");
        env::set_var("SHARD_CAPACITY", "-1");

        let config = Config::from_env();
        assert_eq!(config.shard_count, 4);
        assert_eq!(config.policy, EvictionPolicy::Lfu);
        assert_eq!(config.shard_capacity, 1024);

        env::remove_var("SHARD_COUNT");
        env::remove_var("EVICTION_POLICY");
        env::remove_var("SHARD_CAPACITY");
    }
}
