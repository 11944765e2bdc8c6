//! Shard Cache - An in-process sharded key-value cache
//!
//! Bounded LRU and LFU eviction engines behind a hash router that spreads
//! keys across independently locked shards.
//!
//! The `server` feature (on by default) adds the small HTTP host used to
//! demonstrate the cache. Embedders that only need the cache can build with
//! `default-features = false`.

pub mod cache;
pub mod error;

#[cfg(feature = "server")]
pub mod api;
#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod models;
#[cfg(feature = "server")]
pub mod tasks;

pub use cache::{Cache, EvictionPolicy, LfuCache, LruCache, ShardedCache};
pub use error::{CacheError, Result};

#[cfg(feature = "server")]
pub use api::AppState;
#[cfg(feature = "server")]
pub use config::Config;
#[cfg(feature = "server")]
pub use tasks::spawn_cleanup_task;
