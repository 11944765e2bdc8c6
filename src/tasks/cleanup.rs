//! Expiry Sweep Task
//!
//! Background task that periodically removes expired cache entries so that
//! they stop occupying shard capacity before they are next touched.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{Cache, ShardedCache};

/// Spawns the periodic expiry sweep over every shard of `cache`.
///
/// Each sweep visits the shards one at a time, so it holds at most one shard
/// lock. The returned handle is aborted on shutdown.
pub fn spawn_cleanup_task<V>(
    cache: Arc<ShardedCache<V>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()>
where
    V: 'static,
{
    let interval = Duration::from_secs(cleanup_interval_secs);

    tokio::spawn(async move {
        info!(
            interval_secs = cleanup_interval_secs,
            shards = cache.shard_count(),
            "expiry sweep running"
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.purge_expired();

            if removed > 0 {
                info!(removed, remaining = cache.len(), "expired entries swept");
            } else {
                debug!("expiry sweep found nothing to remove");
            }
        }
    })
}
