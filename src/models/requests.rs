//! Request DTOs for the cache host API

use serde::Deserialize;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Longest key, in bytes, the host accepts.
pub const MAX_KEY_LENGTH: usize = 256;

/// Body of `PUT /set`.
///
/// `ttl` is in seconds; absent or zero stores the entry without expiry.
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl SetRequest {
    /// Rejects keys the host refuses to store.
    pub fn validate(&self) -> Result<()> {
        if self.key.is_empty() {
            return Err(CacheError::InvalidRequest("Key cannot be empty".into()));
        }
        if self.key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidRequest(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }
        Ok(())
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl.map(Duration::from_secs)
    }
}
