//! Cache Entry Module
//!
//! Defines the record stored for each key, shared by both eviction engines.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cached key with its value and optional expiration instant.
///
/// Policy bookkeeping (list links, access frequency) lives in the engine's
/// node type, not here.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The key this entry is stored under
    pub key: String,
    /// The stored value
    pub value: V,
    /// Absolute expiration instant, None = no expiration
    pub expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry with optional TTL.
    ///
    /// # Arguments
    /// * `key` - The key to store under
    /// * `value` - The value to store
    /// * `ttl` - Time to live; `None` or a zero duration means no expiration
    pub fn new(key: impl Into<String>, value: V, ttl: Option<Duration>) -> Self {
        Self {
            key: key.into(),
            value,
            expires_at: expiration_from(ttl),
        }
    }

    // == Refresh ==
    /// Replaces the value in place and recomputes the expiration from `ttl`.
    pub fn refresh(&mut self, value: V, ttl: Option<Duration>) {
        self.value = value;
        self.expires_at = expiration_from(ttl);
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current instant is at or past its
    /// expiration instant.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Checks expiration against a caller-supplied instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns the remaining time to live, or None if no expiration is set.
    ///
    /// Returns `Some(Duration::ZERO)` once the entry has expired.
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|expires| expires.saturating_duration_since(Instant::now()))
    }
}

/// Converts a relative TTL into an absolute instant.
///
/// A TTL too large to represent is treated as no expiration.
fn expiration_from(ttl: Option<Duration>) -> Option<Instant> {
    ttl.filter(|ttl| !ttl.is_zero())
        .and_then(|ttl| Instant::now().checked_add(ttl))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation_no_ttl() {
        let entry = CacheEntry::new("key", "test_value".to_string(), None);

        assert_eq!(entry.key, "key");
        assert_eq!(entry.value, "test_value");
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_zero_ttl_never_expires() {
        let entry = CacheEntry::new("key", 1, Some(Duration::ZERO));

        assert!(entry.expires_at.is_none());
        assert!(entry.ttl_remaining().is_none());
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = CacheEntry::new("key", 1, Some(Duration::from_secs(60)));

        assert!(entry.expires_at.is_some());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("key", 1, Some(Duration::from_millis(50)));

        assert!(!entry.is_expired());

        sleep(Duration::from_millis(80));

        assert!(entry.is_expired());
        assert_eq!(entry.ttl_remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn test_huge_ttl_is_no_expiration() {
        let entry = CacheEntry::new("key", 1, Some(Duration::MAX));
        assert!(entry.expires_at.is_none());
    }

    #[test]
    fn test_refresh_replaces_value_and_expiration() {
        let mut entry = CacheEntry::new("key", 1, Some(Duration::from_secs(60)));

        entry.refresh(2, None);

        assert_eq!(entry.value, 2);
        assert!(entry.expires_at.is_none());
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = CacheEntry::new("key", 1, Some(Duration::from_secs(10)));

        let remaining = entry.ttl_remaining().unwrap();
        assert!(remaining <= Duration::from_secs(10));
        assert!(remaining >= Duration::from_secs(9));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = CacheEntry {
            key: "test".to_string(),
            value: (),
            expires_at: Some(now),
        };

        assert!(entry.is_expired_at(now), "Entry should be expired at boundary");
    }
}
