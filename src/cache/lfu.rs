//! LFU Engine Module
//!
//! Fixed-capacity cache evicting the least frequently used entry, ties broken
//! by recency.
//!
//! Entries are grouped into one intrusive list per access frequency. Within a
//! bucket the front holds the most recently promoted entry, so the back of the
//! `min_frequency` bucket is always the eviction victim:
//!
//! ```text
//! min_frequency = 1
//!
//! freq 1: [key4] <-> [key3] <-> [key1]   <- back evicted first
//!    |
//!    | next / prev
//!    v
//! freq 4: [key0]
//! ```
//!
//! Non-empty buckets are chained in ascending frequency order, so when the
//! minimum bucket empties the new minimum is its successor in the chain.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::cache::list::{ListHead, NodeArena, SlotId};
use crate::cache::{ensure_positive, Cache, CacheEntry};
use crate::error::Result;

/// Frequency of a freshly inserted entry.
const INITIAL_FREQUENCY: u64 = 1;

// == LFU Cache ==
/// Thread-safe LFU engine.
#[derive(Debug)]
pub struct LfuCache<V> {
    capacity: usize,
    state: Mutex<LfuState<V>>,
}

#[derive(Debug)]
struct LfuNode<V> {
    entry: CacheEntry<V>,
    frequency: u64,
}

/// Entries sharing one access frequency.
#[derive(Debug, Default)]
struct FrequencyBucket {
    entries: ListHead,
    /// Nearest lower frequency with a bucket
    prev: Option<u64>,
    /// Nearest higher frequency with a bucket
    next: Option<u64>,
}

#[derive(Debug)]
struct LfuState<V> {
    capacity: usize,
    /// Key to slot, always the same key set as the union of `buckets`
    index: HashMap<String, SlotId>,
    nodes: NodeArena<LfuNode<V>>,
    /// Non-empty buckets only; empty buckets are unlinked and dropped
    buckets: HashMap<u64, FrequencyBucket>,
    /// Head of the bucket chain whenever any entry is stored
    min_frequency: u64,
}

impl<V> LfuCache<V> {
    // == Constructor ==
    /// Creates an empty engine holding at most `capacity` entries.
    ///
    /// Fails with `InvalidConfiguration` when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        ensure_positive("capacity", capacity)?;
        debug!(capacity, "creating LFU engine");
        Ok(Self {
            capacity,
            state: Mutex::new(LfuState {
                capacity,
                index: HashMap::new(),
                nodes: NodeArena::new(),
                buckets: HashMap::new(),
                min_frequency: INITIAL_FREQUENCY,
            }),
        })
    }

    /// Returns the access frequency of `key` without promoting it.
    pub fn frequency(&self, key: &str) -> Option<u64> {
        let state = self.state.lock();
        state
            .index
            .get(key)
            .and_then(|&id| state.nodes.get(id))
            .map(|node| node.frequency)
    }

    /// Bucket frequencies in chain order, starting at the minimum.
    #[cfg(test)]
    fn frequency_chain(&self) -> Vec<u64> {
        let state = self.state.lock();
        let mut chain = Vec::new();
        if state.buckets.is_empty() {
            return chain;
        }
        let mut current = Some(state.min_frequency);
        while let Some(frequency) = current {
            chain.push(frequency);
            current = state.buckets.get(&frequency).and_then(|bucket| bucket.next);
        }
        chain
    }
}

impl<V: Clone + Send> Cache<V> for LfuCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        self.state.lock().get(key)
    }

    fn set(&self, key: &str, value: V, ttl: Option<Duration>) {
        self.state.lock().set(key, value, ttl)
    }

    fn delete(&self, key: &str) -> bool {
        self.state.lock().delete(key)
    }

    fn contains(&self, key: &str) -> bool {
        let state = self.state.lock();
        state
            .index
            .get(key)
            .and_then(|&id| state.nodes.get(id))
            .is_some_and(|node| !node.entry.is_expired())
    }

    fn len(&self) -> usize {
        self.state.lock().index.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn purge_expired(&self) -> usize {
        self.state.lock().purge_expired()
    }

    fn clear(&self) {
        let mut state = self.state.lock();
        state.index.clear();
        state.nodes.clear();
        state.buckets.clear();
        state.min_frequency = INITIAL_FREQUENCY;
    }

    fn debug_validate_invariants(&self) {
        self.state.lock().debug_validate_invariants()
    }
}

impl<V: Clone> LfuState<V> {
    // == Get ==
    fn get(&mut self, key: &str) -> Option<V> {
        let id = *self.index.get(key)?;
        if self.nodes.get(id).map_or(true, |node| node.entry.is_expired()) {
            trace!(key, "dropping expired entry");
            self.remove(id);
            return None;
        }
        self.promote(id);
        self.nodes.get(id).map(|node| node.entry.value.clone())
    }

    // == Set ==
    fn set(&mut self, key: &str, value: V, ttl: Option<Duration>) {
        if let Some(&id) = self.index.get(key) {
            match self.nodes.get_mut(id) {
                Some(node) if !node.entry.is_expired() => {
                    node.entry.refresh(value, ttl);
                    self.promote(id);
                    return;
                }
                _ => {
                    // An expired entry is treated as absent.
                    self.remove(id);
                }
            }
        }

        if self.index.len() >= self.capacity {
            if let Some(evicted) = self.evict() {
                trace!(
                    key = %evicted.entry.key,
                    frequency = evicted.frequency,
                    "evicted least frequently used entry"
                );
            }
        }

        let id = self.nodes.insert(LfuNode {
            entry: CacheEntry::new(key, value, ttl),
            frequency: INITIAL_FREQUENCY,
        });
        if !self.buckets.contains_key(&INITIAL_FREQUENCY) {
            // Nothing sorts below the initial frequency
            let next = (!self.buckets.is_empty()).then_some(self.min_frequency);
            self.link_bucket(INITIAL_FREQUENCY, None, next);
        }
        self.push_to_bucket(INITIAL_FREQUENCY, id);
        self.index.insert(key.to_owned(), id);
        self.min_frequency = INITIAL_FREQUENCY;
    }

    // == Delete ==
    fn delete(&mut self, key: &str) -> bool {
        match self.index.get(key) {
            Some(&id) => self.remove(id).is_some(),
            None => false,
        }
    }

    fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let expired: Vec<SlotId> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.entry.is_expired_at(now))
            .map(|(id, _)| id)
            .collect();
        for &id in &expired {
            self.remove(id);
        }
        expired.len()
    }

    // == Promote ==
    /// Moves an entry to the front of the next frequency's bucket.
    fn promote(&mut self, id: SlotId) {
        let frequency = match self.nodes.get(id) {
            Some(node) => node.frequency,
            None => return,
        };
        let (lower, higher) = match self.buckets.get_mut(&frequency) {
            Some(bucket) if frequency == u64::MAX => {
                // Saturated; only recency changes
                self.nodes.move_to_front(&mut bucket.entries, id);
                return;
            }
            Some(bucket) => (bucket.prev, bucket.next),
            None => return,
        };

        let next = frequency + 1;
        let was_min = self.min_frequency == frequency;
        let emptied = self.detach(id, frequency);

        if !self.buckets.contains_key(&next) {
            let prev = if emptied { lower } else { Some(frequency) };
            self.link_bucket(next, prev, higher);
        }
        if emptied && was_min {
            self.min_frequency = next;
        }

        if let Some(node) = self.nodes.get_mut(id) {
            node.frequency = next;
        }
        self.push_to_bucket(next, id);
    }

    /// Removes the back of the `min_frequency` bucket.
    fn evict(&mut self) -> Option<LfuNode<V>> {
        let victim = self.buckets.get(&self.min_frequency)?.entries.back()?;
        self.remove(victim)
    }

    fn remove(&mut self, id: SlotId) -> Option<LfuNode<V>> {
        let frequency = self.nodes.get(id)?.frequency;
        self.detach(id, frequency);
        let node = self.nodes.remove(id)?;
        self.index.remove(&node.entry.key);
        Some(node)
    }

    /// Unlinks a node from its bucket. A bucket left empty is cut out of the
    /// chain, and if it was the minimum its successor becomes the minimum.
    ///
    /// Returns whether the bucket was dropped.
    fn detach(&mut self, id: SlotId, frequency: u64) -> bool {
        let Some(bucket) = self.buckets.get_mut(&frequency) else {
            return false;
        };
        self.nodes.unlink(&mut bucket.entries, id);
        if !bucket.entries.is_empty() {
            return false;
        }

        let (lower, higher) = (bucket.prev, bucket.next);
        self.unlink_bucket(frequency, lower, higher);
        if self.min_frequency == frequency {
            self.min_frequency = higher.unwrap_or(INITIAL_FREQUENCY);
        }
        true
    }

    fn push_to_bucket(&mut self, frequency: u64, id: SlotId) {
        if let Some(bucket) = self.buckets.get_mut(&frequency) {
            self.nodes.push_front(&mut bucket.entries, id);
        }
    }

    /// Creates an empty bucket between `prev` and `next` in the chain.
    fn link_bucket(&mut self, frequency: u64, prev: Option<u64>, next: Option<u64>) {
        self.buckets.insert(
            frequency,
            FrequencyBucket {
                entries: ListHead::new(),
                prev,
                next,
            },
        );
        if let Some(prev) = prev {
            if let Some(bucket) = self.buckets.get_mut(&prev) {
                bucket.next = Some(frequency);
            }
        }
        if let Some(next) = next {
            if let Some(bucket) = self.buckets.get_mut(&next) {
                bucket.prev = Some(frequency);
            }
        }
    }

    fn unlink_bucket(&mut self, frequency: u64, prev: Option<u64>, next: Option<u64>) {
        if let Some(lower) = prev {
            if let Some(bucket) = self.buckets.get_mut(&lower) {
                bucket.next = next;
            }
        }
        if let Some(higher) = next {
            if let Some(bucket) = self.buckets.get_mut(&higher) {
                bucket.prev = prev;
            }
        }
        self.buckets.remove(&frequency);
    }
}

impl<V> LfuState<V> {
    fn debug_validate_invariants(&self) {
        let mut listed = 0;
        for (&frequency, bucket) in &self.buckets {
            assert!(!bucket.entries.is_empty(), "empty bucket kept for frequency {frequency}");
            self.nodes.debug_validate_list(&bucket.entries);
            for id in self.nodes.iter_ids(&bucket.entries) {
                let node = self.nodes.get(id).expect("bucket links a freed slot");
                assert_eq!(node.frequency, frequency, "node in wrong bucket");
            }
            match bucket.prev {
                Some(prev) => {
                    assert!(prev < frequency, "bucket chain out of order");
                    assert_eq!(self.buckets[&prev].next, Some(frequency), "broken next link");
                }
                None => assert_eq!(self.min_frequency, frequency, "chain head is not the minimum"),
            }
            if let Some(next) = bucket.next {
                assert!(next > frequency, "bucket chain out of order");
                assert_eq!(self.buckets[&next].prev, Some(frequency), "broken prev link");
            }
            listed += bucket.entries.len();
        }
        assert_eq!(self.index.len(), listed, "index/bucket size mismatch");
        assert_eq!(self.nodes.len(), listed, "arena/bucket size mismatch");
        assert!(self.index.len() <= self.capacity, "capacity exceeded");
        if !self.buckets.is_empty() {
            assert!(
                self.buckets.contains_key(&self.min_frequency),
                "min_frequency has no bucket"
            );
        }
        for (key, &id) in &self.index {
            let node = self.nodes.get(id).expect("index points at freed slot");
            assert_eq!(&node.entry.key, key, "index points at wrong entry");
        }
    }
}
