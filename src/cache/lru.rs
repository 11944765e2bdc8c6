//! LRU Engine Module
//!
//! Fixed-capacity cache evicting the least recently used entry.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::cache::list::{ListHead, NodeArena, SlotId};
use crate::cache::{ensure_positive, Cache, CacheEntry};
use crate::error::Result;

// == LRU Cache ==
/// Thread-safe LRU engine.
///
/// Entries sit in a single recency list:
/// - Front = most recently used
/// - Back = least recently used (next eviction victim)
#[derive(Debug)]
pub struct LruCache<V> {
    capacity: usize,
    state: Mutex<LruState<V>>,
}

#[derive(Debug)]
struct LruState<V> {
    capacity: usize,
    /// Key to slot, always the same key set as `order`
    index: HashMap<String, SlotId>,
    nodes: NodeArena<CacheEntry<V>>,
    order: ListHead,
}

impl<V> LruCache<V> {
    // == Constructor ==
    /// Creates an empty engine holding at most `capacity` entries.
    ///
    /// Fails with `InvalidConfiguration` when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        ensure_positive("capacity", capacity)?;
        debug!(capacity, "creating LRU engine");
        Ok(Self {
            capacity,
            state: Mutex::new(LruState {
                capacity,
                index: HashMap::new(),
                nodes: NodeArena::new(),
                order: ListHead::new(),
            }),
        })
    }

    /// Returns stored keys from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        let state = self.state.lock();
        state
            .nodes
            .iter_ids(&state.order)
            .filter_map(|id| state.nodes.get(id).map(|entry| entry.key.clone()))
            .collect()
    }
}

impl<V: Clone + Send> Cache<V> for LruCache<V> {
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
            .is_some_and(|entry| !entry.is_expired())
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
        state.order = ListHead::new();
    }

    fn debug_validate_invariants(&self) {
        self.state.lock().debug_validate_invariants()
    }
}

impl<V: Clone> LruState<V> {
    // == Get ==
    fn get(&mut self, key: &str) -> Option<V> {
        let id = *self.index.get(key)?;
        if self.nodes.get(id).map_or(true, CacheEntry::is_expired) {
            trace!(key, "dropping expired entry");
            self.remove(id);
            return None;
        }
        self.nodes.move_to_front(&mut self.order, id);
        self.nodes.get(id).map(|entry| entry.value.clone())
    }

    // == Set ==
    fn set(&mut self, key: &str, value: V, ttl: Option<Duration>) {
        if let Some(&id) = self.index.get(key) {
            match self.nodes.get_mut(id) {
                Some(entry) if !entry.is_expired() => {
                    entry.refresh(value, ttl);
                    self.nodes.move_to_front(&mut self.order, id);
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
                trace!(key = %evicted.key, "evicted least recently used entry");
            }
        }

        let id = self.nodes.insert(CacheEntry::new(key, value, ttl));
        self.nodes.push_front(&mut self.order, id);
        self.index.insert(key.to_owned(), id);
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
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(id, _)| id)
            .collect();
        for &id in &expired {
            self.remove(id);
        }
        expired.len()
    }

    fn evict(&mut self) -> Option<CacheEntry<V>> {
        let victim = self.order.back()?;
        self.remove(victim)
    }

    fn remove(&mut self, id: SlotId) -> Option<CacheEntry<V>> {
        self.nodes.unlink(&mut self.order, id);
        let entry = self.nodes.remove(id)?;
        self.index.remove(&entry.key);
        Some(entry)
    }
}

impl<V> LruState<V> {
    fn debug_validate_invariants(&self) {
        self.nodes.debug_validate_list(&self.order);
        assert_eq!(self.index.len(), self.order.len(), "index/list size mismatch");
        assert_eq!(self.nodes.len(), self.order.len(), "arena/list size mismatch");
        assert!(self.index.len() <= self.capacity, "capacity exceeded");
        for (key, &id) in &self.index {
            let entry = self.nodes.get(id).expect("index points at freed slot");
            assert_eq!(&entry.key, key, "index points at wrong entry");
        }
    }
}
