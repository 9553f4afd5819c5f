//! Bounded memoization for pure calculations.
//!
//! Entries never expire: the cached function must be pure, so a stored value
//! stays valid forever. When full, an arbitrary entry is evicted.

use dashmap::DashMap;
use std::hash::Hash;
use tracing::debug;

pub const DEFAULT_CAPACITY: usize = 500;

pub struct Memo<K, V> {
    entries: DashMap<K, V>,
    capacity: usize,
}

impl<K, V> Default for Memo<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<K, V> Memo<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// A capacity of zero disables storage, every call computes.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            capacity,
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub fn get_or_insert_with<F>(&self, key: K, f: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(&key) {
            debug!("Cache hit");
            return value;
        }
        debug!("Cache miss");
        let value = f();
        if self.capacity == 0 {
            return value;
        }

        if self.entries.len() >= self.capacity {
            // Shard guards must be released before removing
            let victim = self.entries.iter().next().map(|entry| entry.key().clone());
            if let Some(victim) = victim {
                self.entries.remove(&victim);
            }
        }
        self.entries.insert(key, value.clone());
        value
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
