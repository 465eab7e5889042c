//! Two-tier value cache: pinned entries live as long as the cache,
//! unpinned entries are dropped oldest-first past a fixed count.

use std::any::Any;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::text::TextKey;

pub(crate) type Value = Rc<dyn Any>;

/// Identity of the argument a resource was computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKey {
    Unit,
    Text(TextKey),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct CacheKey {
    pub name: String,
    pub arg: ArgKey,
}

/// Counters describing cache behaviour since the pool was built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub pinned_entries: usize,
    pub unpinned_entries: usize,
}

pub(crate) struct ResourceCache {
    pinned: HashMap<CacheKey, Value>,
    unpinned: HashMap<CacheKey, Value>,
    order: VecDeque<CacheKey>,
    limit: usize,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl ResourceCache {
    pub fn new(limit: usize) -> Self {
        ResourceCache {
            pinned: HashMap::new(),
            unpinned: HashMap::new(),
            order: VecDeque::new(),
            limit,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Look up a value, counting a hit when found. Misses are recorded
    /// separately via [`record_miss`](Self::record_miss) once a hook runs.
    pub fn get(&mut self, key: &CacheKey, pinned: bool) -> Option<Value> {
        let tier = if pinned { &self.pinned } else { &self.unpinned };
        let value = tier.get(key).map(Rc::clone)?;
        self.hits += 1;
        Some(value)
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Store a value and return the keys evicted to make room for it.
    pub fn insert(&mut self, key: CacheKey, value: Value, pinned: bool) -> Vec<CacheKey> {
        if pinned {
            self.pinned.insert(key, value);
            return Vec::new();
        }

        if self.unpinned.insert(key.clone(), value).is_none() {
            self.order.push_back(key);
        }

        let mut evicted = Vec::new();
        while self.order.len() > self.limit {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.unpinned.remove(&oldest);
            self.evictions += 1;
            evicted.push(oldest);
        }
        evicted
    }

    /// Drop every entry, in either tier, computed under `name`.
    pub fn remove_name(&mut self, name: &str) {
        self.pinned.retain(|k, _| k.name != name);
        self.unpinned.retain(|k, _| k.name != name);
        self.order.retain(|k| k.name != name);
    }

    pub fn clear_unpinned(&mut self) {
        self.unpinned.clear();
        self.order.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            pinned_entries: self.pinned.len(),
            unpinned_entries: self.unpinned.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> CacheKey {
        CacheKey {
            name: name.to_string(),
            arg: ArgKey::Unit,
        }
    }

    fn value(v: i32) -> Value {
        Rc::new(v)
    }

    #[test]
    fn test_unpinned_evicts_oldest_first() {
        let mut cache = ResourceCache::new(2);
        assert!(cache.insert(key("a"), value(1), false).is_empty());
        assert!(cache.insert(key("b"), value(2), false).is_empty());
        let evicted = cache.insert(key("c"), value(3), false);

        assert_eq!(evicted, vec![key("a")]);
        assert!(cache.get(&key("a"), false).is_none());
        assert!(cache.get(&key("b"), false).is_some());
        assert!(cache.get(&key("c"), false).is_some());
    }

    #[test]
    fn test_pinned_is_never_evicted() {
        let mut cache = ResourceCache::new(0);
        for i in 0..10 {
            cache.insert(key(&format!("p{i}")), value(i), true);
        }
        assert_eq!(cache.stats().pinned_entries, 10);
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn test_zero_limit_keeps_nothing_unpinned() {
        let mut cache = ResourceCache::new(0);
        let evicted = cache.insert(key("a"), value(1), false);
        assert_eq!(evicted, vec![key("a")]);
        assert_eq!(cache.stats().unpinned_entries, 0);
    }

    #[test]
    fn test_tiers_are_independent() {
        let mut cache = ResourceCache::new(4);
        cache.insert(key("x"), value(1), true);
        assert!(cache.get(&key("x"), false).is_none());
        assert!(cache.get(&key("x"), true).is_some());

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses), (1, 0));
        cache.record_miss();
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_remove_name_and_clear() {
        let mut cache = ResourceCache::new(4);
        cache.insert(key("a"), value(1), false);
        cache.insert(key("b"), value(2), false);
        cache.insert(key("a"), value(3), true);

        cache.remove_name("a");
        assert_eq!(cache.stats().pinned_entries, 0);
        assert_eq!(cache.stats().unpinned_entries, 1);

        cache.clear_unpinned();
        assert_eq!(cache.stats().unpinned_entries, 0);
    }
}
