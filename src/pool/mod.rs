//! Memoizing resource pool.
//!
//! Resources are produced on demand by named hooks and cached by
//! `(name, argument)`. Hooks may fetch other resources through the pool,
//! so the registered hooks form a DAG of memoized derivations.
//!
//! ```
//! use cohmetrix::pool::{Arg, ResourcePool};
//!
//! let mut pool = ResourcePool::new(8);
//! pool.register("greeting", true, |_, _| Ok(String::from("olá")));
//! let value = pool.get::<String>("greeting", Arg::Unit).unwrap();
//! assert_eq!(value.as_str(), "olá");
//! ```

mod cache;
pub mod resources;

use std::any::{type_name, Any};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::config::Config;
use crate::error::{PoolError, Result};
use crate::text::Text;

pub use cache::{ArgKey, CacheStats};
use cache::{CacheKey, ResourceCache, Value};

pub const DEFAULT_CACHE_LIMIT: usize = 100;

/// The argument a resource is computed for.
#[derive(Debug, Clone, Copy)]
pub enum Arg<'a> {
    Unit,
    Text(&'a Text),
}

impl<'a> Arg<'a> {
    pub fn key(&self) -> ArgKey {
        match self {
            Arg::Unit => ArgKey::Unit,
            Arg::Text(text) => ArgKey::Text(text.key()),
        }
    }

    /// The text argument, for hooks that are computed per text.
    pub fn text(&self) -> anyhow::Result<&'a Text> {
        match *self {
            Arg::Text(text) => Ok(text),
            Arg::Unit => anyhow::bail!("resource requires a text argument"),
        }
    }
}

type Hook = Rc<dyn Fn(&ResourcePool, Arg<'_>) -> anyhow::Result<Value>>;

struct Registration {
    hook: Hook,
    pinned: bool,
}

/// Marks a key as being computed; unmarks it on drop, including unwinds.
struct InFlight<'a> {
    set: &'a RefCell<HashSet<CacheKey>>,
    key: &'a CacheKey,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.set.borrow_mut().remove(self.key);
    }
}

/// Registry of resource hooks plus the cache of their results.
///
/// Not thread-safe: build one pool per batch run or per worker and pass it
/// to every metric explicitly.
pub struct ResourcePool {
    hooks: HashMap<String, Registration>,
    cache: RefCell<ResourceCache>,
    in_flight: RefCell<HashSet<CacheKey>>,
}

impl ResourcePool {
    /// An empty pool keeping at most `cache_limit` unpinned entries.
    pub fn new(cache_limit: usize) -> Self {
        ResourcePool {
            hooks: HashMap::new(),
            cache: RefCell::new(ResourceCache::new(cache_limit)),
            in_flight: RefCell::new(HashSet::new()),
        }
    }

    /// A pool with every default resource registered, configured from `config`.
    pub fn from_config(config: &Config) -> Self {
        let mut pool = ResourcePool::new(config.cache_limit);
        resources::register_defaults(&mut pool, config);
        pool
    }

    /// Register `hook` under `name`, replacing any earlier hook of that name.
    ///
    /// Pinned results are kept for the life of the pool; unpinned results
    /// are evicted oldest-first once more than `cache_limit` are held.
    pub fn register<T, F>(&mut self, name: impl Into<String>, pinned: bool, hook: F)
    where
        T: Any,
        F: Fn(&ResourcePool, Arg<'_>) -> anyhow::Result<T> + 'static,
    {
        let name = name.into();
        let hook: Hook = Rc::new(move |pool: &ResourcePool, arg: Arg<'_>| {
            hook(pool, arg).map(|value| Rc::new(value) as Value)
        });

        let previous = self.hooks.insert(name.clone(), Registration { hook, pinned });
        if previous.is_some() {
            warn!(resource = %name, "overwriting registered resource hook");
            // Unpinned entries may have been derived from the old hook.
            let cache = self.cache.get_mut();
            cache.remove_name(&name);
            cache.clear_unpinned();
        }
    }

    /// Fetch a resource, computing and caching it on a miss.
    pub fn get<T: Any>(&self, name: &str, arg: Arg<'_>) -> Result<Rc<T>> {
        self.get_value(name, arg)?
            .downcast::<T>()
            .map_err(|_| PoolError::TypeMismatch {
                name: name.to_string(),
                expected: type_name::<T>(),
            })
    }

    fn get_value(&self, name: &str, arg: Arg<'_>) -> Result<Value> {
        let registration = self
            .hooks
            .get(name)
            .ok_or_else(|| PoolError::UnknownResource(name.to_string()))?;
        let key = CacheKey {
            name: name.to_string(),
            arg: arg.key(),
        };

        if let Some(value) = self.cache.borrow_mut().get(&key, registration.pinned) {
            trace!(resource = name, arg = ?key.arg, "cache hit");
            return Ok(value);
        }

        if !self.in_flight.borrow_mut().insert(key.clone()) {
            return Err(PoolError::Cycle(name.to_string()));
        }
        self.cache.borrow_mut().record_miss();
        debug!(resource = name, arg = ?key.arg, pinned = registration.pinned, "computing resource");
        let hook = Rc::clone(&registration.hook);
        let result = {
            let _guard = InFlight {
                set: &self.in_flight,
                key: &key,
            };
            hook(self, arg)
        };

        let value = result.map_err(|err| PoolError::from_hook(name, err))?;
        let evicted = self
            .cache
            .borrow_mut()
            .insert(key, Rc::clone(&value), registration.pinned);
        for old in evicted {
            debug!(resource = %old.name, arg = ?old.arg, "evicted resource");
        }
        Ok(value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.hooks.contains_key(name)
    }

    pub fn is_pinned(&self, name: &str) -> Option<bool> {
        self.hooks.get(name).map(|r| r.pinned)
    }

    /// Registered resource names, sorted.
    pub fn resource_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.hooks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn cache_limit(&self) -> usize {
        self.cache.borrow().limit()
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.borrow().stats()
    }

    /// Drop all per-text results; pinned resources survive.
    pub fn clear_unpinned(&self) {
        self.cache.borrow_mut().clear_unpinned();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counting_pool(pinned: bool, limit: usize) -> (ResourcePool, Rc<Cell<u32>>) {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mut pool = ResourcePool::new(limit);
        pool.register("x", pinned, move |_, _| {
            let n = counter.get();
            counter.set(n + 1);
            Ok(n)
        });
        (pool, calls)
    }

    #[test]
    fn test_pinned_hook_runs_once() {
        let (pool, calls) = counting_pool(true, 0);
        let values: Vec<u32> = (0..3)
            .map(|_| *pool.get::<u32>("x", Arg::Unit).unwrap())
            .collect();
        assert_eq!(values, vec![0, 0, 0]);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_unpinned_with_zero_limit_recomputes() {
        let (pool, calls) = counting_pool(false, 0);
        let values: Vec<u32> = (0..3)
            .map(|_| *pool.get::<u32>("x", Arg::Unit).unwrap())
            .collect();
        assert_eq!(values, vec![0, 1, 2]);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_pinned_returns_same_allocation() {
        let (pool, _) = counting_pool(true, 4);
        let a = pool.get::<u32>("x", Arg::Unit).unwrap();
        let b = pool.get::<u32>("x", Arg::Unit).unwrap();
        assert!(Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_unknown_resource() {
        let (pool, _) = counting_pool(true, 4);
        assert!(matches!(
            pool.get::<u32>("nonexistent", Arg::Unit),
            Err(PoolError::UnknownResource(ref n)) if n == "nonexistent"
        ));
    }

    #[test]
    fn test_type_mismatch() {
        let (pool, _) = counting_pool(true, 4);
        assert!(matches!(
            pool.get::<String>("x", Arg::Unit),
            Err(PoolError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_arguments_are_part_of_the_key() {
        let mut pool = ResourcePool::new(8);
        pool.register("length", false, |_, arg| Ok(arg.text()?.raw_content().len()));

        let a = Text::new("abc");
        let b = Text::new("abcdef");
        assert_eq!(*pool.get::<usize>("length", Arg::Text(&a)).unwrap(), 3);
        assert_eq!(*pool.get::<usize>("length", Arg::Text(&b)).unwrap(), 6);
        assert_eq!(pool.stats().unpinned_entries, 2);
    }

    #[test]
    fn test_hooks_compose_through_the_pool() {
        let mut pool = ResourcePool::new(8);
        pool.register("base", true, |_, _| Ok(20_u32));
        pool.register("derived", false, |pool, arg| {
            let base = pool.get::<u32>("base", Arg::Unit)?;
            Ok(*base + arg.text()?.paragraphs().len() as u32)
        });

        let text = Text::new("um\ndois");
        assert_eq!(*pool.get::<u32>("derived", Arg::Text(&text)).unwrap(), 22);
    }

    #[test]
    fn test_nested_unknown_resource_is_not_wrapped() {
        let mut pool = ResourcePool::new(8);
        pool.register("outer", false, |pool, _| {
            Ok(*pool.get::<u32>("missing", Arg::Unit)?)
        });
        assert!(matches!(
            pool.get::<u32>("outer", Arg::Unit),
            Err(PoolError::UnknownResource(ref n)) if n == "missing"
        ));
    }

    #[test]
    fn test_cycle_is_detected() {
        let mut pool = ResourcePool::new(8);
        pool.register("a", false, |pool, arg| Ok(*pool.get::<u32>("b", arg)?));
        pool.register("b", false, |pool, arg| Ok(*pool.get::<u32>("a", arg)?));
        assert!(matches!(pool.get::<u32>("a", Arg::Unit), Err(PoolError::Cycle(_))));
    }

    #[test]
    fn test_hook_failure_is_not_cached() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mut pool = ResourcePool::new(8);
        pool.register("flaky", true, move |_, _| -> anyhow::Result<u32> {
            counter.set(counter.get() + 1);
            anyhow::bail!("service unreachable")
        });

        assert!(matches!(pool.get::<u32>("flaky", Arg::Unit), Err(PoolError::Hook { .. })));
        assert!(pool.get::<u32>("flaky", Arg::Unit).is_err());
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_reregistering_replaces_hook_and_cached_value() {
        let mut pool = ResourcePool::new(8);
        pool.register("v", true, |_, _| Ok(1_u32));
        assert_eq!(*pool.get::<u32>("v", Arg::Unit).unwrap(), 1);

        pool.register("v", true, |_, _| Ok(2_u32));
        assert_eq!(*pool.get::<u32>("v", Arg::Unit).unwrap(), 2);
        assert_eq!(pool.is_pinned("v"), Some(true));
    }

    #[test]
    fn test_reregistering_drops_dependent_results() {
        let mut pool = ResourcePool::new(8);
        pool.register("base", true, |_, _| Ok(1_u32));
        pool.register("double", false, |pool, _| Ok(*pool.get::<u32>("base", Arg::Unit)? * 2));
        assert_eq!(*pool.get::<u32>("double", Arg::Unit).unwrap(), 2);

        pool.register("base", true, |_, _| Ok(5_u32));
        assert_eq!(*pool.get::<u32>("double", Arg::Unit).unwrap(), 10);
    }

    #[test]
    fn test_panicking_hook_does_not_poison_key() {
        use std::panic::{catch_unwind, AssertUnwindSafe};

        let fail = Rc::new(Cell::new(true));
        let flag = Rc::clone(&fail);
        let mut pool = ResourcePool::new(8);
        pool.register("fragile", false, move |_, _| {
            if flag.get() {
                panic!("tagger crashed");
            }
            Ok(7_u32)
        });

        let outcome = catch_unwind(AssertUnwindSafe(|| pool.get::<u32>("fragile", Arg::Unit)));
        assert!(outcome.is_err());

        fail.set(false);
        assert_eq!(*pool.get::<u32>("fragile", Arg::Unit).unwrap(), 7);
    }

    #[test]
    fn test_cycle_does_not_count_as_miss() {
        let mut pool = ResourcePool::new(8);
        pool.register("a", false, |pool, arg| Ok(*pool.get::<u32>("a", arg)?));
        assert!(matches!(pool.get::<u32>("a", Arg::Unit), Err(PoolError::Cycle(_))));
        assert_eq!(pool.stats().misses, 1);

        let (pool, _) = counting_pool(false, 8);
        pool.get::<u32>("x", Arg::Unit).unwrap();
        pool.get::<u32>("x", Arg::Unit).unwrap();
        let stats = pool.stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
    }

    #[test]
    fn test_clear_unpinned_keeps_pinned() {
        let mut pool = ResourcePool::new(8);
        pool.register("p", true, |_, _| Ok(1_u32));
        pool.register("u", false, |_, _| Ok(2_u32));
        pool.get::<u32>("p", Arg::Unit).unwrap();
        pool.get::<u32>("u", Arg::Unit).unwrap();

        pool.clear_unpinned();
        let stats = pool.stats();
        assert_eq!((stats.pinned_entries, stats.unpinned_entries), (1, 0));
    }
}
