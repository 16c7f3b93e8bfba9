//! Cache Facade Module
//!
//! Public cache API. Every operation takes the key as an ordered list of
//! parts, encodes it with the configured codec and then talks to the store.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{Entry, Lookup, Store};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::tasks::CleanupScheduler;

// == Cache ==
/// Thread-safe in-memory cache with composite keys and optional TTL.
///
/// Share it between threads behind an `Arc`. Dropping the cache stops its
/// cleanup worker.
///
/// # Example
/// ```
/// use mini_memcache::Cache;
///
/// let cache: Cache<String> = Cache::new();
/// cache.set("hello".to_string(), &["greeting"]);
/// assert_eq!(cache.get(&["greeting"]).unwrap(), "hello");
/// ```
#[derive(Debug)]
pub struct Cache<T> {
    store: Arc<Store<T>>,
    scheduler: Option<CleanupScheduler>,
}

impl<T> Cache<T>
where
    T: Clone + Default + Send + Sync + 'static,
{
    // == Constructors ==
    /// Creates a cache with the default configuration (no background cleanup).
    pub fn new() -> Self {
        Self {
            store: Arc::new(Store::new(CacheConfig::default().key_encoding)),
            scheduler: None,
        }
    }

    /// Creates a cache from `config`, starting the cleanup worker if enabled.
    ///
    /// # Errors
    /// [`CacheError::Scheduler`] if the cleanup worker cannot be started.
    pub fn with_config(config: CacheConfig) -> Result<Self> {
        let interval = config.effective_cleanup_interval();
        let store = Arc::new(Store::new(config.key_encoding));

        let scheduler = match interval {
            Some(interval) => Some(CleanupScheduler::start(Arc::clone(&store), interval)?),
            None => None,
        };

        Ok(Self { store, scheduler })
    }

    fn key<S: AsRef<str>>(&self, keys: &[S]) -> String {
        self.store.encoding().encode(keys)
    }

    // == Set ==
    /// Stores `value` without expiration.
    pub fn set<S: AsRef<str>>(&self, value: T, keys: &[S]) {
        self.set_with_exp(value, Duration::ZERO, keys);
    }

    /// Stores `value`, expiring after `ttl`. A zero `ttl` never expires.
    pub fn set_with_exp<S: AsRef<str>>(&self, value: T, ttl: Duration, keys: &[S]) {
        self.store.put(self.key(keys), value, ttl);
    }

    // == Get ==
    /// Retrieves the value stored under `keys`.
    ///
    /// An expired value is reset to `T::default()` in place; the key stays
    /// present until deleted, cleared or swept.
    pub fn get<S: AsRef<str>>(&self, keys: &[S]) -> Result<T> {
        match self.store.get(&self.key(keys)) {
            Lookup::Hit(value) => Ok(value),
            Lookup::Expired => Err(CacheError::Expired(owned(keys))),
            Lookup::Missing => Err(CacheError::NotFound(owned(keys))),
        }
    }

    // == Delete ==
    /// Removes the entry stored under `keys`.
    pub fn delete<S: AsRef<str>>(&self, keys: &[S]) -> Result<()> {
        if self.store.delete(&self.key(keys)) {
            Ok(())
        } else {
            Err(CacheError::NotFound(owned(keys)))
        }
    }

    // == Presence ==
    /// Returns true if `keys` is present, whether or not it has expired.
    pub fn is_exist<S: AsRef<str>>(&self, keys: &[S]) -> bool {
        self.store.contains(&self.key(keys))
    }

    /// Reports whether the entry under `keys` has expired. Never flushes.
    pub fn is_expired<S: AsRef<str>>(&self, keys: &[S]) -> Result<bool> {
        self.store
            .peek(&self.key(keys), Entry::is_expired)
            .ok_or_else(|| CacheError::NotFound(owned(keys)))
    }

    // == TTL ==
    /// Returns the remaining lifetime of the entry under `keys`.
    ///
    /// `Ok(None)` means the entry never expires.
    pub fn ttl<S: AsRef<str>>(&self, keys: &[S]) -> Result<Option<Duration>> {
        match self.store.peek(&self.key(keys), Entry::remaining) {
            None => Err(CacheError::NotFound(owned(keys))),
            Some(None) => Ok(None),
            Some(Some(remaining)) if remaining.is_zero() => Err(CacheError::Expired(owned(keys))),
            Some(Some(remaining)) => Ok(Some(remaining)),
        }
    }

    // == Keys ==
    /// Returns every stored key, decoded, in no particular order.
    pub fn keys(&self) -> Vec<Vec<String>> {
        self.store.list_keys()
    }

    /// Returns every stored key whose leading parts equal `prefix`.
    ///
    /// Like [`Cache::is_exist`], this sees expired entries that have not been
    /// swept yet.
    pub fn keys_from_prefix<S: AsRef<str>>(&self, prefix: &[S]) -> Vec<Vec<String>> {
        self.store.list_keys_with_prefix(prefix)
    }

    // == Bulk Get ==
    /// Returns the values of all present entries.
    ///
    /// Not an atomic snapshot: keys are listed first, then read one by one.
    /// Keys deleted in between are skipped. Expired entries are flushed by
    /// the read and contribute `T::default()`.
    pub fn gets(&self) -> Vec<T> {
        self.keys()
            .iter()
            .filter_map(|parts| match self.get(parts.as_slice()) {
                Ok(value) => Some(value),
                Err(CacheError::Expired(_)) => Some(T::default()),
                Err(_) => None,
            })
            .collect()
    }

    /// Returns the values of all live entries under `prefix`.
    ///
    /// # Errors
    /// [`CacheError::NoMatch`] if no stored key has the prefix. A prefix that
    /// matches only expired or vanished entries yields `Ok` with an empty list.
    pub fn gets_from_prefix<S: AsRef<str>>(&self, prefix: &[S]) -> Result<Vec<T>> {
        let keys = self.keys_from_prefix(prefix);
        if keys.is_empty() {
            return Err(CacheError::NoMatch(owned(prefix)));
        }
        Ok(self.live_values_of(keys))
    }

    fn live_values_of(&self, keys: Vec<Vec<String>>) -> Vec<T> {
        keys.iter().filter_map(|parts| self.get(parts.as_slice()).ok()).collect()
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&self) {
        self.store.clear();
    }

    // == Length ==
    /// Returns the number of stored keys, expired or not.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns true if no key is stored.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl<T> Cache<T> {
    // == Close ==
    /// Stops the cleanup worker, if any, and waits for it to exit.
    ///
    /// Safe to call any number of times, from any thread.
    pub fn close(&self) {
        if let Some(scheduler) = &self.scheduler {
            scheduler.shutdown();
        }
    }
}

impl<T> Default for Cache<T>
where
    T: Clone + Default + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Cache<T> {
    fn drop(&mut self) {
        self.close();
    }
}

fn owned<S: AsRef<str>>(keys: &[S]) -> Vec<String> {
    keys.iter().map(|key| key.as_ref().to_owned()).collect()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    const NO_KEY: [&str; 0] = [];

    #[test]
    fn test_set_and_get() {
        let cache = Cache::new();

        cache.set("hello".to_string(), &["greeting"]);

        assert_eq!(cache.get(&["greeting"]).unwrap(), "hello");
    }

    #[test]
    fn test_get_missing() {
        let cache: Cache<String> = Cache::new();

        let err = cache.get(&["nonexistent"]).unwrap_err();
        assert!(matches!(err, CacheError::NotFound(ref keys) if keys == &["nonexistent"]));
    }

    #[test]
    fn test_empty_key_is_distinct() {
        let cache = Cache::new();

        cache.set(1u32, &NO_KEY);
        cache.set(2u32, &[""]);

        assert_eq!(cache.get(&NO_KEY).unwrap(), 1);
        assert_eq!(cache.get(&[""]).unwrap(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_expired_get_flushes_but_keeps_key() {
        let cache = Cache::new();

        cache.set_with_exp("temp".to_string(), Duration::from_millis(30), &["key"]);
        assert_eq!(cache.get(&["key"]).unwrap(), "temp");

        sleep(Duration::from_millis(60));

        assert!(matches!(cache.get(&["key"]), Err(CacheError::Expired(_))));
        assert!(cache.is_exist(&["key"]));
        assert!(cache.is_expired(&["key"]).unwrap());
        assert_eq!(cache.keys(), vec![vec!["key".to_string()]]);
    }

    #[test]
    fn test_delete() {
        let cache = Cache::new();

        assert!(matches!(cache.delete(&["missing"]), Err(CacheError::NotFound(_))));

        cache.set("v".to_string(), &["k"]);
        assert!(cache.delete(&["k"]).is_ok());
        assert!(!cache.is_exist(&["k"]));
    }

    #[test]
    fn test_is_expired() {
        let cache = Cache::new();

        assert!(cache.is_expired(&["missing"]).unwrap_err().is_not_found());

        cache.set(1u8, &["permanent"]);
        cache.set_with_exp(1u8, Duration::from_secs(60), &["alive"]);
        assert!(!cache.is_expired(&["permanent"]).unwrap());
        assert!(!cache.is_expired(&["alive"]).unwrap());
    }

    #[test]
    fn test_ttl() {
        let cache = Cache::new();

        assert!(cache.ttl(&["missing"]).unwrap_err().is_not_found());

        cache.set("permanent".to_string(), &["key1"]);
        assert_eq!(cache.ttl(&["key1"]).unwrap(), None);

        cache.set_with_exp("temp".to_string(), Duration::from_millis(200), &["key2"]);
        let remaining = cache.ttl(&["key2"]).unwrap().unwrap();
        assert!(remaining > Duration::ZERO);
        assert!(remaining <= Duration::from_millis(200));

        sleep(Duration::from_millis(250));
        assert!(cache.ttl(&["key2"]).unwrap_err().is_expired());
    }

    #[test]
    fn test_keys_from_prefix() {
        let cache = Cache::new();

        cache.set(1, &["a", "b", "c"]);
        cache.set(2, &["a", "b", "d"]);
        cache.set(3, &["x", "y", "z"]);

        let mut keys = cache.keys_from_prefix(&["a", "b"]);
        keys.sort();
        assert_eq!(keys, vec![vec!["a", "b", "c"], vec!["a", "b", "d"]]);

        assert!(cache.keys_from_prefix(&["a", "b", "c", "d"]).is_empty());
        assert_eq!(cache.keys_from_prefix(&NO_KEY).len(), 3);
    }

    #[test]
    fn test_gets() {
        let cache = Cache::new();

        cache.set(1, &["a"]);
        cache.set(2, &["b"]);
        cache.set_with_exp(3, Duration::from_millis(10), &["c"]);
        sleep(Duration::from_millis(30));

        let mut values = cache.gets();
        values.sort();
        assert_eq!(values, vec![0, 1, 2]);
        assert_eq!(values.len(), cache.keys().len());
    }

    #[test]
    fn test_gets_skips_deleted_keys() {
        let cache = Cache::new();

        cache.set("a".to_string(), &["a"]);
        cache.set("b".to_string(), &["b"]);
        cache.delete(&["a"]).unwrap();

        assert_eq!(cache.gets(), vec!["b".to_string()]);
    }

    #[test]
    fn test_drop_stops_worker() {
        let cache = Cache::with_config(
            CacheConfig::new().with_auto_cleanup(Duration::from_millis(5)),
        )
        .unwrap();
        cache.set("v".to_string(), &["k"]);

        let store = Arc::clone(&cache.store);
        assert_eq!(Arc::strong_count(&store), 3);

        drop(cache);

        // The worker released its handle on the store when its thread exited
        assert_eq!(Arc::strong_count(&store), 1);

        store.put("stale".to_string(), "v".to_string(), Duration::from_millis(1));
        sleep(Duration::from_millis(40));
        assert!(store.contains("stale"));
    }

    #[test]
    fn test_gets_from_prefix() {
        let cache = Cache::new();

        cache.set(10, &["user", "1"]);
        cache.set(20, &["user", "2"]);
        cache.set(30, &["group", "1"]);
        cache.set_with_exp(40, Duration::from_millis(10), &["session", "1"]);
        sleep(Duration::from_millis(30));

        let mut users = cache.gets_from_prefix(&["user"]).unwrap();
        users.sort();
        assert_eq!(users, vec![10, 20]);

        let err = cache.gets_from_prefix(&["nobody"]).unwrap_err();
        assert!(matches!(err, CacheError::NoMatch(ref prefix) if prefix == &["nobody"]));

        // Matches a key, but the only entry has expired
        assert_eq!(cache.gets_from_prefix(&["session"]).unwrap(), Vec::<i32>::new());
    }

    #[test]
    fn test_clear() {
        let cache = Cache::new();

        cache.set(1, &["a"]);
        cache.set(2, &["b"]);
        cache.clear();

        assert!(cache.is_empty());
        assert!(cache.keys().is_empty());
    }

    #[test]
    fn test_close_without_scheduler() {
        let cache: Cache<u8> = Cache::new();
        cache.close();
        cache.close();
    }

    #[test]
    fn test_delimited_encoding() {
        let cache = Cache::with_config(CacheConfig::new().with_key_separator("|")).unwrap();

        cache.set("v".to_string(), &["a", "b"]);

        assert_eq!(cache.get(&["a|b"]).unwrap(), "v");
        assert_eq!(cache.keys(), vec![vec!["a".to_string(), "b".to_string()]]);
    }
}
