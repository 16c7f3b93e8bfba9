//! Cache Store Module
//!
//! Entry map behind a single reader/writer lock. Keys are already encoded;
//! the store only decodes them again when listing.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::debug;

use crate::cache::{Entry, KeyEncoding};

// == Lookup ==
/// Outcome of a store read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// No entry for the key
    Missing,
    /// Entry present but past its expiration; its value has been flushed
    Expired,
    /// Entry present and alive
    Hit(T),
}

// == Cache Store ==
/// Thread-safe entry map.
///
/// Reads take the shared lock, mutations (including the lazy expiry flush
/// and cleanup sweeps) take the exclusive lock.
#[derive(Debug)]
pub struct Store<T> {
    /// Encoded key -> entry
    entries: RwLock<HashMap<String, Entry<T>>>,
    /// Codec used to decode keys for listing
    encoding: KeyEncoding,
}

impl<T: Clone + Default> Store<T> {
    // == Constructor ==
    /// Creates an empty store decoding keys with `encoding`.
    pub fn new(encoding: KeyEncoding) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            encoding,
        }
    }

    /// Returns the key codec of this store.
    pub fn encoding(&self) -> &KeyEncoding {
        &self.encoding
    }

    // == Put ==
    /// Stores a value, overwriting any existing entry for the key.
    ///
    /// A zero `ttl` stores the entry without expiration.
    pub fn put(&self, key: String, value: T, ttl: Duration) {
        let entry = Entry::new(value, ttl);
        self.entries.write().insert(key, entry);
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Expired entries are flushed to the zero value but stay in the map
    /// until deleted, cleared or swept.
    pub fn get(&self, key: &str) -> Lookup<T> {
        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => return Lookup::Missing,
                Some(entry) if !entry.is_expired() => return Lookup::Hit(entry.value.clone()),
                Some(_) => {}
            }
        }

        // The key may have been replaced or removed between the two locks;
        // only flush what is still expired.
        let mut entries = self.entries.write();
        if let Some(entry) = entries.get_mut(key) {
            if entry.is_expired() {
                entry.flush();
                debug!(key, "flushed expired entry");
            }
        }
        Lookup::Expired
    }

    // == Peek ==
    /// Runs `f` on the entry for `key` under the shared lock.
    ///
    /// Returns None if the key is absent. Never mutates.
    pub fn peek<R>(&self, key: &str, f: impl FnOnce(&Entry<T>) -> R) -> Option<R> {
        self.entries.read().get(key).map(f)
    }

    // == Contains ==
    /// Returns true if the key is present, expired or not.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    // == Delete ==
    /// Removes an entry by key. Returns false if the key was absent.
    pub fn delete(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }

    // == Clear ==
    /// Replaces the map with an empty one.
    pub fn clear(&self) {
        *self.entries.write() = HashMap::new();
    }

    // == List Keys ==
    /// Returns every present key decoded into its parts, in no particular order.
    pub fn list_keys(&self) -> Vec<Vec<String>> {
        self.entries
            .read()
            .keys()
            .map(|key| self.encoding.decode(key))
            .collect()
    }

    // == List Keys With Prefix ==
    /// Returns every present key whose leading parts equal `prefix`.
    ///
    /// An empty prefix matches all keys. Expired entries that have not been
    /// swept yet are included, the same way [`Store::contains`] sees them.
    pub fn list_keys_with_prefix<S: AsRef<str>>(&self, prefix: &[S]) -> Vec<Vec<String>> {
        self.list_keys()
            .into_iter()
            .filter(|parts| has_prefix(parts, prefix))
            .collect()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries in one pass under the exclusive lock.
    ///
    /// Returns the number of entries removed.
    pub fn remove_expired(&self) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }

    // == Length ==
    /// Returns the number of present keys, expired or not.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// True if `parts` starts with every element of `prefix`, in order.
fn has_prefix<S: AsRef<str>>(parts: &[String], prefix: &[S]) -> bool {
    parts.len() >= prefix.len()
        && parts
            .iter()
            .zip(prefix)
            .all(|(part, expected)| part == expected.as_ref())
}
