//! Cache Store Module
//!
//! Unsynchronized cache engine: HashMap storage with TTL resolution, lazy
//! expiration on read and the snapshot merge policy. [`Cache`](super::Cache)
//! wraps it in the cache-wide lock.

use std::collections::HashMap;

use crate::cache::entry::current_timestamp_nanos;
use crate::cache::{Entry, Expiration};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Key-value storage with per-entry TTL.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, Entry<V>>,
    /// TTL applied to writes that pass `Expiration::Default`
    default_ttl: Expiration,
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store with the given default TTL.
    pub fn new(default_ttl: Expiration) -> Self {
        Self {
            entries: HashMap::new(),
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Expiration {
        self.default_ttl
    }

    // == Set ==
    /// Stores a key-value pair, overwriting any existing entry.
    pub fn set(&mut self, key: String, value: V, ttl: Expiration) {
        let entry = Entry::new(value, ttl, self.default_ttl);
        self.entries.insert(key, entry);
    }

    // == Get ==
    /// Returns the live entry for `key`.
    ///
    /// Expired entries are reported as absent but left in place for the sweep.
    pub fn get(&self, key: &str) -> Option<&Entry<V>> {
        self.get_at(key, current_timestamp_nanos())
    }

    fn get_at(&self, key: &str, now: i64) -> Option<&Entry<V>> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
    }

    // == Add ==
    /// Stores the pair only if `key` has no live entry.
    pub fn add(&mut self, key: String, value: V, ttl: Expiration) -> Result<()> {
        if self.get(&key).is_some() {
            return Err(CacheError::AlreadyExists(key));
        }
        self.set(key, value, ttl);
        Ok(())
    }

    // == Replace ==
    /// Stores the pair only if `key` already has a live entry.
    pub fn replace(&mut self, key: String, value: V, ttl: Expiration) -> Result<()> {
        if self.get(&key).is_none() {
            return Err(CacheError::NotFound(key));
        }
        self.set(key, value, ttl);
        Ok(())
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Delete Expired ==
    /// Removes all expired entries, judged against a single reference time.
    ///
    /// Returns the number of entries removed.
    pub fn delete_expired(&mut self) -> usize {
        self.delete_expired_at(current_timestamp_nanos())
    }

    pub fn delete_expired_at(&mut self, now: i64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        before - self.entries.len()
    }

    // == Flush ==
    /// Drops every entry.
    pub fn flush(&mut self) {
        self.entries = HashMap::new();
    }

    // == Length ==
    /// Structural entry count, including expired entries not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every stored entry, expired ones included.
    pub fn entries(&self) -> &HashMap<String, Entry<V>> {
        &self.entries
    }

    // == Merge ==
    /// Installs snapshot entries whose key is absent or expired here.
    ///
    /// Live entries always win over incoming ones. Returns the number of
    /// installed entries that are live; snapshot entries already past their
    /// deadline are installed but not counted.
    pub fn merge(&mut self, incoming: HashMap<String, Entry<V>>) -> usize {
        let now = current_timestamp_nanos();
        let mut installed = 0;

        for (key, entry) in incoming {
            if self.get_at(&key, now).is_none() {
                if !entry.is_expired_at(now) {
                    installed += 1;
                }
                self.entries.insert(key, entry);
            }
        }

        installed
    }
}

impl<V: Clone> CacheStore<V> {
    /// Copies every live entry.
    pub fn live_entries(&self) -> HashMap<String, Entry<V>> {
        let now = current_timestamp_nanos();
        self.entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired_at(now))
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect()
    }
}
