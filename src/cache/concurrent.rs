//! Concurrent Cache Module
//!
//! The public cache handle: a [`CacheStore`] behind one cache-wide
//! reader/writer lock, plus ownership of the background sweep task.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::runtime::Handle;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::stats::StatsCounters;
use crate::cache::{CacheStats, CacheStore, Entry, Expiration, Value};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_sweep_task, SweepTask};

/// State shared between the cache handle and its sweep task.
#[derive(Debug)]
pub(crate) struct Shared<V> {
    pub(crate) store: RwLock<CacheStore<V>>,
    pub(crate) stats: StatsCounters,
}

impl<V> Shared<V> {
    /// The only reclamation path; used by both callers and the sweep task.
    pub(crate) async fn delete_expired(&self) -> usize {
        let removed = self.store.write().await.delete_expired();
        self.stats.record_reclaimed(removed);
        removed
    }
}

// == Cache ==
/// Thread-safe key/value cache with per-entry TTL.
///
/// Reads (`get`, `count`, `items`, `save`) share the lock; every mutation
/// takes it exclusively. `add` and `replace` run their existence check and
/// their write inside one exclusive section, so concurrent `add`s on one key
/// have exactly one winner.
///
/// A sweep task is started at construction and runs until [`Cache::stop_sweep`]
/// is called or the cache is dropped.
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// use memocache::{Cache, Expiration, Value};
///
/// # async fn demo() -> memocache::error::Result<()> {
/// let cache: Cache<Value> = Cache::new(
///     Expiration::After(Duration::from_secs(300)),
///     Duration::from_secs(1),
/// )?;
/// cache.set("greeting", "hello", Expiration::Default).await;
/// assert_eq!(cache.get("greeting").await, Some(Value::from("hello")));
/// cache.stop_sweep()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Cache<V = Value> {
    pub(crate) shared: Arc<Shared<V>>,
    sweep_interval: Duration,
    sweeper: Mutex<SweepTask>,
}

impl<V> Cache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates an empty cache and starts its sweep task.
    ///
    /// Must be called from within a Tokio runtime. A zero `sweep_interval`
    /// is rejected.
    pub fn new(default_ttl: Expiration, sweep_interval: Duration) -> Result<Self> {
        if sweep_interval.is_zero() {
            return Err(CacheError::InvalidConfig(
                "sweep interval must be greater than zero".to_string(),
            ));
        }
        let runtime = Handle::try_current().map_err(|_| CacheError::NoRuntime)?;

        let shared = Arc::new(Shared {
            store: RwLock::new(CacheStore::new(default_ttl)),
            stats: StatsCounters::default(),
        });
        let sweeper = spawn_sweep_task(&runtime, shared.clone(), sweep_interval);

        Ok(Self {
            shared,
            sweep_interval,
            sweeper: Mutex::new(sweeper),
        })
    }

    /// Creates a cache from loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.default_expiration(), config.sweep_interval())
    }

    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    pub async fn default_ttl(&self) -> Expiration {
        self.shared.store.read().await.default_ttl()
    }

    // == Set ==
    /// Stores a value, overwriting any existing entry for `key`.
    pub async fn set(&self, key: impl Into<String>, value: impl Into<V>, ttl: Expiration) {
        let mut store = self.shared.store.write().await;
        store.set(key.into(), value.into(), ttl);
    }

    // == Get ==
    /// Returns a copy of the live value for `key`.
    pub async fn get(&self, key: &str) -> Option<V> {
        let store = self.shared.store.read().await;
        let value = store.get(key).map(|entry| entry.value().clone());
        self.shared.stats.record_lookup(value.is_some());
        value
    }

    /// Returns the live value together with its expiration, if it has one.
    pub async fn get_with_expiration(&self, key: &str) -> Option<(V, Option<DateTime<Utc>>)> {
        let store = self.shared.store.read().await;
        let found = store
            .get(key)
            .map(|entry| (entry.value().clone(), entry.expires_at_utc()));
        self.shared.stats.record_lookup(found.is_some());
        found
    }

    // == Add ==
    /// Stores a value only if `key` has no live entry.
    pub async fn add(
        &self,
        key: impl Into<String>,
        value: impl Into<V>,
        ttl: Expiration,
    ) -> Result<()> {
        let mut store = self.shared.store.write().await;
        store.add(key.into(), value.into(), ttl)
    }

    // == Replace ==
    /// Stores a value only if `key` already has a live entry.
    pub async fn replace(
        &self,
        key: impl Into<String>,
        value: impl Into<V>,
        ttl: Expiration,
    ) -> Result<()> {
        let mut store = self.shared.store.write().await;
        store.replace(key.into(), value.into(), ttl)
    }

    // == Delete ==
    /// Removes `key` if present. Deleting a missing key is not an error.
    pub async fn delete(&self, key: &str) {
        let removed = self.shared.store.write().await.delete(key);
        if removed {
            debug!(key, "Deleted entry");
        }
    }

    /// Removes every expired entry and returns how many were removed.
    pub async fn delete_expired(&self) -> usize {
        self.shared.delete_expired().await
    }

    // == Count ==
    /// Structural entry count.
    ///
    /// Expired entries that no sweep has reclaimed yet are still counted.
    pub async fn count(&self) -> usize {
        self.shared.store.read().await.len()
    }

    /// Copies every live entry.
    pub async fn items(&self) -> HashMap<String, Entry<V>> {
        self.shared.store.read().await.live_entries()
    }

    // == Flush ==
    /// Removes every entry.
    pub async fn flush(&self) {
        self.shared.store.write().await.flush();
    }

    // == Stats ==
    pub async fn stats(&self) -> CacheStats {
        let total_entries = self.count().await;
        self.shared.stats.snapshot(total_entries)
    }

    // == Sweep Lifecycle ==
    /// Signals the sweep task to stop without waiting for it.
    ///
    /// The signal is one-shot: a second call returns
    /// [`CacheError::SweepStopped`].
    pub fn stop_sweep(&self) -> Result<()> {
        self.sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .stop()
    }

    /// Whether the sweep task is still running.
    pub fn is_sweeping(&self) -> bool {
        !self
            .sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_finished()
    }
}
