//! Expiry Sweep Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::Shared;
use crate::error::{CacheError, Result};

// == Sweep Task ==
/// Handle to a running sweep task.
///
/// Holds the one-shot stop signal. Dropping the handle closes the channel,
/// which the task treats the same as an explicit stop.
#[derive(Debug)]
pub(crate) struct SweepTask {
    stop_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl SweepTask {
    /// Sends the stop signal. Does not wait for the task to exit.
    ///
    /// Returns [`CacheError::SweepStopped`] if the signal was already sent.
    pub(crate) fn stop(&mut self) -> Result<()> {
        let stop_tx = self.stop_tx.take().ok_or(CacheError::SweepStopped)?;
        // The task may already be gone if the runtime shut down; nothing to do then.
        let _ = stop_tx.send(());
        Ok(())
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Spawns the sweep loop on `runtime`.
///
/// Every `interval` the task takes the cache's write lock and removes expired
/// entries. The stop signal is checked before each tick so no sweep starts
/// after a stop has been observed.
pub(crate) fn spawn_sweep_task<V>(
    runtime: &Handle,
    shared: Arc<Shared<V>>,
    interval: Duration,
) -> SweepTask
where
    V: Send + Sync + 'static,
{
    let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

    let handle = runtime.spawn(async move {
        info!(?interval, "Starting expiry sweep task");

        // First sweep happens one full interval after construction.
        let mut ticker = interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = &mut stop_rx => {
                    info!("Expiry sweep task stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let removed = shared.delete_expired().await;
                    if removed > 0 {
                        info!("Expiry sweep: removed {} expired entries", removed);
                    } else {
                        debug!("Expiry sweep: no expired entries found");
                    }
                }
            }
        }
    });

    SweepTask {
        stop_tx: Some(stop_tx),
        handle,
    }
}

#[cfg(test)]
mod tests {
    use crate::cache::{Cache, Expiration};
    use crate::error::CacheError;
    use std::time::Duration;
    use tokio::time::sleep;

    fn ttl(ms: u64) -> Expiration {
        Expiration::After(Duration::from_millis(ms))
    }

    #[tokio::test]
    async fn test_sweep_removes_expired_entries() {
        let cache: Cache<String> = Cache::new(Expiration::Never, Duration::from_millis(50)).unwrap();

        cache.set("expire_soon", "value", ttl(20)).await;
        cache.set("long_lived", "value", Expiration::Never).await;

        sleep(Duration::from_millis(250)).await;

        assert_eq!(cache.count().await, 1, "Expired entry should have been swept");
        assert_eq!(cache.get("long_lived").await.as_deref(), Some("value"));
        assert!(cache.stats().await.reclaimed >= 1);

        cache.stop_sweep().unwrap();
    }

    #[tokio::test]
    async fn test_sweep_stops_on_signal() {
        let cache: Cache<String> = Cache::new(Expiration::Never, Duration::from_millis(30)).unwrap();
        assert!(cache.is_sweeping());

        cache.stop_sweep().unwrap();
        sleep(Duration::from_millis(50)).await;
        assert!(!cache.is_sweeping(), "Task should be finished after stop");

        // With the task gone, expired entries linger until an explicit sweep
        cache.set("expire_soon", "value", ttl(10)).await;
        sleep(Duration::from_millis(150)).await;
        assert_eq!(cache.count().await, 1);
        assert_eq!(cache.delete_expired().await, 1);
    }

    #[tokio::test]
    async fn test_second_stop_is_an_error() {
        let cache: Cache<String> = Cache::new(Expiration::Never, Duration::from_secs(1)).unwrap();

        cache.stop_sweep().unwrap();
        assert!(matches!(cache.stop_sweep(), Err(CacheError::SweepStopped)));
    }

    #[tokio::test]
    async fn test_sweep_exits_when_cache_dropped() {
        let cache: Cache<String> = Cache::new(Expiration::Never, Duration::from_secs(1)).unwrap();
        let shared = std::sync::Arc::downgrade(&cache.shared);

        drop(cache);
        sleep(Duration::from_millis(50)).await;

        assert!(shared.upgrade().is_none(), "Task should release the cache state");
    }
}
