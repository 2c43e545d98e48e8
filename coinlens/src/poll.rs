//! Subscription-scoped polling of a [`PollingStore`] key.
//!
//! The first [`PollSubscription`] for a key spawns a task that fetches
//! immediately and then on a fixed-rate timer. Each tick starts its fetch
//! without waiting for the previous one, so a slow response neither delays
//! the schedule nor blocks the next fetch; overlapping responses resolve
//! through the store's refresh policy. Dropping the last subscription stops
//! scheduling; a fetch already running still completes and commits.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rand::Rng;
use tokio::sync::oneshot;
use tokio::time::MissedTickBehavior;

use coinlens_core::{CoinlensError, PollConfig, TaskHandle};

use crate::store::PollingStore;

/// Random offset in `[0, interval * jitter_percent / 100)` applied to a tick.
pub(crate) fn jitter_offset(interval: Duration, jitter_percent: u8) -> Duration {
    if jitter_percent == 0 {
        return Duration::ZERO;
    }
    let base_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
    let range = std::cmp::max(
        1,
        base_ms.saturating_mul(u64::from(jitter_percent.min(100))) / 100,
    );
    Duration::from_millis(rand::rng().random_range(0..range))
}

// Non-transient failures will repeat on every tick until the caller acts.
#[cfg(feature = "tracing")]
fn report_poll_error(err: &CoinlensError) {
    if err.is_transient() {
        tracing::debug!(error = %err, "poll fetch failed; retrying next tick");
    } else {
        tracing::warn!(error = %err, "poll fetch failed with a non-retryable error");
    }
}

#[cfg(not(feature = "tracing"))]
const fn report_poll_error(_err: &CoinlensError) {}

struct Entry {
    subscribers: usize,
    // Dropping the handle signals the task to stop.
    _task: TaskHandle,
}

type Registry<K> = Arc<Mutex<BTreeMap<K, Entry>>>;

/// Owns one background polling task per watched key.
pub struct Poller<K, V> {
    store: Arc<PollingStore<K, V>>,
    cfg: PollConfig,
    tasks: Registry<K>,
}

impl<K, V> Poller<K, V>
where
    K: Ord + Clone + Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create a poller over `store`.
    #[must_use]
    pub fn new(store: Arc<PollingStore<K, V>>, cfg: PollConfig) -> Self {
        Self {
            store,
            cfg,
            tasks: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    /// Start (or join) polling for `key`.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use = "polling stops when the subscription is dropped"]
    pub fn subscribe(&self, key: K) -> PollSubscription<K> {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = tasks.get_mut(&key) {
            entry.subscribers += 1;
        } else {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                capability = %self.store.capability(),
                ?key,
                "starting poll task"
            );
            let task = spawn_poll(Arc::clone(&self.store), key.clone(), self.cfg);
            tasks.insert(
                key.clone(),
                Entry {
                    subscribers: 1,
                    _task: task,
                },
            );
        }
        drop(tasks);
        PollSubscription {
            key: Some(key),
            tasks: Arc::clone(&self.tasks),
        }
    }

    /// Number of keys with a running poll task.
    #[must_use]
    pub fn active(&self) -> usize {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether `key` currently has a running poll task.
    #[must_use]
    pub fn is_polling(&self, key: &K) -> bool {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }
}

fn spawn_poll<K, V>(store: Arc<PollingStore<K, V>>, key: K, cfg: PollConfig) -> TaskHandle
where
    K: Ord + Clone + Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
    let join = tokio::spawn(async move {
        // `interval` panics on a zero period.
        let period = cfg.interval.max(Duration::from_millis(1));
        let mut ticks = tokio::time::interval(period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut first = true;
        loop {
            tokio::select! {
                biased;
                _ = &mut stop_rx => break,
                _ = ticks.tick() => {}
            }
            let offset = if first {
                Duration::ZERO
            } else {
                jitter_offset(period, cfg.jitter_percent)
            };
            first = false;
            let store = Arc::clone(&store);
            let key = key.clone();
            // Detached: stopping the poller never cancels a fetch in flight.
            tokio::spawn(async move {
                if !offset.is_zero() {
                    tokio::time::sleep(offset).await;
                }
                if let Err(e) = store.fetch(key).await {
                    report_poll_error(&e);
                }
            });
        }
    });
    TaskHandle::new(join, stop_tx)
}

/// Keeps a key polled while alive.
pub struct PollSubscription<K: Ord> {
    key: Option<K>,
    tasks: Registry<K>,
}

impl<K: Ord> PollSubscription<K> {
    /// Key being polled.
    #[must_use]
    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }
}

impl<K: Ord> Drop for PollSubscription<K> {
    fn drop(&mut self) {
        let Some(key) = self.key.take() else {
            return;
        };
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        let last = tasks.get_mut(&key).is_some_and(|e| {
            e.subscribers -= 1;
            e.subscribers == 0
        });
        if last {
            tasks.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jitter_stays_within_percentage() {
        let base = Duration::from_millis(1_000);
        for _ in 0..200 {
            assert!(jitter_offset(base, 20) < Duration::from_millis(200));
        }
        assert_eq!(jitter_offset(base, 0), Duration::ZERO);
    }
}
