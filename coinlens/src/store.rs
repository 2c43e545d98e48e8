//! Keyed polling cache with stale-while-error semantics.
//!
//! Each key moves through `Idle → Loading → Ready`, then `Refreshing` on
//! later fetches and `Error` when a fetch fails. Failures never discard data
//! that was already shown; they only attach a message next to it.
//!
//! All state lives inside a `tokio::sync::watch` channel. Every mutation
//! replaces a whole slot under the channel's lock, so readers always observe a
//! consistent `(state, data, error)` triple.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use tokio::sync::watch;

use coinlens_core::{Capability, CoinlensError, RefreshPolicy};

/// Lifecycle of a single store key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StoreState {
    /// Never fetched (or cleared).
    #[default]
    Idle,
    /// First fetch in flight; nothing to show yet.
    Loading,
    /// Holding data from the latest committed success.
    Ready,
    /// Background refresh in flight while previous data stays visible.
    Refreshing,
    /// The latest committed fetch failed; previous data, if any, is kept.
    Error,
}

/// Point-in-time view of one key.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<V> {
    /// Current lifecycle state.
    pub state: StoreState,
    /// Last good payload.
    pub data: Option<V>,
    /// Human-readable message from the latest committed failure.
    pub error: Option<String>,
    /// When `data` was last replaced.
    pub updated_at: Option<DateTime<Utc>>,
}

impl<V> Default for Snapshot<V> {
    fn default() -> Self {
        Self {
            state: StoreState::Idle,
            data: None,
            error: None,
            updated_at: None,
        }
    }
}

impl<V> Snapshot<V> {
    /// True only for a first load; background refreshes are silent.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state == StoreState::Loading
    }
}

#[derive(Debug, Clone)]
struct Slot<V> {
    snapshot: Snapshot<V>,
    issued: u64,
}

impl<V> Default for Slot<V> {
    fn default() -> Self {
        Self {
            snapshot: Snapshot::default(),
            issued: 0,
        }
    }
}

/// Every key's slot, as published through [`PollingStore::subscribe`].
#[derive(Debug, Clone)]
pub struct Slots<K, V> {
    epoch: u64,
    slots: BTreeMap<K, Slot<V>>,
}

impl<K: Ord, V> Slots<K, V> {
    /// Snapshot for `key`, if it was ever fetched.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&Snapshot<V>> {
        self.slots.get(key).map(|s| &s.snapshot)
    }

    /// Keys that currently hold a slot.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.slots.keys()
    }
}

/// Async function that produces a payload for a key.
pub type Fetcher<K, V> =
    Arc<dyn Fn(K) -> BoxFuture<'static, Result<V, CoinlensError>> + Send + Sync>;

/// Generic keyed cache store driven by an async fetcher.
pub struct PollingStore<K, V> {
    capability: Capability,
    policy: RefreshPolicy,
    request_timeout: Duration,
    fetcher: Fetcher<K, V>,
    tx: watch::Sender<Slots<K, V>>,
}

impl<K, V> PollingStore<K, V>
where
    K: Ord + Clone + Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create an empty store for `capability`.
    #[must_use]
    pub fn new(
        capability: Capability,
        policy: RefreshPolicy,
        request_timeout: Duration,
        fetcher: Fetcher<K, V>,
    ) -> Self {
        let (tx, _rx) = watch::channel(Slots {
            epoch: 0,
            slots: BTreeMap::new(),
        });
        Self {
            capability,
            policy,
            request_timeout,
            fetcher,
            tx,
        }
    }

    /// Capability this store caches.
    #[must_use]
    pub const fn capability(&self) -> Capability {
        self.capability
    }

    /// Fetch `key` and commit the outcome according to the refresh policy.
    ///
    /// Returns the outcome of this particular request. The store may decline
    /// to commit it (see [`RefreshPolicy::LatestIssued`] and [`Self::clear`]),
    /// in which case the snapshot reflects whichever response did commit.
    ///
    /// # Errors
    /// Returns the fetcher's error, or `RequestTimeout` when the request
    /// deadline elapses. The same failure is recorded on the key.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "coinlens::store::fetch",
            skip(self),
            fields(capability = %self.capability),
        )
    )]
    pub async fn fetch(&self, key: K) -> Result<V, CoinlensError> {
        let (epoch, generation) = self.begin(&key);

        let fut = (self.fetcher)(key.clone());
        let outcome = match tokio::time::timeout(self.request_timeout, fut).await {
            Ok(res) => res,
            Err(_) => Err(CoinlensError::request_timeout(self.capability.as_str())),
        };

        self.commit(&key, epoch, generation, &outcome);
        outcome
    }

    fn begin(&self, key: &K) -> (u64, u64) {
        let mut ticket = (0, 0);
        self.tx.send_modify(|all| {
            let slot = all.slots.entry(key.clone()).or_default();
            slot.issued += 1;
            ticket = (all.epoch, slot.issued);
            let snap = &mut slot.snapshot;
            if snap.data.is_none() {
                snap.state = StoreState::Loading;
                snap.error = None;
            } else {
                snap.state = StoreState::Refreshing;
            }
        });
        ticket
    }

    fn commit(&self, key: &K, epoch: u64, generation: u64, outcome: &Result<V, CoinlensError>) {
        let capability = self.capability;
        let policy = self.policy;
        self.tx.send_if_modified(|all| {
            if all.epoch != epoch {
                #[cfg(feature = "tracing")]
                tracing::debug!(%capability, ?key, "store cleared while in flight; dropping response");
                return false;
            }
            let Some(slot) = all.slots.get_mut(key) else {
                return false;
            };
            if policy == RefreshPolicy::LatestIssued && generation != slot.issued {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    %capability,
                    ?key,
                    generation,
                    latest = slot.issued,
                    "discarding stale response"
                );
                return false;
            }
            let snap = &mut slot.snapshot;
            match outcome {
                Ok(v) => {
                    snap.data = Some(v.clone());
                    snap.error = None;
                    snap.state = StoreState::Ready;
                    snap.updated_at = Some(Utc::now());
                }
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(%capability, ?key, error = %e, "fetch failed; keeping last data");
                    snap.error = Some(
                        e.user_message()
                            .unwrap_or_else(|| format!("Failed to load {}", capability.noun())),
                    );
                    snap.state = StoreState::Error;
                }
            }
            true
        });
    }

    /// Current snapshot for `key`; `Idle` if never fetched.
    #[must_use]
    pub fn snapshot(&self, key: &K) -> Snapshot<V> {
        self.tx.borrow().get(key).cloned().unwrap_or_default()
    }

    /// Last good payload for `key`.
    #[must_use]
    pub fn data(&self, key: &K) -> Option<V> {
        self.tx.borrow().get(key).and_then(|s| s.data.clone())
    }

    /// Lifecycle state for `key`.
    #[must_use]
    pub fn state(&self, key: &K) -> StoreState {
        self.tx.borrow().get(key).map_or(StoreState::Idle, |s| s.state)
    }

    /// Error message for `key`, if the latest committed fetch failed.
    #[must_use]
    pub fn error(&self, key: &K) -> Option<String> {
        self.tx.borrow().get(key).and_then(|s| s.error.clone())
    }

    /// Whether `key` is on its first load.
    #[must_use]
    pub fn is_loading(&self, key: &K) -> bool {
        self.state(key) == StoreState::Loading
    }

    /// Receiver that wakes on every committed change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Slots<K, V>> {
        self.tx.subscribe()
    }

    /// Reset every key to `Idle`. Responses still in flight are dropped.
    pub fn clear(&self) {
        self.tx.send_modify(|all| {
            all.epoch += 1;
            all.slots.clear();
        });
    }
}

impl<K, V> Debug for PollingStore<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollingStore")
            .field("capability", &self.capability)
            .field("policy", &self.policy)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}
