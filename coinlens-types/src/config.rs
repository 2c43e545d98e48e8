//! Configuration types shared across the dashboard, middleware, and connectors.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Capability;

/// How a store applies responses when several fetches for one key overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum RefreshPolicy {
    /// Every settling response is committed; the one that settles last wins,
    /// regardless of issue order.
    #[default]
    LastWriterWins,
    /// Each fetch takes a per-key generation number; a response is committed
    /// only if no newer fetch for the same key has been issued since.
    LatestIssued,
}

/// Cadence of a recurring fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Period of the fixed-rate poll timer, measured between fetch starts.
    pub interval: Duration,
    /// Random jitter percentage `[0, 100]` added to each delay.
    pub jitter_percent: u8,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            jitter_percent: 0,
        }
    }
}

/// Global configuration for a `Dashboard` context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Price polling cadence while at least one consumer watches prices.
    pub price_poll: PollConfig,
    /// Overlapping-fetch policy applied by every store.
    pub refresh_policy: RefreshPolicy,
    /// Deadline for a single store fetch; exceeding it is a fetch failure.
    pub request_timeout: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            price_poll: PollConfig::default(),
            refresh_policy: RefreshPolicy::default(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// TTL/LRU cache configuration for the caching middleware.
///
/// A TTL of zero disables caching for that capability.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheConfig {
    /// TTL applied to capabilities without an explicit override.
    pub default_ttl_ms: u64,
    /// Capacity applied to capabilities without an explicit override.
    pub default_max_entries: u64,
    /// Per-capability TTL overrides keyed by [`Capability::as_str`].
    pub per_capability_ttl_ms: HashMap<String, u64>,
    /// Per-capability capacity overrides keyed by [`Capability::as_str`].
    pub per_capability_max_entries: HashMap<String, u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        let per_capability_ttl_ms = [
            (Capability::Prices, 60_000),
            (Capability::History, 300_000),
            (Capability::SentimentSummary, 1_800_000),
            (Capability::SentimentHeatmap, 1_800_000),
            (Capability::News, 300_000),
        ]
        .into_iter()
        .map(|(c, ms)| (c.as_str().to_string(), ms))
        .collect();

        Self {
            default_ttl_ms: 60_000,
            default_max_entries: 128,
            per_capability_ttl_ms,
            per_capability_max_entries: HashMap::new(),
        }
    }
}

impl CacheConfig {
    /// Effective TTL for a capability, or `None` when caching is disabled.
    #[must_use]
    pub fn ttl_for(&self, cap: Capability) -> Option<Duration> {
        let ms = self
            .per_capability_ttl_ms
            .get(cap.as_str())
            .copied()
            .unwrap_or(self.default_ttl_ms);
        (ms > 0).then(|| Duration::from_millis(ms))
    }

    /// Effective capacity for a capability (at least 1).
    #[must_use]
    pub fn capacity_for(&self, cap: Capability) -> u64 {
        self.per_capability_max_entries
            .get(cap.as_str())
            .copied()
            .unwrap_or(self.default_max_entries)
            .max(1)
    }
}
