use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use coinlens_core::connector::{
    HeatmapProvider, HistoryProvider, NewsProvider, PriceProvider, SentimentProvider,
};
use coinlens_core::{
    AssetId, AssetSet, CoinHeatmapData, CoinlensError, HeatmapKey, HeatmapWindow, HistoryKey,
    MarketConnector, NewsArticle, NewsRequest, PriceHistory, PricePoint, SentimentSummary,
};
use coinlens_types::{CacheConfig, Capability};
use moka::future::Cache;

/// Bounded TTL store that coalesces concurrent misses for the same key.
///
/// Only successful values are stored; a failed fetch is returned to every
/// waiter and the next call tries again.
///
/// Entries are keyed by session generation as well, so a load that was
/// started before [`CachingConnector::invalidate_all`] can neither be joined
/// nor read by callers that arrive after it.
struct TtlStore<K, V> {
    inner: Cache<(u64, K), V>,
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    cap: Capability,
}

impl<K, V> TtlStore<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn new(cap: Capability, capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
            cap,
        }
    }

    async fn get_or_fetch<F>(
        &self,
        session: &AtomicU64,
        key: K,
        fetch: F,
    ) -> Result<V, CoinlensError>
    where
        F: Future<Output = Result<V, CoinlensError>>,
    {
        let generation = session.load(Ordering::Acquire);
        let slot = (generation, key);
        let entry = self
            .inner
            .entry(slot.clone())
            .or_try_insert_with(fetch)
            .await
            .map_err(|e: Arc<CoinlensError>| (*e).clone())?;
        if session.load(Ordering::Acquire) != generation {
            // Settled after the session ended; evict it instead of letting it
            // linger until the TTL.
            self.inner.invalidate(&slot).await;
            #[cfg(feature = "tracing")]
            tracing::debug!(capability = %self.cap, "discarded load from ended session");
        }
        #[cfg(feature = "tracing")]
        if !entry.is_fresh() {
            tracing::debug!(capability = %self.cap, "cache hit");
        }
        Ok(entry.into_value())
    }
}

async fn through<K, V, F>(
    store: Option<&TtlStore<K, Arc<V>>>,
    session: &AtomicU64,
    key: K,
    fetch: F,
) -> Result<V, CoinlensError>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    F: Future<Output = Result<V, CoinlensError>>,
{
    match store {
        Some(s) => s
            .get_or_fetch(session, key, async { fetch.await.map(Arc::new) })
            .await
            .map(|v| (*v).clone()),
        None => fetch.await,
    }
}

/// Declarative wrapper that applies caching when building a connector stack.
pub struct CacheMiddleware {
    cfg: CacheConfig,
}

impl CacheMiddleware {
    /// Create a cache layer from configuration.
    #[must_use]
    pub const fn new(cfg: CacheConfig) -> Self {
        Self { cfg }
    }
}

impl coinlens_core::Middleware for CacheMiddleware {
    fn apply(self: Box<Self>, inner: Arc<dyn MarketConnector>) -> Arc<dyn MarketConnector> {
        let Self { cfg } = *self;
        Arc::new(CachingConnector::new(inner, &cfg))
    }

    fn name(&self) -> &'static str {
        "CachingMiddleware"
    }

    fn config_json(&self) -> serde_json::Value {
        serde_json::json!({
            "default_ttl_ms": self.cfg.default_ttl_ms,
            "default_max_entries": self.cfg.default_max_entries,
            "per_capability_ttl_ms": self.cfg.per_capability_ttl_ms,
            "per_capability_max_entries": self.cfg.per_capability_max_entries,
        })
    }
}

// Per-capability typed stores; `None` means disabled (TTL=0).
struct Stores {
    prices: Option<TtlStore<AssetSet, Arc<Vec<PricePoint>>>>,
    history: Option<TtlStore<HistoryKey, Arc<PriceHistory>>>,
    sentiment: Option<TtlStore<AssetSet, Arc<Vec<SentimentSummary>>>>,
    heatmap: Option<TtlStore<HeatmapKey, Arc<Vec<CoinHeatmapData>>>>,
    news: Option<TtlStore<NewsRequest, Arc<Vec<NewsArticle>>>>,
}

/// Connector wrapper that serves repeated requests from a per-capability TTL cache.
pub struct CachingConnector {
    inner: Arc<dyn MarketConnector>,
    stores: Stores,
    session: AtomicU64,
}

impl CachingConnector {
    fn maybe_store<K, V>(cfg: &CacheConfig, cap: Capability) -> Option<TtlStore<K, V>>
    where
        K: Hash + Eq + Clone + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        let ttl = cfg.ttl_for(cap)?;
        Some(TtlStore::new(cap, cfg.capacity_for(cap), ttl))
    }

    /// Wrap `inner` using the TTLs and capacities in `cfg`.
    #[must_use]
    pub fn new(inner: Arc<dyn MarketConnector>, cfg: &CacheConfig) -> Self {
        let stores = Stores {
            prices: Self::maybe_store(cfg, Capability::Prices),
            history: Self::maybe_store(cfg, Capability::History),
            sentiment: Self::maybe_store(cfg, Capability::SentimentSummary),
            heatmap: Self::maybe_store(cfg, Capability::SentimentHeatmap),
            news: Self::maybe_store(cfg, Capability::News),
        };
        Self {
            inner,
            stores,
            session: AtomicU64::new(0),
        }
    }

    /// Drop every cached value, e.g. when the session ends.
    ///
    /// Loads still in flight complete for their original callers but are
    /// never served to later ones.
    pub fn invalidate_all(&self) {
        self.session.fetch_add(1, Ordering::AcqRel);
        if let Some(s) = &self.stores.prices {
            s.inner.invalidate_all();
        }
        if let Some(s) = &self.stores.history {
            s.inner.invalidate_all();
        }
        if let Some(s) = &self.stores.sentiment {
            s.inner.invalidate_all();
        }
        if let Some(s) = &self.stores.heatmap {
            s.inner.invalidate_all();
        }
        if let Some(s) = &self.stores.news {
            s.inner.invalidate_all();
        }
    }
}

#[async_trait]
impl MarketConnector for CachingConnector {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn vendor(&self) -> &'static str {
        self.inner.vendor()
    }

    coinlens_core::coinlens_connector_accessors!(inner);
}

#[async_trait]
impl PriceProvider for CachingConnector {
    async fn prices(&self, assets: &AssetSet) -> Result<Vec<PricePoint>, CoinlensError> {
        let inner = self
            .inner
            .as_price_provider()
            .ok_or_else(|| CoinlensError::unsupported(Capability::Prices.as_str()))?;
        through(
            self.stores.prices.as_ref(),
            &self.session,
            assets.clone(),
            inner.prices(assets),
        )
        .await
    }
}

#[async_trait]
impl HistoryProvider for CachingConnector {
    async fn history(&self, asset: &AssetId, days: u32) -> Result<PriceHistory, CoinlensError> {
        let inner = self
            .inner
            .as_history_provider()
            .ok_or_else(|| CoinlensError::unsupported(Capability::History.as_str()))?;
        let key = HistoryKey::new(asset.clone(), days)?;
        through(
            self.stores.history.as_ref(),
            &self.session,
            key,
            inner.history(asset, days),
        )
        .await
    }
}

#[async_trait]
impl SentimentProvider for CachingConnector {
    async fn sentiment_summary(
        &self,
        assets: &AssetSet,
    ) -> Result<Vec<SentimentSummary>, CoinlensError> {
        let inner = self
            .inner
            .as_sentiment_provider()
            .ok_or_else(|| CoinlensError::unsupported(Capability::SentimentSummary.as_str()))?;
        through(
            self.stores.sentiment.as_ref(),
            &self.session,
            assets.clone(),
            inner.sentiment_summary(assets),
        )
        .await
    }
}

#[async_trait]
impl HeatmapProvider for CachingConnector {
    async fn sentiment_heatmap(
        &self,
        assets: &AssetSet,
        window: HeatmapWindow,
    ) -> Result<Vec<CoinHeatmapData>, CoinlensError> {
        let inner = self
            .inner
            .as_heatmap_provider()
            .ok_or_else(|| CoinlensError::unsupported(Capability::SentimentHeatmap.as_str()))?;
        through(
            self.stores.heatmap.as_ref(),
            &self.session,
            HeatmapKey::new(assets.clone(), window),
            inner.sentiment_heatmap(assets, window),
        )
        .await
    }
}

#[async_trait]
impl NewsProvider for CachingConnector {
    async fn news(&self, req: &NewsRequest) -> Result<Vec<NewsArticle>, CoinlensError> {
        let inner = self
            .inner
            .as_news_provider()
            .ok_or_else(|| CoinlensError::unsupported(Capability::News.as_str()))?;
        through(
            self.stores.news.as_ref(),
            &self.session,
            req.clone(),
            inner.news(req),
        )
        .await
    }
}
