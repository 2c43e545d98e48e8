use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, join_all};

use coinlens_core::analytics::{AlignedSeriesRow, Comparison, NormMethod, compare};
use coinlens_core::{
    AssetId, AssetSet, CacheConfig, Capability, CoinHeatmapData, CoinlensError, DashboardConfig,
    HeatmapKey, HeatmapWindow, HistoryKey, MarketConnector, NewsArticle, NewsRequest, PollConfig,
    PriceHistory, PricePoint, RefreshPolicy, SentimentSummary,
};
use coinlens_middleware::CachingConnector;

use crate::poll::{PollSubscription, Poller};
use crate::store::{Fetcher, PollingStore};
use crate::view::{PriceTicker, SentimentCard, sentiment_chart};

/// Prices keyed by asset.
pub type PriceMap = BTreeMap<AssetId, PricePoint>;
/// Sentiment summaries keyed by asset.
pub type SentimentMap = BTreeMap<AssetId, SentimentSummary>;

/// Store of current prices per requested asset set.
pub type PriceStore = PollingStore<AssetSet, PriceMap>;
/// Store of sentiment summaries per requested asset set.
pub type SentimentStore = PollingStore<AssetSet, SentimentMap>;
/// Store of per-day sentiment rows per heatmap request.
pub type HeatmapStore = PollingStore<HeatmapKey, Vec<CoinHeatmapData>>;
/// Store of news pages per request.
pub type NewsStore = PollingStore<NewsRequest, Vec<NewsArticle>>;
/// Store of price histories per asset and window.
pub type HistoryStore = PollingStore<HistoryKey, PriceHistory>;

/// Explicit context object owning every store and the price poller.
///
/// Build one per session with [`Dashboard::builder`] and share it (it is
/// cheap to wrap in an `Arc`). Tests build isolated dashboards.
pub struct Dashboard {
    cfg: DashboardConfig,
    cache: Option<Arc<CachingConnector>>,
    prices: Arc<PriceStore>,
    sentiment: Arc<SentimentStore>,
    heatmap: Arc<HeatmapStore>,
    news: Arc<NewsStore>,
    history: Arc<HistoryStore>,
    price_poller: Poller<AssetSet, PriceMap>,
}

/// Builder for constructing a [`Dashboard`].
pub struct DashboardBuilder {
    connector: Option<Arc<dyn MarketConnector>>,
    cfg: DashboardConfig,
    cache: Option<CacheConfig>,
}

impl Default for DashboardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardBuilder {
    /// Create a new builder with default configuration and no connector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connector: None,
            cfg: DashboardConfig::default(),
            cache: None,
        }
    }

    /// Set the connector every store fetches through.
    #[must_use]
    pub fn connector(mut self, c: Arc<dyn MarketConnector>) -> Self {
        self.connector = Some(c);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: DashboardConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Price polling cadence.
    #[must_use]
    pub const fn price_poll(mut self, poll: PollConfig) -> Self {
        self.cfg.price_poll = poll;
        self
    }

    /// Policy for overlapping fetches of one key.
    ///
    /// `LastWriterWins` commits every response as it settles, so a slow early
    /// response can overwrite a faster later one. `LatestIssued` drops any
    /// response that is not from the most recently issued fetch.
    #[must_use]
    pub const fn refresh_policy(mut self, policy: RefreshPolicy) -> Self {
        self.cfg.refresh_policy = policy;
        self
    }

    /// Deadline for a single store fetch.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.cfg.request_timeout = timeout;
        self
    }

    /// Wrap the connector in the TTL cache middleware.
    ///
    /// Repeated fetches within a TTL are answered without touching the
    /// network, and concurrent identical requests share one upstream call.
    /// The cache is dropped on [`Dashboard::logout`].
    #[must_use]
    pub fn cache(mut self, cfg: CacheConfig) -> Self {
        self.cache = Some(cfg);
        self
    }

    /// Build the dashboard.
    ///
    /// # Errors
    /// Returns `MissingConfig` when no connector was set.
    pub fn build(self) -> Result<Dashboard, CoinlensError> {
        let raw = self
            .connector
            .ok_or_else(|| CoinlensError::MissingConfig("dashboard connector".into()))?;

        let cache = self
            .cache
            .as_ref()
            .map(|cfg| Arc::new(CachingConnector::new(raw.clone(), cfg)));
        let conn: Arc<dyn MarketConnector> = match &cache {
            Some(c) => Arc::clone(c) as Arc<dyn MarketConnector>,
            None => raw,
        };

        let cfg = self.cfg;
        let (policy, timeout) = (cfg.refresh_policy, cfg.request_timeout);
        let store = move |cap: Capability| (cap, policy, timeout);

        let prices = Arc::new(new_store(store(Capability::Prices), price_fetcher(&conn)));
        let price_poller = Poller::new(Arc::clone(&prices), cfg.price_poll);

        Ok(Dashboard {
            cache,
            sentiment: Arc::new(new_store(
                store(Capability::SentimentSummary),
                sentiment_fetcher(&conn),
            )),
            heatmap: Arc::new(new_store(
                store(Capability::SentimentHeatmap),
                heatmap_fetcher(&conn),
            )),
            news: Arc::new(new_store(store(Capability::News), news_fetcher(&conn))),
            history: Arc::new(new_store(
                store(Capability::History),
                history_fetcher(&conn),
            )),
            prices,
            price_poller,
            cfg,
        })
    }
}

fn new_store<K, V>(
    (cap, policy, timeout): (Capability, RefreshPolicy, std::time::Duration),
    fetcher: Fetcher<K, V>,
) -> PollingStore<K, V>
where
    K: Ord + Clone + std::fmt::Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    PollingStore::new(cap, policy, timeout, fetcher)
}

/* -------- fetchers: connector capability -> store payload -------- */

fn price_fetcher(conn: &Arc<dyn MarketConnector>) -> Fetcher<AssetSet, PriceMap> {
    let conn = Arc::clone(conn);
    Arc::new(move |assets: AssetSet| -> BoxFuture<'static, Result<PriceMap, CoinlensError>> {
        let conn = Arc::clone(&conn);
        async move {
            let p = conn
                .as_price_provider()
                .ok_or_else(|| CoinlensError::unsupported(Capability::Prices.as_str()))?;
            let points = p.prices(&assets).await?;
            Ok(points
                .into_iter()
                .map(|pt| (pt.asset_id.clone(), pt))
                .collect())
        }
        .boxed()
    })
}

fn sentiment_fetcher(conn: &Arc<dyn MarketConnector>) -> Fetcher<AssetSet, SentimentMap> {
    let conn = Arc::clone(conn);
    Arc::new(move |assets: AssetSet| -> BoxFuture<'static, Result<SentimentMap, CoinlensError>> {
        let conn = Arc::clone(&conn);
        async move {
            let p = conn.as_sentiment_provider().ok_or_else(|| {
                CoinlensError::unsupported(Capability::SentimentSummary.as_str())
            })?;
            let rows = p.sentiment_summary(&assets).await?;
            Ok(rows
                .into_iter()
                .map(|s| (s.asset_id.clone(), s))
                .collect())
        }
        .boxed()
    })
}

fn heatmap_fetcher(
    conn: &Arc<dyn MarketConnector>,
) -> Fetcher<HeatmapKey, Vec<CoinHeatmapData>> {
    let conn = Arc::clone(conn);
    Arc::new(move |key: HeatmapKey| -> BoxFuture<'static, Result<Vec<CoinHeatmapData>, CoinlensError>> {
        let conn = Arc::clone(&conn);
        async move {
            let p = conn.as_heatmap_provider().ok_or_else(|| {
                CoinlensError::unsupported(Capability::SentimentHeatmap.as_str())
            })?;
            p.sentiment_heatmap(&key.assets, key.window).await
        }
        .boxed()
    })
}

fn news_fetcher(conn: &Arc<dyn MarketConnector>) -> Fetcher<NewsRequest, Vec<NewsArticle>> {
    let conn = Arc::clone(conn);
    Arc::new(move |req: NewsRequest| -> BoxFuture<'static, Result<Vec<NewsArticle>, CoinlensError>> {
        let conn = Arc::clone(&conn);
        async move {
            let p = conn
                .as_news_provider()
                .ok_or_else(|| CoinlensError::unsupported(Capability::News.as_str()))?;
            p.news(&req).await
        }
        .boxed()
    })
}

fn history_fetcher(conn: &Arc<dyn MarketConnector>) -> Fetcher<HistoryKey, PriceHistory> {
    let conn = Arc::clone(conn);
    Arc::new(move |key: HistoryKey| -> BoxFuture<'static, Result<PriceHistory, CoinlensError>> {
        let conn = Arc::clone(&conn);
        async move {
            let p = conn
                .as_history_provider()
                .ok_or_else(|| CoinlensError::unsupported(Capability::History.as_str()))?;
            p.history(&key.asset, key.days).await
        }
        .boxed()
    })
}

impl Dashboard {
    /// Start building a dashboard.
    #[must_use]
    pub fn builder() -> DashboardBuilder {
        DashboardBuilder::new()
    }

    /// Effective configuration.
    #[must_use]
    pub const fn config(&self) -> &DashboardConfig {
        &self.cfg
    }

    /// Price store.
    #[must_use]
    pub fn prices(&self) -> &PriceStore {
        &self.prices
    }

    /// Sentiment summary store.
    #[must_use]
    pub fn sentiment(&self) -> &SentimentStore {
        &self.sentiment
    }

    /// Sentiment heatmap store.
    #[must_use]
    pub fn heatmap(&self) -> &HeatmapStore {
        &self.heatmap
    }

    /// News store.
    #[must_use]
    pub fn news(&self) -> &NewsStore {
        &self.news
    }

    /// Price history store.
    #[must_use]
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Fetch prices for `assets` into the price store.
    ///
    /// # Errors
    /// Returns this request's failure; the store keeps the last good data.
    pub async fn fetch_prices(&self, assets: &AssetSet) -> Result<PriceMap, CoinlensError> {
        self.prices.fetch(assets.clone()).await
    }

    /// Fetch sentiment summaries for `assets`.
    ///
    /// # Errors
    /// Returns this request's failure; the store keeps the last good data.
    pub async fn fetch_sentiment(&self, assets: &AssetSet) -> Result<SentimentMap, CoinlensError> {
        self.sentiment.fetch(assets.clone()).await
    }

    /// Fetch per-day sentiment for `assets` over `window`.
    ///
    /// # Errors
    /// Returns this request's failure; the store keeps the last good data.
    pub async fn fetch_heatmap(
        &self,
        assets: &AssetSet,
        window: HeatmapWindow,
    ) -> Result<Vec<CoinHeatmapData>, CoinlensError> {
        self.heatmap
            .fetch(HeatmapKey::new(assets.clone(), window))
            .await
    }

    /// Fetch a news page.
    ///
    /// # Errors
    /// Returns this request's failure; the store keeps the last good data.
    pub async fn fetch_news(&self, req: &NewsRequest) -> Result<Vec<NewsArticle>, CoinlensError> {
        self.news.fetch(req.clone()).await
    }

    /// Fetch `days` of price history for `asset`.
    ///
    /// # Errors
    /// Returns `InvalidArg` for a window outside `1..=365` without touching the
    /// store, otherwise this request's failure.
    pub async fn fetch_history(
        &self,
        asset: &AssetId,
        days: u32,
    ) -> Result<PriceHistory, CoinlensError> {
        let key = HistoryKey::new(asset.clone(), days)?;
        self.history.fetch(key).await
    }

    /// Keep prices for `assets` fresh while the subscription is alive.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use = "polling stops when the subscription is dropped"]
    pub fn watch_prices(&self, assets: &AssetSet) -> PollSubscription<AssetSet> {
        self.price_poller.subscribe(assets.clone())
    }

    /// Whether prices for `assets` are being polled.
    #[must_use]
    pub fn is_watching_prices(&self, assets: &AssetSet) -> bool {
        self.price_poller.is_polling(assets)
    }

    /// Drop every cached payload (session ended).
    ///
    /// Stores return to `Idle` and responses still in flight are discarded.
    /// Active price subscriptions keep polling and repopulate on their next tick.
    pub fn logout(&self) {
        #[cfg(feature = "tracing")]
        tracing::info!("clearing dashboard stores");
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
        self.prices.clear();
        self.sentiment.clear();
        self.heatmap.clear();
        self.news.clear();
        self.history.clear();
    }

    /// Fetch histories for `assets` concurrently and build a normalized
    /// comparison with pairwise correlations.
    ///
    /// # Errors
    /// Fails with the first error when any history cannot be loaded, or with
    /// `InvalidArg` for fewer than two assets or an out-of-range window.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "coinlens::dashboard::compare", skip(self, assets), err)
    )]
    pub async fn compare(
        &self,
        assets: &[AssetId],
        days: u32,
        method: NormMethod,
    ) -> Result<Comparison, CoinlensError> {
        if assets.len() < 2 {
            return Err(CoinlensError::InvalidArg(
                "comparison needs at least two assets".into(),
            ));
        }
        let keys = assets
            .iter()
            .map(|a| HistoryKey::new(a.clone(), days))
            .collect::<Result<Vec<_>, _>>()?;
        let histories = join_all(keys.into_iter().map(|k| self.history.fetch(k)))
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(compare(&histories, days, method))
    }

    /// Fetch the heatmap for `assets` and return date-aligned chart rows.
    ///
    /// # Errors
    /// Returns the heatmap fetch failure.
    pub async fn sentiment_chart(
        &self,
        assets: &AssetSet,
        window: HeatmapWindow,
    ) -> Result<Vec<AlignedSeriesRow>, CoinlensError> {
        let rows = self.fetch_heatmap(assets, window).await?;
        Ok(sentiment_chart(&rows))
    }

    /// Sentiment cards from whatever the store currently holds for `assets`.
    #[must_use]
    pub fn sentiment_cards(&self, assets: &AssetSet) -> Vec<SentimentCard> {
        self.sentiment
            .data(assets)
            .map(|m| m.values().map(SentimentCard::from).collect())
            .unwrap_or_default()
    }

    /// Price tickers from whatever the store currently holds for `assets`.
    #[must_use]
    pub fn price_tickers(&self, assets: &AssetSet) -> Vec<PriceTicker> {
        self.prices
            .data(assets)
            .map(|m| m.values().map(PriceTicker::from).collect())
            .unwrap_or_default()
    }
}
