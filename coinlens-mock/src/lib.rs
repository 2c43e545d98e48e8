//! Deterministic connectors for tests and examples.
//!
//! [`MockConnector`] serves static fixtures for `bitcoin`, `ethereum`,
//! `ripple`, `solana`, and `dogecoin`. Two reserved asset ids drive failure
//! paths: `fail` makes any request containing it fail, and `timeout` delays
//! the response by 200 ms.
//!
//! [`DynamicMockConnector`] defers every call to a test-side controller.
use std::time::Duration;

use async_trait::async_trait;
use coinlens_core::connector::{
    HeatmapProvider, HistoryProvider, MarketConnector, NewsProvider, PriceProvider,
    SentimentProvider,
};
use coinlens_core::{
    AssetId, AssetSet, Capability, CoinHeatmapData, CoinlensError, HeatmapWindow, NewsArticle,
    NewsRequest, PriceHistory, PricePoint, SentimentSummary,
};

mod dynamic;
mod fixtures;

pub use dynamic::{DynamicMockConnector, DynamicMockController, MockBehavior};

/// Mock connector for CI-safe examples. Provides deterministic data from static fixtures.
pub struct MockConnector;

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    /// Create the fixture connector.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    async fn maybe_fail_or_timeout<'a, I>(ids: I, cap: Capability) -> Result<(), CoinlensError>
    where
        I: IntoIterator<Item = &'a AssetId>,
    {
        for id in ids {
            match id.as_str() {
                "fail" => {
                    return Err(CoinlensError::connector(
                        "coinlens-mock",
                        format!("forced failure: {cap}"),
                    ));
                }
                "timeout" => tokio::time::sleep(Duration::from_millis(200)).await,
                _ => {}
            }
        }
        Ok(())
    }
}

#[async_trait]
impl MarketConnector for MockConnector {
    fn name(&self) -> &'static str {
        "coinlens-mock"
    }
    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn as_price_provider(&self) -> Option<&dyn PriceProvider> {
        Some(self as &dyn PriceProvider)
    }
    fn as_history_provider(&self) -> Option<&dyn HistoryProvider> {
        Some(self as &dyn HistoryProvider)
    }
    fn as_sentiment_provider(&self) -> Option<&dyn SentimentProvider> {
        Some(self as &dyn SentimentProvider)
    }
    fn as_heatmap_provider(&self) -> Option<&dyn HeatmapProvider> {
        Some(self as &dyn HeatmapProvider)
    }
    fn as_news_provider(&self) -> Option<&dyn NewsProvider> {
        Some(self as &dyn NewsProvider)
    }
}

#[async_trait]
impl PriceProvider for MockConnector {
    async fn prices(&self, assets: &AssetSet) -> Result<Vec<PricePoint>, CoinlensError> {
        Self::maybe_fail_or_timeout(assets.iter(), Capability::Prices).await?;
        Ok(assets.iter().filter_map(fixtures::prices::by_id).collect())
    }
}

#[async_trait]
impl HistoryProvider for MockConnector {
    async fn history(&self, asset: &AssetId, days: u32) -> Result<PriceHistory, CoinlensError> {
        Self::maybe_fail_or_timeout([asset], Capability::History).await?;
        fixtures::history::by_id(asset, days)
            .ok_or_else(|| CoinlensError::not_found(format!("price history for {asset}")))
    }
}

#[async_trait]
impl SentimentProvider for MockConnector {
    async fn sentiment_summary(
        &self,
        assets: &AssetSet,
    ) -> Result<Vec<SentimentSummary>, CoinlensError> {
        Self::maybe_fail_or_timeout(assets.iter(), Capability::SentimentSummary).await?;
        Ok(assets.iter().filter_map(fixtures::sentiment::by_id).collect())
    }
}

#[async_trait]
impl HeatmapProvider for MockConnector {
    async fn sentiment_heatmap(
        &self,
        assets: &AssetSet,
        window: HeatmapWindow,
    ) -> Result<Vec<CoinHeatmapData>, CoinlensError> {
        Self::maybe_fail_or_timeout(assets.iter(), Capability::SentimentHeatmap).await?;
        Ok(assets
            .iter()
            .filter_map(|id| fixtures::heatmap::by_id(id, window))
            .collect())
    }
}

#[async_trait]
impl NewsProvider for MockConnector {
    async fn news(&self, req: &NewsRequest) -> Result<Vec<NewsArticle>, CoinlensError> {
        if req.coin_filter().iter().any(|c| c == "FAIL") {
            return Err(CoinlensError::connector(
                "coinlens-mock",
                "forced failure: news",
            ));
        }
        Ok(fixtures::news::matching(req))
    }
}
