//! coinlens-http
//!
//! Connector that implements `MarketConnector` against the dashboard backend
//! API (`/api/v1`). Exposes prices, price history, sentiment summaries,
//! sentiment heatmaps, and news. Requests go through a [`adapter::Transport`];
//! the default transport is `reqwest` with optional bearer authentication.
#![warn(missing_docs)]

/// Transport definitions and the production transport backed by `reqwest`.
pub mod adapter;
/// Builder for configuring the HTTP transport.
pub mod builder;
mod wire;

use std::sync::Arc;

use adapter::{CONNECTOR, Transport};
use async_trait::async_trait;
use coinlens_core::{
    AssetId, AssetSet, CoinHeatmapData, CoinlensError, HeatmapWindow, NewsArticle, NewsRequest,
    PriceHistory, PricePoint, SentimentSummary,
    connector::{
        HeatmapProvider, HistoryProvider, MarketConnector, NewsProvider, PriceProvider,
        SentimentProvider,
    },
};

pub use builder::HttpConnectorBuilder;

/// Public connector implementation backed by the dashboard REST API.
pub struct HttpConnector {
    transport: Arc<dyn Transport>,
}

/// Map backend errors onto the workspace taxonomy.
///
/// A 404 from the backend means the asset or resource is unknown, which
/// callers treat differently from a generic HTTP failure.
fn normalize_error(e: CoinlensError, what: &str) -> CoinlensError {
    match e {
        CoinlensError::Http { status: 404, .. } => CoinlensError::not_found(what.to_string()),
        other => other,
    }
}

impl HttpConnector {
    /// Stable connector name used in logs and errors.
    pub const NAME: &'static str = CONNECTOR;

    /// Build a connector around an arbitrary transport.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
        what: &str,
    ) -> Result<serde_json::Value, CoinlensError> {
        self.transport
            .get_json(path, query)
            .await
            .map_err(|e| normalize_error(e, what))
    }
}

#[async_trait]
impl PriceProvider for HttpConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "coinlens_http::prices",
            skip_all,
            fields(coins = %assets.joined()),
        )
    )]
    async fn prices(&self, assets: &AssetSet) -> Result<Vec<PricePoint>, CoinlensError> {
        let v = self
            .get("prices", &[("coins", assets.joined())], "prices")
            .await?;
        wire::decode::<wire::PricesResponse>(v, "prices")?.into_domain()
    }
}

#[async_trait]
impl HistoryProvider for HttpConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "coinlens_http::history",
            skip_all,
            fields(asset = %asset, days = days),
        )
    )]
    async fn history(&self, asset: &AssetId, days: u32) -> Result<PriceHistory, CoinlensError> {
        let path = format!("historical/{}", asset.as_str());
        let what = format!("price history for {asset}");
        let v = self.get(&path, &[("days", days.to_string())], &what).await?;
        let history = wire::decode::<wire::HistoryResponse>(v, "historical")?.into_domain()?;
        if &history.asset_id != asset {
            return Err(CoinlensError::Data(format!(
                "requested history for {asset}, got {}",
                history.asset_id
            )));
        }
        Ok(history)
    }
}

#[async_trait]
impl SentimentProvider for HttpConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "coinlens_http::sentiment_summary",
            skip_all,
            fields(coins = %assets.joined()),
        )
    )]
    async fn sentiment_summary(
        &self,
        assets: &AssetSet,
    ) -> Result<Vec<SentimentSummary>, CoinlensError> {
        let v = self
            .get(
                "sentiment/summary",
                &[("coins", assets.joined())],
                "sentiment summary",
            )
            .await?;
        wire::decode::<wire::SummaryResponse>(v, "sentiment summary")?.into_domain()
    }
}

#[async_trait]
impl HeatmapProvider for HttpConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "coinlens_http::sentiment_heatmap",
            skip_all,
            fields(coins = %assets.joined(), days = window.days()),
        )
    )]
    async fn sentiment_heatmap(
        &self,
        assets: &AssetSet,
        window: HeatmapWindow,
    ) -> Result<Vec<CoinHeatmapData>, CoinlensError> {
        let v = self
            .get(
                "sentiment/heatmap",
                &[
                    ("coins", assets.joined()),
                    ("days", window.days().to_string()),
                ],
                "sentiment heatmap",
            )
            .await?;
        wire::decode::<wire::HeatmapResponse>(v, "sentiment heatmap")?.into_domain()
    }
}

#[async_trait]
impl NewsProvider for HttpConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "coinlens_http::news",
            skip_all,
            fields(limit = req.page_size()),
        )
    )]
    async fn news(&self, req: &NewsRequest) -> Result<Vec<NewsArticle>, CoinlensError> {
        let mut query = Vec::with_capacity(2);
        if !req.coin_filter().is_empty() {
            query.push(("coins", req.coin_filter().join(",")));
        }
        query.push(("limit", req.page_size().to_string()));
        let v = self.get("news", &query, "news").await?;
        let mut articles = wire::decode::<wire::NewsResponse>(v, "news")?.into_domain()?;
        articles.truncate(req.page_size() as usize);
        Ok(articles)
    }
}

#[async_trait]
impl MarketConnector for HttpConnector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn vendor(&self) -> &'static str {
        "Coinlens API"
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
