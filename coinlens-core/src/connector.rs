use async_trait::async_trait;

use crate::{
    AssetId, AssetSet, CoinHeatmapData, CoinlensError, HeatmapWindow, NewsArticle, NewsRequest,
    PriceHistory, PricePoint, SentimentSummary,
};

/// Focused role trait for connectors that provide current USD prices.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Fetch one price point per asset the upstream knows about.
    ///
    /// Assets the upstream does not recognize are omitted rather than failing
    /// the whole request.
    async fn prices(&self, assets: &AssetSet) -> Result<Vec<PricePoint>, CoinlensError>;
}

/// Focused role trait for connectors that provide daily price history.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Fetch `days` of price history for a single asset.
    async fn history(&self, asset: &AssetId, days: u32) -> Result<PriceHistory, CoinlensError>;
}

/// Focused role trait for connectors that provide per-asset sentiment summaries.
#[async_trait]
pub trait SentimentProvider: Send + Sync {
    /// Fetch the current sentiment summary for each requested asset.
    async fn sentiment_summary(
        &self,
        assets: &AssetSet,
    ) -> Result<Vec<SentimentSummary>, CoinlensError>;
}

/// Focused role trait for connectors that provide per-day sentiment series.
#[async_trait]
pub trait HeatmapProvider: Send + Sync {
    /// Fetch a per-day sentiment row for each requested asset over `window`.
    async fn sentiment_heatmap(
        &self,
        assets: &AssetSet,
        window: HeatmapWindow,
    ) -> Result<Vec<CoinHeatmapData>, CoinlensError>;
}

/// Focused role trait for connectors that provide news articles.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// Fetch the latest articles, most recent first.
    async fn news(&self, req: &NewsRequest) -> Result<Vec<NewsArticle>, CoinlensError>;
}

/// Main connector trait implemented by backend adapters. Exposes capability discovery.
#[async_trait]
pub trait MarketConnector: Send + Sync {
    /// A stable identifier used in logs and error messages (e.g. "coinlens-http").
    fn name(&self) -> &'static str;

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Advertise price capability by returning a usable trait object reference when supported.
    fn as_price_provider(&self) -> Option<&dyn PriceProvider> {
        None
    }

    /// Advertise history capability by returning a usable trait object reference when supported.
    fn as_history_provider(&self) -> Option<&dyn HistoryProvider> {
        None
    }

    /// If implemented, returns a trait object for sentiment summaries.
    fn as_sentiment_provider(&self) -> Option<&dyn SentimentProvider> {
        None
    }

    /// If implemented, returns a trait object for sentiment heatmaps.
    fn as_heatmap_provider(&self) -> Option<&dyn HeatmapProvider> {
        None
    }

    /// If implemented, returns a trait object for news articles.
    fn as_news_provider(&self) -> Option<&dyn NewsProvider> {
        None
    }
}

/// Generate `as_*_provider` accessors for a wrapper that implements
/// `MarketConnector` by delegating to an inner field.
///
/// The wrapper must implement every provider trait itself; a capability is
/// advertised only when the inner connector advertises it.
#[macro_export]
macro_rules! coinlens_connector_accessors {
    ($inner:ident) => {
        fn as_price_provider(&self) -> Option<&dyn $crate::connector::PriceProvider> {
            if self.$inner.as_price_provider().is_some() {
                Some(self as &dyn $crate::connector::PriceProvider)
            } else {
                None
            }
        }
        fn as_history_provider(&self) -> Option<&dyn $crate::connector::HistoryProvider> {
            if self.$inner.as_history_provider().is_some() {
                Some(self as &dyn $crate::connector::HistoryProvider)
            } else {
                None
            }
        }
        fn as_sentiment_provider(&self) -> Option<&dyn $crate::connector::SentimentProvider> {
            if self.$inner.as_sentiment_provider().is_some() {
                Some(self as &dyn $crate::connector::SentimentProvider)
            } else {
                None
            }
        }
        fn as_heatmap_provider(&self) -> Option<&dyn $crate::connector::HeatmapProvider> {
            if self.$inner.as_heatmap_provider().is_some() {
                Some(self as &dyn $crate::connector::HeatmapProvider)
            } else {
                None
            }
        }
        fn as_news_provider(&self) -> Option<&dyn $crate::connector::NewsProvider> {
            if self.$inner.as_news_provider().is_some() {
                Some(self as &dyn $crate::connector::NewsProvider)
            } else {
                None
            }
        }
    };
}
