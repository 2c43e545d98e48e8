//! Coinlens data transfer objects, identifiers, and configuration primitives.
#![warn(missing_docs)]

mod asset;
mod capability;
mod config;
mod error;
mod market;
mod news;
mod sentiment;

pub use asset::{AssetId, AssetSet};
pub use capability::Capability;
pub use config::{CacheConfig, DashboardConfig, PollConfig, RefreshPolicy};
pub use error::CoinlensError;
pub use market::{HISTORY_DAYS, HistoryKey, PriceHistory, PricePoint, PriceSample};
pub use news::{DEFAULT_NEWS_LIMIT, MAX_NEWS_LIMIT, NewsArticle, NewsRequest};
pub use sentiment::{
    CoinHeatmapData, DayScore, HeatmapKey, HeatmapWindow, SentimentSummary, Trend,
};
