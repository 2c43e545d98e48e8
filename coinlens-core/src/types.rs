//! Re-export of foundational types from `coinlens-types`.
// Consolidated so downstream crates can depend on `coinlens-core` only.

pub use coinlens_types::{AssetId, AssetSet, Capability, CoinlensError};
pub use coinlens_types::{CacheConfig, DashboardConfig, PollConfig, RefreshPolicy};
pub use coinlens_types::{
    CoinHeatmapData, DayScore, HeatmapKey, HeatmapWindow, SentimentSummary, Trend,
};
pub use coinlens_types::{DEFAULT_NEWS_LIMIT, MAX_NEWS_LIMIT, NewsArticle, NewsRequest};
pub use coinlens_types::{HISTORY_DAYS, HistoryKey, PriceHistory, PricePoint, PriceSample};
