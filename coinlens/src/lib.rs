//! Coinlens aggregates market data for a crypto dashboard.
//!
//! Overview
//! - Fetches prices, sentiment summaries, sentiment heatmaps, news, and price
//!   history through a `coinlens_core::MarketConnector`.
//! - Caches each payload per request key in a [`store::PollingStore`] with
//!   stale-while-error semantics: a failed refresh keeps the last good data
//!   and attaches a message instead of blanking the view.
//! - Polls prices on a fixed cadence while at least one consumer watches them.
//! - Projects store data into display-ready cards, tickers, and date-aligned
//!   chart rows, and compares price histories with Pearson correlation.
//!
//! Key behaviors and trade-offs
//! - Refresh policy:
//!   - `LastWriterWins` (default): every response commits as it settles. Cheap,
//!     but a slow early response can overwrite a faster later one.
//!   - `LatestIssued`: a per-key generation counter drops responses that are
//!     not from the most recent fetch.
//! - Polling: stopping a watch only stops future ticks; a fetch already running
//!   completes and commits, since stores outlive views.
//! - Caching: optional TTL middleware deduplicates identical concurrent
//!   requests and serves repeats without touching the network.
//!
//! Example
//! ```rust,ignore
//! use std::sync::Arc;
//! use coinlens::Dashboard;
//! use coinlens_core::{AssetSet, CacheConfig};
//!
//! let dash = Dashboard::builder()
//!     .connector(Arc::new(coinlens_mock::MockConnector::new()))
//!     .cache(CacheConfig::default())
//!     .build()?;
//!
//! let assets = AssetSet::parse("bitcoin,ethereum")?;
//! let _watch = dash.watch_prices(&assets);
//! dash.fetch_sentiment(&assets).await.ok();
//! for card in dash.sentiment_cards(&assets) {
//!     println!("{} {} {}", card.ticker, card.label, card.score_text());
//! }
//! ```
#![warn(missing_docs)]

mod dashboard;
/// Subscription-scoped price polling.
pub mod poll;
/// Keyed polling cache store.
pub mod store;
/// Display-ready projections.
pub mod view;

pub use dashboard::{
    Dashboard, DashboardBuilder, HeatmapStore, HistoryStore, NewsStore, PriceMap, PriceStore,
    SentimentMap, SentimentStore,
};
pub use poll::{PollSubscription, Poller};
pub use store::{PollingStore, Slots, Snapshot, StoreState};
pub use view::{CorrelationBadge, PriceTicker, SentimentCard};
