//! Wire schemas for the backend API and their conversion into domain types.
//!
//! Every payload is decoded into an explicit struct and validated before it
//! leaves this module; any mismatch is reported as `CoinlensError::Data`.

use std::collections::BTreeSet;

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use coinlens_core::{
    AssetId, CoinHeatmapData, CoinlensError, DayScore, NewsArticle, PriceHistory, PricePoint,
    PriceSample, SentimentSummary, Trend,
};

pub(crate) fn decode<T: DeserializeOwned>(value: Value, endpoint: &str) -> Result<T, CoinlensError> {
    serde_json::from_value(value)
        .map_err(|e| CoinlensError::Data(format!("unexpected {endpoint} response: {e}")))
}

fn asset(raw: &str, endpoint: &str) -> Result<AssetId, CoinlensError> {
    AssetId::new(raw)
        .map_err(|_| CoinlensError::Data(format!("{endpoint} response has an empty coin id")))
}

/* ---------------- prices ---------------- */

#[derive(Debug, Deserialize)]
pub(crate) struct PricesResponse {
    prices: Vec<WirePrice>,
}

#[derive(Debug, Deserialize)]
struct WirePrice {
    coin_id: String,
    #[serde(default)]
    usd: Option<f64>,
    #[serde(default)]
    usd_24h_change: Option<f64>,
    #[serde(default)]
    usd_market_cap: Option<f64>,
}

impl PricesResponse {
    pub(crate) fn into_domain(self) -> Result<Vec<PricePoint>, CoinlensError> {
        let observed_at = Utc::now();
        self.prices
            .into_iter()
            .map(|p| {
                let point = PricePoint {
                    asset_id: asset(&p.coin_id, "prices")?,
                    usd: p.usd,
                    usd_24h_change: p.usd_24h_change,
                    usd_market_cap: p.usd_market_cap,
                    observed_at,
                };
                point.validate()?;
                Ok(point)
            })
            .collect()
    }
}

/* ---------------- history ---------------- */

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryResponse {
    coin_id: String,
    days: u32,
    prices: Vec<WireSample>,
}

#[derive(Debug, Deserialize)]
struct WireSample {
    timestamp: i64,
    price: f64,
}

impl HistoryResponse {
    pub(crate) fn into_domain(self) -> Result<PriceHistory, CoinlensError> {
        let history = PriceHistory {
            asset_id: asset(&self.coin_id, "historical")?,
            days: self.days,
            prices: self
                .prices
                .into_iter()
                .map(|s| PriceSample {
                    timestamp_ms: s.timestamp,
                    price: s.price,
                })
                .collect(),
        };
        history.validate()?;
        Ok(history)
    }
}

/* ---------------- sentiment ---------------- */

#[derive(Debug, Deserialize)]
pub(crate) struct SummaryResponse {
    summaries: Vec<WireSummary>,
}

#[derive(Debug, Deserialize)]
struct WireSummary {
    coin: String,
    score: f64,
    #[serde(default)]
    trend: Trend,
    article_count: u32,
    #[serde(default)]
    top_bullish: Option<String>,
    #[serde(default)]
    top_bearish: Option<String>,
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.filter(|t| !t.trim().is_empty())
}

impl SummaryResponse {
    pub(crate) fn into_domain(self) -> Result<Vec<SentimentSummary>, CoinlensError> {
        self.summaries
            .into_iter()
            .map(|s| {
                let summary = SentimentSummary {
                    asset_id: asset(&s.coin, "sentiment summary")?,
                    score: s.score,
                    trend: s.trend,
                    article_count: s.article_count,
                    top_bullish: non_blank(s.top_bullish),
                    top_bearish: non_blank(s.top_bearish),
                };
                summary.validate()?;
                Ok(summary)
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct HeatmapResponse {
    coins: Vec<WireCoinRow>,
}

#[derive(Debug, Deserialize)]
struct WireCoinRow {
    coin: String,
    days: Vec<WireDay>,
}

#[derive(Debug, Deserialize)]
struct WireDay {
    date: String,
    score: f64,
    article_count: u32,
}

impl HeatmapResponse {
    pub(crate) fn into_domain(self) -> Result<Vec<CoinHeatmapData>, CoinlensError> {
        self.coins
            .into_iter()
            .map(|row| {
                let asset_id = asset(&row.coin, "sentiment heatmap")?;
                let days = row
                    .days
                    .into_iter()
                    .map(|d| {
                        let date = NaiveDate::parse_from_str(&d.date, "%Y-%m-%d").map_err(|_| {
                            CoinlensError::Data(format!(
                                "heatmap date '{}' for {asset_id} is not YYYY-MM-DD",
                                d.date
                            ))
                        })?;
                        Ok(DayScore {
                            date,
                            score: d.score,
                            article_count: d.article_count,
                        })
                    })
                    .collect::<Result<Vec<_>, CoinlensError>>()?;
                let data = CoinHeatmapData { asset_id, days };
                data.validate()?;
                Ok(data)
            })
            .collect()
    }
}

/* ---------------- news ---------------- */

#[derive(Debug, Deserialize)]
pub(crate) struct NewsResponse {
    articles: Vec<WireArticle>,
}

#[derive(Debug, Deserialize)]
struct WireArticle {
    title: String,
    source: String,
    url: String,
    published_at: i64,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    related_coins: Vec<String>,
}

impl NewsResponse {
    pub(crate) fn into_domain(self) -> Result<Vec<NewsArticle>, CoinlensError> {
        self.articles
            .into_iter()
            .map(|a| {
                if a.url.trim().is_empty() {
                    return Err(CoinlensError::Data(format!(
                        "news article '{}' has no url",
                        a.title
                    )));
                }
                Ok(NewsArticle {
                    title: a.title,
                    source: a.source,
                    url: a.url,
                    published_at: a.published_at,
                    image_url: a.image_url.unwrap_or_default(),
                    related_coins: a
                        .related_coins
                        .into_iter()
                        .map(|c| c.trim().to_ascii_uppercase())
                        .filter(|c| !c.is_empty())
                        .collect::<BTreeSet<_>>(),
                })
            })
            .collect()
    }
}
