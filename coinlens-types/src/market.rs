//! Price snapshots and daily price history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AssetId, CoinlensError};

/// Current USD price data for one asset.
///
/// `None` fields mean the upstream had no value, not zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Asset this price belongs to.
    pub asset_id: AssetId,
    /// Spot price in USD.
    pub usd: Option<f64>,
    /// Percentage change over the last 24 hours.
    pub usd_24h_change: Option<f64>,
    /// Market capitalization in USD.
    pub usd_market_cap: Option<f64>,
    /// When the snapshot was received.
    pub observed_at: DateTime<Utc>,
}

impl PricePoint {
    /// Reject non-finite numbers; absent values are fine.
    ///
    /// # Errors
    /// Returns `Data` if any present value is NaN or infinite.
    pub fn validate(&self) -> Result<(), CoinlensError> {
        for (field, v) in [
            ("usd", self.usd),
            ("usd_24h_change", self.usd_24h_change),
            ("usd_market_cap", self.usd_market_cap),
        ] {
            if let Some(x) = v
                && !x.is_finite()
            {
                return Err(CoinlensError::Data(format!(
                    "non-finite {field} for {}",
                    self.asset_id
                )));
            }
        }
        Ok(())
    }
}

/// One timestamped price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    /// Milliseconds since the UNIX epoch.
    pub timestamp_ms: i64,
    /// Price in USD.
    pub price: f64,
}

/// Price history for one asset over a trailing window of days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    /// Asset this series belongs to.
    pub asset_id: AssetId,
    /// Requested window length in days.
    pub days: u32,
    /// Samples in ascending timestamp order.
    pub prices: Vec<PriceSample>,
}

impl PriceHistory {
    /// Raw price values in series order.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.prices.iter().map(|p| p.price).collect()
    }

    /// Check ordering and finiteness.
    ///
    /// # Errors
    /// Returns `Data` if timestamps decrease or a price is non-finite.
    pub fn validate(&self) -> Result<(), CoinlensError> {
        let mut prev: Option<i64> = None;
        for p in &self.prices {
            if !p.price.is_finite() {
                return Err(CoinlensError::Data(format!(
                    "non-finite price at {} for {}",
                    p.timestamp_ms, self.asset_id
                )));
            }
            if let Some(t) = prev
                && p.timestamp_ms < t
            {
                return Err(CoinlensError::Data(format!(
                    "price history for {} is not in ascending order",
                    self.asset_id
                )));
            }
            prev = Some(p.timestamp_ms);
        }
        Ok(())
    }
}

/// Inclusive bounds the backend accepts for a history window.
pub const HISTORY_DAYS: core::ops::RangeInclusive<u32> = 1..=365;

/// Cache/store key for one asset's price history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HistoryKey {
    /// Asset to fetch.
    pub asset: AssetId,
    /// Trailing window in days.
    pub days: u32,
}

impl HistoryKey {
    /// Build a key, validating the window length.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `days` is outside `1..=365`.
    pub fn new(asset: AssetId, days: u32) -> Result<Self, CoinlensError> {
        if !HISTORY_DAYS.contains(&days) {
            return Err(CoinlensError::InvalidArg(format!(
                "history window must be within 1..=365 days, got {days}"
            )));
        }
        Ok(Self { asset, days })
    }
}
