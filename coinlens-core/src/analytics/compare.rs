use serde::{Deserialize, Serialize};

use super::correlation::{PairCorrelation, correlation_matrix};
use super::normalize::NormMethod;
use crate::{AssetId, PriceHistory};

/// One point of a normalized overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparePoint {
    /// Milliseconds since the UNIX epoch.
    pub timestamp_ms: i64,
    /// Normalized value.
    pub normalized: f64,
    /// Raw USD price.
    pub usd: f64,
}

/// One asset's normalized series and headline numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparedSeries {
    /// Asset the series describes.
    pub asset_id: AssetId,
    /// Points in input order.
    pub points: Vec<ComparePoint>,
    /// First raw price in the window.
    pub first_price: Option<f64>,
    /// Last raw price in the window.
    pub last_price: Option<f64>,
    /// Percentage change from first to last; absent when the window is empty
    /// or starts at zero.
    pub price_change_pct: Option<f64>,
}

/// Normalized overlay of several price histories plus their pairwise correlations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Normalization used for `points[].normalized`.
    pub method: NormMethod,
    /// History window in days that every series was requested with.
    pub days: u32,
    /// One entry per input history, in input order.
    pub series: Vec<ComparedSeries>,
    /// Every unordered pair `i < j`, correlated on raw prices.
    pub correlations: Vec<PairCorrelation>,
}

fn change_pct(first: Option<f64>, last: Option<f64>) -> Option<f64> {
    match (first, last) {
        (Some(f), Some(l)) if f != 0.0 => Some((l - f) / f * 100.0),
        _ => None,
    }
}

/// Build a [`Comparison`] from histories fetched for the same `days` window.
#[must_use]
pub fn compare(histories: &[PriceHistory], days: u32, method: NormMethod) -> Comparison {
    let mut raw: Vec<(String, Vec<f64>)> = Vec::with_capacity(histories.len());
    let series = histories
        .iter()
        .map(|h| {
            let values = h.values();
            let normalized = method.apply(&values);
            let points = h
                .prices
                .iter()
                .zip(normalized)
                .map(|(p, normalized)| ComparePoint {
                    timestamp_ms: p.timestamp_ms,
                    normalized,
                    usd: p.price,
                })
                .collect();
            let first_price = values.first().copied();
            let last_price = values.last().copied();
            raw.push((h.asset_id.to_string(), values));
            ComparedSeries {
                asset_id: h.asset_id.clone(),
                points,
                first_price,
                last_price,
                price_change_pct: change_pct(first_price, last_price),
            }
        })
        .collect();

    Comparison {
        method,
        days,
        series,
        correlations: correlation_matrix(&raw),
    }
}
