//! Display-ready projections of store data.

use serde::Serialize;

use coinlens_core::analytics::{
    AlignedSeriesRow, CorrelationLabel, SentimentLabel, TrendDirection, align,
};
use coinlens_core::{AssetId, CoinHeatmapData, PricePoint, SentimentSummary};

/// Placeholder rendered for an unavailable value.
pub const UNAVAILABLE: &str = "—";

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// One sentiment card per asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentCard {
    /// Asset described.
    pub asset_id: AssetId,
    /// Display ticker.
    pub ticker: String,
    /// Bucketed reading of the score.
    pub label: SentimentLabel,
    /// Trend arrow.
    pub direction: TrendDirection,
    /// Score rounded to two decimals.
    pub score: f64,
    /// Articles behind the score.
    pub article_count: u32,
    /// Most bullish headline.
    pub top_bullish: Option<String>,
    /// Most bearish headline.
    pub top_bearish: Option<String>,
}

impl From<&SentimentSummary> for SentimentCard {
    fn from(s: &SentimentSummary) -> Self {
        Self {
            asset_id: s.asset_id.clone(),
            ticker: s.asset_id.label(),
            label: SentimentLabel::from_score(s.score),
            direction: TrendDirection::from(s.trend),
            score: round2(s.score),
            article_count: s.article_count,
            top_bullish: s.top_bullish.clone(),
            top_bearish: s.top_bearish.clone(),
        }
    }
}

impl SentimentCard {
    /// Score text with two decimals and an explicit sign, e.g. `+0.42`.
    #[must_use]
    pub fn score_text(&self) -> String {
        format!("{:+.2}", self.score)
    }
}

/// Formatted price line for one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceTicker {
    /// Asset described.
    pub asset_id: AssetId,
    /// Display ticker.
    pub ticker: String,
    /// Spot price, e.g. `$65,000.00`.
    pub price: String,
    /// 24h change, e.g. `+1.25%`.
    pub change_24h: String,
    /// Compact market cap, e.g. `$1.28T`.
    pub market_cap: String,
    /// Sign of the 24h change.
    pub direction: TrendDirection,
}

impl From<&PricePoint> for PriceTicker {
    fn from(p: &PricePoint) -> Self {
        let direction = match p.usd_24h_change {
            Some(c) if c > 0.0 => TrendDirection::Up,
            Some(c) if c < 0.0 => TrendDirection::Down,
            _ => TrendDirection::Flat,
        };
        Self {
            asset_id: p.asset_id.clone(),
            ticker: p.asset_id.label(),
            price: p.usd.map_or_else(|| UNAVAILABLE.to_string(), format_usd),
            change_24h: p
                .usd_24h_change
                .map_or_else(|| UNAVAILABLE.to_string(), |c| format!("{c:+.2}%")),
            market_cap: p
                .usd_market_cap
                .map_or_else(|| UNAVAILABLE.to_string(), format_compact_usd),
            direction,
        }
    }
}

fn group_thousands(int_part: &str) -> String {
    let mut out = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `$` amount with thousands separators; sub-dollar prices keep four decimals.
#[must_use]
pub fn format_usd(v: f64) -> String {
    let decimals = if v.abs() < 1.0 { 4 } else { 2 };
    let fixed = format!("{:.*}", decimals, v.abs());
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let sign = if v < 0.0 { "-" } else { "" };
    format!("{sign}${}.{frac}", group_thousands(int_part))
}

/// Compact `$` amount with a `K`/`M`/`B`/`T` suffix.
#[must_use]
pub fn format_compact_usd(v: f64) -> String {
    const UNITS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];
    for (scale, suffix) in UNITS {
        if v.abs() >= scale {
            return format!("${:.2}{suffix}", v / scale);
        }
    }
    format!("${v:.2}")
}

/// Date-aligned chart rows for a sentiment heatmap.
#[must_use]
pub fn sentiment_chart(series: &[CoinHeatmapData]) -> Vec<AlignedSeriesRow> {
    align(series)
}

/// Badge describing a correlation coefficient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationBadge {
    /// Label text, e.g. `Strong (inverse)` or `Insufficient data`.
    pub text: String,
    /// Coefficient rounded to two decimals.
    pub value: Option<f64>,
    /// Classification, absent for insufficient data.
    pub label: Option<CorrelationLabel>,
}

impl From<Option<f64>> for CorrelationBadge {
    fn from(r: Option<f64>) -> Self {
        let label = r.map(CorrelationLabel::from_coefficient);
        Self {
            text: label.map_or_else(|| "Insufficient data".to_string(), |l| l.to_string()),
            value: r.map(round2),
            label,
        }
    }
}

impl CorrelationBadge {
    /// Value text, e.g. `-0.87`, or the placeholder.
    #[must_use]
    pub fn value_text(&self) -> String {
        self.value
            .map_or_else(|| UNAVAILABLE.to_string(), |v| format!("{v:.2}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usd_formatting() {
        assert_eq!(format_usd(65_000.0), "$65,000.00");
        assert_eq!(format_usd(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_usd(0.52), "$0.5200");
        assert_eq!(format_usd(999.0), "$999.00");
        assert_eq!(format_compact_usd(1.28e12), "$1.28T");
        assert_eq!(format_compact_usd(412.5e9), "$412.50B");
        assert_eq!(format_compact_usd(950.0), "$950.00");
    }

    #[test]
    fn correlation_badge_text() {
        let strong = CorrelationBadge::from(Some(-0.8734));
        assert_eq!(strong.value_text(), "-0.87");
        assert_eq!(strong.label, Some(CorrelationLabel::from_coefficient(-0.8734)));

        let missing = CorrelationBadge::from(None);
        assert_eq!(missing.text, "Insufficient data");
        assert_eq!(missing.value_text(), UNAVAILABLE);
    }
}
