//! Sentiment summaries and per-day sentiment series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{AssetId, AssetSet, CoinlensError};

/// Direction of sentiment over recent history.
///
/// The backend also emits `"stable"`; it and any unrecognized value decode to
/// [`Trend::Flat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// Recent articles score higher than older ones.
    Improving,
    /// Recent articles score lower than older ones.
    Declining,
    /// No meaningful change.
    #[default]
    #[serde(other)]
    Flat,
}

fn check_score(score: f64, what: impl FnOnce() -> String) -> Result<(), CoinlensError> {
    if score.is_finite() && (-1.0..=1.0).contains(&score) {
        Ok(())
    } else {
        Err(CoinlensError::Data(format!(
            "sentiment score {score} out of [-1, 1] for {}",
            what()
        )))
    }
}

/// Current sentiment for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    /// Asset the summary describes.
    pub asset_id: AssetId,
    /// Weighted score in `[-1, 1]`.
    pub score: f64,
    /// Recent direction.
    pub trend: Trend,
    /// Number of articles scored.
    pub article_count: u32,
    /// Title of the most bullish article, if any.
    pub top_bullish: Option<String>,
    /// Title of the most bearish article, if any.
    pub top_bearish: Option<String>,
}

impl SentimentSummary {
    /// # Errors
    /// Returns `Data` if the score is outside `[-1, 1]` or non-finite.
    pub fn validate(&self) -> Result<(), CoinlensError> {
        check_score(self.score, || self.asset_id.to_string())
    }
}

/// Sentiment for a single calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayScore {
    /// ISO `YYYY-MM-DD` date.
    pub date: NaiveDate,
    /// Average score in `[-1, 1]`.
    pub score: f64,
    /// Number of articles behind the average.
    pub article_count: u32,
}

/// One asset's per-day sentiment row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinHeatmapData {
    /// Asset the row describes.
    pub asset_id: AssetId,
    /// Days in strictly ascending date order.
    pub days: Vec<DayScore>,
}

impl CoinHeatmapData {
    /// # Errors
    /// Returns `Data` if dates are not strictly ascending or a score is out of range.
    pub fn validate(&self) -> Result<(), CoinlensError> {
        let mut prev: Option<NaiveDate> = None;
        for d in &self.days {
            check_score(d.score, || format!("{} on {}", self.asset_id, d.date))?;
            if let Some(p) = prev
                && d.date <= p
            {
                return Err(CoinlensError::Data(format!(
                    "heatmap dates for {} must be unique and ascending ({} after {})",
                    self.asset_id, d.date, p
                )));
            }
            prev = Some(d.date);
        }
        Ok(())
    }
}

/// Trailing window sizes the heatmap endpoint serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum HeatmapWindow {
    /// One week.
    Week,
    /// Thirty days.
    #[default]
    Month,
    /// Ninety days.
    Quarter,
    /// A full year.
    Year,
}

impl HeatmapWindow {
    /// Window length in days.
    #[must_use]
    pub const fn days(self) -> u32 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Quarter => 90,
            Self::Year => 365,
        }
    }
}

impl TryFrom<u32> for HeatmapWindow {
    type Error = CoinlensError;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        match days {
            7 => Ok(Self::Week),
            30 => Ok(Self::Month),
            90 => Ok(Self::Quarter),
            365 => Ok(Self::Year),
            other => Err(CoinlensError::InvalidArg(format!(
                "heatmap window must be 7, 30, 90 or 365 days, got {other}"
            ))),
        }
    }
}

impl From<HeatmapWindow> for u32 {
    fn from(w: HeatmapWindow) -> Self {
        w.days()
    }
}

/// Store/cache key for a heatmap request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HeatmapKey {
    /// Assets to include.
    pub assets: AssetSet,
    /// Trailing window.
    pub window: HeatmapWindow,
}

impl HeatmapKey {
    /// Build a key.
    #[must_use]
    pub const fn new(assets: AssetSet, window: HeatmapWindow) -> Self {
        Self { assets, window }
    }
}
