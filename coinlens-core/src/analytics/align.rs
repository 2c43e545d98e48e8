use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::{AssetId, CoinHeatmapData};

/// One date of an aligned multi-asset sentiment table.
///
/// Serializes to a flat object:
/// `{"date": "2024-03-01", "BTC": 0.42, "BTC_count": 17, "ETH": -0.1, ...}`.
/// An asset with no score on the date contributes no keys at all.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignedSeriesRow {
    /// Calendar date shared by every value in the row.
    pub date: NaiveDate,
    scores: BTreeMap<String, (f64, u32)>,
}

impl AlignedSeriesRow {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            scores: BTreeMap::new(),
        }
    }

    /// Score recorded for `label` on this date.
    #[must_use]
    pub fn score(&self, label: &str) -> Option<f64> {
        self.scores.get(label).map(|(s, _)| *s)
    }

    /// Article count recorded for `label` on this date.
    #[must_use]
    pub fn count(&self, label: &str) -> Option<u32> {
        self.scores.get(label).map(|(_, c)| *c)
    }

    /// Labels present on this date, sorted.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.scores.keys().map(String::as_str)
    }
}

impl Serialize for AlignedSeriesRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1 + 2 * self.scores.len()))?;
        map.serialize_entry("date", &self.date)?;
        for (label, (score, count)) in &self.scores {
            map.serialize_entry(label, score)?;
            map.serialize_entry(&format!("{label}_count"), count)?;
        }
        map.end()
    }
}

/// Merge per-asset daily series into one row per date, labelled by ticker.
///
/// See [`align_with`].
#[must_use]
pub fn align(series: &[CoinHeatmapData]) -> Vec<AlignedSeriesRow> {
    align_with(series, AssetId::label)
}

/// Merge per-asset daily series into one row per date.
///
/// - Rows cover the union of all input dates, ascending, each date once.
/// - Each asset with a score on a date contributes its score and article count
///   under `label_fn(asset)`; assets without one contribute nothing.
/// - When two inputs map to the same label, the later input wins.
pub fn align_with<F>(series: &[CoinHeatmapData], label_fn: F) -> Vec<AlignedSeriesRow>
where
    F: Fn(&AssetId) -> String,
{
    let mut by_date: BTreeMap<NaiveDate, AlignedSeriesRow> = BTreeMap::new();
    for coin in series {
        let label = label_fn(&coin.asset_id);
        for day in &coin.days {
            by_date
                .entry(day.date)
                .or_insert_with(|| AlignedSeriesRow::new(day.date))
                .scores
                .insert(label.clone(), (day.score, day.article_count));
        }
    }
    by_date.into_values().collect()
}
