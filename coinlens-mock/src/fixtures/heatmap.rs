use chrono::Days;
use coinlens_core::{AssetId, CoinHeatmapData, DayScore, HeatmapWindow};

use super::{as_of_date, prices, seed};

/// Per-day scores for the trailing `window`, oldest first.
///
/// `ripple` has no articles every third day so its row is sparse.
pub fn by_id(id: &AssetId, window: HeatmapWindow) -> Option<CoinHeatmapData> {
    prices::by_id(id)?;
    let s = seed(id.as_str());
    let end = as_of_date();
    let days = (0..window.days())
        .rev()
        .filter(|back| id.as_str() != "ripple" || back % 3 != 0)
        .filter_map(|back| {
            let date = end.checked_sub_days(Days::new(u64::from(back)))?;
            let step = (back.wrapping_mul(7).wrapping_add(s)) % 21;
            Some(DayScore {
                date,
                score: f64::from(step) / 10.0 - 1.0,
                article_count: 1 + (back + s) % 9,
            })
        })
        .collect();
    Some(CoinHeatmapData {
        asset_id: id.clone(),
        days,
    })
}
