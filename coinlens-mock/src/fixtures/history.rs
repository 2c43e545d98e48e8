use coinlens_core::{AssetId, PriceHistory, PriceSample};

use super::{as_of, prices, seed};

const DAY_MS: i64 = 86_400_000;

/// One sample per day for the trailing `days`, oldest first.
pub fn by_id(id: &AssetId, days: u32) -> Option<PriceHistory> {
    let base = prices::base_price(id)?;
    let s = seed(id.as_str());
    let end = as_of().timestamp_millis();
    let prices = (0..days)
        .rev()
        .map(|back| {
            let wobble = f64::from((back.wrapping_mul(13).wrapping_add(s)) % 11) - 5.0;
            PriceSample {
                timestamp_ms: end - i64::from(back) * DAY_MS,
                price: base * (1.0 + wobble / 100.0),
            }
        })
        .collect();
    Some(PriceHistory {
        asset_id: id.clone(),
        days,
        prices,
    })
}
