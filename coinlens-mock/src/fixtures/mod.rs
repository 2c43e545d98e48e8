pub mod heatmap;
pub mod history;
pub mod news;
pub mod prices;
pub mod sentiment;

use chrono::{DateTime, NaiveDate, Utc};

/// Fixed "now" so fixture output never depends on the wall clock.
pub fn as_of() -> DateTime<Utc> {
    DateTime::from_timestamp(1_717_200_000, 0).unwrap_or_default()
}

pub fn as_of_date() -> NaiveDate {
    as_of().date_naive()
}

/// Stable per-asset seed for generated series.
pub fn seed(id: &str) -> u32 {
    id.bytes().fold(7u32, |acc, b| acc.wrapping_mul(31).wrapping_add(u32::from(b)))
}
