//! Pure, deterministic analytics over fetched series.
//!
//! - `correlation`: Pearson coefficient and pairwise matrices
//! - `align`: merge per-asset daily series into date-aligned rows
//! - `normalize`: min-max and z-score rescaling
//! - `classify`: sentiment, trend, and correlation labels
//! - `compare`: normalized overlays of price histories

/// Date alignment of per-asset sentiment series.
pub mod align;
/// Display classification of scores, trends, and coefficients.
pub mod classify;
/// Normalized multi-asset price comparison.
pub mod compare;
/// Pearson correlation.
pub mod correlation;
/// Series normalization.
pub mod normalize;

pub use align::{AlignedSeriesRow, align, align_with};
pub use classify::{
    CorrelationLabel, CorrelationStrength, SentimentLabel, TrendDirection, describe_correlation,
};
pub use compare::{ComparePoint, ComparedSeries, Comparison, compare};
pub use correlation::{PairCorrelation, correlate, correlation_matrix};
pub use normalize::{NormMethod, min_max, z_score};
