use serde::{Deserialize, Serialize};

/// Rescaling applied before overlaying series with different magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormMethod {
    /// Scale into `[0, 1]` by the observed range.
    #[default]
    MinMax,
    /// Center on the mean and divide by the population standard deviation.
    ZScore,
}

impl NormMethod {
    /// Apply this method to `values`.
    #[must_use]
    pub fn apply(self, values: &[f64]) -> Vec<f64> {
        match self {
            Self::MinMax => min_max(values),
            Self::ZScore => z_score(values),
        }
    }
}

fn clean(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .map(|v| if v.is_finite() { *v } else { 0.0 })
        .collect()
}

/// Min-max scaling into `[0, 1]`.
///
/// Non-finite values count as `0.0`. A constant series (including a single
/// value) maps to all `0.5`.
#[must_use]
pub fn min_max(values: &[f64]) -> Vec<f64> {
    let cleaned = clean(values);
    let min = cleaned.iter().copied().fold(f64::INFINITY, f64::min);
    let max = cleaned.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if cleaned.is_empty() {
        return cleaned;
    }
    if max == min {
        return vec![0.5; cleaned.len()];
    }
    let spread = max - min;
    cleaned.into_iter().map(|v| (v - min) / spread).collect()
}

/// Z-score standardization using the population standard deviation.
///
/// Non-finite values count as `0.0`. A series with zero spread maps to all `0.0`.
#[must_use]
pub fn z_score(values: &[f64]) -> Vec<f64> {
    let cleaned = clean(values);
    if cleaned.is_empty() {
        return cleaned;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = cleaned.len() as f64;
    let mean = cleaned.iter().sum::<f64>() / n;
    let variance = cleaned.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std = variance.sqrt();
    if std == 0.0 {
        return vec![0.0; cleaned.len()];
    }
    cleaned.into_iter().map(|v| (v - mean) / std).collect()
}
