use serde::{Deserialize, Serialize};

/// Pearson product-moment correlation of two series.
///
/// Only the first `n = min(a.len(), b.len())` values of each slice take part;
/// trailing values of the longer slice are ignored.
///
/// Returns `None` when:
/// - `n < 2`
/// - either window has zero variance
/// - the result is not finite (e.g. a NaN or an infinity in the input)
///
/// Tiny floating-point excursions past ±1 are clamped to the closed interval.
///
/// ```
/// use coinlens_core::analytics::correlate;
///
/// let r = correlate(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 4.0, 6.0, 8.0, 10.0]).unwrap();
/// assert!((r - 1.0).abs() < 1e-12);
/// assert_eq!(correlate(&[5.0], &[5.0]), None);
/// ```
#[must_use]
pub fn correlate(a: &[f64], b: &[f64]) -> Option<f64> {
    let n = a.len().min(b.len());
    if n < 2 {
        return None;
    }
    let a = unit_scaled(&a[..n])?;
    let b = unit_scaled(&b[..n])?;

    #[allow(clippy::cast_precision_loss)]
    let len = n as f64;
    let mean_a = a.iter().sum::<f64>() / len;
    let mean_b = b.iter().sum::<f64>() / len;

    let (mut cov, mut var_a, mut var_b) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (x, y) in a.iter().zip(&b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    if var_a == 0.0 || var_b == 0.0 {
        return None;
    }
    let r = cov / (var_a.sqrt() * var_b.sqrt());
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

// Divides a window by its largest magnitude so the sums of squares stay in
// range for any finite input. `None` for a constant or infinite window.
fn unit_scaled(window: &[f64]) -> Option<Vec<f64>> {
    let first = window[0];
    if window.iter().all(|v| *v == first) {
        return None;
    }
    let scale = window.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    if !scale.is_finite() {
        return None;
    }
    Some(window.iter().map(|v| v / scale).collect())
}

/// Correlation between one unordered pair of labelled series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairCorrelation {
    /// Label of the earlier series in input order.
    pub a: String,
    /// Label of the later series in input order.
    pub b: String,
    /// Coefficient, or `None` when undefined for this pair.
    pub correlation: Option<f64>,
}

/// Correlate every unordered pair `i < j` of the given series, in input order.
#[must_use]
pub fn correlation_matrix<L, V>(series: &[(L, V)]) -> Vec<PairCorrelation>
where
    L: AsRef<str>,
    V: AsRef<[f64]>,
{
    let mut out = Vec::with_capacity(series.len() * series.len().saturating_sub(1) / 2);
    for (i, (la, va)) in series.iter().enumerate() {
        for (lb, vb) in &series[i + 1..] {
            out.push(PairCorrelation {
                a: la.as_ref().to_string(),
                b: lb.as_ref().to_string(),
                correlation: correlate(va.as_ref(), vb.as_ref()),
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ragged_windows_use_common_prefix() {
        let r = correlate(&[1.0, 2.0, 3.0, 100.0, -7.0], &[3.0, 2.0, 1.0]).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn extreme_magnitudes_keep_their_correlation() {
        let big = [0.0, 1e100, 2e100, 5e100];
        let tiny = [0.0, 1e-170, 2e-170, 5e-170];
        for w in [&big, &tiny] {
            let r = correlate(w, w).unwrap();
            assert!((r - 1.0).abs() < 1e-12, "{r}");
        }
        let r = correlate(&big, &tiny).unwrap();
        assert!((r - 1.0).abs() < 1e-12, "{r}");
        assert_eq!(correlate(&[1.0, f64::INFINITY, 3.0], &[1.0, 2.0, 3.0]), None);
    }

    #[test]
    fn nan_input_is_absent_not_nan() {
        assert_eq!(correlate(&[1.0, f64::NAN, 3.0], &[1.0, 2.0, 3.0]), None);
    }

    #[test]
    fn matrix_covers_pairs_in_input_order() {
        let m = correlation_matrix(&[
            ("BTC", vec![1.0, 2.0, 3.0]),
            ("ETH", vec![2.0, 4.0, 6.0]),
            ("SOL", vec![5.0, 5.0, 5.0]),
        ]);
        let pairs: Vec<_> = m.iter().map(|p| (p.a.as_str(), p.b.as_str())).collect();
        assert_eq!(pairs, [("BTC", "ETH"), ("BTC", "SOL"), ("ETH", "SOL")]);
        assert!(m[1].correlation.is_none());
    }
}
