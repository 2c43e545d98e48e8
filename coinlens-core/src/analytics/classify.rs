use core::fmt;

use serde::{Deserialize, Serialize};

use crate::Trend;

/// Arrow direction shown next to a sentiment trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// Improving.
    Up,
    /// Declining.
    Down,
    /// Anything else.
    Flat,
}

impl TrendDirection {
    /// Classify a raw wire string. Only `improving` and `declining` are directional.
    #[must_use]
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "improving" => Self::Up,
            "declining" => Self::Down,
            _ => Self::Flat,
        }
    }
}

impl From<Trend> for TrendDirection {
    fn from(t: Trend) -> Self {
        match t {
            Trend::Improving => Self::Up,
            Trend::Declining => Self::Down,
            Trend::Flat => Self::Flat,
        }
    }
}

/// Five-bucket reading of a sentiment score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    /// Score above 0.3.
    VeryBullish,
    /// Score above 0.1.
    Bullish,
    /// Score within `[-0.1, 0.1]`.
    Neutral,
    /// Score below -0.1.
    Bearish,
    /// Score below -0.3.
    VeryBearish,
}

impl SentimentLabel {
    /// Bucket a score. Boundaries are exclusive: exactly `0.3` is `Bullish`.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score > 0.3 {
            Self::VeryBullish
        } else if score > 0.1 {
            Self::Bullish
        } else if score < -0.3 {
            Self::VeryBearish
        } else if score < -0.1 {
            Self::Bearish
        } else {
            Self::Neutral
        }
    }

    /// Display text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VeryBullish => "Very Bullish",
            Self::Bullish => "Bullish",
            Self::Neutral => "Neutral",
            Self::Bearish => "Bearish",
            Self::VeryBearish => "Very Bearish",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Magnitude bucket of a correlation coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CorrelationStrength {
    /// `|r| < 0.3`.
    Negligible,
    /// `|r| >= 0.3`.
    Weak,
    /// `|r| >= 0.5`.
    Moderate,
    /// `|r| >= 0.8`.
    Strong,
}

impl CorrelationStrength {
    /// Display text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Negligible => "Negligible",
            Self::Weak => "Weak",
            Self::Moderate => "Moderate",
            Self::Strong => "Strong",
        }
    }
}

/// Strength plus sign of a correlation coefficient.
///
/// The sign is an independent qualifier: `-0.9` is `Strong` and `inverse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationLabel {
    /// Magnitude bucket.
    pub strength: CorrelationStrength,
    /// Whether the coefficient is negative.
    pub inverse: bool,
}

impl CorrelationLabel {
    /// Classify a coefficient by its absolute value.
    #[must_use]
    pub fn from_coefficient(r: f64) -> Self {
        let m = r.abs();
        let strength = if m >= 0.8 {
            CorrelationStrength::Strong
        } else if m >= 0.5 {
            CorrelationStrength::Moderate
        } else if m >= 0.3 {
            CorrelationStrength::Weak
        } else {
            CorrelationStrength::Negligible
        };
        Self {
            strength,
            inverse: r < 0.0,
        }
    }
}

impl fmt::Display for CorrelationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.strength.as_str())?;
        if self.inverse {
            f.write_str(" (inverse)")?;
        }
        Ok(())
    }
}

/// Render a correlation result, with `"Insufficient data"` for an absent one.
#[must_use]
pub fn describe_correlation(r: Option<f64>) -> String {
    r.map_or_else(
        || "Insufficient data".to_string(),
        |r| CorrelationLabel::from_coefficient(r).to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_boundaries_are_strict() {
        assert_eq!(SentimentLabel::from_score(0.3), SentimentLabel::Bullish);
        assert_eq!(SentimentLabel::from_score(0.31), SentimentLabel::VeryBullish);
        assert_eq!(SentimentLabel::from_score(0.1), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(-0.1), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(-0.3), SentimentLabel::Bearish);
        assert_eq!(SentimentLabel::from_score(-0.5), SentimentLabel::VeryBearish);
    }

    #[test]
    fn inverse_is_independent_of_strength() {
        let l = CorrelationLabel::from_coefficient(-0.85);
        assert_eq!(l.strength, CorrelationStrength::Strong);
        assert!(l.inverse);
        assert_eq!(l.to_string(), "Strong (inverse)");
        assert_eq!(describe_correlation(Some(0.1)), "Negligible");
        assert_eq!(describe_correlation(None), "Insufficient data");
    }

    #[test]
    fn wire_trends() {
        assert_eq!(TrendDirection::from_wire("improving"), TrendDirection::Up);
        assert_eq!(TrendDirection::from_wire("declining"), TrendDirection::Down);
        assert_eq!(TrendDirection::from_wire("stable"), TrendDirection::Flat);
        assert_eq!(TrendDirection::from(Trend::Flat), TrendDirection::Flat);
    }
}
