use core::fmt;
use serde::{Deserialize, Serialize};

/// High-level capability labels for stores, errors, caching, and telemetry.
///
/// These map one-to-one with connector provider traits and allow consistent
/// Display formatting and match-exhaustive handling when adding new
/// capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Capability {
    /// Current USD prices for a set of assets.
    Prices,
    /// Daily price history for one asset.
    History,
    /// Current sentiment summary per asset.
    SentimentSummary,
    /// Per-day sentiment scores per asset.
    SentimentHeatmap,
    /// Latest news articles.
    News,
}

impl Capability {
    /// Every capability, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Prices,
        Self::History,
        Self::SentimentSummary,
        Self::SentimentHeatmap,
        Self::News,
    ];

    /// Stable, kebab-case identifier for logs/errors/config keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Prices => "prices",
            Self::History => "history",
            Self::SentimentSummary => "sentiment-summary",
            Self::SentimentHeatmap => "sentiment-heatmap",
            Self::News => "news",
        }
    }

    /// Human wording used in generic error fallbacks ("Failed to load ...").
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Prices => "prices",
            Self::History => "price history",
            Self::SentimentSummary => "sentiment",
            Self::SentimentHeatmap => "sentiment heatmap",
            Self::News => "news",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
