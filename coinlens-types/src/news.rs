//! News articles and request parameters.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::CoinlensError;

/// A single news article. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsArticle {
    /// Headline.
    pub title: String,
    /// Publisher name.
    pub source: String,
    /// Link to the article.
    pub url: String,
    /// Publication time in seconds since the UNIX epoch.
    pub published_at: i64,
    /// Thumbnail URL; may be empty.
    pub image_url: String,
    /// Coin symbols the article is tagged with (e.g. `BTC`).
    pub related_coins: BTreeSet<String>,
}

/// Default number of articles per request.
pub const DEFAULT_NEWS_LIMIT: u32 = 20;
/// Largest page the news endpoint serves.
pub const MAX_NEWS_LIMIT: u32 = 50;

/// Parameters for a news fetch; also the news store key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NewsRequest {
    coins: Vec<String>,
    limit: u32,
}

impl Default for NewsRequest {
    fn default() -> Self {
        Self {
            coins: Vec::new(),
            limit: DEFAULT_NEWS_LIMIT,
        }
    }
}

impl NewsRequest {
    /// Unfiltered request for the default page size.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to articles tagged with any of the given symbols.
    ///
    /// Symbols are trimmed, upper-cased, sorted, and de-duplicated so equal
    /// filters produce equal keys.
    #[must_use]
    pub fn coins<I, S>(mut self, coins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: BTreeSet<String> = coins
            .into_iter()
            .map(|s| s.as_ref().trim().to_ascii_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        self.coins = set.into_iter().collect();
        self
    }

    /// Set the page size.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `limit` is outside `1..=50`.
    pub fn limit(mut self, limit: u32) -> Result<Self, CoinlensError> {
        if !(1..=MAX_NEWS_LIMIT).contains(&limit) {
            return Err(CoinlensError::InvalidArg(format!(
                "news limit must be within 1..={MAX_NEWS_LIMIT}, got {limit}"
            )));
        }
        self.limit = limit;
        Ok(self)
    }

    /// Symbol filter; empty means all news.
    #[must_use]
    pub fn coin_filter(&self) -> &[String] {
        &self.coins
    }

    /// Page size.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.limit
    }
}
