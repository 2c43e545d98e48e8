//! Asset identifiers and cache-key sets.

use core::fmt;
use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::CoinlensError;

/// Stable identifier of a tradable asset (e.g. `bitcoin`).
///
/// Always trimmed, lower-cased, and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct AssetId(String);

const LABELS: &[(&str, &str)] = &[
    ("bitcoin", "BTC"),
    ("ripple", "XRP"),
    ("ethereum", "ETH"),
    ("solana", "SOL"),
    ("dogecoin", "DOGE"),
];

impl AssetId {
    /// Validate and normalize an asset identifier.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the identifier is empty after trimming or contains
    /// a comma (which would corrupt the comma-joined wire form).
    pub fn new(raw: impl AsRef<str>) -> Result<Self, CoinlensError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CoinlensError::InvalidArg("empty asset id".into()));
        }
        if trimmed.contains(',') {
            return Err(CoinlensError::InvalidArg(format!(
                "asset id must not contain ',': {trimmed}"
            )));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// Borrow the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display ticker for charts and cards (`bitcoin` → `BTC`).
    ///
    /// Unknown identifiers fall back to their upper-cased id.
    #[must_use]
    pub fn label(&self) -> String {
        LABELS
            .iter()
            .find(|(id, _)| *id == self.0)
            .map_or_else(|| self.0.to_ascii_uppercase(), |(_, l)| (*l).to_string())
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AssetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for AssetId {
    type Error = CoinlensError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for AssetId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Sorted, de-duplicated set of assets used as a request and cache key.
///
/// Two requests for `bitcoin,ethereum` and `ethereum, bitcoin` share one key.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetSet(BTreeSet<AssetId>);

impl AssetSet {
    /// Build a set from already-validated identifiers.
    pub fn new<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = AssetId>,
    {
        Self(ids.into_iter().collect())
    }

    /// Parse a comma-separated list, trimming entries and skipping empty ones.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no identifier remains after filtering.
    pub fn parse(csv: &str) -> Result<Self, CoinlensError> {
        let set: BTreeSet<AssetId> = csv
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(AssetId::new)
            .collect::<Result<_, _>>()?;
        if set.is_empty() {
            return Err(CoinlensError::InvalidArg("no asset ids provided".into()));
        }
        Ok(Self(set))
    }

    /// Comma-joined wire form, in sorted order.
    #[must_use]
    pub fn joined(&self) -> String {
        self.0
            .iter()
            .map(AssetId::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Iterate the assets in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &AssetId> {
        self.0.iter()
    }

    /// Whether the set contains `id`.
    #[must_use]
    pub fn contains(&self, id: &AssetId) -> bool {
        self.0.contains(id)
    }

    /// Number of assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<AssetId> for AssetSet {
    fn from_iter<T: IntoIterator<Item = AssetId>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl fmt::Display for AssetSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}
