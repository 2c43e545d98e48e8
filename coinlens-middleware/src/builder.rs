//! Builder for composing connectors with middleware layers.
//!
//! Layers form an "onion" around the raw connector. The `layers` vector stores
//! middleware in **outermost-first** order (last added = outermost) and
//! `build()` applies them in reverse, so
//!
//! ```text
//! builder.layer(a).layer(b)
//!
//! Storage: [b, a]
//! Result:  b(a(Raw))
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use coinlens_core::{CacheConfig, CoinlensError, MarketConnector, Middleware};

use crate::cache::CacheMiddleware;

const CACHE_LAYER: &str = "CachingMiddleware";

/// Generic middleware builder for composing a connector with layered wrappers.
pub struct ConnectorBuilder {
    raw: Arc<dyn MarketConnector>,
    /// Middleware layers in outermost-first order.
    layers: Vec<Box<dyn Middleware>>,
}

impl ConnectorBuilder {
    /// Create a new builder from a raw, unwrapped connector.
    #[must_use]
    pub fn new(raw: Arc<dyn MarketConnector>) -> Self {
        Self {
            raw,
            layers: Vec::new(),
        }
    }

    /// Add or replace the caching layer.
    ///
    /// The cache sits at the outermost position so hits never reach inner layers.
    #[must_use]
    pub fn with_cache(mut self, cfg: &CacheConfig) -> Self {
        self.layers.retain(|m| m.name() != CACHE_LAYER);
        self.layers
            .insert(0, Box::new(CacheMiddleware::new(cfg.clone())));
        self
    }

    /// Remove the caching layer if present.
    #[must_use]
    pub fn without_cache(mut self) -> Self {
        self.layers.retain(|m| m.name() != CACHE_LAYER);
        self
    }

    /// Add an arbitrary middleware layer at the outermost position.
    #[must_use]
    pub fn layer(mut self, layer: Box<dyn Middleware>) -> Self {
        self.layers.insert(0, layer);
        self
    }

    /// Layer names and configuration snapshots, outermost first, followed by the
    /// raw connector.
    #[must_use]
    pub fn describe(&self) -> Vec<(String, serde_json::Value)> {
        self.layers
            .iter()
            .map(|l| (l.name().to_string(), l.config_json()))
            .chain(std::iter::once((
                "RawConnector".to_string(),
                serde_json::json!({ "name": self.raw.name() }),
            )))
            .collect()
    }

    /// Build the wrapped connector, applying layers innermost first.
    ///
    /// # Errors
    /// Returns `InvalidArg` if two layers share a name.
    pub fn build(self) -> Result<Arc<dyn MarketConnector>, CoinlensError> {
        let mut seen = HashSet::new();
        for l in &self.layers {
            if !seen.insert(l.name()) {
                return Err(CoinlensError::InvalidArg(format!(
                    "duplicate middleware layer: {}",
                    l.name()
                )));
            }
        }

        let mut acc: Arc<dyn MarketConnector> = Arc::clone(&self.raw);
        for m in self.layers.into_iter().rev() {
            acc = m.apply(acc);
        }
        Ok(acc)
    }
}
