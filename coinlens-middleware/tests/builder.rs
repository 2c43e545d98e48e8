use std::sync::Arc;

use coinlens_core::{CacheConfig, CoinlensError, MarketConnector, Middleware};
use coinlens_middleware::{CacheMiddleware, ConnectorBuilder};
use coinlens_mock::MockConnector;

fn raw() -> Arc<dyn MarketConnector> {
    Arc::new(MockConnector::new())
}

#[test]
fn with_cache_replaces_existing_layer() {
    let mut cfg = CacheConfig::default();
    cfg.default_ttl_ms = 1_000;
    let b = ConnectorBuilder::new(raw())
        .with_cache(&CacheConfig::default())
        .with_cache(&cfg);
    let layers = b.describe();
    assert_eq!(layers.len(), 2);
    assert_eq!(layers[0].0, "CachingMiddleware");
    assert_eq!(layers[0].1["default_ttl_ms"], 1_000);
    assert_eq!(layers[1].0, "RawConnector");
    assert_eq!(layers[1].1["name"], "coinlens-mock");
}

#[test]
fn without_cache_leaves_raw_connector() {
    let built = ConnectorBuilder::new(raw())
        .with_cache(&CacheConfig::default())
        .without_cache()
        .build()
        .unwrap();
    assert_eq!(built.name(), "coinlens-mock");
}

#[test]
fn duplicate_layers_are_rejected() {
    let cfg = CacheConfig::default();
    let res = ConnectorBuilder::new(raw())
        .layer(Box::new(CacheMiddleware::new(cfg.clone())))
        .layer(Box::new(CacheMiddleware::new(cfg)))
        .build();
    assert!(matches!(res, Err(CoinlensError::InvalidArg(_))));
}

#[test]
fn middleware_reports_config() {
    let m = CacheMiddleware::new(CacheConfig::default());
    assert_eq!(m.name(), "CachingMiddleware");
    assert_eq!(m.config_json()["per_capability_ttl_ms"]["news"], 300_000);
}
