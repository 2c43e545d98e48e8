#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use coinlens::Dashboard;
use coinlens_core::{AssetId, AssetSet, PollConfig, PricePoint, RefreshPolicy};
use coinlens_mock::{DynamicMockConnector, DynamicMockController, MockConnector};

pub fn id(s: &str) -> AssetId {
    AssetId::new(s).unwrap()
}

pub fn assets(s: &str) -> AssetSet {
    AssetSet::parse(s).unwrap()
}

/// A price point with only the spot price set.
pub fn price(asset: &str, usd: f64) -> PricePoint {
    PricePoint {
        asset_id: id(asset),
        usd: Some(usd),
        usd_24h_change: None,
        usd_market_cap: None,
        observed_at: chrono::Utc::now(),
    }
}

/// Dashboard over the fixture connector.
pub fn fixture_dashboard() -> Dashboard {
    Dashboard::builder()
        .connector(Arc::new(MockConnector::new()))
        .build()
        .unwrap()
}

/// Dashboard over a controller-driven mock with a 60 s price poll.
pub fn dynamic_dashboard(policy: RefreshPolicy) -> (Dashboard, DynamicMockController) {
    let (conn, ctrl) = DynamicMockConnector::new_with_controller("dynamic");
    let dash = Dashboard::builder()
        .connector(conn)
        .refresh_policy(policy)
        .price_poll(PollConfig {
            interval: Duration::from_secs(60),
            jitter_percent: 0,
        })
        .build()
        .unwrap();
    (dash, ctrl)
}
