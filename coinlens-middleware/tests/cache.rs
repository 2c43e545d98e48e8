use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use coinlens_core::{
    AssetSet, CacheConfig, Capability, CoinlensError, MarketConnector, NewsRequest,
};
use coinlens_middleware::{CachingConnector, ConnectorBuilder};
use coinlens_mock::{DynamicMockConnector, MockBehavior, MockConnector};

mod helpers;
use helpers::Counting;

fn cfg_with(cap: &str, ms: u64) -> CacheConfig {
    let mut cfg = CacheConfig::default();
    cfg.per_capability_ttl_ms.insert(cap.into(), ms);
    cfg
}

fn raw() -> Arc<dyn MarketConnector> {
    Arc::new(MockConnector::new())
}

#[tokio::test]
async fn second_call_hits_cache() {
    let (counted, count) = Counting::new(raw());
    let wrapped = ConnectorBuilder::new(counted)
        .with_cache(&CacheConfig::default())
        .build()
        .unwrap();
    let p = wrapped.as_price_provider().unwrap();

    let a = p.prices(&AssetSet::parse("bitcoin,ethereum").unwrap()).await.unwrap();
    let b = p.prices(&AssetSet::parse("ethereum, bitcoin").unwrap()).await.unwrap();
    assert_eq!(a, b);
    assert_eq!(count.load(Ordering::SeqCst), 1, "equal key sets share one entry");
}

#[tokio::test]
async fn distinct_keys_do_not_collide() {
    let (counted, count) = Counting::new(raw());
    let wrapped = ConnectorBuilder::new(counted)
        .with_cache(&CacheConfig::default())
        .build()
        .unwrap();
    let n = wrapped.as_news_provider().unwrap();
    let _ = n.news(&NewsRequest::new()).await.unwrap();
    let _ = n.news(&NewsRequest::new().coins(["BTC"])).await.unwrap();
    let _ = n.news(&NewsRequest::new().limit(5).unwrap()).await.unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn ttl_expiration_causes_refetch() {
    let (counted, count) = Counting::new(raw());
    let wrapped = ConnectorBuilder::new(counted)
        .with_cache(&cfg_with("prices", 50))
        .build()
        .unwrap();
    let p = wrapped.as_price_provider().unwrap();
    let key = AssetSet::parse("solana").unwrap();

    let _ = p.prices(&key).await.unwrap();
    tokio::time::sleep(Duration::from_millis(120)).await;
    let _ = p.prices(&key).await.unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn zero_ttl_disables_capability() {
    let (counted, count) = Counting::new(raw());
    let wrapped = ConnectorBuilder::new(counted)
        .with_cache(&cfg_with("prices", 0))
        .build()
        .unwrap();
    let p = wrapped.as_price_provider().unwrap();
    let key = AssetSet::parse("bitcoin").unwrap();
    let _ = p.prices(&key).await.unwrap();
    let _ = p.prices(&key).await.unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn failures_are_not_cached() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("dyn");
    controller
        .push_prices(MockBehavior::Fail(CoinlensError::http(503, "upstream down")))
        .await;
    controller.set_prices(MockBehavior::Return(vec![])).await;

    let wrapped = ConnectorBuilder::new(mock)
        .with_cache(&CacheConfig::default())
        .build()
        .unwrap();
    let p = wrapped.as_price_provider().unwrap();
    let key = AssetSet::parse("bitcoin").unwrap();

    let err = p.prices(&key).await.unwrap_err();
    assert_eq!(err, CoinlensError::http(503, "upstream down"));
    assert!(p.prices(&key).await.unwrap().is_empty());
    assert!(p.prices(&key).await.unwrap().is_empty());
    assert_eq!(controller.calls(coinlens_core::Capability::Prices).await, 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_misses_coalesce() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("dyn");
    controller
        .set_prices(MockBehavior::Delayed(Duration::from_millis(100), Ok(vec![])))
        .await;
    let wrapped = ConnectorBuilder::new(mock)
        .with_cache(&CacheConfig::default())
        .build()
        .unwrap();

    let key = AssetSet::parse("bitcoin").unwrap();
    let calls = (0..8).map(|_| {
        let w = Arc::clone(&wrapped);
        let k = key.clone();
        tokio::spawn(async move { w.as_price_provider().unwrap().prices(&k).await })
    });
    for h in calls.collect::<Vec<_>>() {
        h.await.unwrap().unwrap();
    }
    assert_eq!(controller.calls(coinlens_core::Capability::Prices).await, 1);
}

#[tokio::test]
async fn unsupported_capability_passes_through() {
    let (counted, _count) = Counting::new(raw());
    let wrapped = ConnectorBuilder::new(counted)
        .with_cache(&CacheConfig::default())
        .build()
        .unwrap();
    assert!(wrapped.as_history_provider().is_none());
    assert!(wrapped.as_price_provider().is_some());
    assert_eq!(wrapped.name(), "counting");
}

#[tokio::test(start_paused = true)]
async fn loads_from_an_ended_session_are_not_served_later() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("dyn");
    controller
        .set_prices(MockBehavior::Delayed(Duration::from_millis(100), Ok(vec![])))
        .await;
    let cache = CachingConnector::new(mock, &CacheConfig::default());
    let p = cache.as_price_provider().unwrap();
    let key = AssetSet::parse("bitcoin").unwrap();

    // Invalidate while the first load is in flight, then start a second
    // caller before that load settles.
    let (first, second) = tokio::join!(p.prices(&key), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        cache.invalidate_all();
        p.prices(&key).await
    });
    first.unwrap();
    second.unwrap();
    assert_eq!(
        controller.calls(Capability::Prices).await,
        2,
        "a caller after invalidation must not join the earlier load"
    );

    p.prices(&key).await.unwrap();
    assert_eq!(controller.calls(Capability::Prices).await, 2);

    cache.invalidate_all();
    p.prices(&key).await.unwrap();
    assert_eq!(controller.calls(Capability::Prices).await, 3);
}
