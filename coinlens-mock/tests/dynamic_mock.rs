use std::time::Duration;

use coinlens_core::{AssetSet, Capability, CoinlensError};
use coinlens_mock::{DynamicMockConnector, MockBehavior};

fn assets() -> AssetSet {
    AssetSet::parse("bitcoin").unwrap()
}

#[tokio::test]
async fn unconfigured_capability_is_unsupported() {
    let (mock, _controller) = DynamicMockConnector::new_with_controller("P0");
    let err = mock
        .as_news_provider()
        .unwrap()
        .news(&Default::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CoinlensError::Unsupported { .. }));
}

#[tokio::test]
async fn queued_behaviors_run_before_default() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    controller.set_prices(MockBehavior::Return(vec![])).await;
    controller
        .push_prices(MockBehavior::Fail(CoinlensError::Other("boom".into())))
        .await;

    let pp = mock.as_price_provider().unwrap();
    let first = pp.prices(&assets()).await.unwrap_err();
    assert_eq!(first, CoinlensError::Other("boom".into()));
    assert!(pp.prices(&assets()).await.unwrap().is_empty());
    assert!(pp.prices(&assets()).await.unwrap().is_empty());
    assert_eq!(controller.calls(Capability::Prices).await, 3);
}

#[tokio::test(start_paused = true)]
async fn delayed_settles_after_tokio_clock_advances() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    controller
        .push_sentiment(MockBehavior::Delayed(Duration::from_secs(5), Ok(vec![])))
        .await;

    let started = tokio::time::Instant::now();
    let got = mock
        .as_sentiment_provider()
        .unwrap()
        .sentiment_summary(&assets())
        .await
        .unwrap();
    assert!(got.is_empty());
    assert!(started.elapsed() >= Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn hang_never_settles() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    controller.set_heatmap(MockBehavior::Hang).await;
    let fut = async {
        mock.as_heatmap_provider()
            .unwrap()
            .sentiment_heatmap(&assets(), Default::default())
            .await
    };
    assert!(tokio::time::timeout(Duration::from_secs(30), fut).await.is_err());
}
