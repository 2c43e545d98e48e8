use coinlens_core::{AssetId, AssetSet, CoinlensError, HeatmapWindow, MarketConnector, NewsRequest};
use coinlens_mock::MockConnector;

fn set(csv: &str) -> AssetSet {
    AssetSet::parse(csv).unwrap()
}

#[tokio::test]
async fn prices_skip_unknown_assets() {
    let m = MockConnector::new();
    let got = m
        .as_price_provider()
        .unwrap()
        .prices(&set("bitcoin,cardano,dogecoin"))
        .await
        .unwrap();
    let ids: Vec<_> = got.iter().map(|p| p.asset_id.as_str()).collect();
    assert_eq!(ids, ["bitcoin", "dogecoin"]);
    assert_eq!(got[1].usd_market_cap, None);
}

#[tokio::test]
async fn forced_failure_asset() {
    let m = MockConnector::new();
    let err = m
        .as_sentiment_provider()
        .unwrap()
        .sentiment_summary(&set("bitcoin,fail"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoinlensError::Connector { .. }));
}

#[tokio::test]
async fn heatmap_rows_validate_and_ripple_is_sparse() {
    let m = MockConnector::new();
    let rows = m
        .as_heatmap_provider()
        .unwrap()
        .sentiment_heatmap(&set("bitcoin,ripple"), HeatmapWindow::Week)
        .await
        .unwrap();
    for r in &rows {
        r.validate().unwrap();
    }
    assert_eq!(rows[0].days.len(), 7);
    assert!(rows[1].days.len() < 7);
}

#[tokio::test]
async fn history_is_ascending_and_sized() {
    let m = MockConnector::new();
    let h = m
        .as_history_provider()
        .unwrap()
        .history(&AssetId::new("solana").unwrap(), 30)
        .await
        .unwrap();
    assert_eq!(h.prices.len(), 30);
    h.validate().unwrap();

    let missing = m
        .as_history_provider()
        .unwrap()
        .history(&AssetId::new("cardano").unwrap(), 30)
        .await
        .unwrap_err();
    assert!(matches!(missing, CoinlensError::NotFound { .. }));
}

#[tokio::test]
async fn news_filter_and_limit() {
    let m = MockConnector::new();
    let np = m.as_news_provider().unwrap();
    let eth = np.news(&NewsRequest::new().coins(["eth"])).await.unwrap();
    assert_eq!(eth.len(), 2);
    assert!(eth.iter().all(|a| a.related_coins.contains("ETH")));
    assert!(eth[0].published_at >= eth[1].published_at);

    let two = np.news(&NewsRequest::new().limit(2).unwrap()).await.unwrap();
    assert_eq!(two.len(), 2);
}
