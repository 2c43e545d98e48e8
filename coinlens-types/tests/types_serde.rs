use coinlens_types::{
    AssetId, AssetSet, CacheConfig, Capability, CoinHeatmapData, CoinlensError, DayScore,
    HeatmapWindow, NewsRequest, SentimentSummary, Trend,
};

fn date(s: &str) -> chrono::NaiveDate {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn trend_decodes_known_and_fallback_values() {
    let t: Trend = serde_json::from_str("\"improving\"").unwrap();
    assert_eq!(t, Trend::Improving);
    let t: Trend = serde_json::from_str("\"declining\"").unwrap();
    assert_eq!(t, Trend::Declining);
    let t: Trend = serde_json::from_str("\"stable\"").unwrap();
    assert_eq!(t, Trend::Flat);
    let t: Trend = serde_json::from_str("\"sideways\"").unwrap();
    assert_eq!(t, Trend::Flat);
    assert_eq!(serde_json::to_string(&Trend::Flat).unwrap(), "\"flat\"");
}

#[test]
fn heatmap_window_accepts_only_served_sizes() {
    let w: HeatmapWindow = serde_json::from_str("90").unwrap();
    assert_eq!(w, HeatmapWindow::Quarter);
    assert_eq!(serde_json::to_string(&HeatmapWindow::Year).unwrap(), "365");
    assert!(serde_json::from_str::<HeatmapWindow>("14").is_err());
    assert!(matches!(
        HeatmapWindow::try_from(0),
        Err(CoinlensError::InvalidArg(_))
    ));
}

#[test]
fn asset_set_normalizes_and_dedups() {
    let a = AssetSet::parse(" Ethereum,bitcoin,,ethereum ").unwrap();
    let b = AssetSet::parse("bitcoin,ethereum").unwrap();
    assert_eq!(a, b);
    assert_eq!(a.joined(), "bitcoin,ethereum");
    assert_eq!(a.len(), 2);
    assert!(AssetSet::parse(" , ,").is_err());
}

#[test]
fn asset_id_rejects_empty_and_labels_known_coins() {
    assert!(AssetId::new("   ").is_err());
    assert!(AssetId::new("a,b").is_err());
    assert_eq!(AssetId::new("bitcoin").unwrap().label(), "BTC");
    assert_eq!(AssetId::new("Cardano").unwrap().label(), "CARDANO");
    assert!(serde_json::from_str::<AssetId>("\"\"").is_err());
}

#[test]
fn news_request_normalizes_filter_and_bounds_limit() {
    let a = NewsRequest::new().coins(["eth", " BTC", "btc", ""]);
    let b = NewsRequest::new().coins(["BTC", "ETH"]);
    assert_eq!(a, b);
    assert_eq!(a.coin_filter(), ["BTC".to_string(), "ETH".to_string()]);
    assert_eq!(a.page_size(), 20);
    assert!(NewsRequest::new().limit(0).is_err());
    assert!(NewsRequest::new().limit(51).is_err());
    assert_eq!(NewsRequest::new().limit(50).unwrap().page_size(), 50);
}

#[test]
fn summary_validation_enforces_score_range() {
    let mut s = SentimentSummary {
        asset_id: AssetId::new("bitcoin").unwrap(),
        score: 0.4,
        trend: Trend::Improving,
        article_count: 12,
        top_bullish: Some("ETF approved".into()),
        top_bearish: None,
    };
    assert!(s.validate().is_ok());
    s.score = 1.2;
    assert!(matches!(s.validate(), Err(CoinlensError::Data(_))));
    s.score = f64::NAN;
    assert!(s.validate().is_err());
}

#[test]
fn heatmap_validation_requires_strictly_ascending_dates() {
    let day = |d: &str, score: f64| DayScore {
        date: date(d),
        score,
        article_count: 1,
    };
    let mut row = CoinHeatmapData {
        asset_id: AssetId::new("solana").unwrap(),
        days: vec![day("2024-03-01", 0.1), day("2024-03-02", -0.2)],
    };
    assert!(row.validate().is_ok());
    row.days.push(day("2024-03-02", 0.0));
    assert!(row.validate().is_err());
}

#[test]
fn day_score_uses_iso_dates_on_the_wire() {
    let d: DayScore =
        serde_json::from_str(r#"{"date":"2024-01-31","score":-0.25,"article_count":3}"#).unwrap();
    assert_eq!(d.date, date("2024-01-31"));
    let out = serde_json::to_value(d).unwrap();
    assert_eq!(out["date"], "2024-01-31");
}

#[test]
fn cache_config_zero_ttl_disables_capability() {
    let mut cfg = CacheConfig::default();
    assert_eq!(
        cfg.ttl_for(Capability::Prices),
        Some(std::time::Duration::from_secs(60))
    );
    cfg.per_capability_ttl_ms.insert("news".into(), 0);
    assert_eq!(cfg.ttl_for(Capability::News), None);
    cfg.per_capability_max_entries.insert("news".into(), 0);
    assert_eq!(cfg.capacity_for(Capability::News), 1);
}

#[test]
fn user_message_prefers_backend_detail() {
    let e = CoinlensError::http(502, "CoinGecko unavailable");
    assert_eq!(e.user_message().as_deref(), Some("CoinGecko unavailable"));
    assert_eq!(CoinlensError::http(500, "  ").user_message(), None);
    assert_eq!(CoinlensError::unsupported("news").user_message(), None);
    assert!(!CoinlensError::Unauthorized.is_transient());
    assert!(CoinlensError::request_timeout("prices").is_transient());
}
