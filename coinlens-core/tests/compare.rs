use coinlens_core::analytics::{NormMethod, compare};
use coinlens_core::{AssetId, PriceHistory, PriceSample};

fn history(id: &str, prices: &[f64]) -> PriceHistory {
    PriceHistory {
        asset_id: AssetId::new(id).unwrap(),
        days: 30,
        prices: prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PriceSample {
                timestamp_ms: 1_700_000_000_000 + i64::try_from(i).unwrap() * 86_400_000,
                price,
            })
            .collect(),
    }
}

#[test]
fn headline_numbers_and_raw_correlation() {
    let cmp = compare(
        &[
            history("bitcoin", &[100.0, 110.0, 120.0]),
            history("ethereum", &[10.0, 9.0, 8.0]),
        ],
        30,
        NormMethod::MinMax,
    );
    assert_eq!(cmp.days, 30);

    let btc = &cmp.series[0];
    assert_eq!(btc.first_price, Some(100.0));
    assert_eq!(btc.last_price, Some(120.0));
    assert!((btc.price_change_pct.unwrap() - 20.0).abs() < 1e-9);
    assert_eq!(
        btc.points.iter().map(|p| p.normalized).collect::<Vec<_>>(),
        [0.0, 0.5, 1.0]
    );
    assert_eq!(btc.points[2].usd, 120.0);

    assert_eq!(cmp.correlations.len(), 1);
    assert_eq!(cmp.correlations[0].a, "bitcoin");
    assert_eq!(cmp.correlations[0].b, "ethereum");
    assert!((cmp.correlations[0].correlation.unwrap() + 1.0).abs() < 1e-12);
}

#[test]
fn empty_or_zero_start_has_no_change() {
    let cmp = compare(
        &[history("solana", &[]), history("dogecoin", &[0.0, 1.0])],
        30,
        NormMethod::ZScore,
    );
    assert_eq!(cmp.series[0].first_price, None);
    assert_eq!(cmp.series[0].price_change_pct, None);
    assert_eq!(cmp.series[1].price_change_pct, None);
    assert_eq!(cmp.correlations[0].correlation, None);
}
