use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};
use coinlens_core::analytics::{align, align_with};
use coinlens_core::{AssetId, CoinHeatmapData, DayScore};
use proptest::prelude::*;

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
}

fn coin(id: &str, days: &[(u32, f64, u32)]) -> CoinHeatmapData {
    CoinHeatmapData {
        asset_id: AssetId::new(id).unwrap(),
        days: days
            .iter()
            .map(|&(day, score, article_count)| DayScore {
                date: d(day),
                score,
                article_count,
            })
            .collect(),
    }
}

#[test]
fn two_assets_with_overlapping_ranges() {
    let btc = coin("bitcoin", &[(1, 0.2, 3), (2, 0.4, 5), (3, -0.1, 2)]);
    let eth = coin("ethereum", &[(2, 0.1, 1), (4, -0.5, 7)]);
    let rows = align(&[btc, eth]);

    let dates: Vec<_> = rows.iter().map(|r| r.date).collect();
    assert_eq!(dates, [d(1), d(2), d(3), d(4)]);

    assert_eq!(rows[0].score("BTC"), Some(0.2));
    assert_eq!(rows[0].score("ETH"), None);
    assert_eq!(rows[1].score("BTC"), Some(0.4));
    assert_eq!(rows[1].count("ETH"), Some(1));
    assert_eq!(rows[2].labels().collect::<Vec<_>>(), ["BTC"]);
    assert_eq!(rows[3].score("BTC"), None);
    assert_eq!(rows[3].score("ETH"), Some(-0.5));
}

#[test]
fn rows_serialize_flat_without_absent_keys() {
    let rows = align(&[
        coin("bitcoin", &[(1, 0.25, 4)]),
        coin("solana", &[(2, -0.5, 1)]),
    ]);
    let json = serde_json::to_value(&rows).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {"date": "2024-03-01", "BTC": 0.25, "BTC_count": 4},
            {"date": "2024-03-02", "SOL": -0.5, "SOL_count": 1},
        ])
    );
}

#[test]
fn later_input_wins_on_shared_label() {
    let a = coin("bitcoin", &[(1, 0.1, 1)]);
    let b = coin("ethereum", &[(1, 0.9, 9)]);
    let rows = align_with(&[a, b], |_| "X".to_string());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].score("X"), Some(0.9));
    assert_eq!(rows[0].count("X"), Some(9));
}

#[test]
fn empty_input_yields_no_rows() {
    assert!(align(&[]).is_empty());
    assert!(align(&[coin("bitcoin", &[])]).is_empty());
}

fn arb_coin(id: &'static str) -> impl Strategy<Value = CoinHeatmapData> {
    proptest::collection::btree_set(0u64..60, 0..20).prop_map(move |offsets| CoinHeatmapData {
        asset_id: AssetId::new(id).unwrap(),
        days: offsets
            .into_iter()
            .map(|o| DayScore {
                date: d(1).checked_add_days(Days::new(o)).unwrap(),
                score: 0.0,
                article_count: u32::try_from(o).unwrap(),
            })
            .collect(),
    })
}

proptest! {
    #[test]
    fn every_input_date_appears_exactly_once(
        a in arb_coin("bitcoin"),
        b in arb_coin("ripple"),
        c in arb_coin("dogecoin"),
    ) {
        let input = vec![a, b, c];
        let rows = align(&input);

        let expected: BTreeSet<NaiveDate> =
            input.iter().flat_map(|s| s.days.iter().map(|x| x.date)).collect();
        let got: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
        prop_assert_eq!(got, expected.into_iter().collect::<Vec<_>>());

        for row in &rows {
            for s in &input {
                let present = s.days.iter().any(|x| x.date == row.date);
                prop_assert_eq!(row.score(&s.asset_id.label()).is_some(), present);
            }
        }

        prop_assert_eq!(align(&input), rows);
    }
}
