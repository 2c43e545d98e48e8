mod common;

use coinlens::view::CorrelationBadge;
use coinlens::{Dashboard, PriceTicker};
use coinlens_core::analytics::NormMethod;
use coinlens_core::{AssetId, AssetSet, CacheConfig, HeatmapWindow, NewsRequest};
use common::{get_connector, init_tracing};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // 1. Build the dashboard context with the TTL cache in front of the connector.
    let dash = Dashboard::builder()
        .connector(get_connector())
        .cache(CacheConfig::default())
        .build()?;

    // 2. Watch prices; the first tick fetches immediately.
    let coins = AssetSet::parse("bitcoin,ethereum,solana,dogecoin")?;
    let _watch = dash.watch_prices(&coins);
    dash.fetch_prices(&coins).await.ok();
    for t in dash.price_tickers(&coins) {
        let PriceTicker {
            ticker,
            price,
            change_24h,
            market_cap,
            ..
        } = t;
        println!("{ticker:<5} {price:>14} {change_24h:>8} {market_cap:>10}");
    }

    // 3. Sentiment cards and a date-aligned heatmap chart.
    dash.fetch_sentiment(&coins).await.ok();
    for card in dash.sentiment_cards(&coins) {
        println!(
            "{:<5} {:<13} {} ({:?}, {} articles)",
            card.ticker,
            card.label,
            card.score_text(),
            card.direction,
            card.article_count
        );
    }
    let rows = dash.sentiment_chart(&coins, HeatmapWindow::Week).await?;
    for row in &rows {
        println!("{}", serde_json::to_string(row)?);
    }

    // 4. Compare normalized 30-day histories and classify their correlations.
    let ids = ["bitcoin", "ethereum", "solana"]
        .into_iter()
        .map(AssetId::new)
        .collect::<Result<Vec<_>, _>>()?;
    let cmp = dash.compare(&ids, 30, NormMethod::MinMax).await?;
    for s in &cmp.series {
        println!(
            "{:<9} change {:>8}",
            s.asset_id.label(),
            s.price_change_pct
                .map_or_else(|| "—".to_string(), |p| format!("{p:+.2}%"))
        );
    }
    for c in &cmp.correlations {
        let badge = CorrelationBadge::from(c.correlation);
        println!("{} / {}: {} {}", c.a, c.b, badge.value_text(), badge.text);
    }

    // 5. Latest headlines for two symbols.
    let news = dash
        .fetch_news(&NewsRequest::new().coins(["BTC", "ETH"]).limit(5)?)
        .await?;
    for a in news {
        println!("[{}] {}", a.source, a.title);
    }

    Ok(())
}
