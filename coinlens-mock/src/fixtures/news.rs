use coinlens_core::{NewsArticle, NewsRequest};

use super::as_of;

const ARTICLES: &[(&str, &str, i64, &[&str])] = &[
    ("Bitcoin reclaims $65k as ETF demand returns", "CoinDesk", 0, &["BTC"]),
    ("Ethereum gas hits yearly low", "The Block", 1_800, &["ETH"]),
    ("XRP slides on renewed legal uncertainty", "Decrypt", 3_600, &["XRP"]),
    ("Solana and Ethereum DEX volumes diverge", "Blockworks", 7_200, &["SOL", "ETH"]),
    ("Dogecoin whales move 400M DOGE", "CoinTelegraph", 10_800, &["DOGE"]),
    ("Crypto market cap steadies above $2.4T", "CoinDesk", 14_400, &[]),
];

/// Most recent first, filtered by symbol when the request has a filter.
pub fn matching(req: &NewsRequest) -> Vec<NewsArticle> {
    let filter = req.coin_filter();
    let now = as_of().timestamp();
    ARTICLES
        .iter()
        .filter(|(_, _, _, coins)| {
            filter.is_empty() || coins.iter().any(|c| filter.iter().any(|f| f == c))
        })
        .take(usize::try_from(req.page_size()).unwrap_or(usize::MAX))
        .enumerate()
        .map(|(i, (title, source, age, coins))| NewsArticle {
            title: (*title).to_string(),
            source: (*source).to_string(),
            url: format!("https://news.example/{i}"),
            published_at: now - age,
            image_url: String::new(),
            related_coins: coins.iter().map(|c| (*c).to_string()).collect(),
        })
        .collect()
}
