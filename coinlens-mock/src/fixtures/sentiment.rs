use coinlens_core::{AssetId, SentimentSummary, Trend};

pub fn by_id(id: &AssetId) -> Option<SentimentSummary> {
    let (score, trend, article_count, bull, bear) = match id.as_str() {
        "bitcoin" => (
            0.42,
            Trend::Improving,
            25,
            Some("Spot ETF inflows hit a monthly high"),
            Some("Miners sell into the rally"),
        ),
        "ethereum" => (
            0.05,
            Trend::Flat,
            18,
            Some("Layer-2 fees drop after upgrade"),
            Some("Staking withdrawals climb"),
        ),
        "ripple" => (-0.22, Trend::Declining, 9, None, Some("Appeal delays ruling")),
        "solana" => (
            0.18,
            Trend::Improving,
            12,
            Some("DEX volume overtakes rivals"),
            None,
        ),
        "dogecoin" => (-0.4, Trend::Declining, 7, None, Some("Whale wallets distribute")),
        _ => return None,
    };
    Some(SentimentSummary {
        asset_id: id.clone(),
        score,
        trend,
        article_count,
        top_bullish: bull.map(str::to_string),
        top_bearish: bear.map(str::to_string),
    })
}
