use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use coinlens_core::connector::{NewsProvider, PriceProvider};
use coinlens_core::{AssetSet, CoinlensError, MarketConnector, NewsArticle, NewsRequest, PricePoint};

/// Wraps a connector and counts upstream price/news calls.
pub struct Counting {
    inner: Arc<dyn MarketConnector>,
    pub count: Arc<AtomicUsize>,
}

impl Counting {
    pub fn new(inner: Arc<dyn MarketConnector>) -> (Arc<dyn MarketConnector>, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let me = Self {
            inner,
            count: count.clone(),
        };
        (Arc::new(me), count)
    }
}

#[async_trait::async_trait]
impl MarketConnector for Counting {
    fn name(&self) -> &'static str {
        "counting"
    }
    fn vendor(&self) -> &'static str {
        "test"
    }
    fn as_price_provider(&self) -> Option<&dyn PriceProvider> {
        Some(self as &dyn PriceProvider)
    }
    fn as_news_provider(&self) -> Option<&dyn NewsProvider> {
        Some(self as &dyn NewsProvider)
    }
}

#[async_trait::async_trait]
impl PriceProvider for Counting {
    async fn prices(&self, assets: &AssetSet) -> Result<Vec<PricePoint>, CoinlensError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.inner.as_price_provider().unwrap().prices(assets).await
    }
}

#[async_trait::async_trait]
impl NewsProvider for Counting {
    async fn news(&self, req: &NewsRequest) -> Result<Vec<NewsArticle>, CoinlensError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.inner.as_news_provider().unwrap().news(req).await
    }
}
