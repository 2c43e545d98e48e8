use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use coinlens_core::connector::{
    HeatmapProvider, HistoryProvider, MarketConnector, NewsProvider, PriceProvider,
    SentimentProvider,
};
use coinlens_core::{
    AssetId, AssetSet, Capability, CoinHeatmapData, CoinlensError, HeatmapWindow, NewsArticle,
    NewsRequest, PriceHistory, PricePoint, SentimentSummary,
};

/// Instruction for how a call should behave.
#[derive(Clone, Debug)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(CoinlensError),
    /// Hang indefinitely (simulate a timeout).
    Hang,
    /// Sleep on the Tokio clock, then settle with the given result.
    Delayed(Duration, Result<T, CoinlensError>),
}

impl<T> MockBehavior<T> {
    async fn run(self) -> Result<T, CoinlensError> {
        match self {
            Self::Return(v) => Ok(v),
            Self::Fail(e) => Err(e),
            Self::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            Self::Delayed(d, r) => {
                tokio::time::sleep(d).await;
                r
            }
        }
    }
}

/// One-shot behaviors are consumed in FIFO order before the sticky default applies.
struct Rules<T> {
    queue: VecDeque<MockBehavior<T>>,
    sticky: Option<MockBehavior<T>>,
}

impl<T> Default for Rules<T> {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
            sticky: None,
        }
    }
}

impl<T: Clone> Rules<T> {
    fn next(&mut self) -> Option<MockBehavior<T>> {
        self.queue.pop_front().or_else(|| self.sticky.clone())
    }
}

#[derive(Default)]
struct InternalState {
    prices: Rules<Vec<PricePoint>>,
    history: Rules<PriceHistory>,
    sentiment: Rules<Vec<SentimentSummary>>,
    heatmap: Rules<Vec<CoinHeatmapData>>,
    news: Rules<Vec<NewsArticle>>,
    calls: HashMap<Capability, usize>,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

macro_rules! behavior_setters {
    ($field:ident, $ty:ty, $set:ident, $push:ident) => {
        #[doc = concat!("Set the default behavior for `", stringify!($field), "` calls.")]
        pub async fn $set(&self, behavior: MockBehavior<$ty>) {
            self.state.lock().await.$field.sticky = Some(behavior);
        }

        #[doc = concat!(
            "Queue a behavior for the next `", stringify!($field),
            "` call; queued behaviors run before the default."
        )]
        pub async fn $push(&self, behavior: MockBehavior<$ty>) {
            self.state.lock().await.$field.queue.push_back(behavior);
        }
    };
}

impl DynamicMockController {
    behavior_setters!(prices, Vec<PricePoint>, set_prices, push_prices);
    behavior_setters!(history, PriceHistory, set_history, push_history);
    behavior_setters!(sentiment, Vec<SentimentSummary>, set_sentiment, push_sentiment);
    behavior_setters!(heatmap, Vec<CoinHeatmapData>, set_heatmap, push_heatmap);
    behavior_setters!(news, Vec<NewsArticle>, set_news, push_news);

    /// Number of calls observed for a capability.
    pub async fn calls(&self, cap: Capability) -> usize {
        self.state.lock().await.calls.get(&cap).copied().unwrap_or(0)
    }

    /// Clear all configured behaviors and call counters.
    pub async fn clear_all_behaviors(&self) {
        *self.state.lock().await = InternalState::default();
    }
}

/// A connector that defers all behavior to an external controller.
///
/// A capability without any configured behavior answers `Unsupported`.
pub struct DynamicMockConnector {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockConnector {
    /// Create a new dynamic mock connector and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn MarketConnector>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn MarketConnector>, controller)
    }

    // Acquire the behavior without holding the lock across the call itself.
    async fn next<T: Clone>(
        &self,
        cap: Capability,
        pick: impl FnOnce(&mut InternalState) -> &mut Rules<T>,
    ) -> Result<T, CoinlensError> {
        let behavior = {
            let mut guard = self.state.lock().await;
            *guard.calls.entry(cap).or_default() += 1;
            pick(&mut guard).next()
        };
        match behavior {
            Some(b) => b.run().await,
            None => Err(CoinlensError::unsupported(cap.as_str())),
        }
    }
}

#[async_trait]
impl MarketConnector for DynamicMockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "DynamicMock"
    }

    fn as_price_provider(&self) -> Option<&dyn PriceProvider> {
        Some(self as &dyn PriceProvider)
    }
    fn as_history_provider(&self) -> Option<&dyn HistoryProvider> {
        Some(self as &dyn HistoryProvider)
    }
    fn as_sentiment_provider(&self) -> Option<&dyn SentimentProvider> {
        Some(self as &dyn SentimentProvider)
    }
    fn as_heatmap_provider(&self) -> Option<&dyn HeatmapProvider> {
        Some(self as &dyn HeatmapProvider)
    }
    fn as_news_provider(&self) -> Option<&dyn NewsProvider> {
        Some(self as &dyn NewsProvider)
    }
}

#[async_trait]
impl PriceProvider for DynamicMockConnector {
    async fn prices(&self, _assets: &AssetSet) -> Result<Vec<PricePoint>, CoinlensError> {
        self.next(Capability::Prices, |s| &mut s.prices).await
    }
}

#[async_trait]
impl HistoryProvider for DynamicMockConnector {
    async fn history(&self, _asset: &AssetId, _days: u32) -> Result<PriceHistory, CoinlensError> {
        self.next(Capability::History, |s| &mut s.history).await
    }
}

#[async_trait]
impl SentimentProvider for DynamicMockConnector {
    async fn sentiment_summary(
        &self,
        _assets: &AssetSet,
    ) -> Result<Vec<SentimentSummary>, CoinlensError> {
        self.next(Capability::SentimentSummary, |s| &mut s.sentiment)
            .await
    }
}

#[async_trait]
impl HeatmapProvider for DynamicMockConnector {
    async fn sentiment_heatmap(
        &self,
        _assets: &AssetSet,
        _window: HeatmapWindow,
    ) -> Result<Vec<CoinHeatmapData>, CoinlensError> {
        self.next(Capability::SentimentHeatmap, |s| &mut s.heatmap)
            .await
    }
}

#[async_trait]
impl NewsProvider for DynamicMockConnector {
    async fn news(&self, _req: &NewsRequest) -> Result<Vec<NewsArticle>, CoinlensError> {
        self.next(Capability::News, |s| &mut s.news).await
    }
}
