use std::sync::Arc;
use std::time::Duration;

use coinlens_core::{CacheConfig, CoinlensError, MarketConnector};
use coinlens_middleware::ConnectorBuilder;

use crate::HttpConnector;
use crate::adapter::{ReqwestTransport, UnauthorizedHook};

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";
/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configures the `reqwest` transport behind an [`HttpConnector`].
pub struct HttpConnectorBuilder {
    base_url: String,
    bearer_token: Option<String>,
    timeout: Duration,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl Default for HttpConnectorBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            bearer_token: None,
            timeout: DEFAULT_TIMEOUT,
            on_unauthorized: None,
        }
    }
}

impl HttpConnectorBuilder {
    /// API root including the version prefix, e.g. `https://host/api/v1`.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Session token sent as `Authorization: Bearer <token>`.
    ///
    /// The token is owned by the caller's auth layer; it is never refreshed here.
    #[must_use]
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Per-request timeout enforced by the HTTP client.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Hook invoked whenever the backend answers 401.
    #[must_use]
    pub fn on_unauthorized<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_unauthorized = Some(Arc::new(hook));
        self
    }

    /// Build the raw connector.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the base URL is not a valid http(s) URL.
    pub fn build(self) -> Result<HttpConnector, CoinlensError> {
        let transport = ReqwestTransport::new(
            &self.base_url,
            self.timeout,
            self.bearer_token,
            self.on_unauthorized,
        )?;
        Ok(HttpConnector::with_transport(Arc::new(transport)))
    }

    /// Build the raw connector and hand it to a middleware builder.
    ///
    /// # Errors
    /// Same as [`HttpConnectorBuilder::build`].
    pub fn layered(self) -> Result<ConnectorBuilder, CoinlensError> {
        let raw: Arc<dyn MarketConnector> = Arc::new(self.build()?);
        Ok(ConnectorBuilder::new(raw))
    }

    /// Build a connector wrapped in the caching layer with `cfg`.
    ///
    /// # Errors
    /// Same as [`HttpConnectorBuilder::build`].
    pub fn cached(self, cfg: &CacheConfig) -> Result<Arc<dyn MarketConnector>, CoinlensError> {
        self.layered()?.with_cache(cfg).build()
    }
}

impl HttpConnector {
    /// Returns a builder with the default base URL and timeout.
    #[must_use]
    pub fn builder() -> HttpConnectorBuilder {
        HttpConnectorBuilder::default()
    }
}
