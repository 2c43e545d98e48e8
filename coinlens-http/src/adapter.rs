#[cfg(feature = "test-adapters")]
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use coinlens_core::CoinlensError;
use reqwest::StatusCode;
use serde_json::Value;
use url::Url;

/// Connector name used in transport-level errors.
pub(crate) const CONNECTOR: &str = "coinlens-http";

/// JSON transport abstraction (so we can inject mocks in tests).
///
/// `path` is relative to the API base (e.g. `"prices"`); query pairs are
/// appended as given.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET and decode the body as JSON.
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, CoinlensError>;

    /// Issue a POST with a JSON body and decode the response as JSON.
    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, CoinlensError>;
}

/// Callback invoked when the backend rejects the session credential.
pub type UnauthorizedHook = std::sync::Arc<dyn Fn() + Send + Sync>;

/// Production transport backed by `reqwest`.
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
    bearer_token: Option<String>,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl ReqwestTransport {
    /// Build a transport for `base_url` with a per-request `timeout`.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unparsable or non-HTTP base URL, and
    /// `Other` if the HTTP client cannot be constructed.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        bearer_token: Option<String>,
        on_unauthorized: Option<UnauthorizedHook>,
    ) -> Result<Self, CoinlensError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| CoinlensError::InvalidArg(format!("invalid base url '{base_url}': {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(CoinlensError::InvalidArg(format!(
                "base url must be http(s), got '{}'",
                base_url.scheme()
            )));
        }
        // `Url::join` replaces the last segment unless the path ends with '/'.
        if !base_url.path().ends_with('/') {
            let p = format!("{}/", base_url.path());
            base_url.set_path(&p);
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoinlensError::Other(format!("http client: {e}")))?;
        Ok(Self {
            client,
            base_url,
            bearer_token: bearer_token.filter(|t| !t.trim().is_empty()),
            on_unauthorized,
        })
    }

    fn url(&self, path: &str) -> Result<Url, CoinlensError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| CoinlensError::InvalidArg(format!("invalid path '{path}': {e}")))
    }

    fn map_send_error(e: &reqwest::Error, path: &str) -> CoinlensError {
        if e.is_timeout() {
            CoinlensError::provider_timeout(CONNECTOR, path)
        } else {
            CoinlensError::connector(CONNECTOR, e.to_string())
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "coinlens_http::send", skip_all, fields(path = %path), err)
    )]
    async fn send(&self, req: reqwest::RequestBuilder, path: &str) -> Result<Value, CoinlensError> {
        let req = match &self.bearer_token {
            Some(token) => req.bearer_auth(token),
            None => {
                #[cfg(feature = "tracing")]
                tracing::warn!(path, "no bearer token configured; sending without Authorization");
                req
            }
        };

        let resp = req
            .send()
            .await
            .map_err(|e| Self::map_send_error(&e, path))?;
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED {
            if let Some(hook) = &self.on_unauthorized {
                hook();
            }
            return Err(CoinlensError::Unauthorized);
        }

        if !status.is_success() {
            let detail = resp
                .json::<Value>()
                .await
                .ok()
                .and_then(|v| v.get("detail").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                });
            return Err(CoinlensError::http(status.as_u16(), detail));
        }

        resp.json::<Value>()
            .await
            .map_err(|e| CoinlensError::Data(format!("invalid JSON from {path}: {e}")))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, CoinlensError> {
        let req = self.client.get(self.url(path)?).query(query);
        self.send(req, path).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, CoinlensError> {
        let req = self.client.post(self.url(path)?).json(body);
        self.send(req, path).await
    }
}

/* -------- Test-only lightweight transport constructor ------- */

#[cfg(feature = "test-adapters")]
impl dyn Transport {
    /// Build a `Transport` from a closure receiving the path and owned query
    /// pairs (tests only). POST requests see the body under the `"$body"` key.
    pub fn from_fn<F>(f: F) -> Arc<dyn Transport>
    where
        F: Send + Sync + 'static + Fn(&str, Vec<(String, String)>) -> Result<Value, CoinlensError>,
    {
        struct FnTransport<F>(F);
        #[async_trait]
        impl<F> Transport for FnTransport<F>
        where
            F: Send
                + Sync
                + 'static
                + Fn(&str, Vec<(String, String)>) -> Result<Value, CoinlensError>,
        {
            async fn get_json(
                &self,
                path: &str,
                query: &[(&str, String)],
            ) -> Result<Value, CoinlensError> {
                let q = query
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), v.clone()))
                    .collect();
                (self.0)(path, q)
            }

            async fn post_json(&self, path: &str, body: &Value) -> Result<Value, CoinlensError> {
                (self.0)(path, vec![("$body".to_string(), body.to_string())])
            }
        }
        Arc::new(FnTransport(f))
    }
}
