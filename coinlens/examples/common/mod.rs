use std::sync::Arc;

use coinlens_core::MarketConnector;

/// Backend connector when `COINLENS_API_URL` is set, fixtures otherwise.
#[must_use]
pub fn get_connector() -> Arc<dyn MarketConnector> {
    match std::env::var("COINLENS_API_URL") {
        Ok(url) => {
            let mut b = coinlens_http::HttpConnector::builder().base_url(url);
            if let Ok(token) = std::env::var("COINLENS_API_TOKEN") {
                b = b.bearer_token(token);
            }
            match b.build() {
                Ok(c) => Arc::new(c),
                Err(e) => {
                    eprintln!("--- ({e}; falling back to mock connector) ---");
                    Arc::new(coinlens_mock::MockConnector::new())
                }
            }
        }
        Err(_) => {
            println!("--- (Using Mock Connector) ---");
            Arc::new(coinlens_mock::MockConnector::new())
        }
    }
}

/// Logging controlled by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
