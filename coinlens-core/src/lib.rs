//! coinlens-core
//!
//! Core traits and analytics shared across the coinlens workspace.
//!
//! - `types`: re-exported data types from `coinlens-types`.
//! - `connector`: the `MarketConnector` trait and capability provider traits.
//! - `analytics`: correlation, date alignment, normalization, and classification.
//! - `task`: owned handles for cooperatively stopped background tasks.
//!
//! Async runtime (Tokio)
//! ---------------------
//! `task::TaskHandle` wraps `tokio::task::JoinHandle<()>` and a
//! `tokio::sync::oneshot::Sender<()>` for cooperative shutdown, so code that
//! spawns pollers must run under a Tokio 1.x runtime.
#![warn(missing_docs)]

/// Pure analytics over price and sentiment series.
pub mod analytics;
/// Connector capability traits and the primary `MarketConnector` interface.
pub mod connector;
/// Middleware trait implemented by connector wrappers.
pub mod middleware;
/// Background task handles with graceful stop.
pub mod task;
pub mod types;

pub use connector::MarketConnector;
pub use middleware::Middleware;
pub use task::TaskHandle;
pub use types::*;
