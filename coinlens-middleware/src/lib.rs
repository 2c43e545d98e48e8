//! coinlens-middleware
//!
//! Connector wrappers applied through [`ConnectorBuilder`]. The only layer
//! today is a per-capability TTL cache that also coalesces identical
//! in-flight requests, so a burst of polls for the same key costs one
//! upstream call.
#![warn(missing_docs)]

mod builder;
mod cache;

pub use crate::builder::ConnectorBuilder;
pub use crate::cache::{CacheMiddleware, CachingConnector};
