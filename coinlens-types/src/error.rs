use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the coinlens workspace.
///
/// This wraps capability mismatches, argument validation errors, response shape
/// mismatches, transport failures, and timeouts.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CoinlensError {
    /// The requested capability is not implemented by the target connector.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// A capability string describing what was requested (e.g. "prices").
        capability: String,
    },

    /// A response did not match the expected schema or violated a data invariant.
    #[error("data issue: {0}")]
    Data(String),

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// An individual connector failed below the HTTP layer (DNS, TLS, reset, decode).
    #[error("{connector} failed: {msg}")]
    Connector {
        /// Connector name that failed.
        connector: String,
        /// Human-readable error message.
        msg: String,
    },

    /// The backend answered with a non-success status.
    ///
    /// `detail` carries the conventional `{ "detail": "..." }` body when present,
    /// otherwise the canonical reason phrase for the status.
    #[error("http {status}: {detail}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the error body.
        detail: String,
    },

    /// The backend rejected the session credential (HTTP 401).
    #[error("unauthorized: session is no longer valid")]
    Unauthorized,

    /// A resource or asset could not be found.
    #[error("not found: {what}")]
    NotFound {
        /// Description of missing resource, e.g. "price history for bitcoin".
        what: String,
    },

    /// An individual provider call exceeded the configured timeout.
    #[error("provider timed out: {capability} via {connector}")]
    ProviderTimeout {
        /// Connector name that timed out.
        connector: String,
        /// Capability label (e.g. "prices", "news").
        capability: String,
    },

    /// A store fetch exceeded the configured request deadline.
    #[error("request timed out: {capability}")]
    RequestTimeout {
        /// Capability label for which the request timed out.
        capability: String,
    },

    /// Required configuration or credential is missing.
    #[error("missing configuration: {0}")]
    MissingConfig(String),

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl CoinlensError {
    /// Helper: build an `Unsupported` error for a capability string.
    #[must_use]
    pub fn unsupported(cap: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: cap.into(),
        }
    }

    /// Helper: build a `Connector` error with the connector name and message.
    pub fn connector(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connector {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build an `Http` error from a status code and detail message.
    pub fn http(status: u16, detail: impl Into<String>) -> Self {
        Self::Http {
            status,
            detail: detail.into(),
        }
    }

    /// Helper: build a `ProviderTimeout` error.
    pub fn provider_timeout(connector: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::ProviderTimeout {
            connector: connector.into(),
            capability: capability.into(),
        }
    }

    /// Helper: build a `RequestTimeout` error.
    #[must_use]
    pub fn request_timeout(capability: impl Into<String>) -> Self {
        Self::RequestTimeout {
            capability: capability.into(),
        }
    }

    /// Message suitable for an inline error affordance next to stale data.
    ///
    /// Prefers the backend-provided `detail` or connector message. Returns `None`
    /// when the error carries nothing more specific than its variant, so callers
    /// can substitute a generic fallback.
    #[must_use]
    pub fn user_message(&self) -> Option<String> {
        let msg = match self {
            Self::Http { detail, .. } => detail.trim(),
            Self::Connector { msg, .. } => msg.trim(),
            Self::Data(msg) | Self::Other(msg) | Self::InvalidArg(msg) => msg.trim(),
            Self::Unauthorized => return Some("Your session has expired".to_string()),
            Self::NotFound { what } => return Some(format!("No data for {what}")),
            Self::RequestTimeout { .. } | Self::ProviderTimeout { .. } => {
                return Some("The request timed out".to_string());
            }
            Self::Unsupported { .. } | Self::MissingConfig(_) => return None,
        };
        if msg.is_empty() {
            None
        } else {
            Some(msg.to_string())
        }
    }

    /// Returns true if the failure is worth retrying on the next poll.
    ///
    /// Capability absence, invalid arguments, and rejected credentials will fail
    /// the same way again; everything else may be transient.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        !matches!(
            self,
            Self::Unsupported { .. }
                | Self::InvalidArg(_)
                | Self::Unauthorized
                | Self::MissingConfig(_)
        )
    }
}
