//! Upstream transport error types.

use legis_core::{ErrorKind, FetchError};

/// Errors from a single upstream GET.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// No API key configured; the request was never sent.
    #[error("API Key missing.")]
    MissingApiKey,

    /// Request exceeded the configured timeout.
    #[error("timeout ({timeout_ms}ms) for {endpoint}")]
    Timeout { endpoint: String, timeout_ms: u64 },

    /// Connection-level failure.
    #[error("network error for {endpoint}: {message}")]
    Network { endpoint: String, message: String },

    /// Upstream answered 404.
    #[error("API HTTP 404 for {endpoint}")]
    NotFound { endpoint: String },

    /// Any other non-success status.
    #[error("API HTTP {status} for {endpoint}: {message}")]
    Http { endpoint: String, status: u16, message: String },

    /// Response body was not JSON.
    #[error("invalid JSON for {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

impl TransportError {
    pub fn not_found(endpoint: impl Into<String>) -> Self {
        TransportError::NotFound { endpoint: endpoint.into() }
    }

    /// Category used everywhere downstream of the transport.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransportError::MissingApiKey => ErrorKind::Config,
            TransportError::Timeout { .. } => ErrorKind::Timeout,
            TransportError::Network { .. } => ErrorKind::Network,
            TransportError::NotFound { .. } => ErrorKind::NotFound,
            TransportError::Http { .. } => ErrorKind::Upstream,
            TransportError::Decode { .. } => ErrorKind::Decode,
        }
    }

    /// HTTP status, when a response arrived.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::NotFound { .. } => Some(404),
            TransportError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<TransportError> for FetchError {
    fn from(err: TransportError) -> Self {
        let fetch = FetchError::new(err.kind(), err.to_string());
        match err.status() {
            Some(status) => fetch.with_status(status),
            None => fetch,
        }
    }
}

/// Pull a human-readable message out of an upstream error body.
///
/// The API nests it as `error.message` or puts it at top-level `message`;
/// anything else falls back to the raw body text.
pub(crate) fn upstream_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .filter(|m| !m.is_empty())
                .or_else(|| v.get("message").and_then(|m| m.as_str()))
        })
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(TransportError::MissingApiKey.to_string(), "API Key missing.");

        let err = TransportError::Http { endpoint: "/bill".into(), status: 500, message: "boom".into() };
        assert_eq!(err.to_string(), "API HTTP 500 for /bill: boom");
    }

    #[test]
    fn test_into_fetch_error_keeps_kind_and_status() {
        let fetch: FetchError = TransportError::not_found("/bill/118/hr/1").into();
        assert_eq!(fetch.kind, ErrorKind::NotFound);
        assert_eq!(fetch.status, Some(404));

        let fetch: FetchError = TransportError::MissingApiKey.into();
        assert_eq!(fetch.kind, ErrorKind::Config);
        assert!(fetch.message.contains("API Key missing"));
        assert_eq!(fetch.status, None);
    }

    #[test]
    fn test_upstream_message_extraction() {
        assert_eq!(upstream_message(r#"{"error":{"message":"bad key"}}"#), "bad key");
        assert_eq!(upstream_message(r#"{"message":"slow down"}"#), "slow down");
        assert_eq!(upstream_message("gateway exploded\n"), "gateway exploded");
    }
}
