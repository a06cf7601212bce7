//! Unified error types for legis.
//!
//! Upstream failures are classified into a closed set of [`ErrorKind`]s as
//! soon as they are observed. Everything downstream (the aggregation layer,
//! the tool surface) switches on the kind and never on message text.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::rusqlite;

use crate::config::ConfigError;

/// Category of a failed upstream fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing API key or base URL. Never retried.
    Config,
    /// The upstream call exceeded its timeout.
    Timeout,
    /// Connection-level failure before a response arrived.
    Network,
    /// The upstream answered 404.
    NotFound,
    /// Any other non-success upstream status.
    Upstream,
    /// The upstream body was not valid JSON.
    Decode,
    /// A 200 response without the expected envelope.
    Shape,
    /// The caller supplied an identifier outside the allowed tables.
    InvalidInput,
}

impl ErrorKind {
    /// Stable uppercase code used as the message prefix.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Config => "CONFIG_ERROR",
            ErrorKind::Timeout => "UPSTREAM_TIMEOUT",
            ErrorKind::Network => "UPSTREAM_NETWORK",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Upstream => "UPSTREAM_HTTP",
            ErrorKind::Decode => "UPSTREAM_DECODE",
            ErrorKind::Shape => "UPSTREAM_SHAPE",
            ErrorKind::InvalidInput => "INVALID_INPUT",
        }
    }

    /// Shape errors are reported to callers exactly like a missing entity.
    pub fn is_not_found(self) -> bool {
        matches!(self, ErrorKind::NotFound | ErrorKind::Shape)
    }

    /// Failures that may succeed on a later attempt.
    pub fn is_transient(self) -> bool {
        matches!(self, ErrorKind::Timeout | ErrorKind::Network | ErrorKind::Upstream)
    }
}

/// A classified fetch failure.
///
/// This is a plain value: detail and composite fetchers return it inside a
/// `Result`, and the cache stores it like any other result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema, thiserror::Error)]
#[error("{}: {}", .kind.code(), .message)]
pub struct FetchError {
    pub kind: ErrorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, status: None, message: message.into() }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn shape(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Shape, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    /// Attach the upstream HTTP status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

/// Unified error types for the legis workspace.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., malformed bioguide id).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Classified upstream failure.
    #[error("{0}")]
    Fetch(FetchError),

    /// Configuration could not be loaded or is invalid.
    #[error("CONFIG_ERROR: {0}")]
    Config(#[from] ConfigError),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// A cached value could not be encoded or decoded.
    #[error("CACHE_ERROR: serialization failed: {0}")]
    Serialization(String),
}

impl From<FetchError> for Error {
    fn from(err: FetchError) -> Self {
        match err.kind {
            ErrorKind::InvalidInput => Error::InvalidInput(err.message),
            _ => Error::Fetch(err),
        }
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Protocol error code for a fetch category.
fn fetch_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::InvalidInput => -32602,
        ErrorKind::NotFound | ErrorKind::Shape => -32001,
        ErrorKind::Config => -32003,
        ErrorKind::Timeout => -32006,
        ErrorKind::Network => -32007,
        ErrorKind::Upstream => -32008,
        ErrorKind::Decode => -32009,
    }
}

impl From<FetchError> for McpError {
    fn from(err: FetchError) -> Self {
        Error::from(err).into()
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::Fetch(fetch) => (fetch_code(fetch.kind), fetch.to_string()),
            Error::Config(e) => (-32003, e.to_string()),
            Error::Database(e) => (-32002, e.to_string()),
            Error::MigrationFailed(msg) => (-32002, msg.clone()),
            Error::Serialization(msg) => (-32002, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::not_found("bill 118/hr/1");
        assert_eq!(err.to_string(), "NOT_FOUND: bill 118/hr/1");
    }

    #[test]
    fn test_shape_counts_as_not_found() {
        assert!(ErrorKind::Shape.is_not_found());
        assert!(ErrorKind::NotFound.is_not_found());
        assert!(!ErrorKind::Timeout.is_not_found());
        assert!(ErrorKind::Timeout.is_transient());
        assert!(!ErrorKind::Config.is_transient());
    }

    #[test]
    fn test_fetch_error_round_trips_through_serde() {
        let err = FetchError::new(ErrorKind::Upstream, "boom").with_status(503);
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"upstream\""));
        let back: FetchError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn test_invalid_input_fetch_error_becomes_invalid_input() {
        let err: Error = FetchError::invalid_input("bad type").into();
        assert!(matches!(err, Error::InvalidInput(ref msg) if msg == "bad type"));
    }

    #[test]
    fn test_error_to_mcp_error() {
        let mcp_err: McpError = FetchError::shape("no envelope").into();
        assert_eq!(mcp_err.code.0, -32001);

        let mcp_err: McpError = Error::InvalidInput("bad id".into()).into();
        assert_eq!(mcp_err.code.0, -32602);

        let mcp_err: McpError = FetchError::new(ErrorKind::Config, "API Key missing").into();
        assert_eq!(mcp_err.code.0, -32003);
    }
}
