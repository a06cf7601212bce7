//! congress.gov API transport.
//!
//! One GET per call: attaches the API key and `format=json`, returns the parsed
//! JSON payload or a classified [`TransportError`].
//!
//! ### Specification
//!
//! - **Endpoint**: `{base_url}{endpoint}`, e.g. `https://api.congress.gov/v3/bill/118/hr/9775`
//! - **Authentication**: `api_key` query parameter. Never logged.
//! - **Classification**: 404 → `NotFound`, other non-success → `Http` with the
//!   upstream message, timeout → `Timeout`, connect/IO → `Network`, bad body → `Decode`.

pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use error::TransportError;

use std::time::Duration;

use async_trait::async_trait;
use legis_core::AppConfig;
use reqwest::header;
use serde_json::Value;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "legis/0.1";

/// Default base URL, including the version prefix.
const DEFAULT_BASE_URL: &str = "https://api.congress.gov/v3";

/// Upstream GET primitive.
///
/// `endpoint` is a path relative to the versioned base URL (`/bill/118/hr/1`).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value, TransportError>;
}

/// HTTP transport configuration.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// API key; `None` makes every call fail with `MissingApiKey`.
    pub api_key: Option<String>,
    /// Base URL (default: https://api.congress.gov/v3).
    pub base_url: String,
    /// Request timeout (default: 15s).
    pub timeout: Duration,
    /// User-agent string (default: legis/0.x).
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&AppConfig> for TransportConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            api_key: config.api_key.clone().filter(|key| !key.is_empty()),
            base_url: config.base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// reqwest-backed [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    config: TransportConfig,
}

impl HttpTransport {
    /// Create a new transport with the given configuration.
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| TransportError::Network { endpoint: String::new(), message: e.to_string() })?;

        if config.api_key.is_none() {
            tracing::warn!("no upstream API key configured; every request will fail");
        }

        Ok(Self { http, config })
    }

    fn classify(&self, endpoint: &str, err: &reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout { endpoint: endpoint.to_string(), timeout_ms: self.config.timeout.as_millis() as u64 }
        } else {
            TransportError::Network { endpoint: endpoint.to_string(), message: err.to_string() }
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value, TransportError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            tracing::error!(endpoint, "API key missing, request not sent");
            return Err(TransportError::MissingApiKey);
        };

        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);

        let mut query: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        if !params.iter().any(|(k, _)| *k == "format") {
            query.push(("format", "json"));
        }

        tracing::debug!(endpoint, ?params, "congress.gov request");

        let response = self
            .http
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .query(&query)
            .query(&[("api_key", api_key)])
            .send()
            .await
            .map_err(|e| self.classify(endpoint, &e))?;

        let status = response.status();
        tracing::debug!(endpoint, %status, "congress.gov response");

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(TransportError::not_found(endpoint));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = TransportError::Http {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message: error::upstream_message(&body),
            };
            tracing::warn!(error = %err, "upstream request failed");
            return Err(err);
        }

        let bytes = response.bytes().await.map_err(|e| self.classify(endpoint, &e))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| TransportError::Decode { endpoint: endpoint.to_string(), message: e.to_string() })
    }
}
