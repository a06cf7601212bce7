//! MCP tool implementations.
//!
//! This module contains all tools exposed by the legis server. Each tool
//! validates its parameters, calls the shared [`CongressService`] and returns
//! the result as pretty-printed JSON text.
//!
//! [`CongressService`]: legis_client::CongressService

pub mod bills;
pub mod cache;
pub mod committees;
pub mod members;
pub mod nominations;

use legis_core::Error;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

/// Page size used when `limit` is missing or outside 1..=100.
const DEFAULT_LIMIT: u32 = 20;

pub(crate) fn page_limit(limit: Option<u32>) -> u32 {
    limit.filter(|n| (1..=100).contains(n)).unwrap_or(DEFAULT_LIMIT)
}

/// Serialize `output` as the tool's text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output).map_err(Error::from)?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Bioguide ids are a letter and six digits, e.g. `P000197`.
pub(crate) fn bioguide_id(raw: &str) -> Result<String, Error> {
    legis_client::bioguide_id(raw).map_err(Error::from)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use legis_client::CongressService;
    use legis_client::transport::mock::MockTransport;
    use legis_core::{AppConfig, CacheDb};
    use rmcp::model::CallToolResult;
    use serde_json::Value;

    pub async fn service(mock: MockTransport) -> (CongressService, Arc<MockTransport>) {
        let mock = Arc::new(mock);
        let cache = CacheDb::open_in_memory().await.unwrap();
        (CongressService::new(mock.clone(), cache, &AppConfig::default()), mock)
    }

    /// Parse the JSON text content of a tool result.
    pub fn output(result: &CallToolResult) -> Value {
        let content = serde_json::to_value(&result.content[0]).unwrap();
        let text = content.get("text").and_then(|v| v.as_str()).expect("Expected text field in content");
        serde_json::from_str(text).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_limit() {
        assert_eq!(page_limit(None), 20);
        assert_eq!(page_limit(Some(0)), 20);
        assert_eq!(page_limit(Some(1)), 1);
        assert_eq!(page_limit(Some(100)), 100);
        assert_eq!(page_limit(Some(101)), 20);
    }

    #[test]
    fn test_bioguide_id() {
        assert_eq!(bioguide_id(" p000197 ").unwrap(), "P000197");
        assert!(matches!(bioguide_id("P00019"), Err(Error::InvalidInput(_))));
        assert!(bioguide_id("P0001970").is_err());
        assert!(matches!(bioguide_id("../BILL"), Err(Error::InvalidInput(_))));
        assert!(bioguide_id("P00019?").is_err());
    }
}
