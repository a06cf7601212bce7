//! cache_purge tool implementation.
//!
//! Purges memo cache entries by expiry, by function, or by count.

use legis_core::{CacheDb, Error};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Parameters for the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeParams {
    /// Purge entries whose TTL has passed.
    #[serde(default)]
    pub expired: bool,

    /// Purge every entry of one cached call, e.g. "full_bill" or "member_roster".
    pub function: Option<String>,

    /// Keep only the newest N entries (LRU purge).
    pub max_entries: Option<usize>,
}

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of entries deleted.
    pub deleted: u64,

    /// Entries left afterwards.
    pub remaining: u64,
}

/// Implementation of the cache_purge tool.
pub async fn purge_impl(cache: &CacheDb, params: CachePurgeParams) -> Result<CallToolResult, McpError> {
    let function = params.function.as_deref().map(str::trim).filter(|f| !f.is_empty());
    if !params.expired && function.is_none() && params.max_entries.is_none() {
        return Err(
            Error::InvalidInput("At least one of expired, function, or max_entries must be specified".to_string()).into(),
        );
    }

    let mut deleted_total = 0u64;

    if params.expired {
        deleted_total += cache.purge_expired().await?;
    }

    if let Some(function) = function {
        deleted_total += cache.purge_function(function).await?;
    }

    if let Some(max_entries) = params.max_entries {
        deleted_total += cache.purge_lru(max_entries).await?;
    }

    let remaining = cache.entry_count().await?;
    tracing::info!(deleted = deleted_total, remaining, "cache purged");

    json_result(&CachePurgeOutput { deleted: deleted_total, remaining })
}
