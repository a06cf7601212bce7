//! SQLite-backed memo cache for upstream fetch results.
//!
//! Every fetcher in the aggregation layer is wrapped with [`CacheDb::memoize`],
//! keyed by function name plus arguments. It supports:
//!
//! - Result caching with per-resource TTLs, errors included
//! - Single-flight computation for concurrent misses on one key
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - Multiple purge strategies (expiry, function, LRU)

pub mod connection;
pub mod hash;
mod inflight;
pub mod memo;
pub mod migrations;
pub mod ttl;

pub use crate::Error;

pub use connection::CacheDb;
pub use ttl::ResourceClass;
