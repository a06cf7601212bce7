//! Cache-related MCP tools.
//!
//! This module provides tools for maintaining the memo cache.

pub mod purge;

pub use purge::{CachePurgeParams, purge_impl};
