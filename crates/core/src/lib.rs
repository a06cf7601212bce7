//! Core types and shared functionality for legis.
//!
//! This crate provides:
//! - Memoizing cache with SQLite backend
//! - Unified error types and upstream failure categories
//! - Configuration structures and lookup tables

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheDb, ResourceClass};
pub use config::{AppConfig, Catalog, ConfigError};
pub use error::{Error, ErrorKind, FetchError};
