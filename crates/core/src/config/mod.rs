//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (LEGIS_*)
//! 2. TOML config file (if LEGIS_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod catalog;
mod validation;

pub use catalog::Catalog;
pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (LEGIS_*, nested keys separated by `__`)
/// 2. TOML config file (if LEGIS_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Upstream API key.
    ///
    /// Set via LEGIS_API_KEY environment variable. Every upstream call fails
    /// with a configuration error while it is unset.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Upstream API base URL, including the version prefix.
    ///
    /// Set via LEGIS_BASE_URL environment variable.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path to SQLite cache database.
    ///
    /// Set via LEGIS_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for upstream requests.
    ///
    /// Set via LEGIS_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Upstream request timeout in milliseconds.
    ///
    /// Set via LEGIS_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum concurrent detail fetches inside one list composite.
    ///
    /// Set via LEGIS_FAN_OUT environment variable.
    #[serde(default = "default_fan_out")]
    pub fan_out: usize,

    /// Congress used when the congress list cannot be fetched.
    ///
    /// Set via LEGIS_FALLBACK_CONGRESS environment variable.
    #[serde(default = "default_fallback_congress")]
    pub fallback_congress: u32,

    /// Type-code tables and deep-link site.
    ///
    /// Nested keys, e.g. LEGIS_CATALOG__SITE_URL.
    #[serde(default)]
    pub catalog: Catalog,
}

fn default_base_url() -> String {
    "https://api.congress.gov/v3".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./legis-cache.sqlite")
}

fn default_user_agent() -> String {
    "legis/0.1".into()
}

fn default_timeout_ms() -> u64 {
    15_000
}

fn default_fan_out() -> usize {
    8
}

fn default_fallback_congress() -> u32 {
    119
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            fan_out: default_fan_out(),
            fallback_congress: default_fallback_congress(),
            catalog: Catalog::default(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `LEGIS_`
    /// 2. TOML file from `LEGIS_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("LEGIS_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("LEGIS_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check if the upstream API key is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the API key is not set.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "api_key".into(),
                hint: "Set LEGIS_API_KEY environment variable".into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.base_url, "https://api.congress.gov/v3");
        assert_eq!(config.db_path, PathBuf::from("./legis-cache.sqlite"));
        assert_eq!(config.user_agent, "legis/0.1");
        assert_eq!(config.timeout_ms, 15_000);
        assert_eq!(config.fan_out, 8);
        assert_eq!(config.fallback_congress, 119);
        assert!(config.api_key.is_none());
        assert_eq!(config.catalog, Catalog::default());
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(15_000));
    }

    #[test]
    fn test_require_api_key_missing() {
        let config = AppConfig::default();
        assert!(matches!(config.require_api_key(), Err(ConfigError::Missing { .. })));

        let config = AppConfig { api_key: Some(String::new()), ..Default::default() };
        assert!(matches!(config.require_api_key(), Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn test_require_api_key_present() {
        let config = AppConfig { api_key: Some("test-key".into()), ..Default::default() };
        assert_eq!(config.require_api_key().unwrap(), "test-key");
    }

    #[test]
    fn test_load_env_overrides() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("LEGIS_API_KEY", "from-env");
            jail.set_env("LEGIS_TIMEOUT_MS", "5000");
            jail.set_env("LEGIS_CATALOG__SITE_URL", "https://mirror.example");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.api_key.as_deref(), Some("from-env"));
            assert_eq!(config.timeout_ms, 5000);
            assert_eq!(config.catalog.site_url, "https://mirror.example");
            assert_eq!(config.catalog.bill_types.len(), 8);
            Ok(())
        });
    }

    #[test]
    fn test_load_toml_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("legis.toml", "fan_out = 4\nfallback_congress = 118\n")?;
            jail.set_env("LEGIS_CONFIG_FILE", "legis.toml");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.fan_out, 4);
            assert_eq!(config.fallback_congress, 118);
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("LEGIS_FAN_OUT", "0");
            assert!(matches!(AppConfig::load(), Err(ConfigError::Invalid { .. })));
            Ok(())
        });
    }
}
