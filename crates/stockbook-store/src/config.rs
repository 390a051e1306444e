//! # Client Configuration
//!
//! Where the inventory service lives and how the client talks to it.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOCKBOOK_API_URL=https://shop.example/api                         │
//! │     STOCKBOOK_TOKEN=...                                                │
//! │     STOCKBOOK_TIMEOUT_SECS=30                                          │
//! │     STOCKBOOK_TOP_PRODUCTS=10                                          │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/stockbook/config.toml (Linux)                            │
//! │     ~/Library/Application Support/com.stockbook.stockbook/config.toml  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:5000/api, no token, 15 s timeout, top 5           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # config.toml
//! [api]
//! url = "http://localhost:5000/api"
//! token = "5f0c..."
//! timeout_secs = 15
//!
//! [report]
//! top_products = 5
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use stockbook_core::DEFAULT_TOP_PRODUCTS;

use crate::error::{StoreError, StoreResult};

/// Longest request timeout accepted, in seconds.
pub const MAX_TIMEOUT_SECS: u64 = 300;

/// Longest top-products ranking accepted.
pub const MAX_TOP_PRODUCTS: usize = 100;

// =============================================================================
// API Settings
// =============================================================================

/// Connection to the external inventory service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL; resource paths (`/items`, `/sales`, ...) are appended.
    #[serde(default = "default_api_url")]
    pub url: String,

    /// Bearer credential. Without one every store call fails fast.
    #[serde(default)]
    pub token: Option<String>,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout() -> u64 {
    15
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            url: default_api_url(),
            token: None,
            timeout_secs: default_timeout(),
        }
    }
}

// =============================================================================
// Report Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Length of the top products ranking.
    #[serde(default = "default_top_products")]
    pub top_products: usize,
}

fn default_top_products() -> usize {
    DEFAULT_TOP_PRODUCTS
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            top_products: default_top_products(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockbookConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

impl StockbookConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (config.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> StoreResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StoreError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StoreResult<()> {
        let url = self.api.url.trim();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(StoreError::InvalidConfig(format!(
                "API URL must start with http:// or https://, got: {}",
                url
            )));
        }

        if self.api.timeout_secs == 0 || self.api.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(StoreError::InvalidConfig(format!(
                "timeout_secs must be between 1 and {}",
                MAX_TIMEOUT_SECS
            )));
        }

        if self.report.top_products == 0 || self.report.top_products > MAX_TOP_PRODUCTS {
            return Err(StoreError::InvalidConfig(format!(
                "top_products must be between 1 and {}",
                MAX_TOP_PRODUCTS
            )));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("STOCKBOOK_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.url = url;
        }

        if let Some(token) = var("STOCKBOOK_TOKEN") {
            let token = token.trim().to_string();
            self.api.token = if token.is_empty() { None } else { Some(token) };
        }

        if let Some(timeout) = var("STOCKBOOK_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring invalid STOCKBOOK_TIMEOUT_SECS"),
            }
        }

        if let Some(top) = var("STOCKBOOK_TOP_PRODUCTS") {
            match top.parse::<usize>() {
                Ok(n) => self.report.top_products = n,
                Err(_) => warn!(value = %top, "Ignoring invalid STOCKBOOK_TOP_PRODUCTS"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "stockbook", "stockbook")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Base URL without a trailing slash.
    pub fn api_url(&self) -> &str {
        self.api.url.trim().trim_end_matches('/')
    }

    pub fn token(&self) -> Option<&str> {
        self.api.token.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = StockbookConfig::default();
        assert_eq!(config.api_url(), "http://localhost:5000/api");
        assert!(config.token().is_none());
        assert_eq!(config.timeout(), Duration::from_secs(15));
        assert_eq!(config.report.top_products, DEFAULT_TOP_PRODUCTS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = StockbookConfig::default();

        config.api.url = "ftp://shop".to_string();
        assert!(matches!(config.validate(), Err(StoreError::InvalidConfig(_))));

        config.api.url = "https://shop.example/api/".to_string();
        assert!(config.validate().is_ok());
        assert_eq!(config.api_url(), "https://shop.example/api");

        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());
        config.api.timeout_secs = MAX_TIMEOUT_SECS + 1;
        assert!(config.validate().is_err());
        config.api.timeout_secs = 30;

        config.report.top_products = 0;
        assert!(config.validate().is_err());
        config.report.top_products = 10;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("STOCKBOOK_API_URL", "https://shop.example/api"),
            ("STOCKBOOK_TOKEN", " abc123 "),
            ("STOCKBOOK_TIMEOUT_SECS", "not-a-number"),
            ("STOCKBOOK_TOP_PRODUCTS", "8"),
        ]);

        let mut config = StockbookConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api_url(), "https://shop.example/api");
        assert_eq!(config.token(), Some("abc123"));
        assert_eq!(config.api.timeout_secs, 15);
        assert_eq!(config.report.top_products, 8);
    }

    #[test]
    fn test_toml_serialization() {
        let mut config = StockbookConfig::default();
        config.api.token = Some("secret".into());
        config.report.top_products = 3;

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("top_products = 3"));

        let parsed: StockbookConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: StockbookConfig = toml::from_str("[api]\ntoken = \"t\"\n").unwrap();
        assert_eq!(parsed.api.url, default_api_url());
        assert_eq!(parsed.token(), Some("t"));
        assert_eq!(parsed.report.top_products, DEFAULT_TOP_PRODUCTS);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("stockbook-config-does-not-exist.toml");
        let config = StockbookConfig::load(Some(path));
        // Environment overrides may apply, but the result must still validate
        assert!(config.is_ok());
    }
}
