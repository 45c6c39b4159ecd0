//! Configuration infrastructure
//!
//! Built-in defaults live in [`defaults`]. An optional JSON file in the
//! user's config directory can override any section; missing sections and
//! fields fall back to the defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;
use url::Url;

use crate::error::CrawlError;

pub use super::catalog_client::HttpClientConfig;

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Remote catalog endpoints
    pub catalog: CatalogConfig,

    /// HTTP client behaviour
    pub http: HttpClientConfig,

    /// Deadline and report output
    pub run: RunConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Remote catalog endpoints and fixed query values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// URL of the JSON array of root categories
    pub menu_url: String,

    /// Prefix of the per-shard product endpoint (`{base}/{shard}/catalog`)
    pub product_base_url: String,

    /// `appType` query value
    pub app_type: u32,

    /// `curr` query value
    pub currency: String,
}

impl CatalogConfig {
    /// Product listing endpoint for one shard
    pub fn product_url(&self, shard: &str) -> String {
        format!(
            "{}/{}/catalog",
            self.product_base_url.trim_end_matches('/'),
            shard
        )
    }

    /// Both endpoints must be absolute http(s) URLs
    pub fn validate(&self) -> Result<(), CrawlError> {
        for (field, value) in [
            ("catalog.menu_url", &self.menu_url),
            ("catalog.product_base_url", &self.product_base_url),
        ] {
            let parsed = Url::parse(value).map_err(|e| CrawlError::Config {
                message: format!("{field} '{value}' is not a valid URL: {e}"),
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(CrawlError::Config {
                    message: format!("{field} '{value}' must use http or https"),
                });
            }
        }
        Ok(())
    }
}

/// Run-level settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Global wall-clock budget for the whole run
    pub time_limit_seconds: u64,

    /// Report workbook location
    pub output_path: PathBuf,
}

impl RunConfig {
    pub const fn time_limit(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.time_limit_seconds)
    }
}

/// Logging configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted file logs
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Number of log files to keep (older files will be deleted)
    pub max_files: u32,

    /// Enable automatic log cleanup on startup
    pub auto_cleanup_logs: bool,

    /// Module-specific log level filters (e.g., "reqwest": "info")
    pub module_filters: HashMap<String, String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            menu_url: defaults::MENU_URL.to_string(),
            product_base_url: defaults::PRODUCT_BASE_URL.to_string(),
            app_type: defaults::APP_TYPE,
            currency: defaults::CURRENCY.to_string(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            time_limit_seconds: defaults::TIME_LIMIT_SECONDS,
            output_path: PathBuf::from(defaults::OUTPUT_PATH),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            max_files: defaults::LOG_MAX_FILES,
            auto_cleanup_logs: defaults::LOG_AUTO_CLEANUP,
            module_filters: {
                let mut filters = HashMap::new();
                filters.insert("reqwest".to_string(), "info".to_string());
                filters.insert("hyper".to_string(), "warn".to_string());
                filters.insert("h2".to_string(), "warn".to_string());
                filters
            },
        }
    }
}

/// Configuration manager for locating and loading settings
pub struct ConfigManager {
    pub config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join("catalog-crawler");

        Ok(config_dir)
    }

    /// Configuration manager for the default per-user config file
    pub fn new() -> Result<Self> {
        let config_path = Self::get_config_dir()?.join("config.json");
        Ok(Self { config_path })
    }

    /// Configuration manager for an explicit file
    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// Load configuration, using built-in defaults when no file exists
    pub async fn load_config(&self) -> Result<AppConfig> {
        if !fs::try_exists(&self.config_path).await.unwrap_or(false) {
            info!(
                "Configuration file not found, using defaults: {:?}",
                self.config_path
            );
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .with_context(|| format!("Failed to read configuration file {:?}", self.config_path))?;

        let config = parse_config(&content)
            .with_context(|| format!("Invalid configuration file {:?}", self.config_path))?;

        info!("Loaded configuration from: {:?}", self.config_path);
        Ok(config)
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

/// Parse a (possibly partial) JSON configuration document
pub fn parse_config(content: &str) -> Result<AppConfig> {
    let config: AppConfig =
        serde_json::from_str(content).context("Configuration file contains invalid JSON")?;
    config.catalog.validate()?;
    Ok(config)
}

/// Default configuration values
pub mod defaults {
    /// Root category menu of the catalog
    pub const MENU_URL: &str = "https://static-basket-01.wb.ru/vol0/data/main-menu-ru-ru-v2.json";

    /// Prefix of the per-shard product listing endpoint
    pub const PRODUCT_BASE_URL: &str = "https://catalog.wb.ru/catalog";

    pub const APP_TYPE: u32 = 1;

    pub const CURRENCY: &str = "rub";

    /// Per-request timeout in seconds
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 10;

    pub const USER_AGENT: &str = concat!("catalog-crawler/", env!("CARGO_PKG_VERSION"));

    /// Global run budget in seconds
    pub const TIME_LIMIT_SECONDS: u64 = 60;

    /// Report workbook location
    pub const OUTPUT_PATH: &str = "wildberries_categories.xlsx";

    // Log configuration defaults
    pub const LOG_LEVEL: &str = "info";

    pub const LOG_JSON_FORMAT: bool = false;

    pub const LOG_CONSOLE_OUTPUT: bool = true;

    pub const LOG_FILE_OUTPUT: bool = false;

    pub const LOG_MAX_FILES: u32 = 5;

    pub const LOG_AUTO_CLEANUP: bool = true;
}
