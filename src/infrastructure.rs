//! Infrastructure layer for configuration, logging and external integrations
//!
//! Provides the HTTP-backed catalog client, the paginated product fetcher
//! and the report workbook writer used by the crawl engine.

pub mod catalog_client;
pub mod config;
pub mod logging;
pub mod product_fetcher;
pub mod report_writer;

// Re-export commonly used items
pub use catalog_client::{CatalogClient, HttpClientConfig};
pub use config::{AppConfig, CatalogConfig, ConfigManager, LoggingConfig, RunConfig};
pub use logging::{get_log_directory, init_logging_with_config};
pub use product_fetcher::ProductFetcher;
pub use report_writer::{XlsxWorkbook, sanitize_sheet_name};
