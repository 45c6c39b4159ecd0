//! Catalog Crawler binary
//!
//! Loads configuration, crawls every root category under the configured
//! time limit and saves the per-root report workbook.

use anyhow::{Context, Result};
use tracing::{error, info};

use catalog_crawler::CrawlEngine;
use catalog_crawler::domain::Deadline;
use catalog_crawler::infrastructure::logging::log_system_info;
use catalog_crawler::infrastructure::{CatalogClient, ConfigManager, XlsxWorkbook, init_logging_with_config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = ConfigManager::new()?
        .load_config()
        .await
        .context("Failed to load configuration")?;
    init_logging_with_config(&config.logging)?;
    log_system_info();

    let deadline = Deadline::start(config.run.time_limit());
    let client = CatalogClient::with_config(&config.http)
        .context("Failed to create HTTP client")?;
    let engine = CrawlEngine::new(client, config.catalog.clone());
    info!("🆔 Run {} started (time limit {:?})", engine.run_id(), deadline.limit());

    let output_path = config.run.output_path.clone();
    match engine.run(&deadline, || XlsxWorkbook::create(&output_path)).await {
        Ok(summary) => {
            info!("💾 Saved: {}", summary.report_path.display());
            Ok(())
        }
        Err(e) => {
            error!("❌ Crawl aborted: {}", e);
            Err(e.into())
        }
    }
}
