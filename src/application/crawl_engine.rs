//! Crawl engine
//!
//! Roots are processed one after another. Within a root every scheduled
//! leaf is fetched concurrently on the current task (no spawning), all
//! fetches are awaited together, and their products are merged back in
//! anchor order, so completion order never affects the report.
//!
//! The deadline is consulted before each root and once more when a root's
//! processing begins. It is never consulted inside a root: a slow leaf
//! delays the next check rather than being cancelled.

use futures::future::join_all;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use crate::domain::category::{CategoryNode, FlatEntry, PendingFetch};
use crate::domain::deadline::Deadline;
use crate::domain::flatten::{Flattened, flatten_category};
use crate::domain::merge::merge_products;
use crate::domain::services::{FetchOutcome, JsonSource, ReportWriter};
use crate::error::CrawlError;
use crate::infrastructure::config::CatalogConfig;
use crate::infrastructure::product_fetcher::ProductFetcher;
use crate::infrastructure::report_writer::sanitize_sheet_name;

/// What happened to a single root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootOutcome {
    Written {
        sheet: String,
        rows: usize,
        products: usize,
    },
    /// The deadline had passed when the root's processing began
    Skipped,
}

/// Totals of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub roots_total: usize,
    pub roots_written: usize,
    /// Roots left out because the deadline had passed
    pub roots_skipped: usize,
    /// Roots whose JSON could not be read as a category
    pub roots_failed: usize,
    pub products_total: usize,
    pub elapsed: Duration,
    pub report_path: PathBuf,
}

impl RunSummary {
    /// Every root made it into the report
    pub const fn is_complete(&self) -> bool {
        self.roots_skipped == 0 && self.roots_failed == 0
    }
}

/// Runs all scheduled leaf fetches of one root together and merges the
/// results into `entries`. Returns the number of product rows inserted.
pub async fn fetch_and_merge<S: JsonSource + ?Sized>(
    fetcher: &ProductFetcher<'_, S>,
    entries: &mut Vec<FlatEntry>,
    pending: &[PendingFetch],
) -> usize {
    let fetches = pending
        .iter()
        .map(|leaf| fetcher.fetch_leaf(leaf.category_id, &leaf.shard));
    let results = join_all(fetches).await;

    merge_products(entries, pending.iter().map(|leaf| leaf.anchor).zip(results))
}

/// Drives one crawl run over a shared JSON source
pub struct CrawlEngine<S> {
    source: S,
    catalog: CatalogConfig,
    run_id: Uuid,
}

impl<S: JsonSource> CrawlEngine<S> {
    pub fn new(source: S, catalog: CatalogConfig) -> Self {
        Self {
            source,
            catalog,
            run_id: Uuid::new_v4(),
        }
    }

    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Crawl every root into a report opened by `open_report`.
    ///
    /// The report is opened only after the root list has been fetched, so a
    /// fatal menu failure leaves no report behind. The engine, and with it
    /// the shared HTTP session, is released when the run returns.
    pub async fn run<W, F>(self, deadline: &Deadline, open_report: F) -> Result<RunSummary, CrawlError>
    where
        W: ReportWriter,
        F: FnOnce() -> Result<W, CrawlError>,
    {
        let span = info_span!("crawl_run", run_id = %self.run_id);
        self.run_inner(deadline, open_report).instrument(span).await
    }

    async fn run_inner<W, F>(&self, deadline: &Deadline, open_report: F) -> Result<RunSummary, CrawlError>
    where
        W: ReportWriter,
        F: FnOnce() -> Result<W, CrawlError>,
    {
        info!("🔍 Loading categories...");
        let roots = self.fetch_roots().await?;
        info!("📋 Found {} root categories", roots.len());

        let mut report = open_report()?;
        let mut summary = RunSummary {
            run_id: self.run_id,
            roots_total: roots.len(),
            roots_written: 0,
            roots_skipped: 0,
            roots_failed: 0,
            products_total: 0,
            elapsed: Duration::ZERO,
            report_path: PathBuf::new(),
        };

        for (index, raw_root) in roots.into_iter().enumerate() {
            if deadline.is_exceeded() {
                warn!(
                    "⏰ Time limit of {:?} reached, skipping {} remaining roots",
                    deadline.limit(),
                    summary.roots_total - index
                );
                summary.roots_skipped += summary.roots_total - index;
                break;
            }

            let root: CategoryNode = match serde_json::from_value(raw_root) {
                Ok(root) => root,
                Err(e) => {
                    error!("❌ Root category #{} is not a valid category: {}", index, e);
                    summary.roots_failed += 1;
                    continue;
                }
            };

            info!("🚀 Processing {}...", root.display_name());
            match self.process_root(&root, deadline, &mut report).await? {
                RootOutcome::Written { products, .. } => {
                    summary.roots_written += 1;
                    summary.products_total += products;
                }
                RootOutcome::Skipped => summary.roots_skipped += 1,
            }
        }

        summary.report_path = report.finish()?;
        summary.elapsed = deadline.elapsed();

        info!(
            "📊 Run finished in {:.1?}: {}/{} roots written, {} skipped, {} failed, {} products",
            summary.elapsed,
            summary.roots_written,
            summary.roots_total,
            summary.roots_skipped,
            summary.roots_failed,
            summary.products_total
        );
        Ok(summary)
    }

    /// The root category list; anything but a JSON array ends the run
    pub async fn fetch_roots(&self) -> Result<Vec<Value>, CrawlError> {
        match self.source.fetch_json(&self.catalog.menu_url, &[]).await {
            FetchOutcome::Data(Value::Array(roots)) => Ok(roots),
            FetchOutcome::Data(other) => {
                let err = CrawlError::invalid_menu(&other);
                error!("❌ {}", err);
                Err(err)
            }
            FetchOutcome::Empty(reason) => {
                let err = CrawlError::InvalidMenu {
                    found: format!("no data ({reason:?})"),
                };
                error!("❌ {}", err);
                Err(err)
            }
            FetchOutcome::Malformed(message) => {
                let err = CrawlError::InvalidMenu {
                    found: format!("an undecodable body ({message})"),
                };
                error!("❌ {}", err);
                Err(err)
            }
        }
    }

    /// Flatten, fetch, merge and write one root
    pub async fn process_root<W: ReportWriter>(
        &self,
        root: &CategoryNode,
        deadline: &Deadline,
        report: &mut W,
    ) -> Result<RootOutcome, CrawlError> {
        if deadline.is_exceeded() {
            warn!("⏰ Skipping {} due to time limit", root.display_name());
            return Ok(RootOutcome::Skipped);
        }

        let sheet_name = sanitize_sheet_name(&root.name);
        let Flattened { mut entries, pending } = flatten_category(root);

        let products = if pending.is_empty() {
            0
        } else {
            info!(
                "📦 Loading products for {} ({} leaves)...",
                root.display_name(),
                pending.len()
            );
            let fetcher = ProductFetcher::new(&self.source, &self.catalog);
            fetch_and_merge(&fetcher, &mut entries, &pending).await
        };

        let sheet = report.write_sheet(&sheet_name, &entries)?;
        Ok(RootOutcome::Written {
            sheet,
            rows: entries.len(),
            products,
        })
    }
}
