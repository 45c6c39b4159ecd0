//! Application layer module
//!
//! Orchestrates one crawl run: root iteration under the deadline, leaf
//! fetch fan-out and the ordered merge that feeds the report writer.

pub mod crawl_engine;

pub use crawl_engine::{CrawlEngine, RootOutcome, RunSummary, fetch_and_merge};
