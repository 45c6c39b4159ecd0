//! Catalog Crawler - time-bounded category tree crawler
//!
//! Walks the remote category tree, fetches paginated product listings for
//! every leaf category concurrently and writes one ordered report sheet per
//! root category, all under a single wall-clock deadline.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use application::{CrawlEngine, RunSummary};
pub use error::CrawlError;
