//! Service seams between the crawl algorithms and the outside world
//!
//! The crawl engine only ever sees these traits; the reqwest client and the
//! xlsx workbook in `infrastructure` are their production implementations.

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;

use super::category::FlatEntry;
use crate::error::CrawlError;

/// Query string pairs, in the order they are sent
pub type Query = [(&'static str, String)];

/// Why a request produced no data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// The endpoint answered "not found"
    NotFound,
    /// A success status with an empty body
    NoContent,
    /// The request did not complete in time
    Timeout,
    /// Connection or protocol failure
    Transport,
    /// Any other non-success status
    Status(u16),
}

/// Result of one JSON request. Never an error: every failure is folded into
/// `Empty` or `Malformed` so callers only distinguish "data" from "nothing".
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Data(Value),
    Empty(EmptyReason),
    /// The body arrived but was not valid JSON
    Malformed(String),
}

impl FetchOutcome {
    /// The payload, if any
    pub fn into_data(self) -> Option<Value> {
        match self {
            Self::Data(value) => Some(value),
            Self::Empty(_) | Self::Malformed(_) => None,
        }
    }
}

/// Something that can answer JSON GET requests
#[async_trait]
pub trait JsonSource: Send + Sync {
    async fn fetch_json(&self, url: &str, query: &Query) -> FetchOutcome;
}

/// Destination for the per-root tables of one run
pub trait ReportWriter {
    /// Write one root's rows under `sheet_name`, returning the name actually used
    fn write_sheet(&mut self, sheet_name: &str, rows: &[FlatEntry]) -> Result<String, CrawlError>;

    /// Flush everything; consumes the writer so it runs exactly once
    fn finish(self) -> Result<PathBuf, CrawlError>
    where
        Self: Sized;
}
