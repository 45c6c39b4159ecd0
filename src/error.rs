//! Crate error types
//!
//! Only failures that end a run (or a report) surface here. Network and
//! decoding failures of individual requests are absorbed at the fetch
//! boundary and reported as a [`FetchOutcome`](crate::domain::FetchOutcome).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("Category menu is not a JSON array (found {found})")]
    InvalidMenu { found: String },

    #[error("Report I/O failed at {path:?}: {source}")]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Workbook encoding failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("No unused sheet name left for '{name}'")]
    SheetNameExhausted { name: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl CrawlError {
    /// Wrap an I/O error with the report path it happened on
    pub fn report_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Report {
            path: path.into(),
            source,
        }
    }

    /// Describe the JSON type that was found where the menu array was expected
    pub fn invalid_menu(value: &serde_json::Value) -> Self {
        let found = match value {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "a boolean",
            serde_json::Value::Number(_) => "a number",
            serde_json::Value::String(_) => "a string",
            serde_json::Value::Array(_) => "an array",
            serde_json::Value::Object(map) if map.is_empty() => "an empty object",
            serde_json::Value::Object(_) => "an object",
        };
        Self::InvalidMenu {
            found: found.to_string(),
        }
    }
}
