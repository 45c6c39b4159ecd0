//! Report workbook writer
//!
//! One `.xlsx` workbook per run, one worksheet per root category, with the
//! columns `ID, Name, Level`. Sheets are kept in memory and the file is
//! written once, when the workbook is finished.

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::domain::category::FlatEntry;
use crate::domain::services::ReportWriter;
use crate::error::CrawlError;

pub const MAX_SHEET_NAME_CHARS: usize = 31;

const FORBIDDEN_SHEET_CHARS: &[char] = &['[', ']', '*', '?', '/', '\\', ':'];

const FALLBACK_SHEET_NAME: &str = "Category";

/// Excel keeps this name for itself
const RESERVED_SHEET_NAME: &str = "history";

const HEADER: [&str; 3] = ["ID", "Name", "Level"];

/// Replace characters spreadsheets reject with `_` and cut to 31 characters.
///
/// A leading or trailing apostrophe is replaced as well.
pub fn sanitize_sheet_name(name: &str) -> String {
    let mut chars: Vec<char> = name
        .chars()
        .map(|ch| if FORBIDDEN_SHEET_CHARS.contains(&ch) { '_' } else { ch })
        .take(MAX_SHEET_NAME_CHARS)
        .collect();

    if let Some(last) = chars.len().checked_sub(1) {
        for end in [0, last] {
            if chars[end] == '\'' {
                chars[end] = '_';
            }
        }
    }

    if chars.is_empty() {
        FALLBACK_SHEET_NAME.to_string()
    } else {
        chars.into_iter().collect()
    }
}

/// Single-file xlsx report
pub struct XlsxWorkbook {
    path: PathBuf,
    workbook: Workbook,
    header_format: Format,
    used_names: HashSet<String>,
    /// Sheet names in write order, with their data row counts
    sheets: Vec<(String, usize)>,
}

impl XlsxWorkbook {
    /// Prepare a workbook that will be saved to `path`, creating its parent
    /// directory if needed
    pub fn create(path: impl AsRef<Path>) -> Result<Self, CrawlError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| CrawlError::report_io(parent, e))?;
        }
        info!("📁 Report workbook: {:?}", path);

        Ok(Self {
            path,
            workbook: Workbook::new(),
            header_format: Format::new().set_bold(),
            used_names: HashSet::from([RESERVED_SHEET_NAME.to_string()]),
            sheets: Vec::new(),
        })
    }

    /// Pick a name not used yet in this workbook, comparing case-insensitively
    fn claim_name(&mut self, requested: &str) -> Result<String, CrawlError> {
        let base = sanitize_sheet_name(requested);
        if self.used_names.insert(base.to_lowercase()) {
            return Ok(base);
        }

        for n in 1..=9999u32 {
            let suffix = n.to_string();
            let keep = MAX_SHEET_NAME_CHARS - suffix.len();
            let candidate: String = base.chars().take(keep).chain(suffix.chars()).collect();
            if self.used_names.insert(candidate.to_lowercase()) {
                return Ok(candidate);
            }
        }
        Err(CrawlError::SheetNameExhausted { name: base })
    }
}

fn write_rows(
    worksheet: &mut Worksheet,
    header_format: &Format,
    rows: &[FlatEntry],
) -> Result<(), CrawlError> {
    for (col, title) in (0u16..).zip(HEADER) {
        worksheet.write_string_with_format(0, col, title, header_format)?;
    }

    for (row_num, row) in (1u32..).zip(rows) {
        if let Some(id) = row.id {
            worksheet.write_number(row_num, 0, id_cell(id))?;
        }
        worksheet.write_string(row_num, 1, row.name.as_str())?;
        worksheet.write_number(row_num, 2, f64::from(row.level))?;
    }
    Ok(())
}

/// Catalog ids stay well below 2^53, so the conversion is exact
#[allow(clippy::cast_precision_loss)]
fn id_cell(id: u64) -> f64 {
    id as f64
}

impl ReportWriter for XlsxWorkbook {
    fn write_sheet(&mut self, sheet_name: &str, rows: &[FlatEntry]) -> Result<String, CrawlError> {
        let name = self.claim_name(sheet_name)?;

        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(name.as_str())?;
        write_rows(worksheet, &self.header_format, rows)?;

        debug!("Added sheet '{}' ({} rows)", name, rows.len());
        self.sheets.push((name.clone(), rows.len()));
        Ok(name)
    }

    fn finish(mut self) -> Result<PathBuf, CrawlError> {
        self.workbook.save(&self.path)?;
        info!(
            "💾 Saved report {:?} with {} sheets",
            self.path,
            self.sheets.len()
        );
        Ok(self.path)
    }
}
