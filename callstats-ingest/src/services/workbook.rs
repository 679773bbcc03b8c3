//! Workbook loading and shape validation
//!
//! A report workbook must expose exactly three sheets: the rolling summary,
//! the rolling VOC and the verbatim statements. Only the first two are read;
//! the verbatim sheet is checked for presence only.

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Cursor;
use thiserror::Error;

pub const SUMMARY_SHEET: &str = "Summary Rolling MoM";
pub const VOC_SHEET: &str = "VOC Rolling MoM";
pub const VERBATIM_SHEET: &str = "Monthly Verbatim Statements";

/// The exact sheet set a report must have (case-sensitive)
pub const REQUIRED_SHEETS: [&str; 3] = [SUMMARY_SHEET, VOC_SHEET, VERBATIM_SHEET];

#[derive(Debug, Error)]
pub enum WorkbookError {
    #[error("Unreadable workbook: {0}")]
    Parse(#[from] calamine::Error),

    #[error("Sheet '{0}' is missing")]
    MissingSheet(String),
}

/// Parsed workbook: sheet name → cell range
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: BTreeMap<String, Range<Data>>,
}

impl Workbook {
    /// Parse xlsx/xls/xlsb/ods bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WorkbookError> {
        let mut reader = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

        let mut sheets = BTreeMap::new();
        for name in reader.sheet_names() {
            let range = reader.worksheet_range(&name)?;
            sheets.insert(name, range);
        }

        Ok(Self { sheets })
    }

    /// Build from already-parsed sheets
    pub fn from_sheets(sheets: impl IntoIterator<Item = (String, Range<Data>)>) -> Self {
        Self {
            sheets: sheets.into_iter().collect(),
        }
    }

    pub fn sheet_names(&self) -> BTreeSet<String> {
        self.sheets.keys().cloned().collect()
    }

    pub fn sheet(&self, name: &str) -> Result<&Range<Data>, WorkbookError> {
        self.sheets
            .get(name)
            .ok_or_else(|| WorkbookError::MissingSheet(name.to_string()))
    }
}

/// True only when `sheet_names` is exactly the required set
pub fn has_required_sheets(sheet_names: &BTreeSet<String>) -> bool {
    sheet_names.len() == REQUIRED_SHEETS.len()
        && REQUIRED_SHEETS.iter().all(|name| sheet_names.contains(*name))
}
