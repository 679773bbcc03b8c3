//! Row-level validation of the summary and VOC sheets
//!
//! Summary sheet: columns A..F, rows 2..13 (twelve months), in order
//! time_period, calls_offered, abandoned_after_30, fcr, dsat, csat.
//!
//! VOC sheet: columns B..W (twenty-two months). Row 1 holds the period date,
//! rows 4, 6 and 8 hold promoters, passives and detractors.
//!
//! All rows are validated and their violations collected before the caller
//! decides; one bad cell fails the whole submission.

use calamine::{Data, Range};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::models::{SummaryRecord, VocRecord};

// Zero-based sheet coordinates
pub const SUMMARY_FIRST_ROW: u32 = 1;
pub const SUMMARY_LAST_ROW: u32 = 12;
pub const VOC_FIRST_COLUMN: u32 = 1;
pub const VOC_LAST_COLUMN: u32 = 22;
pub const VOC_HEADER_ROW: u32 = 0;
pub const VOC_PROMOTERS_ROW: u32 = 3;
pub const VOC_PASSIVES_ROW: u32 = 5;
pub const VOC_DETRACTORS_ROW: u32 = 7;

static EMPTY_CELL: Data = Data::Empty;

/// Result of validating one row, one column or one sheet
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome<T> {
    Valid(T),
    /// One description per violated field
    Invalid(Vec<String>),
}

impl<T> ValidationOutcome<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid(_))
    }
}

/// VOC header cell is not a date; the sheet is structurally malformed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("VOC column {column} header is {found}, expected a date")]
pub struct VocHeaderError {
    /// Spreadsheet column letter
    pub column: String,
    pub found: String,
}

/// Validate one summary row
pub fn validate_summary_row(
    time_period: &Data,
    calls_offered: &Data,
    abandoned_after_30: &Data,
    fcr: &Data,
    dsat: &Data,
    csat: &Data,
) -> ValidationOutcome<SummaryRecord> {
    let mut violations = Vec::new();

    let time_period = collect(&mut violations, "time_period", parse_date(time_period, true));
    let calls_offered = collect(&mut violations, "calls_offered", parse_count(calls_offered));
    let abandoned_after_30 = collect(
        &mut violations,
        "abandoned_after_30",
        parse_ratio(abandoned_after_30),
    );
    let fcr = collect(&mut violations, "fcr", parse_ratio(fcr));
    let dsat = collect(&mut violations, "dsat", parse_ratio(dsat));
    let csat = collect(&mut violations, "csat", parse_ratio(csat));

    match (time_period, calls_offered, abandoned_after_30, fcr, dsat, csat) {
        (
            Some(time_period),
            Some(calls_offered),
            Some(abandoned_after_30),
            Some(fcr),
            Some(dsat),
            Some(csat),
        ) => ValidationOutcome::Valid(SummaryRecord {
            time_period,
            calls_offered,
            abandoned_after_30,
            fcr,
            dsat,
            csat,
        }),
        _ => ValidationOutcome::Invalid(violations),
    }
}

/// Validate one VOC month-column
///
/// A non-date header is a structural error (`Err`), not a field violation.
pub fn validate_voc_column(
    header_cell: &Data,
    promoters: &Data,
    passives: &Data,
    detractors: &Data,
) -> Result<ValidationOutcome<VocRecord>, VocHeaderError> {
    let time_period = parse_date(header_cell, false).map_err(|_| VocHeaderError {
        column: String::new(),
        found: describe(header_cell),
    })?;

    let mut violations = Vec::new();
    let promoters = collect(&mut violations, "promoters", parse_count(promoters));
    let passives = collect(&mut violations, "passives", parse_count(passives));
    let detractors = collect(&mut violations, "detractors", parse_count(detractors));

    Ok(match (promoters, passives, detractors) {
        (Some(promoters), Some(passives), Some(detractors)) => ValidationOutcome::Valid(VocRecord {
            time_period,
            promoters,
            passives,
            detractors,
        }),
        _ => ValidationOutcome::Invalid(violations),
    })
}

/// Validate rows 2..13 of the summary sheet
pub fn validate_summary_sheet(range: &Range<Data>) -> ValidationOutcome<Vec<SummaryRecord>> {
    let mut records = Vec::new();
    let mut violations = Vec::new();

    for row in SUMMARY_FIRST_ROW..=SUMMARY_LAST_ROW {
        let c = |col| cell(range, row, col);
        match validate_summary_row(c(0), c(1), c(2), c(3), c(4), c(5)) {
            ValidationOutcome::Valid(record) => records.push(record),
            ValidationOutcome::Invalid(found) => violations.extend(
                found
                    .into_iter()
                    .map(|v| format!("summary row {}: {}", row + 1, v)),
            ),
        }
    }

    if violations.is_empty() {
        ValidationOutcome::Valid(records)
    } else {
        ValidationOutcome::Invalid(violations)
    }
}

/// Validate columns B..W of the VOC sheet, stopping at the first non-date header
pub fn validate_voc_sheet(
    range: &Range<Data>,
) -> Result<ValidationOutcome<Vec<VocRecord>>, VocHeaderError> {
    let mut records = Vec::new();
    let mut violations = Vec::new();

    for col in VOC_FIRST_COLUMN..=VOC_LAST_COLUMN {
        let outcome = validate_voc_column(
            cell(range, VOC_HEADER_ROW, col),
            cell(range, VOC_PROMOTERS_ROW, col),
            cell(range, VOC_PASSIVES_ROW, col),
            cell(range, VOC_DETRACTORS_ROW, col),
        )
        .map_err(|e| VocHeaderError {
            column: column_letter(col),
            ..e
        })?;

        match outcome {
            ValidationOutcome::Valid(record) => records.push(record),
            ValidationOutcome::Invalid(found) => violations.extend(
                found
                    .into_iter()
                    .map(|v| format!("VOC column {}: {}", column_letter(col), v)),
            ),
        }
    }

    Ok(if violations.is_empty() {
        ValidationOutcome::Valid(records)
    } else {
        ValidationOutcome::Invalid(violations)
    })
}

/// Cell at absolute zero-based (row, col); missing cells read as empty
fn cell(range: &Range<Data>, row: u32, col: u32) -> &Data {
    range.get_value((row, col)).unwrap_or(&EMPTY_CELL)
}

fn collect<T>(violations: &mut Vec<String>, field: &str, parsed: Result<T, String>) -> Option<T> {
    match parsed {
        Ok(value) => Some(value),
        Err(problem) => {
            violations.push(format!("{}: {}", field, problem));
            None
        }
    }
}

/// Date cell → first day of its month
///
/// `allow_text` accepts ISO-formatted text cells as well as typed dates.
fn parse_date(cell: &Data, allow_text: bool) -> Result<NaiveDate, String> {
    let date = match cell {
        Data::DateTime(dt) => dt.as_datetime().map(|d| d.date()),
        Data::DateTimeIso(s) => parse_date_text(s),
        Data::String(s) if allow_text => parse_date_text(s),
        _ => None,
    };

    date.and_then(|d| NaiveDate::from_ymd_opt(d.year(), d.month(), 1))
        .ok_or_else(|| format!("expected a date, got {}", describe(cell)))
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| NaiveDate::parse_from_str(text, "%m/%d/%Y").ok())
}

/// Non-negative integer: integer cell, integral float, or integer text
fn parse_count(cell: &Data) -> Result<i64, String> {
    let value = match cell {
        Data::Int(i) => Some(*i),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Some(*f as i64),
        Data::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    match value {
        Some(v) if v >= 0 => Ok(v),
        Some(v) => Err(format!("must be non-negative, got {}", v)),
        None => Err(format!("expected an integer, got {}", describe(cell))),
    }
}

/// Ratio in [0.0, 1.0]
fn parse_ratio(cell: &Data) -> Result<f64, String> {
    let value = match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match value {
        Some(v) if (0.0..=1.0).contains(&v) => Ok(v),
        Some(v) if v > 1.0 => Err(format!("percentages must not exceed 1.0, got {}", v)),
        Some(v) => Err(format!("must be between 0.0 and 1.0, got {}", v)),
        None => Err(format!("expected a number, got {}", describe(cell))),
    }
}

fn describe(cell: &Data) -> String {
    match cell {
        Data::Empty => "an empty cell".to_string(),
        Data::String(s) => format!("text '{}'", s),
        Data::Float(f) => format!("number {}", f),
        Data::Int(i) => format!("number {}", i),
        Data::Bool(b) => format!("boolean {}", b),
        Data::Error(e) => format!("error {:?}", e),
        Data::DateTime(dt) => format!("date {:?}", dt),
        Data::DateTimeIso(s) => format!("date '{}'", s),
        Data::DurationIso(s) => format!("duration '{}'", s),
    }
}

/// 0 → A, 1 → B, ..., 25 → Z, 26 → AA
fn column_letter(col: u32) -> String {
    let mut n = col + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}
