//! Summary and voice-of-customer records
//!
//! Records are created once by a successful ingestion pass and never mutated.
//! The `*View` types are the display-ready form handed to the HTTP layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One month of the summary sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SummaryRecord {
    /// First day of the month
    pub time_period: NaiveDate,
    pub calls_offered: i64,
    /// Ratio in [0.0, 1.0]
    pub abandoned_after_30: f64,
    /// Ratio in [0.0, 1.0]
    pub fcr: f64,
    /// Ratio in [0.0, 1.0]
    pub dsat: f64,
    /// Ratio in [0.0, 1.0]
    pub csat: f64,
}

impl SummaryRecord {
    pub fn as_view(&self) -> SummaryView {
        SummaryView {
            time_period: self.time_period.format("%B %Y").to_string(),
            calls_offered: group_thousands(self.calls_offered),
            abandoned_after_30: percent(self.abandoned_after_30),
            fcr: percent(self.fcr),
            dsat: percent(self.dsat),
            csat: percent(self.csat),
        }
    }
}

/// Display form of a summary row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryView {
    #[serde(rename = "Time Period")]
    pub time_period: String,
    #[serde(rename = "Calls Offered")]
    pub calls_offered: String,
    #[serde(rename = "Abandon after 30s")]
    pub abandoned_after_30: String,
    #[serde(rename = "FCR")]
    pub fcr: String,
    #[serde(rename = "DSAT")]
    pub dsat: String,
    #[serde(rename = "CSAT")]
    pub csat: String,
}

/// One month-column of the VOC sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct VocRecord {
    /// First day of the month
    pub time_period: NaiveDate,
    pub promoters: i64,
    pub passives: i64,
    pub detractors: i64,
}

impl VocRecord {
    pub fn as_view(&self) -> VocView {
        VocView {
            time_period: self.time_period.format("%B %Y").to_string(),
            promoters: self.promoters,
            passives: self.passives,
            detractors: self.detractors,
        }
    }
}

/// Display form of a VOC column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocView {
    pub time_period: String,
    pub promoters: i64,
    pub passives: i64,
    pub detractors: i64,
}

/// 2153 -> "2,153"
fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// 0.23 -> "23.00%"
fn percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}
