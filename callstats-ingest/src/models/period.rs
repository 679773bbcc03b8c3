//! Reporting period (year, month)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar month a workbook's data pertains to
///
/// Natural key for stored summary and VOC rows. Never persisted itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReportingPeriod {
    pub year: i32,
    /// 1..=12
    pub month: u32,
}

impl ReportingPeriod {
    /// Build a period, rejecting months outside 1..=12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    /// First day of the month
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Inclusive lookup bounds as stored text, day 1 through day 31
    ///
    /// The upper bound is not a real date for short months. Stored dates are
    /// always day 1, so text comparison against "-31" still selects the month.
    pub fn lookup_bounds(&self) -> (String, String) {
        (
            format!("{:04}-{:02}-01", self.year, self.month),
            format!("{:04}-{:02}-31", self.year, self.month),
        )
    }
}

impl fmt::Display for ReportingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first_day().format("%B %Y"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_month() {
        assert!(ReportingPeriod::new(2018, 0).is_none());
        assert!(ReportingPeriod::new(2018, 13).is_none());
        assert!(ReportingPeriod::new(2018, 12).is_some());
    }

    #[test]
    fn displays_month_name_and_year() {
        let period = ReportingPeriod::new(2015, 2).unwrap();
        assert_eq!(period.to_string(), "February 2015");
    }

    #[test]
    fn lookup_bounds_are_zero_padded() {
        let period = ReportingPeriod::new(2018, 4).unwrap();
        assert_eq!(
            period.lookup_bounds(),
            ("2018-04-01".to_string(), "2018-04-31".to_string())
        );
    }
}
