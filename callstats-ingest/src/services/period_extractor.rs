//! Reporting period inference from filenames
//!
//! Convention: `<arbitrary>_<month>_<year...>.<ext>`, e.g.
//! `expedia_report_monthly_january_2018.xlsx`.
//!
//! The month token is matched case-insensitively on its first three letters
//! and must be a prefix of the full month name ("jan", "janu", "january").
//! The year is the first four characters of the last token.

use thiserror::Error;

use crate::models::ReportingPeriod;

/// Token delimiter in report filenames
pub const FILENAME_DELIMITER: char = '_';

/// Month lookup: abbreviation, full name, number
const MONTHS: [(&str, &str, u32); 12] = [
    ("jan", "january", 1),
    ("feb", "february", 2),
    ("mar", "march", 3),
    ("apr", "april", 4),
    ("may", "may", 5),
    ("jun", "june", 6),
    ("jul", "july", 7),
    ("aug", "august", 8),
    ("sep", "september", 9),
    ("oct", "october", 10),
    ("nov", "november", 11),
    ("dec", "december", 12),
];

/// Filename does not encode a recognizable month/year
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("{0} does not follow the <name>_<month>_<year> naming convention")]
    MissingTokens(String),

    #[error("'{token}' in {filename} is not a month")]
    UnknownMonth { filename: String, token: String },

    #[error("'{token}' in {filename} does not start with a four-digit year")]
    InvalidYear { filename: String, token: String },
}

/// Derive (month, year) from a report filename
pub fn extract(filename: &str) -> Result<ReportingPeriod, PeriodError> {
    let tokens: Vec<&str> = filename.split(FILENAME_DELIMITER).collect();
    if tokens.len() < 2 {
        return Err(PeriodError::MissingTokens(filename.to_string()));
    }

    let month_token = tokens[tokens.len() - 2];
    let year_token = tokens[tokens.len() - 1];

    let month = parse_month(month_token).ok_or_else(|| PeriodError::UnknownMonth {
        filename: filename.to_string(),
        token: month_token.to_string(),
    })?;

    let invalid_year = || PeriodError::InvalidYear {
        filename: filename.to_string(),
        token: year_token.to_string(),
    };
    let year_digits = year_token.get(..4).ok_or_else(invalid_year)?;
    if !year_digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid_year());
    }
    let year: i32 = year_digits.parse().map_err(|_| invalid_year())?;

    ReportingPeriod::new(year, month).ok_or_else(invalid_year)
}

fn parse_month(token: &str) -> Option<u32> {
    let token = token.to_lowercase();
    let abbreviation = token.get(..3)?;

    MONTHS
        .iter()
        .find(|(abbrev, full, _)| *abbrev == abbreviation && full.starts_with(token.as_str()))
        .map(|(_, _, number)| *number)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period(year: i32, month: u32) -> ReportingPeriod {
        ReportingPeriod::new(year, month).unwrap()
    }

    #[test]
    fn full_month_name() {
        assert_eq!(
            extract("expedia_report_monthly_january_2018.xlsx"),
            Ok(period(2018, 1))
        );
    }

    #[test]
    fn abbreviation_any_case() {
        assert_eq!(extract("calls_DEC_2019.xlsx"), Ok(period(2019, 12)));
        assert_eq!(extract("calls_Sept_2020.xls"), Ok(period(2020, 9)));
        assert_eq!(extract("calls_may_2021"), Ok(period(2021, 5)));
    }

    #[test]
    fn quarter_token_is_not_a_month() {
        let err = extract("expedia_report_monthly_q1.xlsx").unwrap_err();
        assert!(matches!(err, PeriodError::UnknownMonth { .. }));
    }

    #[test]
    fn month_prefix_with_garbage_is_rejected() {
        let err = extract("unreal_percent_janubad_2018.xlsx").unwrap_err();
        assert!(matches!(err, PeriodError::UnknownMonth { ref token, .. } if token == "janubad"));
    }

    #[test]
    fn non_numeric_year() {
        let err = extract("expedia_report_monthly_march_march.xlsx").unwrap_err();
        assert!(matches!(err, PeriodError::InvalidYear { .. }));
    }

    #[test]
    fn short_year_token() {
        assert!(matches!(
            extract("report_june_18.xlsx"),
            Err(PeriodError::InvalidYear { .. })
        ));
    }

    #[test]
    fn no_delimiter() {
        assert_eq!(
            extract("report.xlsx"),
            Err(PeriodError::MissingTokens("report.xlsx".to_string()))
        );
    }

    #[test]
    fn two_letter_month_token() {
        assert!(matches!(
            extract("report_ja_2018.xlsx"),
            Err(PeriodError::UnknownMonth { .. })
        ));
    }
}
